/*
 * Copyright (C) 2026 Open Source Robotics Foundation
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 *
*/

use crate::Rig;
use glam::{Quat, Vec3};
use hand_pose_format::Attachment;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt, path::Path};
use thiserror::Error as ThisError;

/// Index of a joint inside its [`JointTree`]. The root is always `JointId(0)`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct JointId(pub u32);

impl JointId {
    pub const ROOT: JointId = JointId(0);

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

fn default_true() -> bool {
    true
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct JointNode {
    pub name: String,
    /// Position relative to the parent joint.
    #[serde(default)]
    pub translation: Vec3,
    /// Rotation relative to the parent joint.
    #[serde(default)]
    pub rotation: Quat,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<JointId>,
}

impl JointNode {
    pub fn new(name: impl Into<String>, translation: Vec3) -> Self {
        Self {
            name: name.into(),
            translation,
            rotation: Quat::IDENTITY,
            enabled: true,
            children: Vec::new(),
        }
    }
}

#[derive(ThisError, Debug)]
pub enum JointTreeError {
    #[error("joint tree has no root joint")]
    Empty,
    #[error("joint {0} does not exist")]
    MissingJoint(JointId),
    #[error("joint {0} has more than one parent")]
    MultipleParents(JointId),
    #[error("joint {0} cannot be reached from the root")]
    Unreachable(JointId),
    #[error("failed reading joint tree file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed parsing joint tree file: {0}")]
    RonRead(#[from] ron::error::SpannedError),
    #[error("failed writing joint tree file: {0}")]
    RonWrite(#[from] ron::Error),
}

/// An in-memory joint hierarchy of one hand.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct JointTree {
    #[serde(default)]
    pub attachment: Attachment,
    pub nodes: Vec<JointNode>,
}

impl JointTree {
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            attachment: Attachment::default(),
            nodes: vec![JointNode::new(root_name, Vec3::ZERO)],
        }
    }

    pub fn add_child(
        &mut self,
        parent: JointId,
        name: impl Into<String>,
        translation: Vec3,
    ) -> Result<JointId, JointTreeError> {
        if parent.index() >= self.nodes.len() {
            return Err(JointTreeError::MissingJoint(parent));
        }
        let id = JointId(self.nodes.len() as u32);
        self.nodes.push(JointNode::new(name, translation));
        self.nodes[parent.index()].children.push(id);
        Ok(id)
    }

    /// Add a linear chain of joints below `parent`, each offset from the
    /// previous one by `translation`.
    pub fn add_chain(
        &mut self,
        parent: JointId,
        names: &[&str],
        translation: Vec3,
    ) -> Result<Vec<JointId>, JointTreeError> {
        let mut chain = Vec::with_capacity(names.len());
        let mut parent = parent;
        for name in names {
            parent = self.add_child(parent, *name, translation)?;
            chain.push(parent);
        }
        Ok(chain)
    }

    pub fn node(&self, joint: JointId) -> Option<&JointNode> {
        self.nodes.get(joint.index())
    }

    pub fn node_mut(&mut self, joint: JointId) -> Option<&mut JointNode> {
        self.nodes.get_mut(joint.index())
    }

    pub fn parent(&self, joint: JointId) -> Option<JointId> {
        self.nodes
            .iter()
            .position(|node| node.children.contains(&joint))
            .map(|index| JointId(index as u32))
    }

    pub fn find(&self, name: &str) -> Option<JointId> {
        self.nodes
            .iter()
            .position(|node| node.name == name)
            .map(|index| JointId(index as u32))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check that the nodes form a single tree rooted at [`JointId::ROOT`].
    pub fn validate(&self) -> Result<(), JointTreeError> {
        if self.nodes.is_empty() {
            return Err(JointTreeError::Empty);
        }

        let mut seen = HashSet::new();
        seen.insert(JointId::ROOT);
        let mut queue = vec![JointId::ROOT];
        while let Some(joint) = queue.pop() {
            let node = self.node(joint).ok_or(JointTreeError::MissingJoint(joint))?;
            for child in &node.children {
                if child.index() >= self.nodes.len() {
                    return Err(JointTreeError::MissingJoint(*child));
                }
                if !seen.insert(*child) {
                    return Err(JointTreeError::MultipleParents(*child));
                }
                queue.push(*child);
            }
        }

        if let Some(index) = (0..self.nodes.len()).find(|i| !seen.contains(&JointId(*i as u32))) {
            return Err(JointTreeError::Unreachable(JointId(index as u32)));
        }
        Ok(())
    }

    /// Compose the world transform of a joint from the attachment down.
    fn world_transform(&self, joint: JointId) -> (Vec3, Quat) {
        let mut path = vec![joint];
        let mut current = joint;
        while let Some(parent) = self.parent(current) {
            if path.contains(&parent) {
                break;
            }
            path.push(parent);
            current = parent;
        }

        let mut translation = self.attachment.offset;
        let mut rotation = self.attachment.rotation;
        for joint in path.iter().rev() {
            if let Some(node) = self.node(*joint) {
                translation += rotation * node.translation;
                rotation *= node.rotation;
            }
        }
        (translation, rotation)
    }

    pub fn from_str_ron(s: &str) -> Result<Self, JointTreeError> {
        let tree: Self = ron::de::from_str(s)?;
        tree.validate()?;
        Ok(tree)
    }

    pub fn to_string_ron(&self) -> Result<String, JointTreeError> {
        let style = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .struct_names(false);
        Ok(ron::ser::to_string_pretty(self, style)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, JointTreeError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_str_ron(&contents)
    }

    pub fn to_path(&self, path: &Path) -> Result<(), JointTreeError> {
        std::fs::write(path, self.to_string_ron()?)?;
        Ok(())
    }
}

impl Rig for JointTree {
    type Joint = JointId;

    fn root(&self) -> JointId {
        JointId::ROOT
    }

    fn children(&self, joint: JointId) -> Vec<JointId> {
        self.node(joint)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    fn joint_name(&self, joint: JointId) -> String {
        self.node(joint)
            .map(|node| node.name.clone())
            .unwrap_or_else(|| joint.to_string())
    }

    fn local_rotation(&self, joint: JointId) -> Quat {
        self.node(joint)
            .map(|node| node.rotation)
            .unwrap_or(Quat::IDENTITY)
    }

    fn set_local_rotation(&mut self, joint: JointId, rotation: Quat) {
        if let Some(node) = self.node_mut(joint) {
            node.rotation = rotation;
        }
    }

    fn world_translation(&self, joint: JointId) -> Vec3 {
        self.world_transform(joint).0
    }

    fn world_rotation(&self, joint: JointId) -> Quat {
        self.world_transform(joint).1
    }

    fn attachment(&self) -> Attachment {
        self.attachment
    }

    fn set_attachment(&mut self, attachment: Attachment) {
        self.attachment = attachment;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use float_eq::assert_float_eq;
    use testdir::testdir;

    /// A wrist with an index and a middle finger of four joints each.
    pub(crate) fn two_finger_hand() -> JointTree {
        let mut tree = JointTree::new("wrist");
        let index = tree
            .add_child(JointId::ROOT, "index_1", Vec3::new(0.02, 0.08, 0.0))
            .unwrap();
        tree.add_chain(index, &["index_2", "index_3", "index_4"], Vec3::Y * 0.03)
            .unwrap();
        let middle = tree
            .add_child(JointId::ROOT, "middle_1", Vec3::new(0.0, 0.085, 0.0))
            .unwrap();
        tree.add_chain(middle, &["middle_2", "middle_3", "middle_4"], Vec3::Y * 0.03)
            .unwrap();
        tree
    }

    #[test]
    fn build_and_query() {
        let tree = two_finger_hand();
        assert_eq!(tree.len(), 9);
        tree.validate().unwrap();

        let index_2 = tree.find("index_2").unwrap();
        assert_eq!(tree.parent(index_2), tree.find("index_1"));
        assert_eq!(tree.parent(JointId::ROOT), None);
        assert_eq!(tree.children(JointId::ROOT).len(), 2);
        assert!(matches!(
            tree.clone().add_child(JointId(42), "x", Vec3::ZERO),
            Err(JointTreeError::MissingJoint(JointId(42)))
        ));
    }

    #[test]
    fn world_transform_follows_hierarchy() {
        let mut tree = two_finger_hand();
        tree.attachment.offset = Vec3::new(1.0, 0.0, 0.0);
        let index_1 = tree.find("index_1").unwrap();
        let index_2 = tree.find("index_2").unwrap();

        let p = tree.world_translation(index_2);
        assert_float_eq!(p.x, 1.02, abs <= 1e-6);
        assert_float_eq!(p.y, 0.11, abs <= 1e-6);

        tree.set_local_rotation(index_1, Quat::from_rotation_z(std::f32::consts::FRAC_PI_2));
        let p = tree.world_translation(index_2);
        assert_float_eq!(p.x, 0.99, abs <= 1e-6);
        assert_float_eq!(p.y, 0.08, abs <= 1e-6);
        assert!(
            tree.world_rotation(index_2)
                .abs_diff_eq(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2), 1e-6)
        );
    }

    #[test]
    fn invalid_trees_are_rejected() {
        let mut tree = two_finger_hand();
        tree.nodes[0].children.push(JointId(2));
        assert!(matches!(
            tree.validate(),
            Err(JointTreeError::MultipleParents(JointId(2)))
        ));

        let mut tree = two_finger_hand();
        tree.nodes.push(JointNode::new("orphan", Vec3::ZERO));
        assert!(matches!(tree.validate(), Err(JointTreeError::Unreachable(_))));

        let tree = JointTree {
            attachment: Attachment::default(),
            nodes: Vec::new(),
        };
        assert!(matches!(tree.validate(), Err(JointTreeError::Empty)));
    }

    #[test]
    fn ron_file_roundtrip() {
        let dir = testdir!();
        let path = dir.join("hand.ron");
        let tree = two_finger_hand();
        tree.to_path(&path).unwrap();
        assert_eq!(JointTree::from_path(&path).unwrap(), tree);
    }
}
