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

use crate::{PoseError, Rig};

/// Where an entry sits in the depth-first listing of a hand.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TreePosition {
    pub depth: usize,
    /// This joint is the last child of its parent.
    pub is_last: bool,
    /// For each ancestor between the root and this entry's parent (inclusive
    /// of the parent, exclusive of the root), whether that ancestor still has
    /// siblings listed after it.
    pub ancestors_continue: Vec<bool>,
}

impl TreePosition {
    /// Render the tree-art prefix shown in front of a joint name.
    pub fn label(&self) -> String {
        if self.depth == 0 {
            return "    ".to_owned();
        }

        let mut label = String::new();
        for continues in &self.ancestors_continue {
            label.push_str(if *continues { "│  " } else { "   " });
        }
        label.push_str(if self.is_last { "└" } else { "├" });
        label
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HandEntry<J> {
    pub joint: J,
    pub name: String,
    pub position: TreePosition,
    /// Whether this joint is captured into poses.
    pub included: bool,
    pub sole_child: Option<J>,
}

/// Depth-first listing of every joint in one hand together with which joints
/// participate in poses.
#[derive(Debug, Clone, PartialEq)]
pub struct HandInfo<J> {
    entries: Vec<HandEntry<J>>,
}

impl<J> Default for HandInfo<J> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<J: Copy + PartialEq> HandInfo<J> {
    /// Walk the rig depth-first, children in sibling order. No joint starts
    /// out included.
    pub fn build<R: Rig<Joint = J>>(rig: &R) -> Self {
        let mut entries = Vec::new();
        let mut stack = vec![(rig.root(), TreePosition::default())];
        while let Some((joint, position)) = stack.pop() {
            let children = rig.children(joint);
            let sole_child = match children.as_slice() {
                [only] => Some(*only),
                _ => None,
            };

            let mut ancestors_continue = position.ancestors_continue.clone();
            if position.depth > 0 {
                ancestors_continue.push(!position.is_last);
            }
            let count = children.len();
            for (i, child) in children.into_iter().enumerate().rev() {
                stack.push((
                    child,
                    TreePosition {
                        depth: position.depth + 1,
                        is_last: i + 1 == count,
                        ancestors_continue: ancestors_continue.clone(),
                    },
                ));
            }

            entries.push(HandEntry {
                joint,
                name: rig.joint_name(joint),
                position,
                included: false,
                sole_child,
            });
        }
        Self { entries }
    }

    /// Rebuild after the topology of the rig changed, keeping the inclusion
    /// of every joint that still exists.
    pub fn rebuild<R: Rig<Joint = J>>(&mut self, rig: &R) {
        let mut rebuilt = Self::build(rig);
        for entry in &mut rebuilt.entries {
            entry.included = self
                .entries
                .iter()
                .any(|old| old.joint == entry.joint && old.included);
        }
        *self = rebuilt;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[HandEntry<J>] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&HandEntry<J>> {
        self.entries.get(index)
    }

    pub fn joints(&self) -> impl Iterator<Item = J> + '_ {
        self.entries.iter().map(|entry| entry.joint)
    }

    pub fn index_of(&self, joint: J) -> Option<usize> {
        self.entries.iter().position(|entry| entry.joint == joint)
    }

    pub fn included_joints(&self) -> Vec<J> {
        self.entries
            .iter()
            .filter(|entry| entry.included)
            .map(|entry| entry.joint)
            .collect()
    }

    pub fn included_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.included).count()
    }

    pub fn is_included(&self, index: usize) -> bool {
        self.entries.get(index).is_some_and(|entry| entry.included)
    }

    /// Returns false if there is no entry at `index`.
    pub fn set_included(&mut self, index: usize, included: bool) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                entry.included = included;
                true
            }
            None => false,
        }
    }

    /// Returns false if no joint has that name.
    pub fn set_included_by_name(&mut self, name: &str, included: bool) -> bool {
        match self.entries.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => {
                entry.included = included;
                true
            }
            None => false,
        }
    }

    pub fn include_all(&mut self, included: bool) {
        for entry in &mut self.entries {
            entry.included = included;
        }
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| entry.position.label())
            .collect()
    }

    /// Two hands have the same shape if their listings line up entry by entry.
    pub fn is_topology_equal<K>(&self, other: &HandInfo<K>) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(&other.entries)
                .all(|(a, b)| a.position == b.position)
    }
}

/// One line of the combined view of both hands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairedRow {
    pub label: String,
    pub name: String,
    pub included: bool,
}

/// Merge the listings of both hands into one, for rigs that are laid out the
/// same way. A row counts as included only if it is included in both hands.
pub fn paired_rows<J: Copy + PartialEq>(
    left: &HandInfo<J>,
    right: &HandInfo<J>,
) -> Result<Vec<PairedRow>, PoseError> {
    check_pair(left, right)?;
    Ok(left
        .entries
        .iter()
        .zip(&right.entries)
        .map(|(l, r)| PairedRow {
            label: l.position.label(),
            name: if l.name == r.name {
                l.name.clone()
            } else {
                format!("{} | {}", l.name, r.name)
            },
            included: l.included && r.included,
        })
        .collect())
}

/// Toggle one row of the combined view in both hands at once.
pub fn set_paired_included<J: Copy + PartialEq>(
    left: &mut HandInfo<J>,
    right: &mut HandInfo<J>,
    index: usize,
    included: bool,
) -> Result<bool, PoseError> {
    check_pair(left, right)?;
    let found = left.set_included(index, included);
    right.set_included(index, included);
    Ok(found)
}

fn check_pair<J>(left: &HandInfo<J>, right: &HandInfo<J>) -> Result<(), PoseError> {
    if left.entries.len() != right.entries.len() {
        return Err(PoseError::TopologyMismatch {
            left: left.entries.len(),
            right: right.entries.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{JointId, JointTree, joint_tree::tests::two_finger_hand};
    use glam::Vec3;

    #[test]
    fn depth_first_order() {
        let tree = two_finger_hand();
        let info = HandInfo::build(&tree);
        let names: Vec<_> = info.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "wrist", "index_1", "index_2", "index_3", "index_4", "middle_1", "middle_2",
                "middle_3", "middle_4"
            ]
        );
        assert_eq!(info.included_count(), 0);
        assert_eq!(info.entry(0).unwrap().sole_child, None);
        assert_eq!(info.entry(1).unwrap().sole_child, tree.find("index_2"));
        assert_eq!(info.entry(4).unwrap().sole_child, None);
    }

    #[test]
    fn tree_labels() {
        let mut tree = JointTree::new("root");
        let a = tree.add_child(JointId::ROOT, "a", Vec3::ZERO).unwrap();
        tree.add_child(a, "a1", Vec3::ZERO).unwrap();
        tree.add_child(a, "a2", Vec3::ZERO).unwrap();
        let b = tree.add_child(JointId::ROOT, "b", Vec3::ZERO).unwrap();
        tree.add_child(b, "b1", Vec3::ZERO).unwrap();

        let info = HandInfo::build(&tree);
        assert_eq!(
            info.labels(),
            vec!["    ", "├", "│  ├", "│  └", "└", "   └"]
        );
        assert_eq!(info.entry(2).unwrap().position.depth, 2);
    }

    #[test]
    fn inclusion_survives_rebuild() {
        let mut tree = two_finger_hand();
        let mut info = HandInfo::build(&tree);
        assert!(info.set_included_by_name("index_2", true));
        assert!(info.set_included(5, true));
        assert!(!info.set_included(100, true));
        assert!(!info.set_included_by_name("thumb_1", true));

        tree.add_chain(JointId::ROOT, &["thumb_1", "thumb_2"], Vec3::X * 0.02)
            .unwrap();
        info.rebuild(&tree);
        assert_eq!(info.len(), 11);
        assert_eq!(
            info.included_joints(),
            vec![tree.find("index_2").unwrap(), tree.find("middle_1").unwrap()]
        );
    }

    #[test]
    fn paired_view() {
        let left = two_finger_hand();
        let mut right = two_finger_hand();
        right.nodes[1].name = "r_index_1".to_owned();

        let mut left_info = HandInfo::build(&left);
        let mut right_info = HandInfo::build(&right);
        left_info.set_included(2, true);
        set_paired_included(&mut left_info, &mut right_info, 1, true).unwrap();

        let rows = paired_rows(&left_info, &right_info).unwrap();
        assert_eq!(rows[1].name, "index_1 | r_index_1");
        assert_eq!(rows[2].name, "index_2");
        assert!(rows[1].included);
        assert!(!rows[2].included);
        assert!(left_info.is_topology_equal(&right_info));

        let mut small = JointTree::new("wrist");
        small.add_child(JointId::ROOT, "index_1", Vec3::Y).unwrap();
        let small_info = HandInfo::build(&small);
        assert!(matches!(
            paired_rows(&left_info, &small_info),
            Err(PoseError::TopologyMismatch { left: 9, right: 2 })
        ));
    }
}
