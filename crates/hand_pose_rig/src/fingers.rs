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

use crate::HandInfo;

/// A chain of joints from the base of a finger to its tip.
pub type Finger<J> = Vec<J>;

/// Split the included joints of a hand into fingers.
///
/// A joint continues the current chain when its only child is the next
/// included joint. Otherwise the chain ends at that joint, and chains that
/// never started (a lone joint or a branching joint) are dropped.
pub fn derive_fingers<J: Copy + PartialEq>(info: &HandInfo<J>) -> Vec<Finger<J>> {
    let included: Vec<_> = info.entries().iter().filter(|e| e.included).collect();
    let mut fingers = Vec::new();
    let mut chain = Vec::new();
    for (i, entry) in included.iter().enumerate() {
        let next = included.get(i + 1).map(|e| e.joint);
        if entry.sole_child.is_some() && entry.sole_child == next {
            chain.push(entry.joint);
        } else if !chain.is_empty() {
            chain.push(entry.joint);
            fingers.push(std::mem::take(&mut chain));
        }
    }
    fingers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{JointId, JointTree, joint_tree::tests::two_finger_hand};
    use glam::Vec3;

    #[test]
    fn linear_chain_is_one_finger() {
        let mut tree = JointTree::new("a");
        tree.add_chain(JointId::ROOT, &["b", "c"], Vec3::Y).unwrap();
        let mut info = HandInfo::build(&tree);
        info.include_all(true);

        let fingers = derive_fingers(&info);
        assert_eq!(fingers, vec![vec![JointId(0), JointId(1), JointId(2)]]);
    }

    fn three_joint_fingers() -> JointTree {
        let mut tree = JointTree::new("root");
        tree.add_chain(JointId::ROOT, &["a1", "a2", "a3"], Vec3::Y)
            .unwrap();
        tree.add_chain(JointId::ROOT, &["b1", "b2", "b3"], Vec3::Y)
            .unwrap();
        tree
    }

    #[test]
    fn branching_root_is_not_part_of_a_finger() {
        let tree = three_joint_fingers();
        let mut info = HandInfo::build(&tree);
        info.include_all(true);
        let with_root = derive_fingers(&info);
        assert_eq!(with_root.len(), 2);
        assert!(with_root.iter().all(|finger| finger.len() == 3));
        assert!(!with_root.iter().flatten().any(|j| *j == JointId::ROOT));

        info.set_included(0, false);
        assert_eq!(derive_fingers(&info), with_root);
    }

    #[test]
    fn excluded_joints_split_fingers() {
        let tree = two_finger_hand();
        let mut info = HandInfo::build(&tree);
        info.include_all(true);
        info.set_included_by_name("index_3", false);

        let fingers = derive_fingers(&info);
        let names: Vec<Vec<String>> = fingers
            .iter()
            .map(|f| f.iter().map(|j| tree.nodes[j.index()].name.clone()).collect())
            .collect();
        assert_eq!(
            names,
            vec![
                vec!["index_1".to_owned(), "index_2".to_owned()],
                vec![
                    "middle_1".to_owned(),
                    "middle_2".to_owned(),
                    "middle_3".to_owned(),
                    "middle_4".to_owned()
                ],
            ]
        );
    }
}
