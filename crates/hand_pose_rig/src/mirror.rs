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

use crate::{HandInfo, PoseError, Rig};
use hand_pose_format::MirrorRule;

/// Joints are paired by their position in the listing, so both hands must
/// have the same tree layout.
pub fn check_mirror_layout<J: Copy + PartialEq, K: Copy + PartialEq>(
    a: &HandInfo<J>,
    b: &HandInfo<K>,
) -> Result<(), PoseError> {
    if a.is_topology_equal(b) {
        return Ok(());
    }
    Err(PoseError::TopologyMismatch {
        left: a.len(),
        right: b.len(),
    })
}

/// Reflect the source hand onto the target hand. Joints are matched by their
/// position in the listing, and only joints included in both hands are
/// written. Returns how many joint rotations were written.
///
/// Nothing is written when the two hands are laid out differently.
pub fn mirror_hand<R: Rig>(
    rule: &MirrorRule,
    source_info: &HandInfo<R::Joint>,
    source: &R,
    target_info: &HandInfo<R::Joint>,
    target: &mut R,
) -> Result<usize, PoseError> {
    check_mirror_layout(source_info, target_info)?;
    target.set_attachment(rule.attachment(&source.attachment()));

    let mut written = 0;
    for (from, to) in source_info.entries().iter().zip(target_info.entries()) {
        if !(from.included && to.included) {
            continue;
        }
        target.set_local_rotation(to.joint, rule.joint(source.local_rotation(from.joint)));
        written += 1;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joint_tree::tests::two_finger_hand;
    use glam::{Quat, Vec3};
    use hand_pose_format::Attachment;

    #[test]
    fn mirror_twice_restores_source() {
        let rule = MirrorRule::default();
        let mut left = two_finger_hand();
        let mut right = two_finger_hand();
        left.attachment = Attachment::new(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_xyzw(0.0, 0.1, 0.2, 0.9).normalize(),
        );
        let mut left_info = HandInfo::build(&left);
        let mut right_info = HandInfo::build(&right);
        left_info.include_all(true);
        right_info.include_all(true);
        for (i, joint) in left_info.joints().enumerate() {
            let angle = 0.1 * i as f32;
            left.set_local_rotation(joint, Quat::from_euler(glam::EulerRot::YXZ, angle, -angle, 0.5));
        }
        let original = left.clone();

        assert_eq!(
            mirror_hand(&rule, &left_info, &left, &right_info, &mut right).unwrap(),
            9
        );
        assert!(right.attachment.offset.abs_diff_eq(Vec3::new(-1.0, 2.0, 3.0), 1e-6));

        left.attachment = Attachment::default();
        mirror_hand(&rule, &right_info, &right, &left_info, &mut left).unwrap();

        assert!(left.attachment.offset.abs_diff_eq(original.attachment.offset, 1e-6));
        assert!(
            left.attachment
                .rotation
                .abs_diff_eq(original.attachment.rotation, 1e-6)
        );
        for joint in left_info.joints() {
            assert!(
                left.local_rotation(joint)
                    .abs_diff_eq(original.local_rotation(joint), 1e-6)
            );
        }
    }

    #[test]
    fn only_joints_included_in_both_hands_are_written() {
        let rule = MirrorRule::default();
        let mut left = two_finger_hand();
        let mut right = two_finger_hand();
        let mut left_info = HandInfo::build(&left);
        let mut right_info = HandInfo::build(&right);
        left_info.set_included(1, true);
        left_info.set_included(2, true);
        right_info.set_included(2, true);
        right_info.set_included(3, true);

        for joint in left_info.joints().collect::<Vec<_>>() {
            left.set_local_rotation(joint, Quat::from_rotation_x(0.3));
        }

        assert_eq!(
            mirror_hand(&rule, &left_info, &left, &right_info, &mut right).unwrap(),
            1
        );
        let changed: Vec<_> = right
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.rotation != Quat::IDENTITY)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(changed, vec![2]);
        assert!(right.nodes[2].rotation.abs_diff_eq(Quat::from_rotation_x(-0.3), 1e-6));
    }

    #[test]
    fn differently_shaped_hands_are_not_mirrored() {
        let rule = MirrorRule::default();
        let mut left = crate::JointTree::new("wrist");
        left.add_chain(crate::JointId::ROOT, &["thumb_1", "thumb_2"], Vec3::X * 0.03)
            .unwrap();
        let mut right = two_finger_hand();
        let mut left_info = HandInfo::build(&left);
        let mut right_info = HandInfo::build(&right);
        left_info.include_all(true);
        right_info.include_all(true);
        for joint in left_info.joints().collect::<Vec<_>>() {
            left.set_local_rotation(joint, Quat::from_rotation_z(0.4));
        }
        let original = right.clone();

        assert!(matches!(
            mirror_hand(&rule, &left_info, &left, &right_info, &mut right),
            Err(PoseError::TopologyMismatch { left: 3, right: 9 })
        ));
        assert_eq!(right, original);
    }
}
