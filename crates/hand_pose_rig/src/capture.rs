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
use glam::Quat;
use hand_pose_format::{Attachment, HandPose};

/// Read the attachment and the local rotation of every included joint.
pub fn capture<R: Rig>(info: &HandInfo<R::Joint>, rig: &R) -> HandPose {
    HandPose::new(
        rig.attachment(),
        info.entries()
            .iter()
            .filter(|entry| entry.included)
            .map(|entry| rig.local_rotation(entry.joint))
            .collect(),
    )
}

/// Write a pose into the rig. The rig is left untouched if the pose was
/// captured with a different number of included joints.
pub fn apply<R: Rig>(pose: &HandPose, info: &HandInfo<R::Joint>, rig: &mut R) -> Result<(), PoseError> {
    let expected = info.included_count();
    if !pose.fits(expected) {
        return Err(PoseError::PoseMismatch {
            expected,
            found: pose.len(),
        });
    }

    rig.set_attachment(pose.attachment);
    let included = info.entries().iter().filter(|entry| entry.included);
    for (entry, rotation) in included.zip(&pose.rotations) {
        rig.set_local_rotation(entry.joint, *rotation);
    }
    Ok(())
}

/// Every joint rotation of a hand, recorded when the hand is attached so it
/// can be reset later regardless of which joints are included.
#[derive(Debug, Clone, PartialEq)]
pub struct RestPose<J> {
    pub attachment: Attachment,
    pub rotations: Vec<(J, Quat)>,
}

impl<J: Copy + PartialEq> RestPose<J> {
    pub fn capture<R: Rig<Joint = J>>(info: &HandInfo<J>, rig: &R) -> Self {
        Self {
            attachment: rig.attachment(),
            rotations: info
                .joints()
                .map(|joint| (joint, rig.local_rotation(joint)))
                .collect(),
        }
    }

    pub fn restore<R: Rig<Joint = J>>(&self, rig: &mut R) {
        rig.set_attachment(self.attachment);
        for (joint, rotation) in &self.rotations {
            rig.set_local_rotation(*joint, *rotation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{JointId, joint_tree::tests::two_finger_hand};
    use glam::{EulerRot, Vec3};

    fn arbitrary_rotation(i: usize) -> Quat {
        let t = i as f32;
        Quat::from_euler(EulerRot::YXZ, 0.1 * t, -0.2 * t, 0.05 * t + 0.3)
    }

    #[test]
    fn capture_apply_roundtrip() {
        let mut tree = two_finger_hand();
        let mut info = HandInfo::build(&tree);
        info.include_all(true);
        info.set_included(0, false);
        for (i, joint) in info.included_joints().into_iter().enumerate() {
            tree.set_local_rotation(joint, arbitrary_rotation(i));
        }
        tree.attachment = Attachment::new(Vec3::new(0.1, 0.2, 0.3), arbitrary_rotation(9));

        let pose = capture(&info, &tree);
        assert_eq!(pose.len(), 8);

        let mut other = two_finger_hand();
        apply(&pose, &info, &mut other).unwrap();
        assert_eq!(other, tree);
        assert_eq!(capture(&info, &other), pose);
    }

    #[test]
    fn mismatched_pose_leaves_rig_untouched() {
        let mut tree = two_finger_hand();
        for index in ["index", "middle", "ring"] {
            let base = tree
                .add_child(JointId::ROOT, format!("{index}_0"), Vec3::Y * 0.05)
                .unwrap();
            tree.add_child(base, format!("{index}_x"), Vec3::Y * 0.02)
                .unwrap();
        }
        let mut info = HandInfo::build(&tree);
        info.include_all(true);
        for i in 0..3 {
            info.set_included(i, false);
        }
        assert_eq!(info.included_count(), 12);
        for (i, joint) in info.included_joints().into_iter().enumerate() {
            tree.set_local_rotation(joint, arbitrary_rotation(i));
        }
        let before = tree.clone();

        let stored = HandPose::new(
            Attachment::new(Vec3::ONE, Quat::IDENTITY),
            vec![Quat::from_rotation_x(1.0); 10],
        );
        let result = apply(&stored, &info, &mut tree);
        assert!(matches!(
            result,
            Err(PoseError::PoseMismatch {
                expected: 12,
                found: 10
            })
        ));
        assert_eq!(tree, before);
    }

    #[test]
    fn rest_pose_restores_everything() {
        let mut tree = two_finger_hand();
        let mut info = HandInfo::build(&tree);
        let rest = RestPose::capture(&info, &tree);

        info.set_included_by_name("index_1", true);
        for joint in info.joints().collect::<Vec<_>>() {
            tree.set_local_rotation(joint, Quat::from_rotation_y(0.4));
        }
        tree.attachment.offset = Vec3::X;

        rest.restore(&mut tree);
        assert_eq!(tree, two_finger_hand());
    }
}
