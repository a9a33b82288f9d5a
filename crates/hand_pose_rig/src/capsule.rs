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

use crate::{Finger, Rig};
use glam::Vec3;
use hand_pose_format::AutoPoseSettings;
use serde::{Deserialize, Serialize};

/// Local axis of a joint that a capsule collider is aligned with.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapsuleAxis {
    #[default]
    X,
    Y,
    Z,
}

impl CapsuleAxis {
    pub fn unit(&self) -> Vec3 {
        match self {
            CapsuleAxis::X => Vec3::X,
            CapsuleAxis::Y => Vec3::Y,
            CapsuleAxis::Z => Vec3::Z,
        }
    }
}

/// Capsule collider in the local frame of the joint it is attached to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SegmentCapsule {
    pub axis: CapsuleAxis,
    pub radius: f32,
    pub height: f32,
    pub center: Vec3,
}

impl SegmentCapsule {
    /// Capsule spanning from one joint to the next joint of its finger.
    ///
    /// The axis is the local joint axis most aligned with the direction to
    /// the next joint, preferring Z then Y then X when several round to a
    /// unit component.
    pub fn between<R: Rig>(rig: &R, joint: R::Joint, next: R::Joint, radius: f32) -> Self {
        let start = rig.world_translation(joint);
        let end = rig.world_translation(next);
        let direction = (end - start).normalize_or_zero();
        let rotation = rig.world_rotation(joint);

        let alignment = [
            (rotation * Vec3::X).dot(direction).round(),
            (rotation * Vec3::Y).dot(direction).round(),
            (rotation * Vec3::Z).dot(direction).round(),
        ];
        let (axis, sign) = [CapsuleAxis::Z, CapsuleAxis::Y, CapsuleAxis::X]
            .into_iter()
            .zip([alignment[2], alignment[1], alignment[0]])
            .find(|(_, sign)| *sign != 0.0)
            .unwrap_or((CapsuleAxis::X, 1.0));

        let height = start.distance(end);
        Self {
            axis,
            radius,
            height,
            center: axis.unit() * (height / 2.0) * sign,
        }
    }

    /// Capsule extending backwards along X from the last joint of a finger.
    pub fn fingertip(length: f32, radius: f32) -> Self {
        Self {
            axis: CapsuleAxis::X,
            radius,
            height: length,
            center: -Vec3::X * (length / 2.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FingerSegment<J> {
    pub joint: J,
    pub capsule: SegmentCapsule,
}

/// Colliders for every segment of every finger, root to tip: one per joint
/// pair, plus one on the tip joint when fingertips are enabled.
pub fn finger_segments<R: Rig>(
    rig: &R,
    fingers: &[Finger<R::Joint>],
    settings: &AutoPoseSettings,
) -> Vec<Vec<FingerSegment<R::Joint>>> {
    fingers
        .iter()
        .map(|finger| {
            let mut segments: Vec<_> = finger
                .windows(2)
                .map(|pair| FingerSegment {
                    joint: pair[0],
                    capsule: SegmentCapsule::between(rig, pair[0], pair[1], settings.capsule_radius),
                })
                .collect();
            if settings.use_fingertip {
                if let Some(tip) = finger.last() {
                    segments.push(FingerSegment {
                        joint: *tip,
                        capsule: SegmentCapsule::fingertip(
                            settings.fingertip_length,
                            settings.capsule_radius,
                        ),
                    });
                }
            }
            segments
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HandInfo, JointId, JointTree, derive_fingers, joint_tree::tests::two_finger_hand};
    use float_eq::assert_float_eq;
    use glam::Quat;

    #[test]
    fn capsule_follows_bone_direction() {
        let tree = two_finger_hand();
        let index_2 = tree.find("index_2").unwrap();
        let index_3 = tree.find("index_3").unwrap();

        let capsule = SegmentCapsule::between(&tree, index_2, index_3, 0.01);
        assert_eq!(capsule.axis, CapsuleAxis::Y);
        assert_float_eq!(capsule.height, 0.03, abs <= 1e-6);
        assert!(capsule.center.abs_diff_eq(Vec3::new(0.0, 0.015, 0.0), 1e-6));

        let mut reversed = JointTree::new("wrist");
        let bones = reversed
            .add_chain(JointId::ROOT, &["a", "b"], Vec3::NEG_X * 0.02)
            .unwrap();
        reversed.set_local_rotation(bones[0], Quat::from_rotation_y(0.1));
        let capsule = SegmentCapsule::between(&reversed, bones[0], bones[1], 0.01);
        assert_eq!(capsule.axis, CapsuleAxis::X);
        assert_float_eq!(capsule.height, 0.02, abs <= 1e-6);
        assert!(capsule.center.abs_diff_eq(Vec3::new(-0.01, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn segments_per_finger() {
        let tree = two_finger_hand();
        let mut info = HandInfo::build(&tree);
        info.include_all(true);
        let fingers = derive_fingers(&info);

        let mut settings = AutoPoseSettings::default();
        let segments = finger_segments(&tree, &fingers, &settings);
        assert_eq!(segments.len(), 2);
        assert!(segments.iter().all(|finger| finger.len() == 3));
        assert_eq!(segments[0][0].joint, fingers[0][0]);

        settings.use_fingertip = true;
        let segments = finger_segments(&tree, &fingers, &settings);
        assert!(segments.iter().all(|finger| finger.len() == 4));
        let tip = segments[0][3];
        assert_eq!(tip.joint, fingers[0][3]);
        assert_float_eq!(tip.capsule.height, 0.025, abs <= 1e-6);
        assert!(tip.capsule.center.abs_diff_eq(Vec3::new(-0.0125, 0.0, 0.0), 1e-6));
    }
}
