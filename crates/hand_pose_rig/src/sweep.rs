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

use crate::{FingerSegment, Rig};
use glam::{EulerRot, Quat, Vec3};
use hand_pose_format::AutoPoseSettings;
use std::{collections::HashMap, hash::Hash};

/// Enable switch of the capsule collider attached to each finger segment.
///
/// The physics host disables a collider when its segment touches the target.
pub trait SegmentColliders<J> {
    fn is_collider_enabled(&self, joint: J) -> bool;

    fn set_collider_enabled(&mut self, joint: J, enabled: bool);
}

/// Collider switches kept in a map. Joints without an entry count as having
/// no enabled collider.
#[derive(Debug, Clone)]
pub struct ColliderSet<J> {
    enabled: HashMap<J, bool>,
}

impl<J> Default for ColliderSet<J> {
    fn default() -> Self {
        Self {
            enabled: HashMap::new(),
        }
    }
}

impl<J: Copy + Eq + Hash> ColliderSet<J> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, joint: J) {
        self.enabled.insert(joint, true);
    }

    /// Report a contact between the segment of `joint` and the target.
    pub fn contact(&mut self, joint: J) {
        if let Some(enabled) = self.enabled.get_mut(&joint) {
            *enabled = false;
        }
    }

    pub fn enabled_count(&self) -> usize {
        self.enabled.values().filter(|e| **e).count()
    }

    pub fn len(&self) -> usize {
        self.enabled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }
}

impl<J: Copy + Eq + Hash> SegmentColliders<J> for ColliderSet<J> {
    fn is_collider_enabled(&self, joint: J) -> bool {
        self.enabled.get(&joint).copied().unwrap_or(false)
    }

    fn set_collider_enabled(&mut self, joint: J, enabled: bool) {
        self.enabled.insert(joint, enabled);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepStatus {
    Running,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentProgress<J> {
    pub joint: J,
    /// Number of rotation steps applied to this segment so far.
    pub progress: u32,
}

/// Rotation applied by one step of the sweep, from Euler angles in degrees
/// composed in Y, X, Z order.
pub fn euler_step(degrees: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        degrees.y.to_radians(),
        degrees.x.to_radians(),
        degrees.z.to_radians(),
    )
}

/// Curls the fingers of one hand until each segment either touches the
/// target or runs out of rotation steps.
///
/// Each call to [`AutoPoseSweep::tick`] advances every finger by at most one
/// step. Contacts must be evaluated between ticks.
#[derive(Debug, Clone)]
pub struct AutoPoseSweep<J> {
    fingers: Vec<Vec<SegmentProgress<J>>>,
    step: Quat,
    ceiling: u32,
    iterations: u32,
    finished: bool,
}

impl<J: Copy> AutoPoseSweep<J> {
    /// `fingers` lists the segment joints of each finger from root to tip.
    pub fn new(fingers: Vec<Vec<J>>, rotation_step: Vec3, ceiling: u32) -> Self {
        Self {
            fingers: fingers
                .into_iter()
                .map(|finger| {
                    finger
                        .into_iter()
                        .map(|joint| SegmentProgress { joint, progress: 0 })
                        .collect()
                })
                .collect(),
            step: euler_step(rotation_step),
            ceiling,
            iterations: 0,
            finished: false,
        }
    }

    pub fn from_segments(
        segments: &[Vec<FingerSegment<J>>],
        settings: &AutoPoseSettings,
    ) -> Self {
        Self::new(
            segments
                .iter()
                .map(|finger| finger.iter().map(|segment| segment.joint).collect())
                .collect(),
            settings.rotation_step,
            settings.rotation_ceiling,
        )
    }

    /// Advance every finger by one step.
    ///
    /// For each finger the active segment is the one nearest the tip whose
    /// collider is still enabled. It rotates by one step while below the
    /// ceiling, and once the ceiling is reached its collider is disabled
    /// instead. The sweep finishes on the first tick where no finger has an
    /// active segment.
    pub fn tick<R, C>(&mut self, rig: &mut R, colliders: &mut C) -> SweepStatus
    where
        R: Rig<Joint = J>,
        C: SegmentColliders<J>,
    {
        if self.finished {
            return SweepStatus::Finished;
        }

        let mut any_active = false;
        for finger in &mut self.fingers {
            let Some(segment) = finger
                .iter_mut()
                .rev()
                .find(|segment| colliders.is_collider_enabled(segment.joint))
            else {
                continue;
            };

            any_active = true;
            if segment.progress < self.ceiling {
                rig.rotate_local(segment.joint, self.step);
                segment.progress += 1;
            } else {
                colliders.set_collider_enabled(segment.joint, false);
            }
        }

        if !any_active {
            self.finished = true;
            return SweepStatus::Finished;
        }
        self.iterations += 1;
        SweepStatus::Running
    }

    pub fn fingers(&self) -> &[Vec<SegmentProgress<J>>] {
        &self.fingers
    }

    pub fn segments(&self) -> impl Iterator<Item = J> + '_ {
        self.fingers.iter().flatten().map(|segment| segment.joint)
    }

    /// Number of ticks that had at least one active segment.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn total_progress(&self) -> u32 {
        self.fingers
            .iter()
            .flatten()
            .map(|segment| segment.progress)
            .sum()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Re-enable the collider of every segment, e.g. to retry after a cancel.
    pub fn restore_colliders<C: SegmentColliders<J>>(&self, colliders: &mut C) {
        for joint in self.segments() {
            colliders.set_collider_enabled(joint, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{JointId, JointTree};

    fn single_finger() -> (JointTree, Vec<JointId>) {
        let mut tree = JointTree::new("wrist");
        let joints = tree
            .add_chain(JointId::ROOT, &["a", "b", "c", "d"], Vec3::Y * 0.03)
            .unwrap();
        (tree, joints)
    }

    fn colliders_for(joints: &[JointId]) -> ColliderSet<JointId> {
        let mut colliders = ColliderSet::new();
        for joint in joints {
            colliders.insert(*joint);
        }
        colliders
    }

    #[test]
    fn sweep_stops_at_ceiling() {
        let (mut tree, joints) = single_finger();
        let segments = joints[..3].to_vec();
        let mut colliders = colliders_for(&segments);
        let step = Vec3::new(0.0, 0.0, 2.0);
        let mut sweep = AutoPoseSweep::new(vec![segments.clone()], step, 5);

        let mut ticks = 0;
        while sweep.tick(&mut tree, &mut colliders) == SweepStatus::Running {
            ticks += 1;
            assert!(ticks <= 3 * (5 + 1), "sweep did not terminate");
        }

        assert_eq!(sweep.total_progress(), 15);
        assert!(sweep.fingers()[0].iter().all(|s| s.progress == 5));
        assert_eq!(sweep.iterations(), 18);
        assert_eq!(colliders.enabled_count(), 0);
        assert!(sweep.is_finished());
        assert_eq!(sweep.tick(&mut tree, &mut colliders), SweepStatus::Finished);

        let expected = Quat::from_rotation_z(10f32.to_radians());
        for joint in &segments {
            assert!(tree.local_rotation(*joint).abs_diff_eq(expected, 1e-5));
        }
        assert_eq!(tree.local_rotation(joints[3]), Quat::IDENTITY);
    }

    #[test]
    fn contact_stops_one_segment_early() {
        let (mut tree, joints) = single_finger();
        let segments = joints[..3].to_vec();
        let mut colliders = colliders_for(&segments);
        let mut sweep = AutoPoseSweep::new(vec![segments.clone()], Vec3::Z, 5);

        let mut iteration = 0;
        while sweep.tick(&mut tree, &mut colliders) == SweepStatus::Running {
            iteration += 1;
            if iteration == 2 {
                colliders.contact(segments[1]);
            }
        }

        let progress: Vec<_> = sweep.fingers()[0].iter().map(|s| s.progress).collect();
        assert_eq!(progress, vec![5, 0, 5]);
        assert_eq!(tree.local_rotation(segments[1]), Quat::IDENTITY);
        assert_eq!(colliders.enabled_count(), 0);
    }

    #[test]
    fn contact_on_tip_moves_to_next_segment() {
        let (mut tree, joints) = single_finger();
        let segments = joints[..3].to_vec();
        let mut colliders = colliders_for(&segments);
        let mut sweep = AutoPoseSweep::new(vec![segments.clone()], Vec3::Z, 5);

        sweep.tick(&mut tree, &mut colliders);
        colliders.contact(segments[2]);
        sweep.tick(&mut tree, &mut colliders);

        let progress: Vec<_> = sweep.fingers()[0].iter().map(|s| s.progress).collect();
        assert_eq!(progress, vec![0, 1, 1]);
    }

    #[test]
    fn fingers_advance_in_lockstep() {
        let mut tree = JointTree::new("wrist");
        let a = tree
            .add_chain(JointId::ROOT, &["a1", "a2", "a3"], Vec3::Y)
            .unwrap();
        let b = tree
            .add_chain(JointId::ROOT, &["b1", "b2", "b3"], Vec3::Y)
            .unwrap();
        let mut colliders = colliders_for(&[a[0], a[1], b[0], b[1]]);
        let mut sweep = AutoPoseSweep::new(vec![a[..2].to_vec(), b[..2].to_vec()], Vec3::X, 3);

        for _ in 0..2 {
            sweep.tick(&mut tree, &mut colliders);
        }
        colliders.contact(b[1]);
        sweep.tick(&mut tree, &mut colliders);
        assert_eq!(sweep.fingers()[0][1].progress, 3);
        assert_eq!(sweep.fingers()[1][1].progress, 2);
        assert_eq!(sweep.fingers()[1][0].progress, 1);

        while sweep.tick(&mut tree, &mut colliders) == SweepStatus::Running {}
        assert_eq!(sweep.total_progress(), 3 + 3 + 2 + 3);

        sweep.restore_colliders(&mut colliders);
        assert_eq!(colliders.enabled_count(), 4);
    }

    #[test]
    fn missing_collider_counts_as_disabled() {
        let (mut tree, joints) = single_finger();
        let mut colliders = ColliderSet::new();
        let mut sweep = AutoPoseSweep::new(vec![joints[..3].to_vec()], Vec3::Z, 5);
        assert_eq!(sweep.tick(&mut tree, &mut colliders), SweepStatus::Finished);
        assert_eq!(sweep.iterations(), 0);
    }
}
