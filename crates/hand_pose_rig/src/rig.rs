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

use glam::{Quat, Vec3};
use hand_pose_format::Attachment;
use std::{fmt::Debug, hash::Hash};

/// Access to the joint hierarchy and transforms of one hand.
///
/// The embedding application implements this for whatever scene graph it
/// keeps its hands in. [`crate::JointTree`] is a self-contained implementation.
pub trait Rig {
    type Joint: Copy + Eq + Hash + Debug;

    fn root(&self) -> Self::Joint;

    /// Children of a joint in sibling order.
    fn children(&self, joint: Self::Joint) -> Vec<Self::Joint>;

    fn joint_name(&self, joint: Self::Joint) -> String;

    fn local_rotation(&self, joint: Self::Joint) -> Quat;

    fn set_local_rotation(&mut self, joint: Self::Joint, rotation: Quat);

    fn world_translation(&self, joint: Self::Joint) -> Vec3;

    fn world_rotation(&self, joint: Self::Joint) -> Quat;

    /// Placement of the whole hand relative to the object being posed against.
    fn attachment(&self) -> Attachment;

    fn set_attachment(&mut self, attachment: Attachment);

    /// Rotate a joint in its own frame.
    fn rotate_local(&mut self, joint: Self::Joint, rotation: Quat) {
        let current = self.local_rotation(joint);
        self.set_local_rotation(joint, (current * rotation).normalize());
    }
}
