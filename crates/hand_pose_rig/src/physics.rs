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

use crate::{PoseError, SegmentCapsule, SegmentColliders};
use tracing::debug;

/// What the target object offers for contact detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetShape {
    Collider,
    /// No collider, but a mesh that a convex collider can be derived from.
    Mesh,
    Empty,
}

/// The physics engine of the embedding application.
pub trait PhysicsHost<J>: SegmentColliders<J> {
    /// Handle of an object that hands can be posed against.
    type Target;

    fn target_shape(&self, target: &Self::Target) -> TargetShape;

    fn add_convex_mesh_collider(&mut self, target: &Self::Target);

    /// Make the target a kinematic trigger without gravity so that it reports
    /// contacts without being pushed around.
    fn configure_target_body(&mut self, target: &Self::Target);

    /// Attach (or reshape) the capsule collider of a finger segment.
    fn attach_segment_capsule(&mut self, joint: J, capsule: SegmentCapsule);

    /// Run one physics step, disabling the collider of every segment that
    /// touches the target.
    fn simulate(&mut self);
}

/// Make sure the target can report contacts with finger segments.
pub fn prepare_target<J, P: PhysicsHost<J>>(
    physics: &mut P,
    target: &P::Target,
) -> Result<(), PoseError> {
    match physics.target_shape(target) {
        TargetShape::Collider => {}
        TargetShape::Mesh => {
            debug!("Deriving a convex collider for the auto pose target");
            physics.add_convex_mesh_collider(target);
        }
        TargetShape::Empty => {
            return Err(PoseError::MissingPrerequisite(
                "the auto pose target needs a collider or a mesh".to_owned(),
            ));
        }
    }
    physics.configure_target_body(target);
    Ok(())
}
