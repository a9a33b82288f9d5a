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

use crate::*;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// The quaternion components that get negated when reflecting a rotation
/// across the sagittal plane.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuatAxes {
    #[serde(default)]
    pub x: bool,
    #[serde(default)]
    pub y: bool,
    #[serde(default)]
    pub z: bool,
}

impl QuatAxes {
    pub const XZ: QuatAxes = QuatAxes {
        x: true,
        y: false,
        z: true,
    };

    pub const YZ: QuatAxes = QuatAxes {
        x: false,
        y: true,
        z: true,
    };

    pub fn reflect(&self, rotation: Quat) -> Quat {
        let flip = |negate: bool, value: f32| if negate { -value } else { value };
        Quat::from_xyzw(
            flip(self.x, rotation.x),
            flip(self.y, rotation.y),
            flip(self.z, rotation.z),
            rotation.w,
        )
    }
}

/// How a pose is reflected from one hand onto the other.
///
/// The attachment rotation is expressed in the frame of the posed object while
/// joint rotations are expressed in the parent joint frame, so the two use
/// different component sets.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MirrorRule {
    pub attachment: QuatAxes,
    pub joints: QuatAxes,
}

impl Default for MirrorRule {
    fn default() -> Self {
        Self {
            attachment: QuatAxes::YZ,
            joints: QuatAxes::XZ,
        }
    }
}

impl MirrorRule {
    pub fn attachment(&self, attachment: &Attachment) -> Attachment {
        let offset = attachment.offset;
        Attachment {
            offset: Vec3::new(-offset.x, offset.y, offset.z),
            rotation: self.attachment.reflect(attachment.rotation),
        }
    }

    pub fn joint(&self, rotation: Quat) -> Quat {
        self.joints.reflect(rotation)
    }

    /// Reflect a whole stored hand pose. Rotations stay index-aligned, so the
    /// result only makes sense for a hand with the same included joints.
    pub fn hand_pose(&self, pose: &HandPose) -> HandPose {
        HandPose {
            attachment: self.attachment(&pose.attachment),
            rotations: pose.rotations.iter().map(|r| self.joint(*r)).collect(),
        }
    }
}
