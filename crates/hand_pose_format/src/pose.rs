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
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which hands an operator should act on.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandSelector {
    #[default]
    None,
    Left,
    Right,
    Both,
}

impl HandSelector {
    pub fn from_flags(left: bool, right: bool) -> Self {
        match (left, right) {
            (false, false) => HandSelector::None,
            (true, false) => HandSelector::Left,
            (false, true) => HandSelector::Right,
            (true, true) => HandSelector::Both,
        }
    }

    pub fn includes(&self, side: Side) -> bool {
        match self {
            HandSelector::None => false,
            HandSelector::Left => side == Side::Left,
            HandSelector::Right => side == Side::Right,
            HandSelector::Both => true,
        }
    }

    /// Get the selected side if exactly one hand is selected.
    pub fn single(&self) -> Option<Side> {
        match self {
            HandSelector::Left => Some(Side::Left),
            HandSelector::Right => Some(Side::Right),
            HandSelector::None | HandSelector::Both => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, HandSelector::None)
    }

    pub fn sides(self) -> impl Iterator<Item = Side> {
        Side::BOTH.into_iter().filter(move |side| self.includes(*side))
    }

    pub fn with(self, side: Side) -> Self {
        HandSelector::from_flags(
            self.includes(Side::Left) || side == Side::Left,
            self.includes(Side::Right) || side == Side::Right,
        )
    }
}

impl From<Side> for HandSelector {
    fn from(side: Side) -> Self {
        match side {
            Side::Left => HandSelector::Left,
            Side::Right => HandSelector::Right,
        }
    }
}

/// Where a hand sits relative to the object it is posed against.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Attachment {
    #[serde(default)]
    pub offset: Vec3,
    #[serde(default)]
    pub rotation: Quat,
}

impl Attachment {
    pub fn new(offset: Vec3, rotation: Quat) -> Self {
        Self { offset, rotation }
    }
}

/// Snapshot of one hand: its attachment and the local rotation of every
/// joint that participates in authored poses, in hand traversal order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct HandPose {
    #[serde(default)]
    pub attachment: Attachment,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rotations: Vec<Quat>,
}

impl HandPose {
    pub fn new(attachment: Attachment, rotations: Vec<Quat>) -> Self {
        Self {
            attachment,
            rotations,
        }
    }

    pub fn len(&self) -> usize {
        self.rotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rotations.is_empty()
    }

    /// True if this pose can be applied to a hand with `included` joints.
    pub fn fits(&self, included: usize) -> bool {
        self.rotations.len() == included
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct HandPoseData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub left: HandPose,
    #[serde(default)]
    pub right: HandPose,
}

impl HandPoseData {
    pub fn new(name: impl Into<String>, left: HandPose, right: HandPose) -> Self {
        Self {
            name: name.into(),
            left,
            right,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn hand(&self, side: Side) -> &HandPose {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn hand_mut(&mut self, side: Side) -> &mut HandPose {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// True if both hands can be applied to rigs with the given included
    /// joint counts.
    pub fn fits(&self, left_included: usize, right_included: usize) -> bool {
        self.left.fits(left_included) && self.right.fits(right_included)
    }
}
