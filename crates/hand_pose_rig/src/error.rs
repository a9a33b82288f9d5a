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

use hand_pose_format::{HandSelector, StoreError};
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum PoseError {
    #[error("pose has {found} joint rotations but the hand has {expected} included joints")]
    PoseMismatch { expected: usize, found: usize },
    #[error("[{operation}] cannot run with hand selection {selection:?}")]
    AmbiguousSelection {
        operation: &'static str,
        selection: HandSelector,
    },
    #[error("no pose named [{0}] in the pose file")]
    MissingRecord(String),
    #[error("missing prerequisite: {0}")]
    MissingPrerequisite(String),
    #[error("left hand has {left} joints but right hand has {right} joints")]
    TopologyMismatch { left: usize, right: usize },
    #[error(transparent)]
    Store(#[from] StoreError),
}
