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

use glam::Quat;
use hand_pose_format::{Attachment, Side};

/// State of everything an operator is about to change, recorded before the
/// change happens.
#[derive(Debug, Clone, PartialEq)]
pub struct UndoCheckpoint<J> {
    pub label: String,
    pub attachments: Vec<(Side, Attachment)>,
    pub rotations: Vec<(Side, J, Quat)>,
}

impl<J> UndoCheckpoint<J> {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            attachments: Vec::new(),
            rotations: Vec::new(),
        }
    }

    pub fn sides(&self) -> impl Iterator<Item = Side> + '_ {
        self.attachments.iter().map(|(side, _)| *side)
    }
}

/// Undo service of the embedding application.
pub trait UndoRecorder<J> {
    fn record(&mut self, checkpoint: UndoCheckpoint<J>);
}

/// Discard checkpoints.
impl<J> UndoRecorder<J> for () {
    fn record(&mut self, _: UndoCheckpoint<J>) {}
}

/// Keeps every checkpoint in memory, most recent last.
#[derive(Debug, Clone)]
pub struct UndoHistory<J> {
    checkpoints: Vec<UndoCheckpoint<J>>,
}

impl<J> Default for UndoHistory<J> {
    fn default() -> Self {
        Self {
            checkpoints: Vec::new(),
        }
    }
}

impl<J> UndoHistory<J> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn checkpoints(&self) -> &[UndoCheckpoint<J>] {
        &self.checkpoints
    }

    pub fn labels(&self) -> Vec<&str> {
        self.checkpoints.iter().map(|c| c.label.as_str()).collect()
    }

    pub fn last(&self) -> Option<&UndoCheckpoint<J>> {
        self.checkpoints.last()
    }

    pub fn pop(&mut self) -> Option<UndoCheckpoint<J>> {
        self.checkpoints.pop()
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    pub fn clear(&mut self) {
        self.checkpoints.clear();
    }
}

impl<J> UndoRecorder<J> for UndoHistory<J> {
    fn record(&mut self, checkpoint: UndoCheckpoint<J>) {
        self.checkpoints.push(checkpoint);
    }
}
