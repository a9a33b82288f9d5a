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
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKind {
    /// The store holds exactly one pose.
    Single,
    /// The store holds an ordered list of poses keyed by name.
    Collection,
}

impl StoreKind {
    pub fn label(&self) -> &'static str {
        match self {
            StoreKind::Single => "single",
            StoreKind::Collection => "collection",
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The persisted unit of pose data. Which variant a file uses is decided by
/// the template it was created from.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum PoseStore {
    Single(HandPoseData),
    Collection(Vec<HandPoseData>),
}

impl PoseStore {
    pub fn new(kind: StoreKind) -> Self {
        match kind {
            StoreKind::Single => PoseStore::Single(HandPoseData::default()),
            StoreKind::Collection => PoseStore::Collection(Vec::new()),
        }
    }

    pub fn kind(&self) -> StoreKind {
        match self {
            PoseStore::Single(_) => StoreKind::Single,
            PoseStore::Collection(_) => StoreKind::Collection,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, PoseStore::Collection(_))
    }

    fn unsupported(&self, operation: &'static str) -> StoreError {
        StoreError::Unsupported {
            operation,
            kind: self.kind(),
        }
    }

    /// Replace everything in the store with `data`, renamed to `name`.
    pub fn save(&mut self, data: HandPoseData, name: &str) {
        let data = data.named(name);
        match self {
            PoseStore::Single(hands) => *hands = data,
            PoseStore::Collection(hands) => {
                hands.clear();
                hands.push(data);
            }
        }
    }

    /// Insert `data` under `name`, replacing the first pose that already has
    /// that name or appending otherwise.
    pub fn save_element(&mut self, data: HandPoseData, name: &str) -> Result<(), StoreError> {
        match self {
            PoseStore::Single(_) => Err(self.unsupported("save_element")),
            PoseStore::Collection(hands) => {
                let data = data.named(name);
                match hands.iter_mut().find(|hand| hand.name == name) {
                    Some(existing) => *existing = data,
                    None => hands.push(data),
                }
                Ok(())
            }
        }
    }

    /// Load the only pose of a single store.
    pub fn load(&self) -> Result<HandPoseData, StoreError> {
        match self {
            PoseStore::Single(hands) => Ok(hands.clone()),
            PoseStore::Collection(_) => Err(self.unsupported("load")),
        }
    }

    /// Load a pose of a collection by name. A missing name is not an error:
    /// an empty default pose is returned, so use [`Self::contains`] first if
    /// the difference matters.
    pub fn load_named(&self, name: &str) -> Result<HandPoseData, StoreError> {
        match self {
            PoseStore::Single(_) => Err(self.unsupported("load_named")),
            PoseStore::Collection(hands) => Ok(hands
                .iter()
                .find(|hand| hand.name == name)
                .cloned()
                .unwrap_or_default()),
        }
    }

    pub fn records(&self) -> &[HandPoseData] {
        match self {
            PoseStore::Single(hands) => std::slice::from_ref(hands),
            PoseStore::Collection(hands) => hands,
        }
    }

    pub fn records_mut(&mut self) -> &mut [HandPoseData] {
        match self {
            PoseStore::Single(hands) => std::slice::from_mut(hands),
            PoseStore::Collection(hands) => hands,
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.records().iter().map(|hand| hand.name.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records().iter().any(|hand| hand.name == name)
    }

    pub fn get(&self, index: usize) -> Option<&HandPoseData> {
        self.records().get(index)
    }

    pub fn first(&self) -> Option<&HandPoseData> {
        self.records().first()
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }

    pub fn rename(&mut self, from: &str, to: &str) -> Result<(), StoreError> {
        let hand = self
            .records_mut()
            .iter_mut()
            .find(|hand| hand.name == from)
            .ok_or_else(|| StoreError::RecordNotFound(from.to_owned()))?;
        hand.name = to.to_owned();
        Ok(())
    }
}
