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

use crate::{CURRENT_MAJOR_VERSION, CURRENT_MINOR_VERSION};
use serde::{Deserialize, Serialize, de::Visitor};
use std::fmt;

/// Format version stamped into every pose file.
///
/// A bump of the minor version only adds optional fields, so older readers
/// with the same major version can still load the file and will fall back on
/// their defaults. A bump of the major version means older readers must
/// refuse the file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SemVer(pub u32, pub u32);

impl SemVer {
    pub fn major(&self) -> u32 {
        self.0
    }

    pub fn minor(&self) -> u32 {
        self.1
    }

    /// Check whether this version of hand_pose_format is able to read data
    /// written with the given version.
    pub fn is_readable(&self) -> bool {
        self.0 <= CURRENT_MAJOR_VERSION
    }
}

impl Default for SemVer {
    fn default() -> Self {
        SemVer(CURRENT_MAJOR_VERSION, CURRENT_MINOR_VERSION)
    }
}

impl fmt::Display for SemVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0, self.1)
    }
}

impl Serialize for SemVer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for SemVer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(SemVerVisitor)
    }
}

struct SemVerVisitor;
impl<'de> Visitor<'de> for SemVerVisitor {
    type Value = SemVer;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a format version of the form \"MAJOR.MINOR\"")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        let components = v
            .split('.')
            .map(|s| s.parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| E::custom(format!("invalid format version [{v}]: {err}")))?;

        let [major, minor] = components[..] else {
            return Err(E::custom(format!(
                "format version [{v}] has {} components, but it must have exactly 2",
                components.len(),
            )));
        };

        let version = SemVer(major, minor);
        if !version.is_readable() {
            return Err(E::custom(format!(
                "pose data has format version [{version}], but this version of \
                 hand_pose_format only supports up to [{}]; update hand_pose_format \
                 to read this file",
                SemVer::default(),
            )));
        }

        Ok(version)
    }
}
