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
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Where pose files are saved and which templates can be used to create them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SaveDataSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
    #[serde(default)]
    pub templates: TemplateRegistry,
}

impl SaveDataSettings {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: Some(directory.into()),
            templates: TemplateRegistry::default(),
        }
    }

    /// The configured save directory. An empty path counts as unset.
    pub fn directory(&self) -> Result<&Path, StoreError> {
        self.directory
            .as_deref()
            .filter(|dir| !dir.as_os_str().is_empty())
            .ok_or(StoreError::NoStorageLocation)
    }

    pub fn locator(&self, file_name: &str) -> Result<StoreLocator, StoreError> {
        Ok(StoreLocator::new(self.directory()?, file_name))
    }
}

/// Parameters of the auto pose sweep and the colliders it generates.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AutoPoseSettings {
    /// Give the last joint of every finger its own collider.
    #[serde(default)]
    pub use_fingertip: bool,
    /// Euler rotation in degrees applied to the active joint on every tick.
    pub rotation_step: Vec3,
    /// Number of steps a joint may rotate before it stops on its own.
    pub rotation_ceiling: u32,
    #[serde(default = "AutoPoseSettings::default_capsule_radius")]
    pub capsule_radius: f32,
    #[serde(default = "AutoPoseSettings::default_fingertip_length")]
    pub fingertip_length: f32,
}

impl AutoPoseSettings {
    fn default_capsule_radius() -> f32 {
        0.01
    }

    fn default_fingertip_length() -> f32 {
        0.025
    }
}

impl Default for AutoPoseSettings {
    fn default() -> Self {
        Self {
            use_fingertip: false,
            rotation_step: Vec3::new(0.0, 0.0, 1.0),
            rotation_ceiling: 30,
            capsule_radius: Self::default_capsule_radius(),
            fingertip_length: Self::default_fingertip_length(),
        }
    }
}

/// Pose that "clear" resets the hands to instead of the rest pose.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DefaultPoseSetting {
    pub locator: StoreLocator,
    /// Which record of a collection to use.
    #[serde(default)]
    pub index: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct HandPoseSettings {
    #[serde(default)]
    pub save_data: SaveDataSettings,
    #[serde(default)]
    pub auto_pose: AutoPoseSettings,
    #[serde(default)]
    pub mirror: MirrorRule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_pose: Option<DefaultPoseSetting>,
}

impl HandPoseSettings {
    pub fn to_string_ron(&self) -> ron::Result<String> {
        ron::ser::to_string_pretty(self, Style::new().struct_names(false))
    }

    pub fn from_str_ron(s: &str) -> ron::error::SpannedResult<Self> {
        ron::de::from_str(s)
    }

    pub fn from_path(path: &Path) -> Result<Self, StoreError> {
        let data = fs::read(path)?;
        Ok(ron::de::from_bytes(&data)?)
    }

    pub fn to_path(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_string_ron()?)?;
        Ok(())
    }
}
