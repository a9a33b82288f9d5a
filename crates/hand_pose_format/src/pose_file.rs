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
use std::{io, path::Path};

pub use ron::ser::PrettyConfig as Style;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum FileFormat {
    #[default]
    Ron,
    Json,
}

impl FileFormat {
    pub const ALL: [FileFormat; 2] = [FileFormat::Ron, FileFormat::Json];

    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Ron => ".pose.ron",
            FileFormat::Json => ".pose.json",
        }
    }

    /// Identify the format from a file name, returning the format along with
    /// the file name stripped of its extension.
    pub fn split_file_name(file_name: &str) -> Option<(&str, FileFormat)> {
        Self::ALL.into_iter().find_map(|format| {
                file_name
                    .strip_suffix(format.extension())
                    .map(|stem| (stem, format))
            })
    }

    pub fn from_path(path: &Path) -> Option<FileFormat> {
        let file_name = path.file_name()?.to_str()?;
        Self::split_file_name(file_name).map(|(_, format)| format)
    }
}

/// Everything that gets written into a pose file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PoseFile {
    /// The pose data format that is being used
    pub format_version: SemVer,
    /// Name of the template the file was created from
    pub template: String,
    pub store: PoseStore,
}

fn default_style_config() -> Style {
    Style::new()
        .depth_limit(5)
        .new_line("\n".to_string())
        .indentor("  ".to_string())
        .struct_names(false)
}

impl PoseFile {
    pub fn new(template: impl Into<String>, store: PoseStore) -> Self {
        Self {
            format_version: SemVer::default(),
            template: template.into(),
            store,
        }
    }

    pub fn to_string_ron(&self) -> ron::Result<String> {
        ron::ser::to_string_pretty(self, default_style_config())
    }

    pub fn to_writer_ron<W: io::Write>(&self, mut writer: W) -> Result<(), StoreError> {
        let contents = self.to_string_ron()?;
        writer.write_all(contents.as_bytes())?;
        Ok(())
    }

    pub fn from_str_ron(s: &str) -> ron::error::SpannedResult<Self> {
        ron::de::from_str(s)
    }

    pub fn from_bytes_ron(s: &[u8]) -> ron::error::SpannedResult<Self> {
        ron::de::from_bytes(s)
    }

    pub fn to_string_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_bytes_json(s: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(s)
    }

    pub fn to_bytes(&self, format: FileFormat) -> Result<Vec<u8>, StoreError> {
        match format {
            FileFormat::Ron => {
                let mut data = Vec::new();
                self.to_writer_ron(&mut data)?;
                Ok(data)
            }
            FileFormat::Json => Ok(serde_json::to_vec_pretty(self)?),
        }
    }

    pub fn from_bytes(data: &[u8], format: FileFormat) -> Result<Self, StoreError> {
        match format {
            FileFormat::Ron => Ok(Self::from_bytes_ron(data)?),
            FileFormat::Json => Ok(Self::from_bytes_json(data)?),
        }
    }
}
