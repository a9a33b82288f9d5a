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
use std::{
    collections::BTreeMap,
    fmt, fs, io,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Identifies one pose file: the directory it lives in and its name without
/// extension.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoreLocator {
    pub directory: PathBuf,
    pub name: String,
    #[serde(default)]
    pub format: FileFormat,
}

impl StoreLocator {
    pub fn new(directory: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            name: name.into(),
            format: FileFormat::default(),
        }
    }

    pub fn with_format(mut self, format: FileFormat) -> Self {
        self.format = format;
        self
    }

    pub fn path(&self) -> PathBuf {
        self.directory
            .join(format!("{}{}", self.name, self.format.extension()))
    }

    pub fn from_path(path: &Path) -> Result<Self, StoreError> {
        let (name, format) = path
            .file_name()
            .and_then(|f| f.to_str())
            .and_then(FileFormat::split_file_name)
            .ok_or_else(|| StoreError::UnrecognizedFileType(path.to_owned()))?;
        let directory = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Ok(Self {
            directory,
            name: name.to_owned(),
            format,
        })
    }
}

impl fmt::Display for StoreLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path().display())
    }
}

/// Backend that resolves locators to raw pose file contents.
pub trait PoseStorage {
    /// Read the contents of a pose file, or `None` if it does not exist.
    fn read(&self, locator: &StoreLocator) -> Result<Option<Vec<u8>>, StoreError>;

    fn write(&mut self, locator: &StoreLocator, data: &[u8]) -> Result<(), StoreError>;

    /// List every pose file inside a directory, sorted by locator.
    fn list(&self, directory: &Path) -> Result<Vec<StoreLocator>, StoreError>;

    fn exists(&self, locator: &StoreLocator) -> bool {
        matches!(self.read(locator), Ok(Some(_)))
    }
}

/// Pose files on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileStorage;

impl PoseStorage for FileStorage {
    fn read(&self, locator: &StoreLocator) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(locator.path()) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&mut self, locator: &StoreLocator, data: &[u8]) -> Result<(), StoreError> {
        fs::create_dir_all(&locator.directory)?;
        let path = locator.path();
        debug!("Writing pose file {}", path.display());
        fs::write(path, data)?;
        Ok(())
    }

    fn list(&self, directory: &Path) -> Result<Vec<StoreLocator>, StoreError> {
        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut locators = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if let Ok(locator) = StoreLocator::from_path(&path) {
                locators.push(locator);
            }
        }
        locators.sort();
        Ok(locators)
    }

    fn exists(&self, locator: &StoreLocator) -> bool {
        locator.path().is_file()
    }
}

/// Pose files kept in memory, keyed by their would-be path.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    files: BTreeMap<PathBuf, Vec<u8>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl PoseStorage for MemoryStorage {
    fn read(&self, locator: &StoreLocator) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.files.get(&locator.path()).cloned())
    }

    fn write(&mut self, locator: &StoreLocator, data: &[u8]) -> Result<(), StoreError> {
        self.files.insert(locator.path(), data.to_vec());
        Ok(())
    }

    fn list(&self, directory: &Path) -> Result<Vec<StoreLocator>, StoreError> {
        let mut locators: Vec<_> = self
            .files
            .keys()
            .filter(|path| path.parent() == Some(directory))
            .filter_map(|path| StoreLocator::from_path(path).ok())
            .collect();
        locators.sort();
        Ok(locators)
    }
}
