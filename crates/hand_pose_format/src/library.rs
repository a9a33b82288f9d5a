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
use tracing::{info, warn};

/// Create, read and update pose files inside the configured save directory.
pub struct PoseLibrary<S: PoseStorage> {
    storage: S,
    settings: SaveDataSettings,
}

impl<S: PoseStorage> PoseLibrary<S> {
    pub fn new(storage: S, settings: SaveDataSettings) -> Self {
        Self { storage, settings }
    }

    pub fn settings(&self) -> &SaveDataSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SaveDataSettings {
        &mut self.settings
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Address a pose file of the save directory. A `.pose.ron` or
    /// `.pose.json` extension picks the format. Without one, an existing
    /// file of either format is used and new files are written as RON.
    pub fn locator(&self, file_name: &str) -> Result<StoreLocator, StoreError> {
        if let Some((name, format)) = FileFormat::split_file_name(file_name) {
            return Ok(self.settings.locator(name)?.with_format(format));
        }
        let locator = self.settings.locator(file_name)?;
        Ok(FileFormat::ALL
            .into_iter()
            .map(|format| locator.clone().with_format(format))
            .find(|candidate| self.exists(candidate))
            .unwrap_or(locator))
    }

    pub fn exists(&self, locator: &StoreLocator) -> bool {
        self.storage.exists(locator)
    }

    pub fn open(&self, locator: &StoreLocator) -> Result<PoseFile, StoreError> {
        let data = self
            .storage
            .read(locator)?
            .ok_or_else(|| StoreError::NotFound(locator.path()))?;
        PoseFile::from_bytes(&data, locator.format)
    }

    pub fn write(&mut self, locator: &StoreLocator, file: &PoseFile) -> Result<(), StoreError> {
        let data = file.to_bytes(locator.format)?;
        self.storage.write(locator, &data)
    }

    /// Create a new pose file from a template holding `data`. The record is
    /// named `pose_name`, or after the file when no pose name is given.
    pub fn create(
        &mut self,
        file_name: &str,
        template: &str,
        pose_name: Option<&str>,
        data: HandPoseData,
    ) -> Result<StoreLocator, StoreError> {
        let locator = self.locator(file_name)?;
        let kind = self.settings.templates.kind_of(template)?;
        if self.exists(&locator) {
            return Err(StoreError::AlreadyExists(locator.path()));
        }

        let record_name = non_empty(pose_name).unwrap_or(locator.name.as_str());
        let mut store = PoseStore::new(kind);
        store.save(data, record_name);
        self.write(&locator, &PoseFile::new(template, store))?;
        info!("Created {kind} pose file {locator}");
        Ok(locator)
    }

    /// Replace the whole content of an existing pose file with `data`.
    pub fn overwrite(
        &mut self,
        file_name: &str,
        pose_name: Option<&str>,
        data: HandPoseData,
    ) -> Result<StoreLocator, StoreError> {
        let locator = self.locator(file_name)?;
        let mut file = self.open(&locator)?;
        let record_name = match file.store.kind() {
            StoreKind::Collection => non_empty(pose_name).unwrap_or(locator.name.as_str()),
            StoreKind::Single => locator.name.as_str(),
        };
        file.store.save(data, record_name);
        self.write(&locator, &file)?;
        info!("Overwrote pose file {locator}");
        Ok(locator)
    }

    /// Add `data` to a collection file, replacing a record with the same name.
    pub fn add(
        &mut self,
        file_name: &str,
        pose_name: &str,
        data: HandPoseData,
    ) -> Result<StoreLocator, StoreError> {
        let locator = self.locator(file_name)?;
        if pose_name.is_empty() {
            return Err(StoreError::EmptyPoseName);
        }
        let mut file = self.open(&locator)?;
        file.store.save_element(data, pose_name)?;
        self.write(&locator, &file)?;
        info!("Added pose [{pose_name}] to {locator}");
        Ok(locator)
    }

    /// Replace a record of a collection file that must already exist.
    pub fn replace(
        &mut self,
        file_name: &str,
        pose_name: &str,
        data: HandPoseData,
    ) -> Result<StoreLocator, StoreError> {
        let locator = self.locator(file_name)?;
        let mut file = self.open(&locator)?;
        if !file.store.contains(pose_name) {
            return Err(StoreError::RecordNotFound(pose_name.to_owned()));
        }
        file.store.save_element(data, pose_name)?;
        self.write(&locator, &file)?;
        info!("Replaced pose [{pose_name}] in {locator}");
        Ok(locator)
    }

    /// Every readable pose file in the save directory.
    pub fn files(&self) -> Result<Vec<(StoreLocator, PoseFile)>, StoreError> {
        let directory = self.settings.directory()?;
        let mut files = Vec::new();
        for locator in self.storage.list(directory)? {
            match self.open(&locator) {
                Ok(file) => files.push((locator, file)),
                Err(err) => warn!("Skipping unreadable pose file {locator}: {err}"),
            }
        }
        Ok(files)
    }

    pub fn files_of_template(
        &self,
        template: &str,
    ) -> Result<Vec<(StoreLocator, PoseFile)>, StoreError> {
        Ok(self
            .files()?
            .into_iter()
            .filter(|(_, file)| file.template == template)
            .collect())
    }
}

fn non_empty(name: Option<&str>) -> Option<&str> {
    name.filter(|n| !n.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};
    use testdir::testdir;

    fn pose_data(x: f32) -> HandPoseData {
        let hand = HandPose::new(
            Attachment::new(Vec3::new(x, 0.0, 0.0), Quat::IDENTITY),
            vec![Quat::IDENTITY, Quat::from_rotation_x(x)],
        );
        HandPoseData::new("", hand.clone(), hand)
    }

    fn memory_library() -> PoseLibrary<MemoryStorage> {
        PoseLibrary::new(MemoryStorage::new(), SaveDataSettings::new("poses"))
    }

    #[test]
    fn unconfigured_library_fails_before_io() {
        let mut library = PoseLibrary::new(MemoryStorage::new(), SaveDataSettings::default());
        assert!(matches!(
            library.create("grip", SINGLE_TEMPLATE, None, pose_data(1.0)),
            Err(StoreError::NoStorageLocation)
        ));
        assert!(matches!(
            library.add("grip", "", pose_data(1.0)),
            Err(StoreError::NoStorageLocation)
        ));
        assert!(matches!(library.files(), Err(StoreError::NoStorageLocation)));
        assert!(library.storage().is_empty());
    }

    #[test]
    fn create_single_names_record_after_file() {
        let mut library = memory_library();
        let locator = library
            .create("relaxed", SINGLE_TEMPLATE, Some("ignored"), pose_data(1.0))
            .unwrap();
        let file = library.open(&locator).unwrap();
        assert_eq!(file.template, SINGLE_TEMPLATE);
        assert_eq!(file.store.names(), vec!["ignored"]);

        assert!(matches!(
            library.create("relaxed", SINGLE_TEMPLATE, None, pose_data(2.0)),
            Err(StoreError::AlreadyExists(_))
        ));
        assert!(matches!(
            library.create("other", "unknown", None, pose_data(2.0)),
            Err(StoreError::UnknownTemplate(_))
        ));

        library.overwrite("relaxed", Some("ignored"), pose_data(3.0)).unwrap();
        let file = library.open(&locator).unwrap();
        assert_eq!(file.store.names(), vec!["relaxed"]);
        assert_eq!(file.store.load().unwrap().left.attachment.offset.x, 3.0);
    }

    #[test]
    fn collection_crud() {
        let mut library = memory_library();
        let locator = library
            .create("grips", COLLECTION_TEMPLATE, Some("fist"), pose_data(1.0))
            .unwrap();

        library.add("grips", "point", pose_data(2.0)).unwrap();
        library.add("grips", "fist", pose_data(3.0)).unwrap();
        let file = library.open(&locator).unwrap();
        assert_eq!(file.store.names(), vec!["fist", "point"]);
        assert_eq!(
            file.store.load_named("fist").unwrap().left.attachment.offset.x,
            3.0
        );

        library.replace("grips", "point", pose_data(4.0)).unwrap();
        assert!(matches!(
            library.replace("grips", "pinch", pose_data(4.0)),
            Err(StoreError::RecordNotFound(_))
        ));
        assert!(matches!(
            library.add("grips", "", pose_data(4.0)),
            Err(StoreError::EmptyPoseName)
        ));

        library.overwrite("grips", None, pose_data(5.0)).unwrap();
        assert_eq!(library.open(&locator).unwrap().store.names(), vec!["grips"]);
    }

    #[test]
    fn json_files_are_found_by_name() {
        let mut library = memory_library();
        let json = library
            .create("grips.pose.json", COLLECTION_TEMPLATE, Some("fist"), pose_data(1.0))
            .unwrap();
        assert_eq!(json.format, FileFormat::Json);
        assert_eq!(json.name, "grips");
        assert_eq!(library.locator("grips").unwrap(), json);

        let listed: Vec<_> = library
            .files()
            .unwrap()
            .into_iter()
            .map(|(locator, _)| locator)
            .collect();
        assert_eq!(listed, vec![json.clone()]);

        assert_eq!(library.add("grips", "point", pose_data(2.0)).unwrap(), json);
        library.replace("grips", "fist", pose_data(3.0)).unwrap();
        assert!(matches!(
            library.create("grips", COLLECTION_TEMPLATE, None, pose_data(4.0)),
            Err(StoreError::AlreadyExists(_))
        ));
        assert!(!library.exists(&StoreLocator::new("poses", "grips")));

        let file = library.open(&json).unwrap();
        assert_eq!(file.store.names(), vec!["fist", "point"]);
        assert_eq!(
            file.store.load_named("fist").unwrap().left.attachment.offset.x,
            3.0
        );

        library.overwrite("grips", None, pose_data(5.0)).unwrap();
        assert_eq!(library.open(&json).unwrap().store.names(), vec!["grips"]);
    }

    #[test]
    fn add_to_single_file_is_unsupported() {
        let mut library = memory_library();
        library
            .create("relaxed", SINGLE_TEMPLATE, None, pose_data(1.0))
            .unwrap();
        assert!(matches!(
            library.add("relaxed", "extra", pose_data(2.0)),
            Err(StoreError::Unsupported { .. })
        ));
        assert!(matches!(
            library.open(&StoreLocator::new("poses", "missing")),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn files_on_disk_by_template() {
        let dir = testdir!();
        let mut library = PoseLibrary::new(FileStorage, SaveDataSettings::new(&dir));
        library
            .create("relaxed", SINGLE_TEMPLATE, None, pose_data(1.0))
            .unwrap();
        library
            .create("grips", COLLECTION_TEMPLATE, Some("fist"), pose_data(1.0))
            .unwrap();
        std::fs::write(dir.join("broken.pose.ron"), "not a pose file").unwrap();

        let files = library.files().unwrap();
        assert_eq!(files.len(), 2);

        let collections = library.files_of_template(COLLECTION_TEMPLATE).unwrap();
        assert_eq!(collections.len(), 1);
        assert_eq!(collections[0].0.name, "grips");
    }
}
