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

use crate::StoreKind;
use std::path::PathBuf;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum StoreError {
    #[error("[{operation}] is not supported by a {kind} pose store")]
    Unsupported {
        operation: &'static str,
        kind: StoreKind,
    },
    #[error("no storage location is configured for pose data")]
    NoStorageLocation,
    #[error("unknown pose template [{0}]")]
    UnknownTemplate(String),
    #[error("pose file [{0}] already exists")]
    AlreadyExists(PathBuf),
    #[error("pose file [{0}] does not exist")]
    NotFound(PathBuf),
    #[error("no pose named [{0}] in the pose store")]
    RecordNotFound(String),
    #[error("a pose name is required for this operation")]
    EmptyPoseName,
    #[error("unrecognized pose file type: {0}")]
    UnrecognizedFileType(PathBuf),
    #[error("failed accessing pose data: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed writing ron pose data: {0}")]
    RonWrite(#[from] ron::Error),
    #[error("failed parsing ron pose data: {0}")]
    RonRead(#[from] ron::error::SpannedError),
    #[error("failed handling json pose data: {0}")]
    Json(#[from] serde_json::Error),
}
