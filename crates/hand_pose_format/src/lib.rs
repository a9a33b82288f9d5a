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

pub mod error;
pub use error::*;

pub mod library;
pub use library::*;

pub mod mirror;
pub use mirror::*;

pub mod pose;
pub use pose::*;

pub mod pose_file;
pub use pose_file::*;

pub mod semver;
pub use semver::*;

pub mod settings;
pub use settings::*;

pub mod storage;
pub use storage::*;

pub mod store;
pub use store::*;

pub mod template;
pub use template::*;

pub const CURRENT_MAJOR_VERSION: u32 = 0;
pub const CURRENT_MINOR_VERSION: u32 = 1;
