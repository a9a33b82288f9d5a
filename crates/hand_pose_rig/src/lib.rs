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

pub mod capsule;
pub use capsule::*;

pub mod capture;
pub use capture::*;

pub mod controller;
pub use controller::*;

pub mod error;
pub use error::*;

pub mod fingers;
pub use fingers::*;

pub mod hand_info;
pub use hand_info::*;

pub mod joint_tree;
pub use joint_tree::*;

pub mod mirror;
pub use mirror::*;

pub mod physics;
pub use physics::*;

pub mod rig;
pub use rig::*;

pub mod selection;
pub use selection::*;

pub mod sweep;
pub use sweep::*;

pub mod undo;
pub use undo::*;
