// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for AiSEG2 gateway control.
//!
//! # Types
//!
//! - [`Device`] - A device descriptor from the listing page
//! - [`DeviceListing`] - Devices keyed by display name
//! - [`ShutterOperation`] - Open/Close/Stop
//! - [`Room`] - Temperature and humidity of one room

mod device;
mod operation;
mod room;

pub use device::{Device, DeviceId, DeviceListing, ShutterInfo};
pub use operation::ShutterOperation;
pub use room::Room;
