// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `aiseg2_lib` - A Rust library to control Panasonic AiSEG2 gateways.
//!
//! The AiSEG2 home energy-management gateway has no public machine API, only
//! an HTML control panel served over digest-authenticated HTTP. This library
//! drives that panel the way a browser would.
//!
//! # Supported Features
//!
//! - **Discovery**: find the gateway on the LAN over SSDP
//! - **Device listing**: read the devices embedded in the listing page
//! - **Shutter control**: open, close or stop shutters with the panel's
//!   single-use operation token
//! - **Air environment**: per-room temperature and humidity
//!
//! # Quick Start
//!
//! ```no_run
//! use aiseg2_lib::{Gateway, discovery, protocol::ClientConfig, types::ShutterOperation};
//!
//! #[tokio::main]
//! async fn main() -> aiseg2_lib::Result<()> {
//!     let address = discovery::discover().await?;
//!     let gateway = Gateway::new(ClientConfig::new().with_credentials("aiseg", "password"))?;
//!
//!     let shutters = gateway.get_shutters(address).await?;
//!     for device in shutters.iter().filter(|d| d.is_shutter()) {
//!         println!("{} ({})", device.name, device.condition);
//!     }
//!
//!     let message = gateway
//!         .operate_shutter(address, "Garage", ShutterOperation::Open)
//!         .await?;
//!     println!("{message}");
//!
//!     Ok(())
//! }
//! ```
//!
//! # Errors
//!
//! Each operation fails with its own [`Error`] variant. The underlying
//! transport or parsing failure is available through
//! [`std::error::Error::source`].

pub mod discovery;
pub mod error;
mod gateway;
pub mod payload;
pub mod protocol;
pub mod scrape;
pub mod types;

pub use discovery::{DiscoveryOptions, discover};
pub use error::{Cause, Error, ParseError, ProtocolError, Result, ValueError};
pub use gateway::Gateway;
pub use protocol::ClientConfig;
pub use types::{Device, DeviceId, DeviceListing, Room, ShutterOperation};
