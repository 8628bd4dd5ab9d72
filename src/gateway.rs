// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Operations on an AiSEG2 gateway.
//!
//! [`Gateway`] replays what the control panel does in a browser. Every
//! operation is a short, linear sequence of requests; nothing is cached
//! between calls and nothing is retried.

use std::net::IpAddr;

use crate::error::{Cause, Error, ProtocolError};
use crate::payload::{ShutterCommand, form_body};
use crate::protocol::{ClientConfig, HttpClient};
use crate::scrape::air_environment::parse_rooms;
use crate::scrape::device_list::parse_device_list;
use crate::scrape::operation_page::OperationSlots;
use crate::types::{Device, DeviceListing, Room, ShutterOperation};

const DEVICE_LIST_PATH: &str = "/page/devices/device/325";
const OPERATION_PAGE_PATH: &str = "/page/devices/device/325/operation_pu";
const OPERATION_SUBMIT_PATH: &str = "/action/devices/device/325/operation";
const AIR_ENVIRONMENT_PATH: &str = "/page/airenvironment/43";

/// The air environment listing always spans these pages.
const AIR_ENVIRONMENT_PAGES: [u8; 2] = [1, 2];

// Fixed values the operation page form expects; the gateway does not
// interpret them beyond matching its own form.
const SHUTTER_TRACK: &str = "325";
const ACCEPT_ID: &str = "83038";

/// Client for one AiSEG2 control panel.
///
/// The gateway address is passed to every operation, typically the one
/// returned by [`discover`](crate::discovery::discover).
///
/// Concurrent calls are independent. Two concurrent operations on the
/// same shutter are not serialized: each fetches its own token and the
/// gateway applies whichever submission arrives last.
///
/// # Examples
///
/// ```no_run
/// use aiseg2_lib::discovery::discover;
/// use aiseg2_lib::protocol::ClientConfig;
/// use aiseg2_lib::types::ShutterOperation;
/// use aiseg2_lib::Gateway;
///
/// # async fn example() -> aiseg2_lib::Result<()> {
/// let gateway = Gateway::new(ClientConfig::new().with_credentials("aiseg", "password"))?;
/// let address = discover().await?;
///
/// let shutters = gateway.get_shutters(address).await?;
/// if let Some(garage) = shutters.get("Garage") {
///     gateway.do_shutter(address, garage, ShutterOperation::Close).await?;
/// }
///
/// for room in gateway.get_air_environment(address).await? {
///     println!("{}: {} C, {} %", room.name, room.temp, room.humi);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Gateway {
    http: HttpClient,
}

impl Gateway {
    /// Creates a gateway client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        Ok(Self {
            http: config.into_client()?,
        })
    }

    /// Fetches the device listing.
    ///
    /// Devices are keyed by display name; see [`DeviceListing`] for how
    /// duplicate names are handled. A page without an embedded list gives
    /// an empty listing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceListUnavailable`] if the page cannot be
    /// fetched or its embedded list is malformed.
    pub async fn get_shutters(&self, address: IpAddr) -> Result<DeviceListing, Error> {
        let path = format!("{DEVICE_LIST_PATH}?{}", query(&[("page", "1")]));

        let html = self
            .http
            .get_page(address, &path)
            .await
            .map_err(|e| Error::DeviceListUnavailable(e.into()))?;
        let listing =
            parse_device_list(&html).map_err(|e| Error::DeviceListUnavailable(e.into()))?;

        tracing::info!(address = %address, count = listing.len(), "Fetched device listing");

        Ok(listing)
    }

    /// Fetches the operation page of `device` and returns its hidden values.
    ///
    /// The token in the result is single-use. [`do_shutter`](Self::do_shutter)
    /// fetches a fresh one for each submission.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] if the page cannot be fetched.
    pub async fn fetch_operation_page(
        &self,
        address: IpAddr,
        device: &Device,
    ) -> Result<OperationSlots, Error> {
        Ok(self.operation_slots(address, device).await?)
    }

    /// Opens, closes or stops a shutter.
    ///
    /// Fetches a fresh operation token, then submits the operation. The two
    /// requests are not atomic: the shutter may change state in between, and
    /// the gateway offers no way to detect it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShutterOperationFailed`] if either request fails or
    /// the operation page carries no token.
    pub async fn do_shutter(
        &self,
        address: IpAddr,
        device: &Device,
        operation: ShutterOperation,
    ) -> Result<String, Error> {
        tracing::debug!(
            node_id = %device.node_id,
            eoj = %device.eoj,
            device_type = %device.device_type,
            operation = %operation,
            "Operating shutter"
        );

        self.submit_operation(address, device, operation)
            .await
            .map_err(|source| {
                tracing::warn!(
                    device = %device.name,
                    operation = %operation,
                    error = %source,
                    "Shutter operation failed"
                );
                Error::ShutterOperationFailed {
                    device: device.name.clone(),
                    operation,
                    source,
                }
            })?;

        tracing::info!(device = %device.name, operation = %operation, "Shutter operation sent");

        Ok(format!(
            "shutter {} operation {operation} success.",
            device.name
        ))
    }

    /// Looks up a shutter by name and operates it.
    ///
    /// Fetches the listing, then behaves like [`do_shutter`](Self::do_shutter).
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceListUnavailable`] if the listing fails,
    /// [`Error::DeviceNotFound`] if no device has that name, or
    /// [`Error::ShutterOperationFailed`] if the operation fails.
    pub async fn operate_shutter(
        &self,
        address: IpAddr,
        name: &str,
        operation: ShutterOperation,
    ) -> Result<String, Error> {
        let listing = self.get_shutters(address).await?;
        let device = listing
            .get(name)
            .ok_or_else(|| Error::DeviceNotFound(name.to_string()))?;
        self.do_shutter(address, device, operation).await
    }

    /// Reads temperature and humidity of every room.
    ///
    /// Rooms are returned in page order, then in panel order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AirEnvironmentUnavailable`] if any page cannot be
    /// fetched or parsed.
    pub async fn get_air_environment(&self, address: IpAddr) -> Result<Vec<Room>, Error> {
        let mut rooms = Vec::new();

        for page in AIR_ENVIRONMENT_PAGES {
            let page_number = page.to_string();
            let path = format!(
                "{AIR_ENVIRONMENT_PATH}?{}",
                query(&[("page", page_number.as_str())])
            );
            let html = self
                .http
                .get_page(address, &path)
                .await
                .map_err(|e| Error::AirEnvironmentUnavailable(e.into()))?;
            let found = parse_rooms(&html).map_err(|e| Error::AirEnvironmentUnavailable(e.into()))?;

            tracing::debug!(page, count = found.len(), "Parsed air environment page");
            rooms.extend(found);
        }

        Ok(rooms)
    }

    async fn operation_slots(
        &self,
        address: IpAddr,
        device: &Device,
    ) -> Result<OperationSlots, ProtocolError> {
        let path = format!(
            "{OPERATION_PAGE_PATH}?{}",
            query(&[
                ("page", "1"),
                ("page325", "1"),
                ("nodeId", device.node_id.as_str()),
                ("eoj", device.eoj.as_str()),
                ("type", device.device_type.as_str()),
                ("track", SHUTTER_TRACK),
                ("acceptId", ACCEPT_ID),
                ("request_by_form", "1"),
            ])
        );

        let html = self.http.get_page(address, &path).await?;
        Ok(OperationSlots::parse(&html))
    }

    async fn submit_operation(
        &self,
        address: IpAddr,
        device: &Device,
        operation: ShutterOperation,
    ) -> Result<(), Cause> {
        let slots = self.operation_slots(address, device).await?;
        let body = form_body(&ShutterCommand::new(device, operation), slots.token()?)?;
        self.http
            .post_form(address, OPERATION_SUBMIT_PATH, body)
            .await?;
        Ok(())
    }
}

/// Builds a URL-encoded query string.
fn query(params: &[(&str, &str)]) -> String {
    params
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_encodes_values() {
        assert_eq!(
            query(&[("page", "1"), ("name", "a b&c")]),
            "page=1&name=a%20b%26c"
        );
    }

    #[test]
    fn query_keeps_hex_identifiers() {
        assert_eq!(query(&[("eoj", "0x026301")]), "eoj=0x026301");
    }

    #[test]
    fn gateway_from_default_config() {
        assert!(Gateway::new(ClientConfig::new()).is_ok());
    }
}
