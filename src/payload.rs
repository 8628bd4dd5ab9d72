// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shutter operation form body.
//!
//! The panel posts `data=<json>` where the JSON's `objSendData` member is
//! itself a JSON document serialized to a string:
//!
//! ```text
//! data={"objSendData":"{\"nodeId\":\"1\",\"eoj\":\"0x0263\",\"type\":\"0x0e\",\"device\":{\"open\":\"1\"}}","token":"53529"}
//! ```

use serde::Serialize;

use crate::error::ParseError;
use crate::types::{Device, ShutterOperation};

/// The command sent to one shutter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShutterCommand<'a> {
    node_id: &'a str,
    eoj: &'a str,
    #[serde(rename = "type")]
    device_type: &'a str,
    device: ShutterState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct ShutterState {
    open: &'static str,
}

impl<'a> ShutterCommand<'a> {
    /// Creates the command for `operation` on `device`.
    #[must_use]
    pub fn new(device: &'a Device, operation: ShutterOperation) -> Self {
        Self {
            node_id: &device.node_id,
            eoj: &device.eoj,
            device_type: &device.device_type,
            device: ShutterState {
                open: operation.code(),
            },
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ShutterRequest<'a> {
    obj_send_data: String,
    token: &'a str,
}

/// Builds the form body submitting `command` with `token`.
///
/// The JSON is appended to `data=` as is, the way the panel's own script
/// sends it.
///
/// # Errors
///
/// Returns `ParseError::Json` if serialization fails.
///
/// # Examples
///
/// ```
/// use aiseg2_lib::payload::{ShutterCommand, form_body};
/// use aiseg2_lib::types::{Device, ShutterOperation};
///
/// let json = r#"{"nodeId":"1","eoj":"0x0263","type":"0x0e","name":"Garage"}"#;
/// let device: Device = serde_json::from_str(json).unwrap();
///
/// let body = form_body(&ShutterCommand::new(&device, ShutterOperation::Close), "53529").unwrap();
/// assert_eq!(
///     body,
///     r#"data={"objSendData":"{\"nodeId\":\"1\",\"eoj\":\"0x0263\",\"type\":\"0x0e\",\"device\":{\"open\":\"1\"}}","token":"53529"}"#
/// );
/// ```
pub fn form_body(command: &ShutterCommand<'_>, token: &str) -> Result<String, ParseError> {
    let request = ShutterRequest {
        obj_send_data: serde_json::to_string(command)?,
        token,
    };
    Ok(format!("data={}", serde_json::to_string(&request)?))
}
