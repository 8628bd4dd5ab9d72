// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `aiseg2_lib` library.
//!
//! Callers see a small, stable taxonomy ([`Error`]): one variant per
//! gateway operation. The transport or parsing failure that caused it is
//! kept as the error's [`source`](std::error::Error::source), so the
//! diagnostic detail survives without widening the taxonomy.

use thiserror::Error;

use crate::types::ShutterOperation;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// No gateway answered the discovery search in time.
    #[error("can't find AiSEG2 (no response within {timeout_ms} ms)")]
    DiscoveryTimeout {
        /// The discovery window that elapsed.
        timeout_ms: u64,
    },

    /// The discovery socket could not be used.
    #[error("discovery failed")]
    Discovery(#[source] ProtocolError),

    /// The device listing could not be fetched or parsed.
    #[error("can't get AiSEG2 shutter list")]
    DeviceListUnavailable(#[source] Cause),

    /// The token fetch or the mutation submission failed.
    #[error("shutter {device} operation {operation} failed")]
    ShutterOperationFailed {
        /// Display name of the device.
        device: String,
        /// The requested operation.
        operation: ShutterOperation,
        /// What went wrong.
        #[source]
        source: Cause,
    },

    /// No device in the listing has the requested name.
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    /// One of the air environment pages could not be fetched or parsed.
    #[error("air environment read failed")]
    AirEnvironmentUnavailable(#[source] Cause),

    /// The HTTP client could not be created.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Underlying failure attached to an operation-level [`Error`].
#[derive(Debug, Error)]
pub enum Cause {
    /// The request to the gateway failed.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The gateway's page did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Errors related to value validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// An unknown shutter operation name was provided.
    #[error("invalid shutter operation: {0}")]
    InvalidOperation(String),
}

/// Errors related to communication with the gateway.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Socket I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The digest challenge could not be answered.
    #[error("digest authentication error: {0}")]
    Digest(#[from] digest_auth::Error),

    /// The gateway rejected the credentials.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The gateway answered with a non-success status.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
}

/// Errors related to parsing gateway pages.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// An element the page must contain is missing.
    #[error("missing element: {0}")]
    MissingElement(String),

    /// The operation page has fewer hidden values than expected.
    #[error("missing {name} at slot {index} (page has {found} values)")]
    MissingSlot {
        /// Name of the slot.
        name: &'static str,
        /// Position of the slot.
        index: usize,
        /// Number of values found on the page.
        found: usize,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
