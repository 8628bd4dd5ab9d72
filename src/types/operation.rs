// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shutter operations.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// An operation that can be sent to a shutter.
///
/// # Examples
///
/// ```
/// use aiseg2_lib::types::ShutterOperation;
///
/// assert_eq!(ShutterOperation::Open.code(), "0");
/// assert_eq!(ShutterOperation::Close.code(), "1");
/// assert_eq!(ShutterOperation::Stop.code(), "2");
///
/// let op: ShutterOperation = "close".parse().unwrap();
/// assert_eq!(op, ShutterOperation::Close);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShutterOperation {
    /// Open the shutter.
    Open,
    /// Close the shutter.
    Close,
    /// Stop a shutter in motion.
    Stop,
}

impl ShutterOperation {
    /// All operations, in protocol code order.
    pub const ALL: [Self; 3] = [Self::Open, Self::Close, Self::Stop];

    /// Returns the code the gateway expects in the `device.open` field.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Open => "0",
            Self::Close => "1",
            Self::Stop => "2",
        }
    }

    /// Returns the lowercase operation name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Close => "close",
            Self::Stop => "stop",
        }
    }
}

impl fmt::Display for ShutterOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShutterOperation {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" | "0" => Ok(Self::Open),
            "close" | "1" => Ok(Self::Close),
            "stop" | "2" => Ok(Self::Stop),
            _ => Err(ValueError::InvalidOperation(s.to_string())),
        }
    }
}
