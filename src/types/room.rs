// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Air environment readings.

use serde::Serialize;

/// Temperature and humidity of one room, as shown on the gateway panel.
///
/// Both readings are kept exactly as reconstructed from the panel's digit
/// glyphs, e.g. `"23.5"`. An empty string means the panel showed no digits.
///
/// # Examples
///
/// ```
/// use aiseg2_lib::types::Room;
///
/// let room = Room::new("Living", "23.5", "48");
/// assert_eq!(room.temperature(), Some(23.5));
/// assert_eq!(room.humidity(), Some(48.0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Room {
    /// Room name.
    pub name: String,
    /// Temperature digits.
    pub temp: String,
    /// Humidity digits.
    pub humi: String,
}

impl Room {
    /// Creates a room reading.
    #[must_use]
    pub fn new(name: impl Into<String>, temp: impl Into<String>, humi: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            temp: temp.into(),
            humi: humi.into(),
        }
    }

    /// Temperature in degrees Celsius, if the digits form a number.
    #[must_use]
    pub fn temperature(&self) -> Option<f64> {
        self.temp.parse().ok()
    }

    /// Relative humidity in percent, if the digits form a number.
    #[must_use]
    pub fn humidity(&self) -> Option<f64> {
        self.humi.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_readings_are_none() {
        let room = Room::new("Hall", "", "");
        assert_eq!(room.temperature(), None);
        assert_eq!(room.humidity(), None);
    }
}
