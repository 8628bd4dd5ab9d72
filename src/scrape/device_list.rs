// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device listing page.
//!
//! The listing page hands its devices to the panel script on load:
//!
//! ```html
//! <script type="text/javascript">window.onload = init([{"nodeId":"268...", ...}]);</script>
//! ```

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::error::ParseError;
use crate::types::{Device, DeviceListing};

static INLINE_SCRIPT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script:not([src])").expect("static selector is valid"));

static INIT_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)window\.onload\s*=\s*init\((\[.*?\])\)").expect("static pattern is valid")
});

/// Extracts the devices embedded in a listing page.
///
/// Every inline script is scanned; descriptors from all matching scripts
/// are collected in document order. A page without the `init()` call
/// yields an empty listing.
///
/// # Errors
///
/// Returns `ParseError::Json` if the embedded array is not a list of
/// device descriptors.
///
/// # Examples
///
/// ```
/// use aiseg2_lib::scrape::device_list::parse_device_list;
///
/// let html = r#"<html><head><script>
///     window.onload = init([{"nodeId":"1","eoj":"0x026301","type":"0x0e","name":"Garage"}]);
/// </script></head><body></body></html>"#;
///
/// let listing = parse_device_list(html).unwrap();
/// assert_eq!(listing.get("Garage").unwrap().eoj, "0x026301");
/// ```
pub fn parse_device_list(html: &str) -> Result<DeviceListing, ParseError> {
    let document = Html::parse_document(html);
    let mut devices: Vec<Device> = Vec::new();

    for script in document.select(&INLINE_SCRIPT) {
        let text: String = script.text().collect();
        if let Some(captures) = INIT_CALL.captures(&text) {
            let found: Vec<Device> = serde_json::from_str(&captures[1])?;
            tracing::debug!(count = found.len(), "Found embedded device list");
            devices.extend(found);
        }
    }

    Ok(DeviceListing::from_devices(devices))
}
