// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-device operation page.
//!
//! The page carries its form state as unlabeled hidden spans:
//!
//! ```html
//! <span class="setting_value" style="display:none;">76856</span>
//! <span class="setting_value" style="display:none;">53529</span>
//! ...
//! ```
//!
//! Values are identified only by position, in the order listed in
//! [`OPERATION_SLOT_NAMES`].

use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::error::ParseError;

/// Meaning of each hidden value, by position.
pub const OPERATION_SLOT_NAMES: [&str; 7] = [
    "controlId",
    "operationToken",
    "callerUrl",
    "deviceType",
    "deviceName",
    "deviceInfo",
    "transitionInfo",
];

/// Position of the single-use operation token.
pub const OPERATION_TOKEN_INDEX: usize = 1;

static SETTING_VALUE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".setting_value").expect("static selector is valid"));

/// Hidden values of one operation page fetch, in document order.
///
/// The token is valid for a single submission and must not be reused.
///
/// # Examples
///
/// ```
/// use aiseg2_lib::scrape::operation_page::OperationSlots;
///
/// let html = r#"<span class="setting_value">76856</span>
///               <span class="setting_value">53529</span>"#;
/// let slots = OperationSlots::parse(html);
/// assert_eq!(slots.token().unwrap(), "53529");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationSlots {
    values: Vec<String>,
}

impl OperationSlots {
    /// Collects the text of every hidden value element.
    #[must_use]
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);
        let values = document
            .select(&SETTING_VALUE)
            .map(|element| element.text().collect::<String>())
            .collect();
        Self { values }
    }

    /// All values in document order.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Returns the operation token.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::MissingSlot` if the page has too few values.
    pub fn token(&self) -> Result<&str, ParseError> {
        self.values
            .get(OPERATION_TOKEN_INDEX)
            .map(String::as_str)
            .ok_or(ParseError::MissingSlot {
                name: OPERATION_SLOT_NAMES[OPERATION_TOKEN_INDEX],
                index: OPERATION_TOKEN_INDEX,
                found: self.values.len(),
            })
    }

    /// Consumes the slots, returning the values.
    #[must_use]
    pub fn into_values(self) -> Vec<String> {
        self.values
    }
}
