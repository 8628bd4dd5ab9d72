// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Air environment listing pages.
//!
//! Each room is a `.base` block inside `#area`. Readings are not text: the
//! panel draws every digit as its own `div` whose class selects the glyph,
//! so `23.5` is rendered as
//!
//! ```html
//! <div class="num_ond">
//!   <div class="num no2"></div><div class="num no3"></div>
//!   <div class="num_dot"></div><div class="num no5"></div>
//! </div>
//! ```

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::ParseError;
use crate::types::Room;

static AREA: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#area").expect("static selector is valid"));
static BASE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".base").expect("static selector is valid"));
static NAME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".txt_name").expect("static selector is valid"));
static TEMPERATURE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".num_ond").expect("static selector is valid"));
static HUMIDITY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".num_shitudo").expect("static selector is valid"));
static DIV: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div").expect("static selector is valid"));

static BR_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br>").expect("static pattern is valid"));
static DIGIT_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"num no([0-9])").expect("static pattern is valid"));

const DECIMAL_POINT_CLASS: &str = "num_dot";

/// Returns the room name from the first of `elements`.
///
/// Line breaks (`<br>` in any case) are removed from the element's inner
/// markup. Returns an empty string when `elements` is empty.
pub fn parse_room_name<'a>(elements: impl IntoIterator<Item = ElementRef<'a>>) -> String {
    elements
        .into_iter()
        .next()
        .map(|element| BR_TAG.replace_all(&element.inner_html(), "").into_owned())
        .unwrap_or_default()
}

/// Reconstructs a reading from the digit glyphs of the first of `elements`.
///
/// Every descendant `div` is visited in document order: a digit glyph
/// appends its digit and the decimal point glyph appends `.`. Other `div`s
/// are skipped. Returns an empty string when `elements` is empty.
pub fn parse_segment_display<'a>(elements: impl IntoIterator<Item = ElementRef<'a>>) -> String {
    let Some(display) = elements.into_iter().next() else {
        return String::new();
    };

    let mut value = String::new();
    for glyph in display.select(&DIV) {
        let class = glyph.value().attr("class").unwrap_or_default();
        if let Some(captures) = DIGIT_CLASS.captures(class) {
            value.push_str(&captures[1]);
        }
        if class == DECIMAL_POINT_CLASS {
            value.push('.');
        }
    }
    value
}

/// Extracts the rooms shown on one air environment page.
///
/// Empty `.base` blocks are unoccupied slots and are skipped.
///
/// # Errors
///
/// Returns `ParseError::MissingElement` if the page has no `#area`.
///
/// # Examples
///
/// ```
/// use aiseg2_lib::scrape::air_environment::parse_rooms;
///
/// let html = r#"<div id="area">
///   <div class="base"><div class="txt_name">Living<br>Room</div>
///     <div class="num_ond"><div class="num no2"></div><div class="num no1"></div></div>
///     <div class="num_shitudo"><div class="num no4"></div><div class="num no5"></div></div>
///   </div>
///   <div class="base"></div>
/// </div>"#;
///
/// let rooms = parse_rooms(html).unwrap();
/// assert_eq!(rooms.len(), 1);
/// assert_eq!(rooms[0].name, "LivingRoom");
/// assert_eq!(rooms[0].temp, "21");
/// assert_eq!(rooms[0].humi, "45");
/// ```
pub fn parse_rooms(html: &str) -> Result<Vec<Room>, ParseError> {
    let document = Html::parse_document(html);
    let area = document
        .select(&AREA)
        .next()
        .ok_or_else(|| ParseError::MissingElement("#area".to_string()))?;

    let rooms = area
        .select(&BASE)
        .filter(|base| !base.inner_html().is_empty())
        .map(|base| Room {
            name: parse_room_name(base.select(&NAME)),
            temp: parse_segment_display(base.select(&TEMPERATURE)),
            humi: parse_segment_display(base.select(&HUMIDITY)),
        })
        .collect();

    Ok(rooms)
}
