// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parsers for the gateway's control panel pages.
//!
//! The panel has no machine API: data is embedded in the HTML meant for its
//! browser UI. Each submodule knows one page layout.
//!
//! - [`device_list`] - JSON array passed to the listing page's `init()`
//! - [`operation_page`] - hidden form values carrying the operation token
//! - [`air_environment`] - room readings drawn as CSS digit glyphs

pub mod air_environment;
pub mod device_list;
pub mod operation_page;
