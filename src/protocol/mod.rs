// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport for communicating with the AiSEG2 gateway.
//!
//! The gateway serves an HTML control panel over plain HTTP on port 80,
//! protected by digest authentication. [`HttpClient`] fetches its pages and
//! posts its forms; [`ClientConfig`] holds the connection parameters.

mod http;

pub use http::{ClientConfig, Credentials, HttpClient, host_url};
