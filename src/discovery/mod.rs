// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! SSDP discovery of the AiSEG2 gateway.
//!
//! The gateway answers SSDP searches for its data service
//! ([`AISEG2_SEARCH_TARGET`]). Discovery sends one search and resolves with
//! the source address of the first matching response. Only the first
//! responder is used; a LAN is expected to carry a single gateway.
//!
//! # Examples
//!
//! ```no_run
//! use aiseg2_lib::discovery::discover;
//!
//! # async fn example() -> aiseg2_lib::Result<()> {
//! let address = discover().await?;
//! println!("AiSEG2 at {address}");
//! # Ok(())
//! # }
//! ```

mod ssdp;

use std::net::IpAddr;
use std::time::Duration;

pub use ssdp::SsdpSocket;

use crate::error::{Error, ProtocolError};

/// Service type the gateway advertises over SSDP.
pub const AISEG2_SEARCH_TARGET: &str = "urn:panasonic-com:service:p60AiSeg2DataService:1";

/// Default discovery timeout.
const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_millis(5000);

/// A socket able to run one discovery search.
///
/// [`SsdpSocket`] is the network implementation; tests drive
/// [`discover_with`] through simulated responders.
#[allow(async_fn_in_trait)]
pub trait SearchSocket {
    /// Sends a search for `search_target`.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the search cannot be sent.
    async fn search(&mut self, search_target: &str) -> Result<(), ProtocolError>;

    /// Waits for the next response matching `search_target` and returns
    /// the responder's address.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if receiving fails.
    async fn next_response(&mut self, search_target: &str) -> Result<IpAddr, ProtocolError>;

    /// Releases the socket.
    fn stop(&mut self);
}

/// Options for gateway discovery.
///
/// # Examples
///
/// ```
/// use aiseg2_lib::discovery::DiscoveryOptions;
/// use std::time::Duration;
///
/// let options = DiscoveryOptions::new().with_timeout(Duration::from_secs(10));
/// assert_eq!(options.timeout(), Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOptions {
    timeout: Option<Duration>,
    search_target: Option<String>,
}

impl DiscoveryOptions {
    /// Creates options with the default 5 second timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how long to wait for the first response.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the SSDP search target.
    #[must_use]
    pub fn with_search_target(mut self, search_target: impl Into<String>) -> Self {
        self.search_target = Some(search_target.into());
        self
    }

    /// Returns the discovery timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_DISCOVERY_TIMEOUT)
    }

    /// Returns the SSDP search target.
    #[must_use]
    pub fn search_target(&self) -> &str {
        self.search_target.as_deref().unwrap_or(AISEG2_SEARCH_TARGET)
    }
}

/// Discovers the gateway with default options.
///
/// # Errors
///
/// Returns [`Error::DiscoveryTimeout`] if no gateway answers within 5
/// seconds, or [`Error::Discovery`] if the socket fails.
pub async fn discover() -> Result<IpAddr, Error> {
    discover_with_options(DiscoveryOptions::default()).await
}

/// Discovers the gateway over a fresh [`SsdpSocket`].
///
/// # Errors
///
/// Returns [`Error::DiscoveryTimeout`] if no gateway answers in time, or
/// [`Error::Discovery`] if the socket fails.
pub async fn discover_with_options(options: DiscoveryOptions) -> Result<IpAddr, Error> {
    let mut socket = SsdpSocket::bind().await.map_err(Error::Discovery)?;
    discover_with(&mut socket, &options).await
}

/// Runs discovery over the given socket.
///
/// The socket is stopped exactly once before returning, whatever the
/// outcome.
///
/// # Errors
///
/// Returns [`Error::DiscoveryTimeout`] if no matching response arrives
/// within the timeout, or [`Error::Discovery`] if the socket fails.
pub async fn discover_with<S: SearchSocket>(
    socket: &mut S,
    options: &DiscoveryOptions,
) -> Result<IpAddr, Error> {
    let search_target = options.search_target();
    let timeout = options.timeout();
    let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);

    tracing::info!(
        search_target = %search_target,
        timeout_ms,
        "Starting AiSEG2 discovery"
    );

    let outcome = tokio::time::timeout(timeout, async {
        socket.search(search_target).await?;
        socket.next_response(search_target).await
    })
    .await;

    socket.stop();

    match outcome {
        Ok(Ok(address)) => {
            tracing::info!(address = %address, "Found AiSEG2");
            Ok(address)
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "AiSEG2 discovery failed");
            Err(Error::Discovery(e))
        }
        Err(_) => {
            tracing::warn!(timeout_ms, "No AiSEG2 answered discovery");
            Err(Error::DiscoveryTimeout { timeout_ms })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovery_options_default() {
        let options = DiscoveryOptions::default();
        assert_eq!(options.timeout(), Duration::from_millis(5000));
        assert_eq!(options.search_target(), AISEG2_SEARCH_TARGET);
    }

    #[test]
    fn discovery_options_chained() {
        let options = DiscoveryOptions::new()
            .with_timeout(Duration::from_secs(2))
            .with_search_target("ssdp:all");

        assert_eq!(options.timeout(), Duration::from_secs(2));
        assert_eq!(options.search_target(), "ssdp:all");
    }
}
