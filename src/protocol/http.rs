// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP transport for the AiSEG2 control panel.

use std::net::IpAddr;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT, WWW_AUTHENTICATE};
use reqwest::{Client, Method, StatusCode};

use crate::error::ProtocolError;

/// The gateway rejects requests without these two headers.
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const GATEWAY_USER_AGENT: &str = "Node.js";

/// Formats a gateway address into the base URL used for requests.
///
/// The default port 80 is omitted and IPv6 literals are bracketed.
///
/// # Examples
///
/// ```
/// use aiseg2_lib::protocol::host_url;
/// use std::net::{IpAddr, Ipv4Addr};
///
/// let address = IpAddr::V4(Ipv4Addr::new(192, 168, 0, 216));
/// assert_eq!(host_url(address, 80), "http://192.168.0.216");
/// assert_eq!(host_url(address, 8080), "http://192.168.0.216:8080");
/// ```
#[must_use]
pub fn host_url(address: IpAddr, port: u16) -> String {
    let host = match address {
        IpAddr::V4(v4) => v4.to_string(),
        IpAddr::V6(v6) => format!("[{v6}]"),
    };
    if port == ClientConfig::DEFAULT_PORT {
        format!("http://{host}")
    } else {
        format!("http://{host}:{port}")
    }
}

// ============================================================================
// ClientConfig - Connection parameters shared by all gateway requests
// ============================================================================

/// Configuration for talking to an AiSEG2 gateway.
///
/// The gateway address is not part of the configuration: it is usually only
/// known after [discovery](crate::discovery::discover) and is passed to each
/// operation instead.
///
/// # Examples
///
/// ```
/// use aiseg2_lib::protocol::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new()
///     .with_credentials("aiseg", "password")
///     .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.port(), 80);
/// assert_eq!(config.credentials(), Some(("aiseg", "password")));
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    port: u16,
    credentials: Option<(String, String)>,
    timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientConfig {
    /// Default HTTP port.
    pub const DEFAULT_PORT: u16 = 80;
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration with default port, timeout and no credentials.
    #[must_use]
    pub fn new() -> Self {
        Self {
            port: Self::DEFAULT_PORT,
            credentials: None,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the digest authentication credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the credentials if set.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        self.credentials
            .as_ref()
            .map(|(u, p)| (u.as_str(), p.as_str()))
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Creates an `HttpClient` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn into_client(self) -> Result<HttpClient, ProtocolError> {
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ProtocolError::Http)?;

        let credentials = self
            .credentials
            .map(|(username, password)| Credentials { username, password });

        Ok(HttpClient {
            port: self.port,
            client,
            credentials,
        })
    }
}

// ============================================================================
// HttpClient - Digest-authenticated page fetches and form posts
// ============================================================================

/// HTTP client for the gateway's control panel.
///
/// Each call is an independent request. When credentials are configured
/// and the gateway answers `401` with a digest challenge, the request is
/// repeated once with an `Authorization` header computed from it.
#[derive(Debug, Clone)]
pub struct HttpClient {
    port: u16,
    client: Client,
    credentials: Option<Credentials>,
}

/// Digest authentication credentials.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Username for authentication.
    pub username: String,
    /// Password for authentication.
    pub password: String,
}

impl HttpClient {
    /// Returns the port requests are sent to.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Fetches a page and returns its body.
    ///
    /// `path` includes the query string.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, authentication is rejected or
    /// the gateway answers with a non-success status.
    pub async fn get_page(&self, address: IpAddr, path: &str) -> Result<String, ProtocolError> {
        self.send(Method::GET, address, path, None).await
    }

    /// Posts a raw form body and returns the response body.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, authentication is rejected or
    /// the gateway answers with a non-success status.
    pub async fn post_form(
        &self,
        address: IpAddr,
        path: &str,
        body: String,
    ) -> Result<String, ProtocolError> {
        self.send(Method::POST, address, path, Some(body)).await
    }

    async fn send(
        &self,
        method: Method,
        address: IpAddr,
        path: &str,
        body: Option<String>,
    ) -> Result<String, ProtocolError> {
        let url = format!("{}{path}", host_url(address, self.port));

        tracing::debug!(method = %method, url = %url, "Sending HTTP request");

        let mut response = self
            .request(method.clone(), &url, body.clone(), None)
            .send()
            .await
            .map_err(ProtocolError::Http)?;

        if response.status() == StatusCode::UNAUTHORIZED {
            let Some(credentials) = &self.credentials else {
                return Err(ProtocolError::AuthenticationFailed);
            };
            let challenge = response
                .headers()
                .get(WWW_AUTHENTICATE)
                .and_then(|value| value.to_str().ok())
                .ok_or(ProtocolError::AuthenticationFailed)?;

            let authorization = digest_authorization(
                credentials,
                challenge,
                &method,
                path,
                body.as_deref(),
            )?;

            tracing::debug!(url = %url, "Answering digest challenge");

            response = self
                .request(method, &url, body, Some(authorization))
                .send()
                .await
                .map_err(ProtocolError::Http)?;

            if response.status() == StatusCode::UNAUTHORIZED {
                return Err(ProtocolError::AuthenticationFailed);
            }
        }

        if !response.status().is_success() {
            return Err(ProtocolError::ConnectionFailed(format!(
                "HTTP {} - {}",
                response.status().as_u16(),
                response.status().canonical_reason().unwrap_or("Unknown")
            )));
        }

        let text = response.text().await.map_err(ProtocolError::Http)?;

        tracing::debug!(bytes = text.len(), "Received HTTP response");

        Ok(text)
    }

    fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<String>,
        authorization: Option<String>,
    ) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(USER_AGENT, GATEWAY_USER_AGENT);

        if let Some(authorization) = authorization {
            request = request.header(AUTHORIZATION, authorization);
        }
        if let Some(body) = body {
            request = request.body(body);
        }
        request
    }
}

/// Computes the `Authorization` header answering a digest challenge.
fn digest_authorization(
    credentials: &Credentials,
    challenge: &str,
    method: &Method,
    path: &str,
    body: Option<&str>,
) -> Result<String, ProtocolError> {
    let mut prompt = digest_auth::parse(challenge)?;

    let context = if *method == Method::POST {
        digest_auth::AuthContext::new_post(
            credentials.username.as_str(),
            credentials.password.as_str(),
            path,
            body.map(str::as_bytes),
        )
    } else {
        digest_auth::AuthContext::new(
            credentials.username.as_str(),
            credentials.password.as_str(),
            path,
        )
    };

    Ok(prompt.respond(&context)?.to_header_string())
}
