// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! SSDP search socket.

use std::net::{IpAddr, Ipv4Addr, SocketAddr, SocketAddrV4};

use tokio::net::UdpSocket;

use crate::discovery::SearchSocket;
use crate::error::ProtocolError;

const SSDP_MULTICAST: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(239, 255, 255, 250), 1900));

/// A UDP socket sending SSDP `M-SEARCH` requests.
///
/// The socket is released by [`stop`](SearchSocket::stop); searching or
/// receiving after that fails.
#[derive(Debug)]
pub struct SsdpSocket {
    socket: Option<UdpSocket>,
    destination: SocketAddr,
}

impl SsdpSocket {
    /// Binds an ephemeral socket that searches the SSDP multicast group.
    ///
    /// # Errors
    ///
    /// Returns error if the socket cannot be bound.
    pub async fn bind() -> Result<Self, ProtocolError> {
        Self::bind_to(SSDP_MULTICAST).await
    }

    /// Binds an ephemeral socket that sends its searches to `destination`
    /// instead of the multicast group.
    ///
    /// # Errors
    ///
    /// Returns error if the socket cannot be bound.
    pub async fn bind_to(destination: SocketAddr) -> Result<Self, ProtocolError> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await?;
        socket.set_multicast_ttl_v4(2)?;
        Ok(Self {
            socket: Some(socket),
            destination,
        })
    }

    fn socket(&self) -> Result<&UdpSocket, ProtocolError> {
        self.socket.as_ref().ok_or_else(|| {
            ProtocolError::ConnectionFailed("discovery socket already stopped".to_string())
        })
    }
}

impl SearchSocket for SsdpSocket {
    async fn search(&mut self, search_target: &str) -> Result<(), ProtocolError> {
        let request = format!(
            "M-SEARCH * HTTP/1.1\r\n\
             HOST: 239.255.255.250:1900\r\n\
             MAN: \"ssdp:discover\"\r\n\
             MX: 3\r\n\
             ST: {search_target}\r\n\
             \r\n"
        );

        tracing::debug!(destination = %self.destination, st = %search_target, "Sending M-SEARCH");

        self.socket()?
            .send_to(request.as_bytes(), self.destination)
            .await?;
        Ok(())
    }

    async fn next_response(&mut self, search_target: &str) -> Result<IpAddr, ProtocolError> {
        let socket = self.socket()?;
        let mut buffer = [0u8; 2048];

        loop {
            let (size, source) = socket.recv_from(&mut buffer).await?;

            let Ok(text) = std::str::from_utf8(&buffer[..size]) else {
                tracing::trace!(source = %source, "Ignoring non UTF-8 datagram");
                continue;
            };

            match parse_ssdp_response(text) {
                Some(response) if response.matches(search_target) => {
                    tracing::debug!(
                        source = %source,
                        location = ?response.location,
                        "Received matching SSDP response"
                    );
                    return Ok(source.ip());
                }
                Some(_) => {
                    tracing::trace!(source = %source, "Ignoring SSDP response for another service");
                }
                None => tracing::trace!(source = %source, "Ignoring malformed SSDP datagram"),
            }
        }
    }

    fn stop(&mut self) {
        if self.socket.take().is_some() {
            tracing::debug!("Discovery socket stopped");
        }
    }
}

/// Headers of an SSDP search response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct SsdpResponse {
    st: Option<String>,
    usn: Option<String>,
    location: Option<String>,
}

impl SsdpResponse {
    fn matches(&self, search_target: &str) -> bool {
        let st_matches = self
            .st
            .as_deref()
            .is_some_and(|st| st.eq_ignore_ascii_case(search_target));
        let usn_matches = self.usn.as_deref().is_some_and(|usn| {
            usn.to_ascii_lowercase()
                .contains(&search_target.to_ascii_lowercase())
        });
        st_matches || usn_matches
    }
}

/// Parses an SSDP search response. Requests and notifications are rejected.
fn parse_ssdp_response(text: &str) -> Option<SsdpResponse> {
    let mut lines = text.lines();
    let status = lines.next()?.trim();
    if !status.to_ascii_uppercase().starts_with("HTTP/") {
        return None;
    }

    let mut response = SsdpResponse::default();
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim().to_string();
        match name.trim().to_ascii_uppercase().as_str() {
            "ST" => response.st = Some(value),
            "USN" => response.usn = Some(value),
            "LOCATION" => response.location = Some(value),
            _ => {}
        }
    }

    if response.st.is_none() && response.usn.is_none() {
        return None;
    }
    Some(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::AISEG2_SEARCH_TARGET;

    const AISEG2_RESPONSE: &str = "HTTP/1.1 200 OK\r\n\
        CACHE-CONTROL: max-age=1800\r\n\
        LOCATION: http://192.168.0.216:80/description.xml\r\n\
        ST: urn:panasonic-com:service:p60AiSeg2DataService:1\r\n\
        USN: uuid:0000-1111::urn:panasonic-com:service:p60AiSeg2DataService:1\r\n\
        \r\n";

    #[test]
    fn parse_aiseg2_response() {
        let response = parse_ssdp_response(AISEG2_RESPONSE).unwrap();
        assert_eq!(
            response.location.as_deref(),
            Some("http://192.168.0.216:80/description.xml")
        );
        assert!(response.matches(AISEG2_SEARCH_TARGET));
    }

    #[test]
    fn parse_lowercase_headers() {
        let text =
            "HTTP/1.1 200 OK\r\nst: urn:panasonic-com:service:p60AiSeg2DataService:1\r\n\r\n";
        let response = parse_ssdp_response(text).unwrap();
        assert!(response.matches(AISEG2_SEARCH_TARGET));
    }

    #[test]
    fn other_service_does_not_match() {
        let text = "HTTP/1.1 200 OK\r\n\
            ST: urn:schemas-upnp-org:device:ZonePlayer:1\r\n\
            USN: uuid:RINCON_000E58A0123456::urn:schemas-upnp-org:device:ZonePlayer:1\r\n\
            \r\n";
        let response = parse_ssdp_response(text).unwrap();
        assert!(!response.matches(AISEG2_SEARCH_TARGET));
    }

    #[test]
    fn usn_alone_matches() {
        let text = "HTTP/1.1 200 OK\r\n\
            USN: uuid:0000::urn:panasonic-com:service:p60AiSeg2DataService:1\r\n\r\n";
        let response = parse_ssdp_response(text).unwrap();
        assert!(response.matches(AISEG2_SEARCH_TARGET));
    }

    #[test]
    fn notify_is_rejected() {
        let text = "NOTIFY * HTTP/1.1\r\n\
            NT: urn:panasonic-com:service:p60AiSeg2DataService:1\r\n\
            USN: uuid:0000::urn:panasonic-com:service:p60AiSeg2DataService:1\r\n\r\n";
        assert!(parse_ssdp_response(text).is_none());
    }

    #[test]
    fn empty_and_malformed_are_rejected() {
        assert!(parse_ssdp_response("").is_none());
        assert!(parse_ssdp_response("HTTP/1.1 200 OK\r\nSERVER: x\r\n\r\n").is_none());
        assert!(parse_ssdp_response("not ssdp at all").is_none());
    }

    #[tokio::test]
    async fn search_and_receive_over_loopback() {
        let responder = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let destination = responder.local_addr().unwrap();

        let mut socket = SsdpSocket::bind_to(destination).await.unwrap();
        socket.search(AISEG2_SEARCH_TARGET).await.unwrap();

        let mut buffer = [0u8; 2048];
        let (size, searcher) = responder.recv_from(&mut buffer).await.unwrap();
        let request = std::str::from_utf8(&buffer[..size]).unwrap();
        assert!(request.starts_with("M-SEARCH * HTTP/1.1\r\n"));
        assert!(request.contains("ST: urn:panasonic-com:service:p60AiSeg2DataService:1\r\n"));

        let searcher = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), searcher.port());
        let unrelated = "HTTP/1.1 200 OK\r\nST: upnp:rootdevice\r\n\r\n";
        responder.send_to(unrelated.as_bytes(), searcher).await.unwrap();
        responder
            .send_to(AISEG2_RESPONSE.as_bytes(), searcher)
            .await
            .unwrap();

        let address = socket.next_response(AISEG2_SEARCH_TARGET).await.unwrap();
        assert_eq!(address, IpAddr::V4(Ipv4Addr::LOCALHOST));
    }

    #[tokio::test]
    async fn stopped_socket_refuses_to_search() {
        let mut socket = SsdpSocket::bind().await.unwrap();
        socket.stop();
        assert!(socket.search(AISEG2_SEARCH_TARGET).await.is_err());
    }
}
