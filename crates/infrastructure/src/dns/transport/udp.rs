//! UDP transport for upstream queries (RFC 1035 §4.2.1).
//!
//! Messages are sent unframed. Replies are read into a buffer that fits any
//! datagram, so an upstream honouring a large client EDNS payload is never
//! cut short; a reply with TC set is returned as-is.

use super::{io_to_domain, DnsTransport, TransportResponse};
use async_trait::async_trait;
use qtype_dns_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::debug;

const MAX_UDP_RESPONSE_SIZE: usize = 65535;

pub struct UdpTransport {
    server_addr: SocketAddr,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    fn bind_addr(&self) -> SocketAddr {
        if self.server_addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        }
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let server = self.server_addr;

        let socket = UdpSocket::bind(self.bind_addr())
            .await
            .map_err(|e| DomainError::IoError(format!("Failed to bind UDP socket: {}", e)))?;
        // A connected socket only delivers datagrams from `server`.
        socket
            .connect(server)
            .await
            .map_err(|e| io_to_domain(server, e))?;

        let exchange = async {
            let bytes_sent = socket
                .send(message_bytes)
                .await
                .map_err(|e| io_to_domain(server, e))?;
            debug!(server = %server, bytes_sent, "UDP query sent");

            let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
            let bytes_received = socket
                .recv(&mut recv_buf)
                .await
                .map_err(|e| io_to_domain(server, e))?;
            recv_buf.truncate(bytes_received);
            Ok::<_, DomainError>(recv_buf)
        };

        let bytes = tokio::time::timeout(timeout, exchange)
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: server.to_string(),
            })??;

        debug!(server = %server, bytes_received = bytes.len(), "UDP response received");

        Ok(TransportResponse {
            bytes,
            protocol_used: "UDP",
        })
    }
}
