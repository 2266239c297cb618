use super::transport::{create_transport, resolver};
use async_trait::async_trait;
use hickory_proto::op::Message;
use qtype_dns_application::ports::UpstreamExchange;
use qtype_dns_domain::{DomainError, UpstreamAddr, UpstreamConfig, UpstreamProtocol};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::debug;

/// Sends requests to upstream resolvers over UDP or TCP.
///
/// The timeout bounds the whole exchange, hostname lookup included. A
/// reply whose id differs from the request's is rejected.
pub struct TransportExchange {
    protocol: UpstreamProtocol,
    timeout: Duration,
}

impl TransportExchange {
    pub fn new(protocol: UpstreamProtocol, timeout: Duration) -> Self {
        Self { protocol, timeout }
    }

    pub fn from_config(config: &UpstreamConfig) -> Self {
        Self::new(config.protocol, Duration::from_millis(config.query_timeout))
    }

    pub fn protocol(&self) -> UpstreamProtocol {
        self.protocol
    }

    async fn resolve(&self, server: &UpstreamAddr) -> Result<SocketAddr, DomainError> {
        if let Some(addr) = server.socket_addr() {
            return Ok(addr);
        }
        let (hostname, port) = server
            .unresolved_parts()
            .ok_or_else(|| DomainError::InvalidUpstreamAddress(server.to_string()))?;
        let addrs = resolver::resolve_all(hostname, port, self.timeout).await?;
        addrs
            .first()
            .copied()
            .ok_or_else(|| DomainError::UpstreamResolution {
                host: server.to_string(),
            })
    }

    async fn round_trip(
        &self,
        request_bytes: &[u8],
        server: &UpstreamAddr,
    ) -> Result<Vec<u8>, DomainError> {
        let addr = self.resolve(server).await?;
        let transport = create_transport(self.protocol, addr);
        let response = transport.send(request_bytes, self.timeout).await?;

        debug!(
            server = %server,
            protocol = response.protocol_used,
            bytes = response.bytes.len(),
            "Upstream replied"
        );
        Ok(response.bytes)
    }
}

#[async_trait]
impl UpstreamExchange for TransportExchange {
    async fn exchange(
        &self,
        request: &Message,
        server: &UpstreamAddr,
    ) -> Result<Message, DomainError> {
        let request_bytes = request
            .to_vec()
            .map_err(|e| DomainError::MessageEncoding(e.to_string()))?;

        let response_bytes = tokio::time::timeout(
            self.timeout,
            self.round_trip(&request_bytes, server),
        )
        .await
        .map_err(|_| DomainError::TransportTimeout {
            server: server.to_string(),
        })??;

        let reply = Message::from_vec(&response_bytes)
            .map_err(|e| DomainError::InvalidDnsResponse(format!("{}: {}", server, e)))?;

        if reply.id() != request.id() {
            return Err(DomainError::InvalidDnsResponse(format!(
                "{}: reply id {} does not match request id {}",
                server,
                reply.id(),
                request.id()
            )));
        }

        Ok(reply)
    }
}
