use async_trait::async_trait;
use hickory_proto::op::Message;
use qtype_dns_domain::{DomainError, UpstreamAddr};

/// One request/response round trip with an upstream resolver.
///
/// Implementations own the transport timeout. An `Err` means no usable
/// reply arrived; a reply carrying an error rcode is still `Ok`.
#[async_trait]
pub trait UpstreamExchange: Send + Sync {
    async fn exchange(
        &self,
        request: &Message,
        server: &UpstreamAddr,
    ) -> Result<Message, DomainError>;
}
