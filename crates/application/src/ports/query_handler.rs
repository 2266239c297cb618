use async_trait::async_trait;
use hickory_proto::op::Message;

/// Turns one inbound request into exactly one reply.
#[async_trait]
pub trait QueryHandler: Send + Sync {
    async fn handle(&self, request: &Message) -> Message;

    /// Short name for logs.
    fn mode(&self) -> &'static str;
}
