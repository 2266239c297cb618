use super::zone_gate::ZoneGate;
use hickory_proto::op::{Message, MessageType, ResponseCode};
use qtype_dns_application::ports::QueryHandler;
use qtype_dns_application::services::error_reply;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Wire-level front of the query pipeline, shared by the UDP and TCP
/// listeners: bytes in, at most one reply out.
#[derive(Clone)]
pub struct DnsServerHandler {
    handler: Arc<dyn QueryHandler>,
    gate: ZoneGate,
}

impl DnsServerHandler {
    pub fn new(handler: Arc<dyn QueryHandler>, gate: ZoneGate) -> Self {
        Self { handler, gate }
    }

    pub fn zone(&self) -> &str {
        self.gate.zone()
    }

    pub fn mode(&self) -> &'static str {
        self.handler.mode()
    }

    /// Returns `None` when nothing should be sent back: the datagram was
    /// too short to carry an id, it was not a query, or the reply could not
    /// be serialised.
    pub async fn handle_bytes(&self, request_bytes: &[u8], client: SocketAddr) -> Option<Vec<u8>> {
        let request = match Message::from_vec(request_bytes) {
            Ok(msg) => msg,
            Err(e) => {
                warn!(client = %client, error = %e, "Malformed DNS request");
                return format_error_reply(request_bytes);
            }
        };

        if request.message_type() != MessageType::Query {
            debug!(client = %client, id = request.id(), "Ignoring inbound response message");
            return None;
        }

        let reply = self.handle_message(&request, client).await;

        match reply.to_vec() {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                error!(client = %client, id = request.id(), error = %e, "Failed to serialise reply");
                None
            }
        }
    }

    async fn handle_message(&self, request: &Message, client: SocketAddr) -> Message {
        if let Some(query) = request.queries().first() {
            debug!(
                client = %client,
                id = request.id(),
                domain = %query.name(),
                record_type = %query.query_type(),
                questions = request.queries().len(),
                "DNS query received"
            );
        }

        if !self.gate.admits(request) {
            debug!(client = %client, zone = %self.gate.zone(), "Query outside served zone");
            return error_reply(request, ResponseCode::Refused);
        }

        self.handler.handle(request).await
    }
}

/// FORMERR for a request that did not parse, echoing its id when the
/// header got that far.
fn format_error_reply(request_bytes: &[u8]) -> Option<Vec<u8>> {
    let id = u16::from_be_bytes([*request_bytes.first()?, *request_bytes.get(1)?]);

    let mut reply = Message::new();
    reply
        .set_id(id)
        .set_message_type(MessageType::Response)
        .set_response_code(ResponseCode::FormErr);

    reply.to_vec().ok()
}
