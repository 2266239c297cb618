mod helpers;

use async_trait::async_trait;
use helpers::build_request;
use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::RecordType;
use qtype_dns_application::ports::QueryHandler;
use qtype_dns_application::services::reply_to;
use qtype_dns_infrastructure::dns::{DnsServerHandler, ZoneGate};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Replies NOERROR with no records and counts invocations.
#[derive(Default)]
struct CountingHandler {
    calls: AtomicUsize,
}

#[async_trait]
impl QueryHandler for CountingHandler {
    async fn handle(&self, request: &Message) -> Message {
        self.calls.fetch_add(1, Ordering::SeqCst);
        reply_to(request)
    }

    fn mode(&self) -> &'static str {
        "counting"
    }
}

fn client() -> SocketAddr {
    "192.0.2.10:40000".parse().unwrap()
}

fn handler_for(zone: &str) -> (DnsServerHandler, Arc<CountingHandler>) {
    let inner = Arc::new(CountingHandler::default());
    (
        DnsServerHandler::new(inner.clone(), ZoneGate::new(zone)),
        inner,
    )
}

async fn roundtrip(handler: &DnsServerHandler, request: &Message) -> Option<Message> {
    let bytes = request.to_vec().unwrap();
    handler
        .handle_bytes(&bytes, client())
        .await
        .map(|reply| Message::from_vec(&reply).unwrap())
}

#[tokio::test]
async fn test_query_in_zone_reaches_handler() {
    let (handler, inner) = handler_for("lan.");
    let request = build_request(21, &[("printer.lan.", RecordType::A)]);

    let reply = roundtrip(&handler, &request).await.unwrap();

    assert_eq!(reply.id(), 21);
    assert_eq!(reply.message_type(), MessageType::Response);
    assert_eq!(reply.response_code(), ResponseCode::NoError);
    assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_query_outside_zone_is_refused() {
    let (handler, inner) = handler_for("lan.");
    let request = build_request(22, &[("example.com.", RecordType::A)]);

    let reply = roundtrip(&handler, &request).await.unwrap();

    assert_eq!(reply.id(), 22);
    assert_eq!(reply.response_code(), ResponseCode::Refused);
    assert_eq!(reply.queries().len(), 1);
    assert_eq!(inner.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_zero_questions_pass_through() {
    let (handler, inner) = handler_for("lan.");
    let request = build_request(23, &[]);

    let reply = roundtrip(&handler, &request).await.unwrap();

    assert_eq!(reply.response_code(), ResponseCode::NoError);
    assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_inbound_response_is_ignored() {
    let (handler, inner) = handler_for(".");
    let mut request = build_request(24, &[("example.com.", RecordType::A)]);
    request.set_message_type(MessageType::Response);

    assert!(roundtrip(&handler, &request).await.is_none());
    assert_eq!(inner.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_garbage_with_header_id_gets_format_error() {
    let (handler, inner) = handler_for(".");
    // Header claims one question but the body is cut short.
    let bytes = [0x12, 0x34, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x03];

    let reply = handler.handle_bytes(&bytes, client()).await.unwrap();
    let reply = Message::from_vec(&reply).unwrap();

    assert_eq!(reply.id(), 0x1234);
    assert_eq!(reply.response_code(), ResponseCode::FormErr);
    assert_eq!(inner.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_one_byte_datagram_is_dropped() {
    let (handler, _) = handler_for(".");
    assert!(handler.handle_bytes(&[0x01], client()).await.is_none());
}

#[test]
fn test_handler_reports_zone_and_mode() {
    let (handler, _) = handler_for("Corp.Example");
    assert_eq!(handler.zone(), "corp.example.");
    assert_eq!(handler.mode(), "counting");
}
