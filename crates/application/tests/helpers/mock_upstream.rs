use async_trait::async_trait;
use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::Record;
use qtype_dns_application::ports::UpstreamExchange;
use qtype_dns_domain::{DomainError, UpstreamAddr};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub enum MockOutcome {
    Answers(Vec<Record>),
    Rcode(ResponseCode),
    TransportError,
    MalformedReply,
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub server: UpstreamAddr,
    pub id: u16,
    pub questions: Vec<String>,
}

/// Scripted upstream keyed by question name. Unscripted names get an empty
/// NOERROR reply.
pub struct MockUpstreamExchange {
    outcomes: Mutex<HashMap<String, MockOutcome>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockUpstreamExchange {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_outcome(&self, domain: &str, outcome: MockOutcome) {
        self.outcomes
            .lock()
            .unwrap()
            .insert(domain.to_string(), outcome);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockUpstreamExchange {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UpstreamExchange for MockUpstreamExchange {
    async fn exchange(
        &self,
        request: &Message,
        server: &UpstreamAddr,
    ) -> Result<Message, DomainError> {
        let questions: Vec<String> = request
            .queries()
            .iter()
            .map(|q| q.name().to_utf8())
            .collect();

        self.calls.lock().unwrap().push(RecordedCall {
            server: server.clone(),
            id: request.id(),
            questions: questions.clone(),
        });

        let outcome = questions
            .first()
            .and_then(|q| self.outcomes.lock().unwrap().get(q).cloned())
            .unwrap_or(MockOutcome::Answers(vec![]));

        let mut reply = request.clone();
        reply.set_message_type(MessageType::Response);

        match outcome {
            MockOutcome::TransportError => Err(DomainError::TransportTimeout {
                server: server.to_string(),
            }),
            MockOutcome::MalformedReply => Err(DomainError::InvalidDnsResponse(format!(
                "{}: unexpected end of input reached",
                server
            ))),
            MockOutcome::Rcode(code) => {
                reply.set_response_code(code);
                Ok(reply)
            }
            MockOutcome::Answers(records) => {
                reply.set_response_code(ResponseCode::NoError);
                reply.add_answers(records);
                Ok(reply)
            }
        }
    }
}
