use async_trait::async_trait;
use hickory_proto::op::Message;
use hickory_proto::rr::Record;
use qtype_dns_domain::{normalize_name, ConfigError, RecordType, RecordsConfig};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::ports::{QueryHandler, RecordStore};
use crate::services::{encode_record, reply_to};

/// Answers questions straight from a [`RecordStore`], without any upstream.
///
/// A question whose name or type is missing from the store contributes no
/// answer and no error. Replies are authoritative.
pub struct StaticAnswerUseCase {
    store: Arc<dyn RecordStore>,
    default_ttl: u32,
}

impl StaticAnswerUseCase {
    pub fn new(store: Arc<dyn RecordStore>, default_ttl: u32) -> Self {
        Self { store, default_ttl }
    }

    /// Fills `store` from the configured table and builds the use case on it.
    pub fn from_config(
        store: Arc<dyn RecordStore>,
        config: &RecordsConfig,
    ) -> Result<Self, ConfigError> {
        let entries = config.parsed_entries()?;
        let count = entries.len();
        for (name, record_type, value) in entries {
            store.put(&name, record_type, value);
        }
        info!(
            records = count,
            names = store.len(),
            ttl = config.default_ttl,
            "Static records loaded"
        );
        Ok(Self::new(store, config.default_ttl))
    }

    pub async fn execute(&self, request: &Message) -> Message {
        let mut answers: Vec<Record> = Vec::new();

        for query in request.queries() {
            let Some(record_type) = RecordType::from_u16(u16::from(query.query_type())) else {
                debug!(qtype = %query.query_type(), "Skipping unknown query type");
                continue;
            };

            let name = normalize_name(&query.name().to_utf8());
            let Some(value) = self.store.get(&name, record_type) else {
                debug!(domain = %name, qtype = %record_type, "No static record");
                continue;
            };

            match encode_record(query.name(), record_type, &value, self.default_ttl) {
                Ok(record) => answers.push(record),
                Err(e) => {
                    warn!(domain = %name, qtype = %record_type, error = %e, "Unusable static record")
                }
            }
        }

        let mut reply = reply_to(request);
        reply.add_answers(answers);
        reply.set_authoritative(true);

        debug!(
            id = reply.id(),
            questions = reply.queries().len(),
            answers = reply.answers().len(),
            "Responding from static records"
        );
        reply
    }
}

#[async_trait]
impl QueryHandler for StaticAnswerUseCase {
    async fn handle(&self, request: &Message) -> Message {
        self.execute(request).await
    }

    fn mode(&self) -> &'static str {
        "static"
    }
}
