use hickory_proto::op::Message;
use qtype_dns_domain::{is_in_zone, normalize_name};

/// Admits requests whose first question falls inside the served zone.
#[derive(Debug, Clone)]
pub struct ZoneGate {
    zone: String,
}

impl ZoneGate {
    pub fn new(zone: &str) -> Self {
        Self {
            zone: normalize_name(zone),
        }
    }

    pub fn zone(&self) -> &str {
        &self.zone
    }

    /// Requests without questions are admitted; the handler answers them
    /// with an empty reply.
    pub fn admits(&self, request: &Message) -> bool {
        match request.queries().first() {
            Some(query) => is_in_zone(&query.name().to_utf8(), &self.zone),
            None => true,
        }
    }
}
