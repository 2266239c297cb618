use dashmap::DashMap;
use qtype_dns_application::ports::RecordStore;
use qtype_dns_domain::RecordType;
use std::collections::HashMap;

/// Record table held in memory for the lifetime of the process.
///
/// Names are stored exactly as given; callers normalise them first.
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: DashMap<String, HashMap<RecordType, String>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn get(&self, name: &str, record_type: RecordType) -> Option<String> {
        self.records
            .get(name)
            .and_then(|by_type| by_type.get(&record_type).cloned())
    }

    fn put(&self, name: &str, record_type: RecordType, value: String) {
        self.records
            .entry(name.to_string())
            .or_default()
            .insert(record_type, value);
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}
