use qtype_dns_application::ports::RecordStore;
use qtype_dns_domain::RecordType;
use std::collections::HashMap;
use std::sync::RwLock;

pub struct MockRecordStore {
    records: RwLock<HashMap<String, HashMap<RecordType, String>>>,
}

impl MockRecordStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    pub fn with(self, name: &str, record_type: RecordType, value: &str) -> Self {
        self.put(name, record_type, value.to_string());
        self
    }
}

impl Default for MockRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MockRecordStore {
    fn get(&self, name: &str, record_type: RecordType) -> Option<String> {
        self.records
            .read()
            .unwrap()
            .get(name)
            .and_then(|by_type| by_type.get(&record_type))
            .cloned()
    }

    fn put(&self, name: &str, record_type: RecordType, value: String) {
        self.records
            .write()
            .unwrap()
            .entry(name.to_string())
            .or_default()
            .insert(record_type, value);
    }

    fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }
}
