use qtype_dns_domain::RecordType;

/// Lookup table for statically served records, keyed by owner name and type.
///
/// Implementations own their synchronisation: `get` may run concurrently
/// from any number of request tasks; `put` must be exclusive per name.
pub trait RecordStore: Send + Sync {
    fn get(&self, name: &str, record_type: RecordType) -> Option<String>;

    fn put(&self, name: &str, record_type: RecordType, value: String);

    /// Number of distinct owner names.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
