use super::{DnsQuery, RecordClass, RecordType};
use std::sync::Arc;

/// Response-cache key: the full (name, type, class) question tuple.
///
/// Two queries differing only in transport or transaction ID share an entry;
/// two queries differing in record type or class never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub domain: Arc<str>,
    pub record_type: RecordType,
    pub record_class: RecordClass,
}

impl CacheKey {
    pub fn new(domain: Arc<str>, record_type: RecordType, record_class: RecordClass) -> Self {
        Self {
            domain,
            record_type,
            record_class,
        }
    }
}

impl From<&DnsQuery> for CacheKey {
    fn from(query: &DnsQuery) -> Self {
        Self {
            domain: Arc::clone(&query.domain),
            record_type: query.record_type,
            record_class: query.record_class,
        }
    }
}
