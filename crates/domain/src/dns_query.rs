use super::{validators::normalize_domain, RecordClass, RecordType};
use std::sync::Arc;

/// A parsed DNS question, normalized at construction.
///
/// Uses `Arc<str>` for zero-cost cloning between the pipeline, cache key and
/// upstream resolver. The transport transaction ID deliberately lives outside
/// this type: it belongs to the adapter, not to resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuery {
    pub domain: Arc<str>,
    pub record_type: RecordType,
    pub record_class: RecordClass,
}

impl DnsQuery {
    /// Build a query with the domain case-folded into trailing-dot form.
    pub fn new(domain: &str, record_type: RecordType, record_class: RecordClass) -> Self {
        Self {
            domain: Arc::from(normalize_domain(domain)),
            record_type,
            record_class,
        }
    }
}
