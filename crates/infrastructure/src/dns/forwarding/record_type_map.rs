//! Mapping between the domain-layer record types and `hickory-proto`'s.

use hickory_proto::rr::{DNSClass, RecordType as HickoryType};
use phantom_dns_domain::{RecordClass, RecordType};

pub struct RecordTypeMapper;

impl RecordTypeMapper {
    pub fn to_hickory(record_type: RecordType) -> HickoryType {
        HickoryType::from(record_type.to_u16())
    }

    /// Query classes other than the well-known ones fall back to IN; the
    /// wire value is preserved in the cache key regardless.
    pub fn class_to_hickory(record_class: RecordClass) -> DNSClass {
        match record_class {
            RecordClass::In => DNSClass::IN,
            RecordClass::Ch => DNSClass::CH,
            RecordClass::Hs => DNSClass::HS,
            RecordClass::Any => DNSClass::ANY,
            RecordClass::Other(_) => DNSClass::IN,
        }
    }
}
