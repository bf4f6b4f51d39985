//! Constructs upstream query messages in wire format.
//!
//! Every forwarded exchange gets a freshly built message with its own random
//! transaction ID; client IDs never travel upstream.

use super::record_type_map::RecordTypeMapper;
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::Name;
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use phantom_dns_domain::{DnsQuery, DomainError};
use std::str::FromStr;

pub struct MessageBuilder;

impl MessageBuilder {
    /// Build a recursive query for `query` and serialize it, returning the
    /// transaction ID for response matching alongside the wire bytes.
    pub fn build_query(query: &DnsQuery) -> Result<(u16, Vec<u8>), DomainError> {
        let name = Name::from_str(&query.domain).map_err(|e| {
            DomainError::InvalidDomainName(format!("Invalid domain '{}': {}", query.domain, e))
        })?;

        let mut question = Query::new();
        question.set_name(name);
        question.set_query_type(RecordTypeMapper::to_hickory(query.record_type));
        question.set_query_class(RecordTypeMapper::class_to_hickory(query.record_class));

        let id = fastrand::u16(..);

        let mut message = Message::new();
        message.set_id(id);
        message.set_message_type(MessageType::Query);
        message.set_op_code(OpCode::Query);
        message.set_recursion_desired(true);
        message.add_query(question);

        let bytes = Self::serialize_message(&message)?;
        Ok((id, bytes))
    }

    fn serialize_message(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::MalformedQuery(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }
}
