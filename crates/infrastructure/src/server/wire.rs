use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use phantom_dns_application::QueryPipeline;
use tracing::{debug, error};

/// Resolve one wire-format request into wire-format response bytes.
///
/// Undecodable payloads get a FORMERR carrying the client's transaction ID
/// when the header survived, and nothing at all when it didn't — there is
/// no ID to answer to.
pub async fn handle_wire_query(pipeline: &QueryPipeline, bytes: &[u8]) -> Option<Vec<u8>> {
    let request = match Message::from_vec(bytes) {
        Ok(request) => request,
        Err(e) => {
            debug!(error = %e, len = bytes.len(), "Dropping undecodable query");
            return formerr_from_raw(bytes);
        }
    };

    let resolution = pipeline.resolve(&request).await;

    match resolution.message.to_vec() {
        Ok(response) => Some(response),
        Err(e) => {
            error!(error = %e, outcome = resolution.outcome.as_str(), "Failed to encode response");
            None
        }
    }
}

/// Best-effort FORMERR for a payload that didn't parse. The first two bytes
/// of any DNS message are the transaction ID.
fn formerr_from_raw(bytes: &[u8]) -> Option<Vec<u8>> {
    if bytes.len() < 2 {
        return None;
    }

    let id = u16::from_be_bytes([bytes[0], bytes[1]]);
    let mut response = Message::new();
    response.set_id(id);
    response.set_message_type(MessageType::Response);
    response.set_op_code(OpCode::Query);
    response.set_response_code(ResponseCode::FormErr);
    response.to_vec().ok()
}
