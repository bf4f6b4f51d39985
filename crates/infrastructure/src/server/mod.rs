//! Listener adapters. Each one decodes its transport's framing, hands the
//! wire payload to the shared pipeline and writes back whatever comes out.

pub mod doh;
pub mod dot;
pub mod udp;
pub mod wire;

pub use wire::handle_wire_query;
