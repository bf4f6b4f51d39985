//! PhantomDNS Application Layer
//!
//! Ports (traits) implemented by the infrastructure layer, plus the
//! query-resolution pipeline shared by every transport adapter.
pub mod ports;
pub mod use_cases;

pub use use_cases::resolve_query::{QueryPipeline, Resolution, ResolutionOutcome};
