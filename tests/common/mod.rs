pub mod fixtures;

#[allow(unused_imports)]
pub use fixtures::{build_pipeline, MockUpstream};
