pub mod engine;
pub mod fetch;

pub use engine::BlockFilterEngine;
