pub mod blocklist_sync;
pub mod cache_sweep;
pub mod runner;

pub use blocklist_sync::BlocklistSyncJob;
pub use cache_sweep::CacheSweepJob;
pub use runner::JobRunner;
