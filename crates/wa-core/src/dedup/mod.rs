//! Atomic, exactly-once webhook deduplication.

pub mod mock;
pub mod redis_store;
pub mod store;
pub mod types;

pub use mock::MockDedupStore;
pub use redis_store::RedisDedupStore;
pub use store::DedupStore;
pub use types::{CreateOutcome, DedupStatus, MessageIdRecord};
