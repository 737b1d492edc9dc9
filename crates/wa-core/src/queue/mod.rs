//! Message queue system for async processing
//!
//! This module provides a Redis-based queue system for processing
//! WhatsApp messages asynchronously.

pub mod message_queue;
pub mod redis_queue;
pub mod types;
pub mod mock;
pub mod worker;

pub use message_queue::*;
pub use redis_queue::*;
pub use types::*;
pub use mock::MockMessageQueue;
pub use worker::Worker;