//! Message queue trait and job processor contract

use crate::errors::CoreResult;
use crate::queue::types::{Envelope, JobResult, Lane, QueueStats, Receipt};
use async_trait::async_trait;
use std::time::Duration;

/// A lane of the queue substrate: receipt-handle based, SQS-shaped
/// semantics (receive with a visibility timeout, extend, delete, or
/// dead-letter) backed by Redis rather than a managed queue service.
#[async_trait]
pub trait MessageQueue: Send + Sync {
    /// Enqueue an envelope onto the lane its job type routes to.
    async fn enqueue(&self, envelope: Envelope) -> CoreResult<String>;

    /// Receive up to `max_messages` visible envelopes from `lane`, making
    /// each invisible to other receivers for `visibility_timeout`.
    async fn receive(
        &self,
        lane: Lane,
        max_messages: usize,
        visibility_timeout: Duration,
    ) -> CoreResult<Vec<Receipt>>;

    /// Push the visibility deadline for an in-flight envelope further into
    /// the future. Used by long-running handlers to heartbeat ownership.
    async fn extend_visibility(
        &self,
        lane: Lane,
        receipt_handle: &str,
        visibility_timeout: Duration,
    ) -> CoreResult<()>;

    /// Acknowledge successful processing; removes the envelope entirely.
    async fn delete(&self, lane: Lane, receipt_handle: &str) -> CoreResult<()>;

    /// Processing failed but the envelope should become visible again
    /// (after `delay`) for another attempt, provided it has retries left.
    /// When retries are exhausted the substrate routes it to the lane's
    /// dead-letter list instead.
    async fn release(&self, lane: Lane, receipt_handle: &str, delay: Duration) -> CoreResult<()>;

    /// Force a receipt straight to the dead-letter list, bypassing retry.
    async fn dead_letter(&self, lane: Lane, receipt_handle: &str, reason: &str) -> CoreResult<()>;

    /// Lane statistics (visible / in-flight / delayed / dead-lettered counts).
    async fn stats(&self, lane: Lane) -> CoreResult<QueueStats>;

    /// Check substrate connectivity.
    async fn health_check(&self) -> CoreResult<bool>;
}

/// Handles the work carried by one or more lanes.
#[async_trait]
pub trait JobProcessor: Send + Sync {
    async fn process(&self, envelope: &Envelope) -> JobResult;

    /// Lanes this processor polls, in priority order.
    fn lanes(&self) -> Vec<Lane>;

    fn max_concurrent_jobs(&self) -> usize {
        10
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_millis(200)
    }

    /// Visibility timeout granted on receive; long-running processors
    /// (the incoming processor) heartbeat past this via `extend_visibility`.
    fn visibility_timeout(&self) -> Duration {
        Duration::from_secs(900)
    }
}
