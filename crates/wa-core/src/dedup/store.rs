//! Dedup store contract.

use super::types::{CreateOutcome, DedupStatus, MessageIdRecord};
use crate::errors::CoreResult;
use async_trait::async_trait;

/// Exactly-once ingress bookkeeping: one atomic conditional write per
/// `message_id`, plus processor-ownership-gated status transitions, so that
/// two webhook deliveries (WhatsApp retries the callback liberally) or two
/// competing incoming-processor workers can never both act on the same
/// message.
#[async_trait]
pub trait DedupStore: Send + Sync {
    /// Atomically create the dedup record for `message_id` if absent.
    /// Concurrent callers racing on the same id: exactly one observes
    /// [`CreateOutcome::New`], the rest observe [`CreateOutcome::Duplicate`].
    async fn create_if_absent(&self, message_id: &str, ttl_seconds: u64) -> CoreResult<CreateOutcome>;

    /// Claim a `received` record for processing. Succeeds only if the
    /// record is still `received` and unclaimed; fails (returns `false`)
    /// if another processor already claimed it, or the record has moved
    /// past `received`.
    async fn claim(&self, message_id: &str, processor_id: &str) -> CoreResult<bool>;

    /// Transition a claimed record's status. Succeeds only if `processor_id`
    /// matches the current owner recorded by [`claim`](Self::claim).
    async fn update_status(
        &self,
        message_id: &str,
        status: DedupStatus,
        processor_id: &str,
        error_message: Option<&str>,
    ) -> CoreResult<bool>;

    /// Strongly consistent existence check.
    async fn exists(&self, message_id: &str) -> CoreResult<bool>;

    /// Fetch the current record, if any.
    async fn get(&self, message_id: &str) -> CoreResult<Option<MessageIdRecord>>;
}
