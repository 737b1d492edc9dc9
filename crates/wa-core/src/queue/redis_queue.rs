//! Redis-backed implementation of the three-lane queue substrate.
//!
//! Each lane (`incoming`, `outgoing`, `analytics`) owns four key families:
//!
//! - `{prefix}{lane}:priority:{0..3}` — ready-to-receive lists, one per
//!   [`Priority`], popped highest-first.
//! - `{prefix}{lane}:delayed` — a ZSET of envelope ids scored by the time
//!   they become visible (used for delayed sends and for envelopes whose
//!   visibility window lapsed without being deleted).
//! - `{prefix}{lane}:inflight` — a ZSET of receipt handles scored by their
//!   visibility deadline; a handle's presence here is what makes it valid.
//! - `{prefix}{lane}:dead` — a list of envelope ids that exhausted their
//!   receive budget or were explicitly dead-lettered.
//!
//! `{prefix}envelope:{id}` holds the JSON-encoded [`Envelope`] itself, and
//! `{prefix}receipt:{handle}` maps a receipt handle back to its envelope id.

use crate::errors::{CoreError, CoreResult};
use crate::queue::types::{Envelope, Lane, QueueStats, Receipt};
use crate::queue::MessageQueue;
use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client as RedisClient, Script};
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

/// Receives one envelope id ready across the four priority lists, falling
/// back from `Critical` to `Low`, and returns it without removing it from
/// bookkeeping elsewhere — callers still own registering the receipt.
const CLAIM_SCRIPT: &str = r#"
for p = 3, 0, -1 do
    local key = KEYS[1] .. ":priority:" .. p
    local id = redis.call("RPOP", key)
    if id then
        return id
    end
end
return false
"#;

#[derive(Clone)]
pub struct RedisQueue {
    #[allow(dead_code)]
    client: RedisClient,
    connection_manager: ConnectionManager,
    key_prefix: String,
}

impl RedisQueue {
    pub async fn new(redis_url: &str, key_prefix: Option<String>) -> CoreResult<Self> {
        let client = RedisClient::open(redis_url)
            .map_err(|e| CoreError::External(format!("failed to create Redis client: {e}")))?;

        let connection_manager = ConnectionManager::new(client.clone())
            .await
            .map_err(|e| CoreError::External(format!("failed to create connection manager: {e}")))?;

        Ok(Self {
            client,
            connection_manager,
            key_prefix: key_prefix.unwrap_or_else(|| "wa:queue:".to_string()),
        })
    }

    fn lane_key(&self, lane: Lane) -> String {
        format!("{}{}", self.key_prefix, lane.as_str())
    }

    fn priority_key(&self, lane: Lane, priority: u8) -> String {
        format!("{}:priority:{}", self.lane_key(lane), priority)
    }

    fn delayed_key(&self, lane: Lane) -> String {
        format!("{}:delayed", self.lane_key(lane))
    }

    fn inflight_key(&self, lane: Lane) -> String {
        format!("{}:inflight", self.lane_key(lane))
    }

    fn dead_key(&self, lane: Lane) -> String {
        format!("{}:dead", self.lane_key(lane))
    }

    fn envelope_key(&self, id: &str) -> String {
        format!("{}envelope:{}", self.key_prefix, id)
    }

    fn receipt_key(&self, handle: &str) -> String {
        format!("{}receipt:{}", self.key_prefix, handle)
    }

    async fn load_envelope(&self, conn: &mut ConnectionManager, id: &str) -> CoreResult<Option<Envelope>> {
        let data: Option<String> = conn
            .get(self.envelope_key(id))
            .await
            .map_err(|e| CoreError::External(format!("failed to load envelope {id}: {e}")))?;
        match data {
            Some(data) => Ok(Some(
                serde_json::from_str(&data).map_err(|e| CoreError::Deserialization(e.to_string()))?,
            )),
            None => Ok(None),
        }
    }

    async fn store_envelope(&self, conn: &mut ConnectionManager, envelope: &Envelope) -> CoreResult<()> {
        let data = serde_json::to_string(envelope).map_err(|e| CoreError::Serialization(e.to_string()))?;
        conn.set(self.envelope_key(&envelope.id), data)
            .await
            .map_err(|e| CoreError::External(format!("failed to store envelope {}: {e}", envelope.id)))
    }

    /// Move envelopes in `lane`'s delayed ZSET whose score has elapsed into
    /// the appropriate priority list, and reclaim any in-flight receipt
    /// whose visibility deadline has lapsed without being deleted.
    async fn sweep(&self, lane: Lane) -> CoreResult<()> {
        let mut conn = self.connection_manager.clone();
        let now_ms = chrono::Utc::now().timestamp_millis();

        let ready: Vec<String> = conn
            .zrangebyscore_limit(self.delayed_key(lane), 0, now_ms, 0, 50)
            .await
            .map_err(|e| CoreError::External(format!("failed to scan delayed queue: {e}")))?;

        for id in ready {
            if let Some(envelope) = self.load_envelope(&mut conn, &id).await? {
                let priority_key = self.priority_key(lane, envelope.priority as u8);
                let _: () = redis::pipe()
                    .atomic()
                    .zrem(self.delayed_key(lane), &id)
                    .lpush(&priority_key, &id)
                    .query_async(&mut conn)
                    .await
                    .map_err(|e| CoreError::External(format!("failed to promote delayed envelope: {e}")))?;
            }
        }

        let expired_handles: Vec<String> = conn
            .zrangebyscore_limit(self.inflight_key(lane), 0, now_ms, 0, 50)
            .await
            .map_err(|e| CoreError::External(format!("failed to scan in-flight set: {e}")))?;

        for handle in expired_handles {
            warn!("visibility window lapsed for receipt {handle} on lane {}", lane.as_str());
            self.requeue_or_deadletter(lane, &handle).await?;
        }

        Ok(())
    }

    async fn requeue_or_deadletter(&self, lane: Lane, receipt_handle: &str) -> CoreResult<()> {
        let mut conn = self.connection_manager.clone();
        let receipt_key = self.receipt_key(receipt_handle);
        let id: Option<String> = conn
            .get(&receipt_key)
            .await
            .map_err(|e| CoreError::External(format!("failed to resolve receipt: {e}")))?;

        let Some(id) = id else { return Ok(()) };
        let Some(mut envelope) = self.load_envelope(&mut conn, &id).await? else {
            return Ok(());
        };

        envelope.receive_count += 1;
        self.store_envelope(&mut conn, &envelope).await?;

        let _: () = redis::pipe()
            .atomic()
            .zrem(self.inflight_key(lane), receipt_handle)
            .del(&receipt_key)
            .query_async(&mut conn)
            .await
            .map_err(|e| CoreError::External(format!("failed to clear in-flight entry: {e}")))?;

        if envelope.can_retry() {
            let priority_key = self.priority_key(lane, envelope.priority as u8);
            conn.lpush(&priority_key, &id)
                .await
                .map_err(|e| CoreError::External(format!("failed to requeue envelope: {e}")))?;
        } else {
            warn!("envelope {id} exhausted receive budget, routing to dead-letter list");
            conn.lpush(self.dead_key(lane), &id)
                .await
                .map_err(|e| CoreError::External(format!("failed to dead-letter envelope: {e}")))?;
        }

        Ok(())
    }
}

#[async_trait]
impl MessageQueue for RedisQueue {
    async fn enqueue(&self, envelope: Envelope) -> CoreResult<String> {
        let mut conn = self.connection_manager.clone();
        let lane = envelope.lane();
        let id = envelope.id.clone();

        self.store_envelope(&mut conn, &envelope).await?;

        let now = chrono::Utc::now();
        if envelope.visible_after > now {
            let delay_ms = envelope.visible_after.timestamp_millis();
            conn.zadd(self.delayed_key(lane), &id, delay_ms)
                .await
                .map_err(|e| CoreError::External(format!("failed to schedule delayed envelope: {e}")))?;
        } else {
            let priority_key = self.priority_key(lane, envelope.priority as u8);
            conn.lpush(&priority_key, &id)
                .await
                .map_err(|e| CoreError::External(format!("failed to enqueue envelope: {e}")))?;
        }

        debug!("enqueued {id} on lane {} priority {:?}", lane.as_str(), envelope.priority);
        Ok(id)
    }

    async fn receive(
        &self,
        lane: Lane,
        max_messages: usize,
        visibility_timeout: Duration,
    ) -> CoreResult<Vec<Receipt>> {
        self.sweep(lane).await?;

        let mut conn = self.connection_manager.clone();
        let script = Script::new(CLAIM_SCRIPT);
        let lane_key = self.lane_key(lane);
        let mut receipts = Vec::with_capacity(max_messages);

        for _ in 0..max_messages {
            let id: Option<String> = script
                .key(&lane_key)
                .invoke_async(&mut conn)
                .await
                .map_err(|e| CoreError::External(format!("failed to claim envelope: {e}")))?;

            let Some(id) = id else { break };
            let Some(envelope) = self.load_envelope(&mut conn, &id).await? else {
                continue;
            };

            let receipt_handle = Uuid::new_v4().to_string();
            let deadline_ms = (chrono::Utc::now()
                + chrono::Duration::from_std(visibility_timeout).unwrap_or_default())
            .timestamp_millis();

            let _: () = redis::pipe()
                .atomic()
                .zadd(self.inflight_key(lane), &receipt_handle, deadline_ms)
                .set_ex(self.receipt_key(&receipt_handle), &id, 86_400)
                .query_async(&mut conn)
                .await
                .map_err(|e| CoreError::External(format!("failed to register receipt: {e}")))?;

            receipts.push(Receipt { envelope, receipt_handle });
        }

        Ok(receipts)
    }

    async fn extend_visibility(
        &self,
        lane: Lane,
        receipt_handle: &str,
        visibility_timeout: Duration,
    ) -> CoreResult<()> {
        let mut conn = self.connection_manager.clone();
        let deadline_ms = (chrono::Utc::now()
            + chrono::Duration::from_std(visibility_timeout).unwrap_or_default())
        .timestamp_millis();

        conn.zadd(self.inflight_key(lane), receipt_handle, deadline_ms)
            .await
            .map_err(|e| CoreError::External(format!("failed to extend visibility: {e}")))
    }

    async fn delete(&self, lane: Lane, receipt_handle: &str) -> CoreResult<()> {
        let mut conn = self.connection_manager.clone();
        let receipt_key = self.receipt_key(receipt_handle);
        let id: Option<String> = conn
            .get(&receipt_key)
            .await
            .map_err(|e| CoreError::External(format!("failed to resolve receipt: {e}")))?;

        let mut pipe = redis::pipe();
        pipe.atomic()
            .zrem(self.inflight_key(lane), receipt_handle)
            .del(&receipt_key);
        if let Some(id) = &id {
            pipe.del(self.envelope_key(id));
        }
        let _: () = pipe
            .query_async(&mut conn)
            .await
            .map_err(|e| CoreError::External(format!("failed to delete envelope: {e}")))?;

        debug!("deleted receipt {receipt_handle} on lane {}", lane.as_str());
        Ok(())
    }

    async fn release(&self, lane: Lane, receipt_handle: &str, delay: Duration) -> CoreResult<()> {
        let mut conn = self.connection_manager.clone();
        let receipt_key = self.receipt_key(receipt_handle);
        let id: Option<String> = conn
            .get(&receipt_key)
            .await
            .map_err(|e| CoreError::External(format!("failed to resolve receipt: {e}")))?;

        let Some(id) = id else { return Ok(()) };
        let Some(mut envelope) = self.load_envelope(&mut conn, &id).await? else {
            return Ok(());
        };

        envelope.receive_count += 1;
        self.store_envelope(&mut conn, &envelope).await?;

        let _: () = redis::pipe()
            .atomic()
            .zrem(self.inflight_key(lane), receipt_handle)
            .del(&receipt_key)
            .query_async(&mut conn)
            .await
            .map_err(|e| CoreError::External(format!("failed to clear in-flight entry: {e}")))?;

        if !envelope.can_retry() {
            warn!("envelope {id} exhausted receive budget on release, routing to dead-letter list");
            conn.lpush(self.dead_key(lane), &id)
                .await
                .map_err(|e| CoreError::External(format!("failed to dead-letter envelope: {e}")))?;
            return Ok(());
        }

        if delay.is_zero() {
            let priority_key = self.priority_key(lane, envelope.priority as u8);
            conn.lpush(&priority_key, &id)
                .await
                .map_err(|e| CoreError::External(format!("failed to release envelope: {e}")))?;
        } else {
            let score = (chrono::Utc::now() + chrono::Duration::from_std(delay).unwrap_or_default())
                .timestamp_millis();
            conn.zadd(self.delayed_key(lane), &id, score)
                .await
                .map_err(|e| CoreError::External(format!("failed to delay envelope release: {e}")))?;
        }

        Ok(())
    }

    async fn dead_letter(&self, lane: Lane, receipt_handle: &str, reason: &str) -> CoreResult<()> {
        let mut conn = self.connection_manager.clone();
        let receipt_key = self.receipt_key(receipt_handle);
        let id: Option<String> = conn
            .get(&receipt_key)
            .await
            .map_err(|e| CoreError::External(format!("failed to resolve receipt: {e}")))?;

        let Some(id) = id else { return Ok(()) };
        if let Some(mut envelope) = self.load_envelope(&mut conn, &id).await? {
            envelope
                .attributes
                .insert("dead_letter_reason".to_string(), reason.to_string());
            self.store_envelope(&mut conn, &envelope).await?;
        }

        let _: () = redis::pipe()
            .atomic()
            .zrem(self.inflight_key(lane), receipt_handle)
            .del(&receipt_key)
            .lpush(self.dead_key(lane), &id)
            .query_async(&mut conn)
            .await
            .map_err(|e| CoreError::External(format!("failed to dead-letter envelope: {e}")))?;

        warn!("envelope {id} dead-lettered on lane {}: {reason}", lane.as_str());
        Ok(())
    }

    async fn stats(&self, lane: Lane) -> CoreResult<QueueStats> {
        let mut conn = self.connection_manager.clone();

        let mut visible = 0u64;
        for priority in 0..4 {
            let len: u64 = conn
                .llen(self.priority_key(lane, priority))
                .await
                .map_err(|e| CoreError::External(format!("failed to read queue length: {e}")))?;
            visible += len;
        }

        let in_flight: u64 = conn
            .zcard(self.inflight_key(lane))
            .await
            .map_err(|e| CoreError::External(format!("failed to read in-flight count: {e}")))?;
        let delayed: u64 = conn
            .zcard(self.delayed_key(lane))
            .await
            .map_err(|e| CoreError::External(format!("failed to read delayed count: {e}")))?;
        let dead_lettered: u64 = conn
            .llen(self.dead_key(lane))
            .await
            .map_err(|e| CoreError::External(format!("failed to read dead-letter count: {e}")))?;

        Ok(QueueStats { visible, in_flight, delayed, dead_lettered })
    }

    async fn health_check(&self) -> CoreResult<bool> {
        let mut conn = self.connection_manager.clone();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| CoreError::External(format!("Redis health check failed: {e}")))?;
        Ok(pong == "PONG")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::types::{JobType, MessageContent, Priority};

    #[tokio::test]
    async fn test_redis_queue_roundtrip() {
        if std::env::var("REDIS_URL").is_err() {
            println!("skipping Redis queue test - REDIS_URL not set");
            return;
        }

        let redis_url = std::env::var("REDIS_URL").unwrap();
        let queue = RedisQueue::new(&redis_url, Some("test:queue:".to_string())).await.unwrap();

        let envelope = Envelope::new(JobType::ProcessIncomingMessage {
            wa_message_id: "wamid.test".to_string(),
            from: "15550001111".to_string(),
            received_at: chrono::Utc::now(),
            content: MessageContent::Text { body: "hi".to_string() },
        })
        .with_priority(Priority::High);

        let id = queue.enqueue(envelope).await.unwrap();

        let received = queue
            .receive(Lane::Incoming, 1, Duration::from_secs(30))
            .await
            .unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].envelope.id, id);

        queue.delete(Lane::Incoming, &received[0].receipt_handle).await.unwrap();

        let stats = queue.stats(Lane::Incoming).await.unwrap();
        assert_eq!(stats.visible, 0);
        assert_eq!(stats.in_flight, 0);
    }
}
