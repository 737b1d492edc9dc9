//! In-memory queue used by unit and integration tests.

use super::types::{Envelope, Lane, QueueStats, Receipt};
use super::MessageQueue;
use crate::errors::CoreResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

struct InFlight {
    envelope: Envelope,
    lane: Lane,
}

/// Mock message queue: same receipt-handle contract as [`RedisQueue`], kept
/// entirely in process memory so tests don't need a live Redis instance.
pub struct MockMessageQueue {
    ready: Mutex<HashMap<Lane, Vec<Envelope>>>,
    inflight: Mutex<HashMap<String, InFlight>>,
    dead: Mutex<HashMap<Lane, Vec<Envelope>>>,
}

impl MockMessageQueue {
    pub fn new() -> Self {
        Self {
            ready: Mutex::new(HashMap::new()),
            inflight: Mutex::new(HashMap::new()),
            dead: Mutex::new(HashMap::new()),
        }
    }

    /// Inspect envelopes currently sitting in a lane's ready list.
    pub fn peek(&self, lane: Lane) -> Vec<Envelope> {
        self.ready.lock().unwrap().get(&lane).cloned().unwrap_or_default()
    }

    pub fn clear(&self) {
        self.ready.lock().unwrap().clear();
        self.inflight.lock().unwrap().clear();
        self.dead.lock().unwrap().clear();
    }
}

impl Default for MockMessageQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageQueue for MockMessageQueue {
    async fn enqueue(&self, envelope: Envelope) -> CoreResult<String> {
        let id = envelope.id.clone();
        let lane = envelope.lane();
        self.ready.lock().unwrap().entry(lane).or_default().push(envelope);
        Ok(id)
    }

    async fn receive(
        &self,
        lane: Lane,
        max_messages: usize,
        _visibility_timeout: Duration,
    ) -> CoreResult<Vec<Receipt>> {
        let mut ready = self.ready.lock().unwrap();
        let queue = ready.entry(lane).or_default();
        let mut receipts = Vec::new();

        for _ in 0..max_messages {
            let Some(envelope) = queue.pop() else { break };
            let receipt_handle = Uuid::new_v4().to_string();
            self.inflight.lock().unwrap().insert(
                receipt_handle.clone(),
                InFlight { envelope: envelope.clone(), lane },
            );
            receipts.push(Receipt { envelope, receipt_handle });
        }

        Ok(receipts)
    }

    async fn extend_visibility(
        &self,
        _lane: Lane,
        _receipt_handle: &str,
        _visibility_timeout: Duration,
    ) -> CoreResult<()> {
        Ok(())
    }

    async fn delete(&self, _lane: Lane, receipt_handle: &str) -> CoreResult<()> {
        self.inflight.lock().unwrap().remove(receipt_handle);
        Ok(())
    }

    async fn release(&self, _lane: Lane, receipt_handle: &str, _delay: Duration) -> CoreResult<()> {
        let Some(mut entry) = self.inflight.lock().unwrap().remove(receipt_handle) else {
            return Ok(());
        };
        entry.envelope.receive_count += 1;
        if entry.envelope.can_retry() {
            self.ready.lock().unwrap().entry(entry.lane).or_default().push(entry.envelope);
        } else {
            self.dead.lock().unwrap().entry(entry.lane).or_default().push(entry.envelope);
        }
        Ok(())
    }

    async fn dead_letter(&self, _lane: Lane, receipt_handle: &str, reason: &str) -> CoreResult<()> {
        if let Some(entry) = self.inflight.lock().unwrap().remove(receipt_handle) {
            let mut envelope = entry.envelope;
            envelope
                .attributes
                .insert("dead_letter_reason".to_string(), reason.to_string());
            self.dead.lock().unwrap().entry(entry.lane).or_default().push(envelope);
        }
        Ok(())
    }

    async fn stats(&self, lane: Lane) -> CoreResult<QueueStats> {
        Ok(QueueStats {
            visible: self.ready.lock().unwrap().get(&lane).map(|v| v.len() as u64).unwrap_or(0),
            in_flight: self
                .inflight
                .lock()
                .unwrap()
                .values()
                .filter(|e| e.lane == lane)
                .count() as u64,
            delayed: 0,
            dead_lettered: self.dead.lock().unwrap().get(&lane).map(|v| v.len() as u64).unwrap_or(0),
        })
    }

    async fn health_check(&self) -> CoreResult<bool> {
        Ok(true)
    }
}
