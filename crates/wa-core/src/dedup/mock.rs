//! In-memory dedup store for tests.

use super::store::DedupStore;
use super::types::{CreateOutcome, DedupStatus, MessageIdRecord};
use crate::errors::CoreResult;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct MockDedupStore {
    records: Mutex<HashMap<String, MessageIdRecord>>,
}

impl MockDedupStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DedupStore for MockDedupStore {
    async fn create_if_absent(&self, message_id: &str, _ttl_seconds: u64) -> CoreResult<CreateOutcome> {
        let mut records = self.records.lock().unwrap();
        if let Some(existing) = records.get_mut(message_id) {
            existing.webhook_count += 1;
            return Ok(CreateOutcome::Duplicate(existing.clone()));
        }

        let now = Utc::now();
        let record = MessageIdRecord {
            message_id: message_id.to_string(),
            processing_id: Uuid::new_v4().to_string(),
            status: DedupStatus::Received,
            processor_id: None,
            webhook_count: 1,
            error_message: None,
            created_at: now,
            updated_at: now,
        };
        records.insert(message_id.to_string(), record.clone());
        Ok(CreateOutcome::New(record))
    }

    async fn claim(&self, message_id: &str, processor_id: &str) -> CoreResult<bool> {
        let mut records = self.records.lock().unwrap();
        let Some(record) = records.get_mut(message_id) else { return Ok(false) };
        if record.status == DedupStatus::Received && record.processor_id.is_none() {
            record.status = DedupStatus::Processing;
            record.processor_id = Some(processor_id.to_string());
            record.updated_at = Utc::now();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn update_status(
        &self,
        message_id: &str,
        status: DedupStatus,
        processor_id: &str,
        error_message: Option<&str>,
    ) -> CoreResult<bool> {
        let mut records = self.records.lock().unwrap();
        let Some(record) = records.get_mut(message_id) else { return Ok(false) };
        if record.processor_id.as_deref() == Some(processor_id) {
            record.status = status;
            record.updated_at = Utc::now();
            record.error_message = error_message.map(|s| s.to_string());
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn exists(&self, message_id: &str) -> CoreResult<bool> {
        Ok(self.records.lock().unwrap().contains_key(message_id))
    }

    async fn get(&self, message_id: &str) -> CoreResult<Option<MessageIdRecord>> {
        Ok(self.records.lock().unwrap().get(message_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn duplicate_webhook_is_rejected() {
        let store = MockDedupStore::new();
        let first = store.create_if_absent("wamid.1", 86_400).await.unwrap();
        assert!(matches!(first, CreateOutcome::New(_)));

        let second = store.create_if_absent("wamid.1", 86_400).await.unwrap();
        match second {
            CreateOutcome::Duplicate(record) => assert_eq!(record.webhook_count, 2),
            CreateOutcome::New(_) => panic!("expected duplicate"),
        }
    }

    #[tokio::test]
    async fn only_one_processor_can_claim() {
        let store = MockDedupStore::new();
        store.create_if_absent("wamid.2", 86_400).await.unwrap();

        assert!(store.claim("wamid.2", "worker-a").await.unwrap());
        assert!(!store.claim("wamid.2", "worker-b").await.unwrap());
    }

    #[tokio::test]
    async fn status_update_requires_ownership() {
        let store = MockDedupStore::new();
        store.create_if_absent("wamid.3", 86_400).await.unwrap();
        store.claim("wamid.3", "worker-a").await.unwrap();

        assert!(!store
            .update_status("wamid.3", DedupStatus::Completed, "worker-b", None)
            .await
            .unwrap());
        assert!(store
            .update_status("wamid.3", DedupStatus::Completed, "worker-a", None)
            .await
            .unwrap());

        let record = store.get("wamid.3").await.unwrap().unwrap();
        assert_eq!(record.status, DedupStatus::Completed);
    }
}
