//! Redis-backed dedup store.
//!
//! Grounded on `original_source/backend/app/dynamodb_client.py`'s
//! `store_message_id_atomic` / `claim_message_processing` /
//! `update_message_status_atomic`, whose DynamoDB `ConditionExpression`
//! guards are re-expressed here as small Lua scripts run against a Redis
//! hash per `message_id` — Redis's single-threaded script execution gives
//! the same all-or-nothing guarantee DynamoDB's conditional writes did.

use super::store::DedupStore;
use super::types::{CreateOutcome, DedupStatus, MessageIdRecord};
use crate::errors::{CoreError, CoreResult};
use async_trait::async_trait;
use chrono::Utc;
use redis::{aio::ConnectionManager, AsyncCommands, Client as RedisClient, Script};
use std::collections::HashMap;
use uuid::Uuid;

const CREATE_IF_ABSENT_SCRIPT: &str = r#"
local key = KEYS[1]
local exists = redis.call("EXISTS", key)
if exists == 1 then
    redis.call("HINCRBY", key, "webhook_count", 1)
    return 0
else
    redis.call("HSET", key,
        "message_id", ARGV[1],
        "processing_id", ARGV[2],
        "status", "received",
        "webhook_count", "1",
        "created_at", ARGV[3],
        "updated_at", ARGV[3])
    redis.call("EXPIRE", key, ARGV[4])
    return 1
end
"#;

const CLAIM_SCRIPT: &str = r#"
local key = KEYS[1]
local status = redis.call("HGET", key, "status")
local processor = redis.call("HGET", key, "processor_id")
if status == "received" and (processor == false or processor == nil) then
    redis.call("HSET", key, "status", "processing", "processor_id", ARGV[1], "updated_at", ARGV[2])
    return 1
else
    return 0
end
"#;

const UPDATE_STATUS_SCRIPT: &str = r#"
local key = KEYS[1]
local processor = redis.call("HGET", key, "processor_id")
if processor == ARGV[1] then
    redis.call("HSET", key, "status", ARGV[2], "updated_at", ARGV[3])
    if ARGV[4] ~= "" then
        redis.call("HSET", key, "error_message", ARGV[4])
    end
    return 1
else
    return 0
end
"#;

#[derive(Clone)]
pub struct RedisDedupStore {
    #[allow(dead_code)]
    client: RedisClient,
    connection_manager: ConnectionManager,
    key_prefix: String,
}

impl RedisDedupStore {
    pub async fn new(redis_url: &str, key_prefix: Option<String>) -> CoreResult<Self> {
        let client = RedisClient::open(redis_url)
            .map_err(|e| CoreError::External(format!("failed to create Redis client: {e}")))?;
        let connection_manager = ConnectionManager::new(client.clone())
            .await
            .map_err(|e| CoreError::External(format!("failed to create connection manager: {e}")))?;

        Ok(Self {
            client,
            connection_manager,
            key_prefix: key_prefix.unwrap_or_else(|| "wa:dedup:".to_string()),
        })
    }

    fn key(&self, message_id: &str) -> String {
        format!("{}msgid:{}", self.key_prefix, message_id)
    }

    fn parse_record(fields: HashMap<String, String>) -> Option<MessageIdRecord> {
        if fields.is_empty() {
            return None;
        }
        Some(MessageIdRecord {
            message_id: fields.get("message_id")?.clone(),
            processing_id: fields.get("processing_id")?.clone(),
            status: DedupStatus::parse(fields.get("status")?)?,
            processor_id: fields.get("processor_id").cloned(),
            webhook_count: fields.get("webhook_count").and_then(|v| v.parse().ok()).unwrap_or(1),
            error_message: fields.get("error_message").cloned(),
            created_at: fields
                .get("created_at")
                .and_then(|v| v.parse::<DateTimeWrapper>().ok())
                .map(|w| w.0)
                .unwrap_or_else(Utc::now),
            updated_at: fields
                .get("updated_at")
                .and_then(|v| v.parse::<DateTimeWrapper>().ok())
                .map(|w| w.0)
                .unwrap_or_else(Utc::now),
        })
    }
}

/// Thin wrapper so `str::parse` can produce a `DateTime<Utc>` from an RFC
/// 3339 string without importing `FromStr` conflicts elsewhere.
struct DateTimeWrapper(chrono::DateTime<Utc>);

impl std::str::FromStr for DateTimeWrapper {
    type Err = chrono::ParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(DateTimeWrapper(chrono::DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc)))
    }
}

#[async_trait]
impl DedupStore for RedisDedupStore {
    async fn create_if_absent(&self, message_id: &str, ttl_seconds: u64) -> CoreResult<CreateOutcome> {
        let mut conn = self.connection_manager.clone();
        let key = self.key(message_id);
        let processing_id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        let created: i64 = Script::new(CREATE_IF_ABSENT_SCRIPT)
            .key(&key)
            .arg(message_id)
            .arg(&processing_id)
            .arg(&now)
            .arg(ttl_seconds)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| CoreError::External(format!("dedup create_if_absent failed: {e}")))?;

        let fields: HashMap<String, String> = conn
            .hgetall(&key)
            .await
            .map_err(|e| CoreError::External(format!("failed to read dedup record: {e}")))?;
        let record = Self::parse_record(fields)
            .ok_or_else(|| CoreError::internal("dedup record missing immediately after write"))?;

        if created == 1 {
            Ok(CreateOutcome::New(record))
        } else {
            Ok(CreateOutcome::Duplicate(record))
        }
    }

    async fn claim(&self, message_id: &str, processor_id: &str) -> CoreResult<bool> {
        let mut conn = self.connection_manager.clone();
        let key = self.key(message_id);
        let now = Utc::now().to_rfc3339();

        let claimed: i64 = Script::new(CLAIM_SCRIPT)
            .key(&key)
            .arg(processor_id)
            .arg(&now)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| CoreError::External(format!("dedup claim failed: {e}")))?;

        Ok(claimed == 1)
    }

    async fn update_status(
        &self,
        message_id: &str,
        status: DedupStatus,
        processor_id: &str,
        error_message: Option<&str>,
    ) -> CoreResult<bool> {
        let mut conn = self.connection_manager.clone();
        let key = self.key(message_id);
        let now = Utc::now().to_rfc3339();

        let updated: i64 = Script::new(UPDATE_STATUS_SCRIPT)
            .key(&key)
            .arg(processor_id)
            .arg(status.as_str())
            .arg(&now)
            .arg(error_message.unwrap_or(""))
            .invoke_async(&mut conn)
            .await
            .map_err(|e| CoreError::External(format!("dedup update_status failed: {e}")))?;

        Ok(updated == 1)
    }

    async fn exists(&self, message_id: &str) -> CoreResult<bool> {
        let mut conn = self.connection_manager.clone();
        let exists: bool = conn
            .exists(self.key(message_id))
            .await
            .map_err(|e| CoreError::External(format!("dedup exists check failed: {e}")))?;
        Ok(exists)
    }

    async fn get(&self, message_id: &str) -> CoreResult<Option<MessageIdRecord>> {
        let mut conn = self.connection_manager.clone();
        let fields: HashMap<String, String> = conn
            .hgetall(self.key(message_id))
            .await
            .map_err(|e| CoreError::External(format!("failed to read dedup record: {e}")))?;
        Ok(Self::parse_record(fields))
    }
}
