//! Composition root: builds every repository, engine, and external client
//! the handlers and background workers depend on, and shares them through
//! `web::Data<AppState>` and `Arc` clones handed to spawned tasks.

use std::sync::Arc;
use tokio::sync::RwLock;

use wa_core::campaign::CampaignScheduler;
use wa_core::conversation::ConversationEngine;
use wa_core::dedup::{DedupStore, RedisDedupStore};
use wa_core::queue::{MessageQueue, RedisQueue};
use wa_core::reply::{BusinessHours, ReplyEngine};
use wa_db::config::{DatabaseConfig as DbConfigInner, DatabaseUrl};
use wa_db::connection::{establish_connection, DatabaseConnection};
use wa_db::{
    AgentSessionRepository, CampaignRepository, ConversationStateRepository, CustomerRepository,
    DailyBusinessMetricRepository, StoredMessageRepository, WorkflowTemplateRepository,
};

/// Application state shared across all request handlers and background workers.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<crate::config::ApiConfig>,
    health: Arc<RwLock<HealthState>>,

    pub dedup: Arc<dyn DedupStore>,
    pub queue: Arc<dyn MessageQueue>,
    pub whatsapp_client: Arc<wa_whatsapp::WhatsAppClient>,

    pub customers: Arc<CustomerRepository>,
    pub stored_messages: Arc<StoredMessageRepository>,
    pub workflow_templates: Arc<WorkflowTemplateRepository>,
    pub conversation_states: Arc<ConversationStateRepository>,
    pub agent_sessions: Arc<AgentSessionRepository>,
    pub campaigns: Arc<CampaignRepository>,
    pub daily_metrics: Arc<DailyBusinessMetricRepository>,

    pub conversation_engine: Arc<ConversationEngine>,
    pub reply_engine: Arc<ReplyEngine>,
    pub campaign_scheduler: Arc<CampaignScheduler>,
}

#[derive(Debug, Clone)]
struct HealthState {
    database_healthy: bool,
    last_check: chrono::DateTime<chrono::Utc>,
    startup_time: chrono::DateTime<chrono::Utc>,
    version: String,
}

impl AppState {
    pub async fn new(config: crate::config::ApiConfig) -> Result<Self, AppStateError> {
        let db_config = DbConfigInner::new(
            DatabaseUrl::new(config.database.url.clone())
                .map_err(|e| AppStateError::Configuration(e.to_string()))?,
        );
        let db = establish_connection(&db_config)
            .await
            .map_err(AppStateError::DatabaseConnection)?;

        let dedup: Arc<dyn DedupStore> = Arc::new(
            RedisDedupStore::new(
                &config.redis.url,
                Some(format!("{}dedup:", config.redis.key_prefix)),
            )
            .await
            .map_err(|e| AppStateError::Configuration(e.to_string()))?,
        );

        let queue: Arc<dyn MessageQueue> = Arc::new(
            RedisQueue::new(
                &config.redis.url,
                Some(format!("{}queue:", config.redis.key_prefix)),
            )
            .await
            .map_err(|e| AppStateError::Configuration(e.to_string()))?,
        );

        let whatsapp_client = Arc::new(
            wa_whatsapp::WhatsAppClient::new(wa_whatsapp::WhatsAppConfig {
                access_token: config.whatsapp.access_token.clone(),
                phone_number_id: config.whatsapp.phone_number_id.clone(),
                base_url: config.whatsapp.base_url.clone(),
                webhook_verify_token: config.whatsapp.webhook_verify_token.clone(),
                app_secret: config.whatsapp.app_secret.clone(),
            })
            .map_err(|e| AppStateError::Configuration(e.to_string()))?,
        );

        let customers = Arc::new(CustomerRepository::new(db.clone()));
        let stored_messages = Arc::new(StoredMessageRepository::new(db.clone()));
        let workflow_templates = Arc::new(WorkflowTemplateRepository::new(db.clone()));
        let conversation_states = Arc::new(ConversationStateRepository::new(db.clone()));
        let agent_sessions = Arc::new(AgentSessionRepository::new(db.clone()));
        let campaigns = Arc::new(CampaignRepository::new(db.clone()));
        let daily_metrics = Arc::new(DailyBusinessMetricRepository::new(db.clone()));

        let conversation_engine = Arc::new(ConversationEngine::new(
            workflow_templates.clone(),
            conversation_states.clone(),
            agent_sessions.clone(),
            queue.clone(),
        ));
        let reply_engine = Arc::new(ReplyEngine::with_default_rules(
            BusinessHours::default(),
            queue.clone(),
        ));
        let campaign_scheduler = Arc::new(CampaignScheduler::new(
            campaigns.clone(),
            customers.clone(),
            queue.clone(),
        ));

        let health = Arc::new(RwLock::new(HealthState {
            database_healthy: true,
            last_check: chrono::Utc::now(),
            startup_time: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }));

        Ok(Self {
            db,
            config: Arc::new(config),
            health,
            dedup,
            queue,
            whatsapp_client,
            customers,
            stored_messages,
            workflow_templates,
            conversation_states,
            agent_sessions,
            campaigns,
            daily_metrics,
            conversation_engine,
            reply_engine,
            campaign_scheduler,
        })
    }

    /// Check the health of all system components.
    pub async fn health_check(&self) -> HealthCheckResult {
        let db_healthy = self.check_database_health().await;
        let queue_healthy = self.queue.health_check().await.unwrap_or(false);

        let mut health = self.health.write().await;
        health.database_healthy = db_healthy;
        health.last_check = chrono::Utc::now();
        let current = health.clone();
        drop(health);

        HealthCheckResult {
            healthy: db_healthy && queue_healthy,
            checks: vec![
                HealthCheck {
                    name: "database".to_string(),
                    status: if db_healthy {
                        HealthStatus::Healthy
                    } else {
                        HealthStatus::Unhealthy
                    },
                    message: if db_healthy {
                        "Database connection is healthy".to_string()
                    } else {
                        "Database connection failed".to_string()
                    },
                    last_checked: current.last_check,
                },
                HealthCheck {
                    name: "queue".to_string(),
                    status: if queue_healthy {
                        HealthStatus::Healthy
                    } else {
                        HealthStatus::Unhealthy
                    },
                    message: if queue_healthy {
                        "Queue substrate is reachable".to_string()
                    } else {
                        "Queue substrate is unreachable".to_string()
                    },
                    last_checked: current.last_check,
                },
            ],
            uptime: chrono::Utc::now()
                .signed_duration_since(current.startup_time)
                .num_seconds(),
            version: current.version,
        }
    }

    async fn check_database_health(&self) -> bool {
        use sea_orm::{ConnectionTrait, Statement};

        match self
            .db
            .execute(Statement::from_string(
                self.db.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await
        {
            Ok(_) => true,
            Err(e) => {
                tracing::error!("Database health check failed: {}", e);
                false
            }
        }
    }

    pub fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    pub async fn uptime(&self) -> i64 {
        let health = self.health.read().await;
        chrono::Utc::now()
            .signed_duration_since(health.startup_time)
            .num_seconds()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    #[error("Failed to establish database connection: {0}")]
    DatabaseConnection(#[from] wa_db::error::DatabaseError),
    #[error("Configuration error: {0}")]
    Configuration(String),
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthCheckResult {
    pub healthy: bool,
    pub checks: Vec<HealthCheck>,
    pub uptime: i64,
    pub version: String,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    pub message: String,
    pub last_checked: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub enum HealthStatus {
    #[serde(rename = "healthy")]
    Healthy,
    #[serde(rename = "unhealthy")]
    Unhealthy,
    #[serde(rename = "degraded")]
    Degraded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_error_display() {
        let error = AppStateError::Configuration("test error".to_string());
        assert!(error.to_string().contains("Configuration error: test error"));
    }

    #[test]
    fn test_health_status_serialization() {
        let status = HealthStatus::Healthy;
        let serialized = serde_json::to_string(&status).unwrap();
        assert_eq!(serialized, "\"healthy\"");

        let status = HealthStatus::Unhealthy;
        let serialized = serde_json::to_string(&status).unwrap();
        assert_eq!(serialized, "\"unhealthy\"");

        let status = HealthStatus::Degraded;
        let serialized = serde_json::to_string(&status).unwrap();
        assert_eq!(serialized, "\"degraded\"");
    }
}