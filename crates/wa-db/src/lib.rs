//! WAGateway Database Layer
//! 
//! This crate provides database connectivity, entity models, and repository patterns
//! for the messaging backend using SeaORM with PostgreSQL support.

pub mod config;
pub mod connection;
pub mod entities;
pub mod migration;
pub mod repositories;
pub mod error;

// Re-export commonly used types
pub use config::{DatabaseConfig, DatabaseUrl};
pub use connection::{DatabaseConnection, establish_connection, create_connection_pool};
pub use error::{DatabaseError, Result};
pub use entities::*;
pub use repositories::*;

// Re-export SeaORM types for convenience
pub use sea_orm::{
    Database, DatabaseConnection as SeaOrmConnection, EntityTrait, QueryFilter, 
    QuerySelect, QueryOrder, PaginatorTrait, Condition, Set, ActiveModelTrait,
    ConnectionTrait, TransactionTrait, Statement, Value, JsonValue
};

// Re-export migration utilities
pub use sea_orm_migration::MigratorTrait;
pub use migration::Migrator;

/// Run database migrations
pub async fn run_migrations(connection: &SeaOrmConnection) -> Result<()> {
    migration::run_migrations(connection).await
}

/// Health check for a given database connection. Callers own the
/// connection (built once in the composition root and threaded through
/// `AppState`) rather than reaching for a global pool.
pub async fn health_check(connection: &SeaOrmConnection) -> Result<bool> {
    match connection.ping().await {
        Ok(_) => Ok(true),
        Err(e) => {
            tracing::error!("Database health check failed: {}", e);
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_database_config_creation() {
        let config = DatabaseConfig::from_env().unwrap_or_default();
        assert!(!config.database_url().as_str().is_empty());
    }
}