//! PostgreSQL connection management. Schema is owned by the hosting
//! platform; this service only reads and writes existing tables.

use crate::config::DatabaseConfig;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(&config.url)
        .await
}

/// Pool that connects on first use, so the router can be built (and driven
/// in tests) without a reachable database. The short acquire timeout keeps
/// queries against an absent database from stalling.
pub fn create_lazy_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(2))
        .connect_lazy(&config.url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires running PostgreSQL
    async fn test_create_pool() {
        let config = DatabaseConfig {
            url: "postgres://localhost:5432/inventory_test".to_string(),
            max_connections: 5,
            min_connections: 1,
        };
        let pool = create_pool(&config).await;
        assert!(pool.is_ok());
    }
}
