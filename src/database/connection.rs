use super::{Backend, BackendPool};
use crate::config::ActionConfig;
use sqlx::pool::PoolOptions;
use sqlx::Row;
use tracing::info;

pub struct DatabaseConnection {
    pool: BackendPool,
}

impl DatabaseConnection {
    /// Open a pool using the configured URL and connection limit
    pub async fn connect(config: &ActionConfig) -> Result<Self, sqlx::Error> {
        let pool = PoolOptions::<Backend>::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await?;

        info!(
            max_connections = config.max_connections,
            "Database pool established"
        );

        Ok(Self { pool })
    }

    /// Wrap a pool that was opened elsewhere
    pub fn from_pool(pool: BackendPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &BackendPool {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 AS health")
            .fetch_one(&self.pool)
            .await?;

        let health: i64 = row.try_get("health")?;
        Ok(health == 1)
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}
