use crate::config::DatabaseConfig;
use crate::error::Result;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};
use std::time::Duration;

pub type DbPool = Pool<Postgres>;

pub fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
}

pub async fn create_pool(config: &DatabaseConfig) -> Result<DbPool> {
    let pool = pool_options(config)
        .connect_with(config.connect_options()?)
        .await?;

    Ok(pool)
}
