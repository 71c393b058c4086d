use async_trait::async_trait;
use sqlx::FromRow;

use super::{ReadingQuery, ReadingStore};
use crate::db::DbPool;
use crate::error::Result;
use crate::models::Reading;

#[derive(Clone)]
pub struct PgReadingRepository {
    pool: DbPool,
}

impl PgReadingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReadingStore for PgReadingRepository {
    async fn fetch(&self, query: &ReadingQuery) -> Result<Vec<Reading>> {
        // The connection goes back to the pool when `conn` drops, on every path.
        let mut conn = self.pool.acquire().await?;
        tracing::debug!(params = query.params.len(), sql = %query.sql, "Executing reading query");

        let rows = query.bind_all().fetch_all(&mut *conn).await?;

        let readings = rows
            .iter()
            .map(Reading::from_row)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        tracing::debug!(rows = readings.len(), "Reading query finished");
        Ok(readings)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
