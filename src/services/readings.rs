use std::sync::Arc;

use crate::error::Result;
use crate::models::{ReadingFilter, ReadingListResponse, ReadingRecord, TemperatureQueryParams};
use crate::repositories::{ReadingQuery, ReadingStore};

#[derive(Clone)]
pub struct ReadingService {
    store: Arc<dyn ReadingStore>,
    table: String,
}

impl ReadingService {
    pub fn new(store: Arc<dyn ReadingStore>, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
        }
    }

    /// Parse, build, fetch, map. Nothing touches the store until every
    /// parameter has been validated.
    pub async fn list(&self, params: TemperatureQueryParams) -> Result<ReadingListResponse> {
        let filter = ReadingFilter::parse(&params)?;
        let query = ReadingQuery::build(&self.table, &filter);

        if filter.is_empty() {
            tracing::debug!("No filters supplied, reading the whole {} table", self.table);
        }

        let readings = self.store.fetch(&query).await.map_err(|e| {
            tracing::error!("Error fetching data: {:?}", e);
            e
        })?;

        Ok(ReadingListResponse {
            data: readings.into_iter().map(ReadingRecord::from).collect(),
        })
    }

    pub async fn health(&self) -> bool {
        match self.store.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Health check failed: {}", e);
                false
            }
        }
    }
}
