pub mod query;
pub mod readings;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Reading;

pub use query::{FilterValue, ReadingQuery};
pub use readings::PgReadingRepository;

/// Read side of the reading store. Each call holds a connection only for its
/// own duration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReadingStore: Send + Sync {
    async fn fetch(&self, query: &ReadingQuery) -> Result<Vec<Reading>>;

    async fn ping(&self) -> Result<()>;
}
