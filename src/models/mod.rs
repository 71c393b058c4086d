pub mod filter;
pub mod reading;

pub use filter::{ReadingFilter, TemperatureQueryParams};
pub use reading::{ErrorEnvelope, Reading, ReadingListResponse, ReadingRecord};
