pub mod health;
pub mod readings;

use crate::services::ReadingService;

#[derive(Clone)]
pub struct AppState {
    pub service: ReadingService,
    /// Answer failures with HTTP 200 instead of 4xx/5xx.
    pub uniform_error_status: bool,
}
