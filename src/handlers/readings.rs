use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use super::AppState;
use crate::models::TemperatureQueryParams;

/// GET /temperature-data
/// Readings matching the optional date, time-of-day and bus filters
pub async fn get_temperature_data(
    State(state): State<AppState>,
    Query(params): Query<TemperatureQueryParams>,
) -> Response {
    match state.service.list(params).await {
        Ok(response) => Json(response).into_response(),
        Err(err) if state.uniform_error_status => {
            (StatusCode::OK, Json(err.envelope())).into_response()
        }
        Err(err) => err.into_response(),
    }
}
