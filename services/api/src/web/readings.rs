//! services/api/src/web/readings.rs
//!
//! Reading-interval endpoint.

use axum::{extract::State, Extension};
use reading_tracker_core::domain::User;
use std::sync::Arc;

use crate::error::ApiError;
use crate::web::dto::{ReadingIntervalDto, SaveIntervalRequest};
use crate::web::envelope::Reply;
use crate::web::extract::ApiJson;
use crate::web::state::AppState;
use crate::web::validation::validate_interval;

/// Create a new reading interval for the caller.
#[utoipa::path(
    post,
    path = "/api/v1/book-readings/save-interval",
    tag = "Reading Book",
    request_body = SaveIntervalRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Interval recorded", body = ReadingIntervalDto),
        (status = 400, description = "Invalid range, page past the end of the book, or overlap"),
        (status = 404, description = "Unknown book")
    )
)]
pub async fn save_interval_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    ApiJson(req): ApiJson<SaveIntervalRequest>,
) -> Result<Reply<ReadingIntervalDto>, ApiError> {
    let input = validate_interval(req)?;
    let interval = state
        .readings
        .record_interval(&user, input.book_id, input.start_page, input.end_page)
        .await?;
    Ok(Reply::created(
        "Successfully created reading Book interval",
        interval.into(),
    ))
}
