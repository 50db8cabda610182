//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL for a long one.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// { "original_url": "https://example.com/some/long/path" }
/// ```
///
/// # Response
///
/// ```json
/// { "shortened_url": "http://localhost:8080/aZ_09xYk3Q" }
/// ```
///
/// # Errors
///
/// - **400** malformed body or a URL that is not absolute
/// - **409** the URL is already shortened (only with unique original URLs enabled)
/// - **503** every generated candidate collided
/// - **504** storage did not answer in time
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>, AppError> {
    let Json(payload) =
        payload.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    payload.validate()?;

    let code = state.shortener.shorten(&payload.original_url).await?;

    Ok(Json(ShortenResponse {
        shortened_url: state.shortener.short_url(&code),
    }))
}
