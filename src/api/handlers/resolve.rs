//! Handler for short URL resolution.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::debug;

use crate::api::dto::shorten::OriginalUrlResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the original URL behind a short code.
///
/// # Endpoint
///
/// `GET /{shortened_url}`
///
/// The path segment is looked up as-is; codes that could never have been
/// generated simply miss.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn resolve_handler(
    Path(shortened_url): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<OriginalUrlResponse>, AppError> {
    let original_url = state.shortener.resolve(&shortened_url).await?;

    debug!(code = %shortened_url, "short url resolved");

    Ok(Json(OriginalUrlResponse { original_url }))
}
