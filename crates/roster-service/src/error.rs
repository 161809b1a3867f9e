//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
///
/// Registration outcomes are not errors — they serialise as bodies with
/// their own status mapping. This type covers the paths around them.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("too many requests; try again shortly")]
  Throttled,

  #[error("remote sync failed: {0}")]
  Remote(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Throttled => (StatusCode::TOO_MANY_REQUESTS, self.to_string()),
      ApiError::Remote(m) => (StatusCode::BAD_GATEWAY, m.clone()),
      ApiError::Store(e) => {
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
