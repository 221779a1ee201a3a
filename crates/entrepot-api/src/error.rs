//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use entrepot_core::Error as CoreError;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("unprocessable: {0}")]
  Unprocessable(String),

  #[error("internal error: {0}")]
  Internal(String),

  #[error("storage unavailable: {0}")]
  Unavailable(String),
}

/// Map the domain taxonomy onto HTTP status codes.
impl From<CoreError> for ApiError {
  fn from(e: CoreError) -> Self {
    match e {
      CoreError::AisleNotFound(_)
      | CoreError::ColumnNotFound(_)
      | CoreError::SlotNotFound(_)
      | CoreError::PackageNotFound(_)
      | CoreError::CarrierNotFound(_)
      | CoreError::PlacementNotFound { .. } => ApiError::NotFound(e.to_string()),

      CoreError::DuplicateSlotPosition { .. }
      | CoreError::SlotOccupied { .. }
      | CoreError::AisleHasColumns(_)
      | CoreError::ColumnHasSlots(_)
      | CoreError::SlotHasPlacements(_)
      | CoreError::PackageHasPlacements(_)
      | CoreError::LoginTaken(_) => ApiError::Conflict(e.to_string()),

      CoreError::InvalidLevel(_) => ApiError::Unprocessable(e.to_string()),

      CoreError::StorageUnavailable(_) => ApiError::Unavailable(e.to_string()),
    }
  }
}

/// Convert any store error into an [`ApiError`] via the domain taxonomy.
/// Handlers use this as `.map_err(store_err)`.
pub fn store_err<E: Into<CoreError>>(e: E) -> ApiError {
  ApiError::from(e.into())
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Unprocessable(m) => (StatusCode::UNPROCESSABLE_ENTITY, m.clone()),
      ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m.clone()),
      ApiError::Unavailable(m) => (StatusCode::SERVICE_UNAVAILABLE, m.clone()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
