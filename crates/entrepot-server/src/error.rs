//! Error type for the server layer.

use axum::{
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized")]
  Unauthorized,

  #[error("store error: {0}")]
  Store(String),
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Unauthorized => (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Basic realm=\"entrepot\"")],
        "unauthorized",
      )
        .into_response(),
      Error::Store(m) => (StatusCode::SERVICE_UNAVAILABLE, m).into_response(),
    }
  }
}
