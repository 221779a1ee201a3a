//! Error type for `entrepot-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] entrepot_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

/// Collapse into the domain taxonomy: domain failures pass through, backend
/// failures become `StorageUnavailable` (propagated, never retried).
impl From<Error> for entrepot_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(c) => c,
      other => entrepot_core::Error::StorageUnavailable(other.to_string()),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
