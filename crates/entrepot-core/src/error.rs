//! Error types for `entrepot-core`.
//!
//! This is the domain failure taxonomy. Storage backends wrap their own
//! transport failures into [`Error::StorageUnavailable`] on the way up.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("aisle not found: {0}")]
  AisleNotFound(i64),

  #[error("column not found: {0}")]
  ColumnNotFound(i64),

  #[error("slot not found: {0}")]
  SlotNotFound(i64),

  #[error("package not found: {0}")]
  PackageNotFound(i64),

  #[error("carrier not found: {0}")]
  CarrierNotFound(i64),

  #[error(
    "no placement of package {package_id} in slot {slot_id} by carrier {carrier_id}"
  )]
  PlacementNotFound {
    carrier_id: i64,
    package_id: i64,
    slot_id:    i64,
  },

  #[error("column {column_id} already has a slot at level {level}")]
  DuplicateSlotPosition { column_id: i64, level: i64 },

  #[error("slot level must be between 0 and 3, got {0}")]
  InvalidLevel(i64),

  #[error("slot {slot_id} is occupied by package {occupied_by}")]
  SlotOccupied { slot_id: i64, occupied_by: i64 },

  #[error("aisle {0} still has columns")]
  AisleHasColumns(i64),

  #[error("column {0} still has slots")]
  ColumnHasSlots(i64),

  #[error("slot {0} is referenced by placements")]
  SlotHasPlacements(i64),

  #[error("package {0} is referenced by placements")]
  PackageHasPlacements(i64),

  #[error("login {0:?} is already taken")]
  LoginTaken(String),

  #[error("storage unavailable: {0}")]
  StorageUnavailable(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
