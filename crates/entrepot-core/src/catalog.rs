//! Structural catalog types: aisles, columns, and slots.
//!
//! These are flat entities with parent references. All identity comes from
//! SQLite-assigned integer row ids; `number` fields are operator-facing
//! labels and carry no uniqueness guarantee.

use serde::{Deserialize, Serialize};

/// Highest slot level a column can hold. Levels run 0 (floor) through 3.
pub const MAX_LEVEL: i64 = 3;

// ─── Aisle ───────────────────────────────────────────────────────────────────

/// A top-level warehouse subdivision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aisle {
  pub aisle_id: i64,
  pub number:   i64,
}

// ─── Column ──────────────────────────────────────────────────────────────────

/// A subdivision of an aisle holding slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
  pub column_id: i64,
  pub number:    i64,
  pub aisle_id:  i64,
}

/// Input to [`crate::store::WarehouseStore::add_column`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewColumn {
  pub aisle_id: i64,
  pub number:   i64,
}

// ─── Slot ────────────────────────────────────────────────────────────────────

/// A leveled storage position within a column, with capacity limits.
///
/// At most one slot exists per `(column_id, level)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
  pub slot_id:    i64,
  /// Vertical position within the column, 0..=[`MAX_LEVEL`].
  pub level:      i64,
  pub max_volume: i64,
  pub max_weight: i64,
  pub column_id:  i64,
}

/// Input to [`crate::store::WarehouseStore::add_slot`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewSlot {
  pub column_id:  i64,
  pub level:      i64,
  pub max_volume: i64,
  pub max_weight: i64,
}

impl NewSlot {
  /// Whether `level` is inside the allowed 0..=[`MAX_LEVEL`] range.
  pub fn level_in_range(&self) -> bool {
    (0..=MAX_LEVEL).contains(&self.level)
  }
}
