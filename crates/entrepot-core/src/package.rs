//! Package types — the physical items placed into slots.
//!
//! A package stores only its own attributes; where it currently sits is
//! always derived from the placement ledger, never written back here.

use serde::{Deserialize, Serialize};

/// A physical item with dimensions and weight. Dimensions are millimetres,
/// weight is grams, matching the slot capacity columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
  pub package_id: i64,
  pub length:     i64,
  pub width:      i64,
  pub height:     i64,
  pub weight:     i64,
}

/// Input to [`crate::store::WarehouseStore::add_package`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewPackage {
  pub length: i64,
  pub width:  i64,
  pub height: i64,
  pub weight: i64,
}
