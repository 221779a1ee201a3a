//! Placement types — the ledger rows linking a package to a slot.
//!
//! A placement records that a carrier deposited a package into a slot at a
//! point in time. Moves append a new row; prior rows stay behind as history.
//! "Where is package P right now" is always computed as the newest row for
//! that package, never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One ledger row. `placement_id` is the monotonic sequence that breaks
/// `deposited_at` ties, so "newest" is always well defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
  pub placement_id: i64,
  pub carrier_id:   i64,
  pub package_id:   i64,
  pub slot_id:      i64,
  pub deposited_at: DateTime<Utc>,
}

/// Input to [`crate::store::WarehouseStore::record_placement`].
/// When `deposited_at` is `None` the store stamps the row with "now".
#[derive(Debug, Clone, Deserialize)]
pub struct NewPlacement {
  pub carrier_id:   i64,
  pub package_id:   i64,
  pub slot_id:      i64,
  pub deposited_at: Option<DateTime<Utc>>,
}

impl NewPlacement {
  /// Convenience constructor for a store-stamped placement.
  pub fn new(carrier_id: i64, package_id: i64, slot_id: i64) -> Self {
    Self { carrier_id, package_id, slot_id, deposited_at: None }
  }
}
