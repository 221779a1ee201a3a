//! Denormalised read-model rows produced by the reporting queries.
//!
//! These are never stored; each row is assembled by a join at query time.
//! Parent fields are `Option` because the joins tolerate broken foreign
//! keys: a missing parent surfaces as absent fields, not an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A slot with its full location path, for the hierarchical warehouse view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotContext {
  pub slot_id:       i64,
  pub level:         i64,
  pub max_volume:    i64,
  pub max_weight:    i64,
  pub column_id:     i64,
  pub column_number: Option<i64>,
  pub aisle_id:      Option<i64>,
  pub aisle_number:  Option<i64>,
}

/// A placement joined with its package's dimensions and full location path,
/// for inventory and audit views. The package join is inner (a ledger row
/// without its package would be a broken record); the location joins are
/// left, so a deleted slot still leaves the row readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementDetails {
  pub placement_id:   i64,
  pub carrier_id:     i64,
  pub package_id:     i64,
  pub slot_id:        i64,
  pub deposited_at:   DateTime<Utc>,
  pub level:          Option<i64>,
  pub column_number:  Option<i64>,
  pub aisle_number:   Option<i64>,
  pub package_length: i64,
  pub package_width:  i64,
  pub package_height: i64,
  pub package_weight: i64,
}
