//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Ledger timestamps are stored as RFC 3339 strings; carrier dates as plain
//! `YYYY-MM-DD`. Integer ids map straight onto SQLite INTEGER columns and
//! need no helpers.

use chrono::{DateTime, NaiveDate, Utc};
use entrepot_core::{
  carrier::Carrier,
  placement::Placement,
  report::PlacementDetails,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `placements` row.
pub struct RawPlacement {
  pub placement_id: i64,
  pub carrier_id:   i64,
  pub package_id:   i64,
  pub slot_id:      i64,
  pub deposited_at: String,
}

impl RawPlacement {
  pub fn into_placement(self) -> Result<Placement> {
    Ok(Placement {
      placement_id: self.placement_id,
      carrier_id:   self.carrier_id,
      package_id:   self.package_id,
      slot_id:      self.slot_id,
      deposited_at: decode_dt(&self.deposited_at)?,
    })
  }
}

/// Raw values read directly from a `carriers` row (hash excluded).
pub struct RawCarrier {
  pub carrier_id: i64,
  pub first_name: String,
  pub last_name:  String,
  pub born_on:    String,
  pub hired_on:   String,
  pub login:      String,
}

impl RawCarrier {
  pub fn into_carrier(self) -> Result<Carrier> {
    Ok(Carrier {
      carrier_id: self.carrier_id,
      first_name: self.first_name,
      last_name:  self.last_name,
      born_on:    decode_date(&self.born_on)?,
      hired_on:   decode_date(&self.hired_on)?,
      login:      self.login,
    })
  }
}

/// Raw values from the placements/packages/slots/columns/aisles join.
pub struct RawPlacementDetails {
  pub placement_id:   i64,
  pub carrier_id:     i64,
  pub package_id:     i64,
  pub slot_id:        i64,
  pub deposited_at:   String,
  pub level:          Option<i64>,
  pub column_number:  Option<i64>,
  pub aisle_number:   Option<i64>,
  pub package_length: i64,
  pub package_width:  i64,
  pub package_height: i64,
  pub package_weight: i64,
}

impl RawPlacementDetails {
  pub fn into_details(self) -> Result<PlacementDetails> {
    Ok(PlacementDetails {
      placement_id:   self.placement_id,
      carrier_id:     self.carrier_id,
      package_id:     self.package_id,
      slot_id:        self.slot_id,
      deposited_at:   decode_dt(&self.deposited_at)?,
      level:          self.level,
      column_number:  self.column_number,
      aisle_number:   self.aisle_number,
      package_length: self.package_length,
      package_width:  self.package_width,
      package_height: self.package_height,
      package_weight: self.package_weight,
    })
  }
}
