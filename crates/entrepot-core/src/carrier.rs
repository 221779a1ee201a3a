//! Carrier types — the warehouse operators who perform placements.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A warehouse operator. The password hash never leaves the store layer;
/// see [`CarrierCredentials`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Carrier {
  pub carrier_id: i64,
  pub first_name: String,
  pub last_name:  String,
  pub born_on:    NaiveDate,
  pub hired_on:   NaiveDate,
  pub login:      String,
}

/// Input to [`crate::store::WarehouseStore::add_carrier`].
///
/// `password_hash` is an argon2 PHC string computed by the caller; the store
/// never sees a plaintext password.
#[derive(Debug, Clone)]
pub struct NewCarrier {
  pub first_name:    String,
  pub last_name:     String,
  pub born_on:       NaiveDate,
  pub hired_on:      NaiveDate,
  pub login:         String,
  pub password_hash: String,
}

/// A carrier together with its stored password hash, returned only by
/// [`crate::store::WarehouseStore::find_carrier_by_login`] for the auth layer.
#[derive(Debug, Clone)]
pub struct CarrierCredentials {
  pub carrier:       Carrier,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}
