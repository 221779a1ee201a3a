//! HTTP Basic-auth verification against the carriers table.
//!
//! Unlike a fixed config-file credential pair, every carrier registered in
//! the store can authenticate with their own login and password. Passwords
//! are verified against the stored argon2 PHC hash.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::http::HeaderMap;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use entrepot_core::{carrier::Carrier, store::WarehouseStore};

use crate::error::Error;

/// Verify the `Authorization: Basic` header and return the authenticated
/// carrier. Every failure mode collapses to `Unauthorized` so the response
/// leaks nothing about which part of the credentials was wrong.
pub async fn verify_basic<S>(headers: &HeaderMap, store: &S) -> Result<Carrier, Error>
where
  S: WarehouseStore,
  S::Error: Into<entrepot_core::Error>,
{
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| Error::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| Error::Unauthorized)?;

  let (login, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;

  let stored = store
    .find_carrier_by_login(login)
    .await
    .map_err(|e| Error::Store(e.into().to_string()))?
    .ok_or(Error::Unauthorized)?;

  let parsed_hash = PasswordHash::new(&stored.password_hash)
    .map_err(|_| Error::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| Error::Unauthorized)?;

  Ok(stored.carrier)
}
