//! Handlers for `/carriers` endpoints.
//!
//! The create handler accepts a plaintext password and stores only its
//! argon2 PHC hash; nothing below this layer ever sees the plaintext.

use std::sync::Arc;

use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use entrepot_core::{
  carrier::{Carrier, NewCarrier},
  store::WarehouseStore,
};
use rand_core::OsRng;
use serde::Deserialize;

use crate::error::{ApiError, store_err};

/// `GET /carriers`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Carrier>>, ApiError>
where
  S: WarehouseStore,
  S::Error: Into<entrepot_core::Error>,
{
  let carriers = store.list_carriers().await.map_err(store_err)?;
  Ok(Json(carriers))
}

/// JSON body accepted by `POST /carriers`.
#[derive(Debug, Deserialize)]
pub struct CreateCarrierBody {
  pub first_name: String,
  pub last_name:  String,
  pub born_on:    NaiveDate,
  pub hired_on:   NaiveDate,
  pub login:      String,
  pub password:   String,
}

/// `POST /carriers` — returns 201 + the stored [`Carrier`] (hash excluded).
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateCarrierBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WarehouseStore,
  S::Error: Into<entrepot_core::Error>,
{
  let salt = SaltString::generate(&mut OsRng);
  let password_hash = Argon2::default()
    .hash_password(body.password.as_bytes(), &salt)
    .map_err(|e| ApiError::Internal(format!("argon2 error: {e}")))?
    .to_string();

  let carrier = store
    .add_carrier(NewCarrier {
      first_name: body.first_name,
      last_name: body.last_name,
      born_on: body.born_on,
      hired_on: body.hired_on,
      login: body.login,
      password_hash,
    })
    .await
    .map_err(store_err)?;
  Ok((StatusCode::CREATED, Json(carrier)))
}

/// `GET /carriers/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Carrier>, ApiError>
where
  S: WarehouseStore,
  S::Error: Into<entrepot_core::Error>,
{
  let carrier = store
    .get_carrier(id)
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound(format!("carrier {id} not found")))?;
  Ok(Json(carrier))
}
