//! Handlers for the placement-ledger endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/placements` | Assign a package to a slot; idempotent on re-assign |
//! | `DELETE` | `/placements` | Explicit withdrawal of a matching placement |
//! | `GET` | `/packages/:id/placement` | Current placement; 404 when unplaced |
//! | `GET` | `/packages/:id/history` | Full ledger for a package, newest first |
//! | `GET` | `/slots/:id/occupancy` | Current occupant(s) of a slot |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use entrepot_core::{placement::Placement, store::WarehouseStore};
use serde::Deserialize;

use crate::error::{ApiError, store_err};

// ─── Assign / withdraw ───────────────────────────────────────────────────────

/// JSON body accepted by `POST /placements` and `DELETE /placements`.
#[derive(Debug, Deserialize)]
pub struct PlacementBody {
  pub carrier_id: i64,
  pub package_id: i64,
  pub slot_id:    i64,
}

/// `POST /placements` — returns 201 + the current [`Placement`] row (the
/// existing one when the package already sits in the target slot).
pub async fn assign<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<PlacementBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WarehouseStore,
  S::Error: Into<entrepot_core::Error>,
{
  let placement = store
    .assign_package(body.carrier_id, body.package_id, body.slot_id)
    .await
    .map_err(store_err)?;
  Ok((StatusCode::CREATED, Json(placement)))
}

/// `DELETE /placements` — 404 if no matching ledger row exists.
pub async fn withdraw<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<PlacementBody>,
) -> Result<StatusCode, ApiError>
where
  S: WarehouseStore,
  S::Error: Into<entrepot_core::Error>,
{
  store
    .remove_placement(body.carrier_id, body.package_id, body.slot_id)
    .await
    .map_err(store_err)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Per-package reads ───────────────────────────────────────────────────────

/// `GET /packages/:id/placement`
pub async fn current_for_package<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Placement>, ApiError>
where
  S: WarehouseStore,
  S::Error: Into<entrepot_core::Error>,
{
  let placement = store
    .current_placement(id)
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound(format!("package {id} is not placed")))?;
  Ok(Json(placement))
}

/// `GET /packages/:id/history`
pub async fn history_for_package<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Vec<Placement>>, ApiError>
where
  S: WarehouseStore,
  S::Error: Into<entrepot_core::Error>,
{
  let history = store.placement_history(id).await.map_err(store_err)?;
  Ok(Json(history))
}

// ─── Per-slot reads ──────────────────────────────────────────────────────────

/// `GET /slots/:id/occupancy`
pub async fn slot_occupancy<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Vec<Placement>>, ApiError>
where
  S: WarehouseStore,
  S::Error: Into<entrepot_core::Error>,
{
  let occupants = store.occupancy_of(id).await.map_err(store_err)?;
  Ok(Json(occupants))
}
