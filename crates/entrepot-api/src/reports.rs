//! Handlers for `/reports` endpoints — the pure read-model views.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use entrepot_core::{
  report::{PlacementDetails, SlotContext},
  store::WarehouseStore,
};
use serde::Deserialize;

use crate::error::{ApiError, store_err};

/// `GET /reports/slots` — every slot with its full location path.
pub async fn slots<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<SlotContext>>, ApiError>
where
  S: WarehouseStore,
  S::Error: Into<entrepot_core::Error>,
{
  let rows = store.slots_with_context().await.map_err(store_err)?;
  Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
pub struct PlacementsParams {
  /// If `true`, return the full ledger; otherwise only each package's
  /// current row (the live inventory view). Default `false`.
  #[serde(default)]
  pub include_history: bool,
}

/// `GET /reports/placements[?include_history=true]`
pub async fn placements<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<PlacementsParams>,
) -> Result<Json<Vec<PlacementDetails>>, ApiError>
where
  S: WarehouseStore,
  S::Error: Into<entrepot_core::Error>,
{
  let rows = store
    .placements_with_details(params.include_history)
    .await
    .map_err(store_err)?;
  Ok(Json(rows))
}
