//! Handlers for the structural-catalog endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/aisles` | All aisles |
//! | `POST` | `/aisles` | Body: `{"number":7}` |
//! | `GET`  | `/aisles/:id` | 404 if not found |
//! | `DELETE` | `/aisles/:id` | 409 while columns exist |
//! | `GET`  | `/columns` | Optional `?aisle_id=` |
//! | `POST` | `/columns` | Body: `{"aisle_id":1,"number":3}` |
//! | `GET`/`DELETE` | `/columns/:id` | 409 while slots exist |
//! | `GET`  | `/slots` | Optional `?column_id=` |
//! | `POST` | `/slots` | 409 on duplicate (column, level), 422 on bad level |
//! | `GET`/`DELETE` | `/slots/:id` | 409 while placements reference it |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use entrepot_core::{
  catalog::{Aisle, Column, NewColumn, NewSlot, Slot},
  store::WarehouseStore,
};
use serde::Deserialize;

use crate::error::{ApiError, store_err};

// ─── Aisles ──────────────────────────────────────────────────────────────────

/// `GET /aisles`
pub async fn list_aisles<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Aisle>>, ApiError>
where
  S: WarehouseStore,
  S::Error: Into<entrepot_core::Error>,
{
  let aisles = store.list_aisles().await.map_err(store_err)?;
  Ok(Json(aisles))
}

#[derive(Debug, Deserialize)]
pub struct CreateAisleBody {
  pub number: i64,
}

/// `POST /aisles` — body: `{"number":7}`
pub async fn create_aisle<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateAisleBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WarehouseStore,
  S::Error: Into<entrepot_core::Error>,
{
  let aisle = store.add_aisle(body.number).await.map_err(store_err)?;
  Ok((StatusCode::CREATED, Json(aisle)))
}

/// `GET /aisles/:id`
pub async fn get_aisle<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Aisle>, ApiError>
where
  S: WarehouseStore,
  S::Error: Into<entrepot_core::Error>,
{
  let aisle = store
    .get_aisle(id)
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound(format!("aisle {id} not found")))?;
  Ok(Json(aisle))
}

/// `DELETE /aisles/:id`
pub async fn delete_aisle<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: WarehouseStore,
  S::Error: Into<entrepot_core::Error>,
{
  store.remove_aisle(id).await.map_err(store_err)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Columns ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListColumnsParams {
  pub aisle_id: Option<i64>,
}

/// `GET /columns[?aisle_id=<id>]`
pub async fn list_columns<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListColumnsParams>,
) -> Result<Json<Vec<Column>>, ApiError>
where
  S: WarehouseStore,
  S::Error: Into<entrepot_core::Error>,
{
  let columns = store
    .list_columns(params.aisle_id)
    .await
    .map_err(store_err)?;
  Ok(Json(columns))
}

/// `POST /columns` — body: [`NewColumn`]
pub async fn create_column<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewColumn>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WarehouseStore,
  S::Error: Into<entrepot_core::Error>,
{
  let column = store.add_column(body).await.map_err(store_err)?;
  Ok((StatusCode::CREATED, Json(column)))
}

/// `GET /columns/:id`
pub async fn get_column<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Column>, ApiError>
where
  S: WarehouseStore,
  S::Error: Into<entrepot_core::Error>,
{
  let column = store
    .get_column(id)
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound(format!("column {id} not found")))?;
  Ok(Json(column))
}

/// `DELETE /columns/:id`
pub async fn delete_column<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: WarehouseStore,
  S::Error: Into<entrepot_core::Error>,
{
  store.remove_column(id).await.map_err(store_err)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Slots ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListSlotsParams {
  pub column_id: Option<i64>,
}

/// `GET /slots[?column_id=<id>]`
pub async fn list_slots<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListSlotsParams>,
) -> Result<Json<Vec<Slot>>, ApiError>
where
  S: WarehouseStore,
  S::Error: Into<entrepot_core::Error>,
{
  let slots = store.list_slots(params.column_id).await.map_err(store_err)?;
  Ok(Json(slots))
}

/// `POST /slots` — body: [`NewSlot`]
pub async fn create_slot<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewSlot>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WarehouseStore,
  S::Error: Into<entrepot_core::Error>,
{
  let slot = store.add_slot(body).await.map_err(store_err)?;
  Ok((StatusCode::CREATED, Json(slot)))
}

/// `GET /slots/:id`
pub async fn get_slot<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Slot>, ApiError>
where
  S: WarehouseStore,
  S::Error: Into<entrepot_core::Error>,
{
  let slot = store
    .get_slot(id)
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound(format!("slot {id} not found")))?;
  Ok(Json(slot))
}

/// `DELETE /slots/:id`
pub async fn delete_slot<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: WarehouseStore,
  S::Error: Into<entrepot_core::Error>,
{
  store.remove_slot(id).await.map_err(store_err)?;
  Ok(StatusCode::NO_CONTENT)
}
