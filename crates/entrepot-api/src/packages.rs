//! Handlers for `/packages` endpoints.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use entrepot_core::{
  package::{NewPackage, Package},
  store::WarehouseStore,
};

use crate::error::{ApiError, store_err};

/// `GET /packages`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Package>>, ApiError>
where
  S: WarehouseStore,
  S::Error: Into<entrepot_core::Error>,
{
  let packages = store.list_packages().await.map_err(store_err)?;
  Ok(Json(packages))
}

/// `POST /packages` — body: [`NewPackage`]
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewPackage>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WarehouseStore,
  S::Error: Into<entrepot_core::Error>,
{
  let package = store.add_package(body).await.map_err(store_err)?;
  Ok((StatusCode::CREATED, Json(package)))
}

/// `GET /packages/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Package>, ApiError>
where
  S: WarehouseStore,
  S::Error: Into<entrepot_core::Error>,
{
  let package = store
    .get_package(id)
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound(format!("package {id} not found")))?;
  Ok(Json(package))
}

/// `DELETE /packages/:id` — 409 while ledger rows reference the package.
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: WarehouseStore,
  S::Error: Into<entrepot_core::Error>,
{
  store.remove_package(id).await.map_err(store_err)?;
  Ok(StatusCode::NO_CONTENT)
}
