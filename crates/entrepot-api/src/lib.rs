//! JSON REST API for Entrepot.
//!
//! Exposes an axum [`Router`] backed by any
//! [`entrepot_core::store::WarehouseStore`]. Auth, TLS, and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", entrepot_api::api_router(store.clone()))
//! ```

pub mod carriers;
pub mod catalog;
pub mod error;
pub mod packages;
pub mod placements;
pub mod reports;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use entrepot_core::store::WarehouseStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: WarehouseStore + Clone + Send + Sync + 'static,
  S::Error: Into<entrepot_core::Error>,
{
  Router::new()
    // Structural catalog
    .route(
      "/aisles",
      get(catalog::list_aisles::<S>).post(catalog::create_aisle::<S>),
    )
    .route(
      "/aisles/{id}",
      get(catalog::get_aisle::<S>).delete(catalog::delete_aisle::<S>),
    )
    .route(
      "/columns",
      get(catalog::list_columns::<S>).post(catalog::create_column::<S>),
    )
    .route(
      "/columns/{id}",
      get(catalog::get_column::<S>).delete(catalog::delete_column::<S>),
    )
    .route(
      "/slots",
      get(catalog::list_slots::<S>).post(catalog::create_slot::<S>),
    )
    .route(
      "/slots/{id}",
      get(catalog::get_slot::<S>).delete(catalog::delete_slot::<S>),
    )
    .route("/slots/{id}/occupancy", get(placements::slot_occupancy::<S>))
    // Package registry
    .route(
      "/packages",
      get(packages::list::<S>).post(packages::create::<S>),
    )
    .route(
      "/packages/{id}",
      get(packages::get_one::<S>).delete(packages::delete_one::<S>),
    )
    .route(
      "/packages/{id}/placement",
      get(placements::current_for_package::<S>),
    )
    .route(
      "/packages/{id}/history",
      get(placements::history_for_package::<S>),
    )
    // Placement ledger
    .route(
      "/placements",
      post(placements::assign::<S>).delete(placements::withdraw::<S>),
    )
    // Reports
    .route("/reports/slots", get(reports::slots::<S>))
    .route("/reports/placements", get(reports::placements::<S>))
    // Carriers
    .route(
      "/carriers",
      get(carriers::list::<S>).post(carriers::create::<S>),
    )
    .route("/carriers/{id}", get(carriers::get_one::<S>))
    .with_state(store)
}
