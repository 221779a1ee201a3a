//! HTTP server layer for Entrepot.
//!
//! Wraps the JSON API router in carrier authentication and request tracing,
//! and owns the runtime configuration format.

pub mod auth;
pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  extract::{Request, State},
  middleware::{self, Next},
  response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use entrepot_core::store::WarehouseStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// A carrier inserted at startup when the carriers table is empty, so a
/// fresh deployment has someone who can authenticate. The hash comes from
/// `server --hash-password`.
#[derive(Deserialize, Clone)]
pub struct BootstrapCarrier {
  pub first_name:    String,
  pub last_name:     String,
  pub born_on:       NaiveDate,
  pub hired_on:      NaiveDate,
  pub login:         String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:              String,
  pub port:              u16,
  pub store_path:        PathBuf,
  #[serde(default)]
  pub bootstrap_carrier: Option<BootstrapCarrier>,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through the auth middleware.
#[derive(Clone)]
pub struct AppState<S: WarehouseStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full server [`Router`]: the JSON API nested under `/api`,
/// gated by carrier Basic auth, with request tracing outermost.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: WarehouseStore + Clone + Send + Sync + 'static,
  S::Error: Into<entrepot_core::Error>,
{
  Router::new()
    .nest("/api", entrepot_api::api_router(state.store.clone()))
    .layer(middleware::from_fn_with_state(state, require_auth::<S>))
    .layer(TraceLayer::new_for_http())
}

/// Reject the request with 401 unless the Basic credentials match a carrier.
async fn require_auth<S>(
  State(state): State<AppState<S>>,
  req: Request,
  next: Next,
) -> Response
where
  S: WarehouseStore + Clone + Send + Sync + 'static,
  S::Error: Into<entrepot_core::Error>,
{
  match auth::verify_basic(req.headers(), state.store.as_ref()).await {
    Ok(_carrier) => next.run(req).await,
    Err(e) => e.into_response(),
  }
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD as B64;
  use chrono::NaiveDate;
  use entrepot_core::carrier::NewCarrier;
  use entrepot_store_sqlite::SqliteStore;
  use rand_core::OsRng;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  /// In-memory store with one carrier (`mdupont` / the given password).
  async fn make_state(password: &str) -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string();

    store
      .add_carrier(NewCarrier {
        first_name:    "Marc".into(),
        last_name:     "Dupont".into(),
        born_on:       NaiveDate::from_ymd_opt(1988, 4, 12).unwrap(),
        hired_on:      NaiveDate::from_ymd_opt(2019, 9, 2).unwrap(),
        login:         "mdupont".into(),
        password_hash: hash,
      })
      .await
      .unwrap();

    AppState {
      store:  Arc::new(store),
      config: Arc::new(ServerConfig {
        host:              "127.0.0.1".to_string(),
        port:              8088,
        store_path:        PathBuf::from(":memory:"),
        bootstrap_carrier: None,
      }),
    }
  }

  fn basic(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  async fn request(
    state:  AppState<SqliteStore>,
    method: &str,
    uri:    &str,
    auth:   Option<&str>,
    body:   Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(a) = auth {
      builder = builder.header(header::AUTHORIZATION, a);
    }
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };

    let resp = router(state)
      .oneshot(builder.body(body).unwrap())
      .await
      .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
  }

  /// POST helper that asserts 201 and returns the created body.
  async fn create(
    state: &AppState<SqliteStore>,
    auth:  &str,
    uri:   &str,
    body:  Value,
  ) -> Value {
    let (status, value) =
      request(state.clone(), "POST", uri, Some(auth), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "POST {uri}: {value}");
    value
  }

  // ── Auth ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn unauthenticated_requests_return_401() {
    let state = make_state("secret").await;
    let (status, _) = request(state, "GET", "/api/aisles", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn unauthenticated_response_carries_challenge() {
    let state = make_state("secret").await;
    let resp = router(state)
      .oneshot(
        Request::builder()
          .method("GET")
          .uri("/api/aisles")
          .body(Body::empty())
          .unwrap(),
      )
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));
  }

  #[tokio::test]
  async fn wrong_password_returns_401() {
    let state = make_state("secret").await;
    let auth  = basic("mdupont", "wrong");
    let (status, _) =
      request(state, "GET", "/api/aisles", Some(&auth), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn unknown_login_returns_401() {
    let state = make_state("secret").await;
    let auth  = basic("ghost", "secret");
    let (status, _) =
      request(state, "GET", "/api/aisles", Some(&auth), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn valid_credentials_pass() {
    let state = make_state("secret").await;
    let auth  = basic("mdupont", "secret");
    let (status, value) =
      request(state, "GET", "/api/aisles", Some(&auth), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value, json!([]));
  }

  // ── Assignment flow ──────────────────────────────────────────────────────

  /// Create aisle 7 → column 3 → slot level 0 over the API; return the ids.
  async fn seed_location(
    state: &AppState<SqliteStore>,
    auth:  &str,
  ) -> (i64, i64, i64) {
    let aisle = create(state, auth, "/api/aisles", json!({"number": 7})).await;
    let aisle_id = aisle["aisle_id"].as_i64().unwrap();

    let column = create(
      state,
      auth,
      "/api/columns",
      json!({"aisle_id": aisle_id, "number": 3}),
    )
    .await;
    let column_id = column["column_id"].as_i64().unwrap();

    let slot = create(
      state,
      auth,
      "/api/slots",
      json!({
        "column_id": column_id,
        "level": 0,
        "max_volume": 5000,
        "max_weight": 200
      }),
    )
    .await;
    (aisle_id, column_id, slot["slot_id"].as_i64().unwrap())
  }

  #[tokio::test]
  async fn assign_and_read_back_current_placement() {
    let state = make_state("secret").await;
    let auth  = basic("mdupont", "secret");
    let (_, _, slot_id) = seed_location(&state, &auth).await;

    let package = create(
      &state,
      &auth,
      "/api/packages",
      json!({"length": 30, "width": 20, "height": 15, "weight": 2500}),
    )
    .await;
    let package_id = package["package_id"].as_i64().unwrap();

    let carriers = request(state.clone(), "GET", "/api/carriers", Some(&auth), None)
      .await
      .1;
    let carrier_id = carriers[0]["carrier_id"].as_i64().unwrap();

    create(
      &state,
      &auth,
      "/api/placements",
      json!({
        "carrier_id": carrier_id,
        "package_id": package_id,
        "slot_id": slot_id
      }),
    )
    .await;

    let (status, current) = request(
      state,
      "GET",
      &format!("/api/packages/{package_id}/placement"),
      Some(&auth),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(current["slot_id"].as_i64(), Some(slot_id));
    assert_eq!(current["carrier_id"].as_i64(), Some(carrier_id));
  }

  #[tokio::test]
  async fn unplaced_package_placement_returns_404() {
    let state = make_state("secret").await;
    let auth  = basic("mdupont", "secret");

    let package = create(
      &state,
      &auth,
      "/api/packages",
      json!({"length": 1, "width": 1, "height": 1, "weight": 1}),
    )
    .await;
    let package_id = package["package_id"].as_i64().unwrap();

    let (status, _) = request(
      state,
      "GET",
      &format!("/api/packages/{package_id}/placement"),
      Some(&auth),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn assign_unknown_package_returns_404() {
    let state = make_state("secret").await;
    let auth  = basic("mdupont", "secret");
    let (_, _, slot_id) = seed_location(&state, &auth).await;

    let (status, value) = request(
      state,
      "POST",
      "/api/placements",
      Some(&auth),
      Some(json!({"carrier_id": 1, "package_id": 404, "slot_id": slot_id})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{value}");
  }

  #[tokio::test]
  async fn duplicate_slot_position_returns_409() {
    let state = make_state("secret").await;
    let auth  = basic("mdupont", "secret");
    let (_, column_id, _) = seed_location(&state, &auth).await;

    let (status, value) = request(
      state,
      "POST",
      "/api/slots",
      Some(&auth),
      Some(json!({
        "column_id": column_id,
        "level": 0,
        "max_volume": 1,
        "max_weight": 1
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT, "{value}");
  }

  #[tokio::test]
  async fn slot_level_out_of_range_returns_422() {
    let state = make_state("secret").await;
    let auth  = basic("mdupont", "secret");
    let (_, column_id, _) = seed_location(&state, &auth).await;

    let (status, _) = request(
      state,
      "POST",
      "/api/slots",
      Some(&auth),
      Some(json!({
        "column_id": column_id,
        "level": 9,
        "max_volume": 1,
        "max_weight": 1
      })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  }

  #[tokio::test]
  async fn placements_report_joins_location_path() {
    let state = make_state("secret").await;
    let auth  = basic("mdupont", "secret");
    let (_, _, slot_id) = seed_location(&state, &auth).await;

    let package = create(
      &state,
      &auth,
      "/api/packages",
      json!({"length": 30, "width": 20, "height": 15, "weight": 2500}),
    )
    .await;
    let package_id = package["package_id"].as_i64().unwrap();

    create(
      &state,
      &auth,
      "/api/placements",
      json!({"carrier_id": 1, "package_id": package_id, "slot_id": slot_id}),
    )
    .await;

    let (status, rows) = request(
      state,
      "GET",
      "/api/reports/placements",
      Some(&auth),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["aisle_number"].as_i64(), Some(7));
    assert_eq!(rows[0]["column_number"].as_i64(), Some(3));
    assert_eq!(rows[0]["level"].as_i64(), Some(0));
    assert_eq!(rows[0]["package_weight"].as_i64(), Some(2500));
  }

  // ── Carrier registration ─────────────────────────────────────────────────

  #[tokio::test]
  async fn registered_carrier_can_authenticate() {
    let state = make_state("secret").await;
    let auth  = basic("mdupont", "secret");

    let created = create(
      &state,
      &auth,
      "/api/carriers",
      json!({
        "first_name": "Sophie",
        "last_name": "Leroy",
        "born_on": "1992-11-03",
        "hired_on": "2024-01-15",
        "login": "sleroy",
        "password": "hunter2"
      }),
    )
    .await;
    // The response never exposes the hash.
    assert!(created.get("password_hash").is_none());

    let new_auth = basic("sleroy", "hunter2");
    let (status, _) =
      request(state, "GET", "/api/aisles", Some(&new_auth), None).await;
    assert_eq!(status, StatusCode::OK);
  }
}
