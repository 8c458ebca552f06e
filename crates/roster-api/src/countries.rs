//! Handlers for `/countries` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/countries` | All countries |
//! | `POST` | `/countries` | Body: [`NewCountry`]; duplicate name → 409 |
//! | `POST` | `/countries/import` | Body: raw `.xlsx` bytes; column A, row 2 down |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use bytes::Bytes;
use roster_core::{
  country::{Country, NewCountry},
  store::DirectoryStore,
};
use serde_json::json;

use crate::error::ApiError;

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /countries`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Country>>, ApiError>
where
  S: DirectoryStore,
{
  let countries = store
    .list_countries()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(countries))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /countries` — body: `{"name":"..."}`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewCountry>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DirectoryStore,
{
  body
    .validate()
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

  // Resolve the collision to 409 here; the store treats it as a plain error.
  if store
    .find_country_by_name(&body.name)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .is_some()
  {
    return Err(ApiError::Conflict(format!(
      "country {:?} already exists",
      body.name
    )));
  }

  let country = store
    .add_country(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(country)))
}

// ─── Bulk import ─────────────────────────────────────────────────────────────

/// `POST /countries/import` — body: the uploaded workbook bytes.
///
/// Inserts every non-blank name from column A (row 2 down) that is not
/// already present; responds with `{"inserted": <count>}`.
pub async fn import<S>(
  State(store): State<Arc<S>>,
  body: Bytes,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: DirectoryStore,
{
  let names = roster_export::read_country_column(&body)
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

  let inserted = store
    .import_countries(names)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  tracing::info!(inserted, "bulk country import finished");
  Ok(Json(json!({ "inserted": inserted })))
}
