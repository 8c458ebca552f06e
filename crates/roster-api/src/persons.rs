//! Handlers for `/persons` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/persons` | Optional `searchProperty`, `searchTerm`, `sortBy`, `orderOptions` |
//! | `POST`   | `/persons` | Body: [`NewPerson`]; returns 201 + view |
//! | `GET`    | `/persons/:id` | 404 if not found |
//! | `PUT`    | `/persons/:id` | Body: [`PersonUpdate`]; replaces all mutable fields |
//! | `DELETE` | `/persons/:id` | 204 on success, 404 if absent |
//! | `GET`    | `/persons/export/csv` | `text/csv` download |
//! | `GET`    | `/persons/export/xlsx` | spreadsheet download, `persons.xlsx` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use roster_core::{
  person::{NewPerson, PersonUpdate, PersonView},
  query::{self, SortDirection},
  store::DirectoryStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

/// MIME type of an Office Open XML spreadsheet.
const XLSX_CONTENT_TYPE: &str =
  "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

// ─── List (search + sort pipeline) ───────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  /// Field selector for the search; empty means "no filter".
  #[serde(default)]
  pub search_property: String,
  #[serde(default)]
  pub search_term:     String,
  /// Field selector for the sort; empty means "keep store order".
  #[serde(default)]
  pub sort_by:         String,
  #[serde(default)]
  pub order_options:   SortDirection,
}

/// `GET /persons[?searchProperty=..&searchTerm=..][&sortBy=..][&orderOptions=ASC|DESC]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<PersonView>>, ApiError>
where
  S: DirectoryStore,
{
  let all = store
    .list_persons()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  // An unparseable Id term is the caller's fault, not a server failure.
  let found =
    query::search(&all, &params.search_property, &params.search_term)
      .map_err(|e| ApiError::BadRequest(e.to_string()))?;

  let sorted = query::sort(found, &params.sort_by, params.order_options);
  Ok(Json(sorted))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /persons` — body: [`NewPerson`]
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewPerson>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DirectoryStore,
{
  body
    .validate()
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

  let view = store
    .add_person(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(view)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /persons/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<PersonView>, ApiError>
where
  S: DirectoryStore,
{
  let view = store
    .get_person(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;
  Ok(Json(view))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PUT /persons/:id` — body: [`PersonUpdate`]
pub async fn update_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<PersonUpdate>,
) -> Result<Json<PersonView>, ApiError>
where
  S: DirectoryStore,
{
  body
    .validate()
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

  // Resolve absence to 404 here; the store treats it as a plain error.
  store
    .get_person(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;

  let view = store
    .update_person(id, body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(view))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /persons/:id`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: DirectoryStore,
{
  let deleted = store
    .delete_person(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  if deleted {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("person {id} not found")))
  }
}

// ─── Exports ─────────────────────────────────────────────────────────────────

/// `GET /persons/export/csv`
pub async fn export_csv<S>(
  State(store): State<Arc<S>>,
) -> Result<Response, ApiError>
where
  S: DirectoryStore,
{
  let all = store
    .list_persons()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let bytes = roster_export::persons_csv(&all)?;

  Ok(
    ([(header::CONTENT_TYPE, "text/csv")], bytes).into_response(),
  )
}

/// `GET /persons/export/xlsx`
pub async fn export_xlsx<S>(
  State(store): State<Arc<S>>,
) -> Result<Response, ApiError>
where
  S: DirectoryStore,
{
  let all = store
    .list_persons()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let bytes = roster_export::persons_xlsx(&all)?;

  Ok(
    (
      [
        (header::CONTENT_TYPE, XLSX_CONTENT_TYPE),
        (
          header::CONTENT_DISPOSITION,
          "attachment; filename=\"persons.xlsx\"",
        ),
      ],
      bytes,
    )
      .into_response(),
  )
}
