//! Handlers for document endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/campaigns/:campaign_id/docs` | `?include_deleted=true&kind=index` |
//! | `POST`   | `/campaigns/:campaign_id/docs` | Body: `{"title":"...","folder_id":null}` |
//! | `GET`    | `/docs/:id` | 404 if not found |
//! | `PUT`    | `/docs/:id/body` | Returns the [`SaveReport`] |
//! | `PUT`    | `/docs/:id/title` | |
//! | `PUT`    | `/docs/:id/folder` | `folder_id: null` moves to the root |
//! | `POST`   | `/docs/:id/trash`, `/docs/:id/restore` | |
//! | `DELETE` | `/docs/:id` | Purge — irreversible |
//! | `GET`    | `/docs/:id/backlinks` | Active sources only |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use lorekeep_core::{
  document::{DocKind, Document},
  store::{DocQuery, WikiStore},
};
use lorekeep_engine::{Backlink, SaveReport};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  #[serde(default)]
  pub include_deleted: bool,
  pub kind:            Option<DocKind>,
}

/// `GET /campaigns/:campaign_id/docs`
pub async fn list<S: WikiStore>(
  State(state): State<ApiState<S>>,
  Path(campaign_id): Path<Uuid>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Document>>, ApiError> {
  let docs = state
    .engine
    .store()
    .list_docs(campaign_id, DocQuery {
      include_deleted: params.include_deleted,
      kind:            params.kind,
    })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(docs))
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub title:     String,
  #[serde(default)]
  pub folder_id: Option<Uuid>,
}

/// `POST /campaigns/:campaign_id/docs`
pub async fn create<S: WikiStore>(
  State(state): State<ApiState<S>>,
  Path(campaign_id): Path<Uuid>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  if body.title.trim().is_empty() {
    return Err(ApiError::BadRequest("title must not be empty".into()));
  }
  let doc = state
    .engine
    .create_doc(campaign_id, &body.title, body.folder_id)
    .await?;
  Ok((StatusCode::CREATED, Json(doc)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /docs/:id`
pub async fn get_one<S: WikiStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Document>, ApiError> {
  let doc = state
    .engine
    .store()
    .get_doc(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("document {id} not found")))?;
  Ok(Json(doc))
}

// ─── Save ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SaveBody {
  pub body: String,
}

/// `PUT /docs/:id/body` — persist a body and resynchronise the graph.
pub async fn save<S: WikiStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<SaveBody>,
) -> Result<Json<SaveReport>, ApiError> {
  let report = state.engine.save_doc_content(id, &body.body).await?;
  Ok(Json(report))
}

// ─── Rename / move ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RenameBody {
  pub title: String,
}

/// `PUT /docs/:id/title`
pub async fn rename<S: WikiStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<RenameBody>,
) -> Result<Json<Document>, ApiError> {
  if body.title.trim().is_empty() {
    return Err(ApiError::BadRequest("title must not be empty".into()));
  }
  let doc = state.engine.rename_doc(id, &body.title).await?;
  Ok(Json(doc))
}

#[derive(Debug, Deserialize)]
pub struct RelocateBody {
  #[serde(default)]
  pub folder_id: Option<Uuid>,
}

/// `PUT /docs/:id/folder` — `folder_id: null` moves to the campaign root.
pub async fn relocate<S: WikiStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<RelocateBody>,
) -> Result<Json<Document>, ApiError> {
  let doc = state.engine.move_doc(id, body.folder_id).await?;
  Ok(Json(doc))
}

// ─── Trash / restore / purge ─────────────────────────────────────────────────

/// `POST /docs/:id/trash`
pub async fn trash<S: WikiStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Document>, ApiError> {
  Ok(Json(state.engine.trash_doc(id).await?))
}

/// `POST /docs/:id/restore`
pub async fn restore<S: WikiStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Document>, ApiError> {
  Ok(Json(state.engine.restore_doc(id).await?))
}

/// `DELETE /docs/:id` — purge, irreversible.
pub async fn purge<S: WikiStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  state.engine.purge_doc(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Backlinks ───────────────────────────────────────────────────────────────

/// `GET /docs/:id/backlinks`
pub async fn backlinks<S: WikiStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Backlink>>, ApiError> {
  Ok(Json(state.engine.list_backlinks(id).await?))
}
