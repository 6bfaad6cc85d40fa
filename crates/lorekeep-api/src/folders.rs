//! Handlers for folder and campaign-wide endpoints.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use lorekeep_core::{folder::Folder, store::WikiStore};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

// ─── List / create ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  #[serde(default)]
  pub include_deleted: bool,
}

/// `GET /campaigns/:campaign_id/folders`
pub async fn list<S: WikiStore>(
  State(state): State<ApiState<S>>,
  Path(campaign_id): Path<Uuid>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Folder>>, ApiError> {
  let folders = state
    .engine
    .store()
    .list_folders(campaign_id, params.include_deleted)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(folders))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:      String,
  #[serde(default)]
  pub parent_id: Option<Uuid>,
}

/// `POST /campaigns/:campaign_id/folders`
pub async fn create<S: WikiStore>(
  State(state): State<ApiState<S>>,
  Path(campaign_id): Path<Uuid>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  if body.name.trim().is_empty() {
    return Err(ApiError::BadRequest("name must not be empty".into()));
  }
  let folder = state
    .engine
    .create_folder(campaign_id, &body.name, body.parent_id)
    .await?;
  Ok((StatusCode::CREATED, Json(folder)))
}

// ─── Rename ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RenameBody {
  pub name: String,
}

/// `PUT /folders/:id/name` — the index document's title follows.
pub async fn rename<S: WikiStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<RenameBody>,
) -> Result<Json<Folder>, ApiError> {
  if body.name.trim().is_empty() {
    return Err(ApiError::BadRequest("name must not be empty".into()));
  }
  Ok(Json(state.engine.rename_folder(id, &body.name).await?))
}

// ─── Cascades ────────────────────────────────────────────────────────────────

/// `POST /folders/:id/trash` — soft-deletes the whole subtree.
pub async fn trash<S: WikiStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  state.engine.trash_folder(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /folders/:id/restore`
pub async fn restore<S: WikiStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  state.engine.restore_folder(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /folders/:id` — purge the subtree, irreversible.
pub async fn purge<S: WikiStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  state.engine.purge_folder(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Campaign-wide operations ────────────────────────────────────────────────

/// `POST /campaigns/:campaign_id/seed` — default folders for a fresh
/// campaign; a no-op (empty list) if any folder already exists.
pub async fn seed<S: WikiStore>(
  State(state): State<ApiState<S>>,
  Path(campaign_id): Path<Uuid>,
) -> Result<Json<Vec<Folder>>, ApiError> {
  Ok(Json(state.engine.seed_campaign(campaign_id).await?))
}

#[derive(Debug, Serialize)]
pub struct ReindexResponse {
  pub writes: usize,
}

/// `POST /campaigns/:campaign_id/reindex` — full index synthesis pass.
pub async fn reindex<S: WikiStore>(
  State(state): State<ApiState<S>>,
  Path(campaign_id): Path<Uuid>,
) -> Result<Json<ReindexResponse>, ApiError> {
  let writes = state.engine.update_all_folder_indexes(campaign_id).await?;
  Ok(Json(ReindexResponse { writes }))
}
