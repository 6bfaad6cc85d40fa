//! Handlers for tag endpoints.

use axum::{
  Json,
  extract::{Path, State},
};
use lorekeep_core::{document::Document, store::WikiStore};
use lorekeep_markdown::{
  ParsedTag, TagIssue, ValidateOptions, normalize_tags, parse_tags,
  validate_tags,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

// ─── Tag lookup ──────────────────────────────────────────────────────────────

/// `GET /campaigns/:campaign_id/tags/:namespace/:value/docs`
pub async fn docs_with_tag<S: WikiStore>(
  State(state): State<ApiState<S>>,
  Path((campaign_id, namespace, value)): Path<(Uuid, String, String)>,
) -> Result<Json<Vec<Document>>, ApiError> {
  let docs = state
    .engine
    .list_docs_with_tag(campaign_id, &namespace, &value)
    .await?;
  Ok(Json(docs))
}

// ─── Validation ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ValidateBody {
  /// Markdown body to extract tags from.
  pub body:   String,
  /// Treat unknown namespaces as errors instead of warnings.
  #[serde(default)]
  pub strict: bool,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
  pub tags:   Vec<ParsedTag>,
  pub issues: Vec<TagIssue>,
}

/// `POST /tags/validate` — run the full tag pipeline against the
/// configured namespace vocabulary without touching any document.
pub async fn validate<S: WikiStore>(
  State(state): State<ApiState<S>>,
  Json(body): Json<ValidateBody>,
) -> Result<Json<ValidateResponse>, ApiError> {
  let tags = normalize_tags(parse_tags(&body.body));
  let options = ValidateOptions {
    strict_namespaces: body.strict,
    ..Default::default()
  };
  let issues = validate_tags(&tags, &state.specs, &options)
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
  Ok(Json(ValidateResponse { tags, issues }))
}
