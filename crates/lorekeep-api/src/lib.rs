//! JSON REST API for Lorekeep.
//!
//! Exposes an axum [`Router`] backed by a [`WikiEngine`] over any
//! [`lorekeep_core::store::WikiStore`]. Auth, TLS, and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", lorekeep_api::api_router(state.clone()))
//! ```

pub mod documents;
pub mod error;
pub mod folders;
pub mod tags;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post, put},
};
use lorekeep_core::store::WikiStore;
use lorekeep_engine::WikiEngine;
use lorekeep_markdown::NamespaceSpec;
use serde::Deserialize;

pub use error::ApiError;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `LOREKEEP_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  /// Tag namespace vocabulary; the built-in vocabulary applies when
  /// omitted.
  #[serde(default)]
  pub namespaces: Option<Vec<NamespaceSpec>>,
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct ApiState<S> {
  pub engine: Arc<WikiEngine<S>>,
  pub specs:  Arc<Vec<NamespaceSpec>>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      engine: Arc::clone(&self.engine),
      specs:  Arc::clone(&self.specs),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: WikiStore + 'static,
{
  Router::new()
    // Documents
    .route(
      "/campaigns/{campaign_id}/docs",
      get(documents::list::<S>).post(documents::create::<S>),
    )
    .route(
      "/docs/{id}",
      get(documents::get_one::<S>).delete(documents::purge::<S>),
    )
    .route("/docs/{id}/body", put(documents::save::<S>))
    .route("/docs/{id}/title", put(documents::rename::<S>))
    .route("/docs/{id}/folder", put(documents::relocate::<S>))
    .route("/docs/{id}/trash", post(documents::trash::<S>))
    .route("/docs/{id}/restore", post(documents::restore::<S>))
    .route("/docs/{id}/backlinks", get(documents::backlinks::<S>))
    // Folders
    .route(
      "/campaigns/{campaign_id}/folders",
      get(folders::list::<S>).post(folders::create::<S>),
    )
    .route("/folders/{id}/name", put(folders::rename::<S>))
    .route("/folders/{id}/trash", post(folders::trash::<S>))
    .route("/folders/{id}/restore", post(folders::restore::<S>))
    .route("/folders/{id}", axum::routing::delete(folders::purge::<S>))
    // Campaign-wide operations
    .route("/campaigns/{campaign_id}/seed", post(folders::seed::<S>))
    .route("/campaigns/{campaign_id}/reindex", post(folders::reindex::<S>))
    // Tags
    .route(
      "/campaigns/{campaign_id}/tags/{namespace}/{value}/docs",
      get(tags::docs_with_tag::<S>),
    )
    .route("/tags/validate", post(tags::validate::<S>))
    .with_state(state)
}

// ─── Integration tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use lorekeep_markdown::builtin_specs;
  use lorekeep_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use uuid::Uuid;

  async fn make_state() -> ApiState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    ApiState {
      engine: Arc::new(WikiEngine::new(store)),
      specs:  Arc::new(builtin_specs()),
    }
  }

  async fn request(
    state:  ApiState<SqliteStore>,
    method: &str,
    uri:    &str,
    body:   Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = api_router(state)
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
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  async fn create_doc(
    state: &ApiState<SqliteStore>,
    campaign: Uuid,
    title: &str,
  ) -> String {
    let (status, doc) = request(
      state.clone(),
      "POST",
      &format!("/campaigns/{campaign}/docs"),
      Some(json!({ "title": title })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    doc["doc_id"].as_str().unwrap().to_string()
  }

  // ── Save ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn save_returns_report_with_created_stubs() {
    let state = make_state().await;
    let campaign = Uuid::new_v4();
    let id = create_doc(&state, campaign, "Source").await;

    let (status, report) = request(
      state.clone(),
      "PUT",
      &format!("/docs/{id}/body"),
      Some(json!({ "body": "See [[Unknown Page]]. @type:npc" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["edge_count"], 1);
    assert_eq!(report["tag_count"], 1);
    assert_eq!(report["created_stubs"][0]["title"], "Unknown Page");

    // Same body again: the stub now resolves, so none is reported.
    let (_, report) = request(
      state,
      "PUT",
      &format!("/docs/{id}/body"),
      Some(json!({ "body": "See [[Unknown Page]]. @type:npc" })),
    )
    .await;
    assert_eq!(report["created_stubs"].as_array().unwrap().len(), 0);
  }

  // ── Trash / restore / purge ─────────────────────────────────────────────────

  #[tokio::test]
  async fn trash_restore_purge_roundtrip() {
    let state = make_state().await;
    let campaign = Uuid::new_v4();
    let id = create_doc(&state, campaign, "Doomed").await;

    let (status, doc) = request(
      state.clone(),
      "POST",
      &format!("/docs/{id}/trash"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!doc["deleted_at"].is_null());

    let (status, doc) = request(
      state.clone(),
      "POST",
      &format!("/docs/{id}/restore"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["deleted_at"].is_null());

    let (status, _) =
      request(state.clone(), "DELETE", &format!("/docs/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) =
      request(state, "GET", &format!("/docs/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));
  }

  #[tokio::test]
  async fn missing_document_is_404() {
    let state = make_state().await;
    let (status, body) = request(
      state,
      "POST",
      &format!("/docs/{}/trash", Uuid::new_v4()),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));
  }

  // ── Campaign-wide operations ────────────────────────────────────────────────

  #[tokio::test]
  async fn seed_then_reindex_is_a_noop() {
    let state = make_state().await;
    let campaign = Uuid::new_v4();

    let (status, folders) = request(
      state.clone(),
      "POST",
      &format!("/campaigns/{campaign}/seed"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(folders.as_array().unwrap().len(), 6);

    let (status, reindex) = request(
      state,
      "POST",
      &format!("/campaigns/{campaign}/reindex"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reindex["writes"], 0);
  }

  // ── Tags ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn validate_reports_issues_without_writes() {
    let state = make_state().await;
    let (status, body) = request(
      state,
      "POST",
      "/tags/validate",
      Some(json!({ "body": "@type:mountain" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tags"][0]["namespace"], "type");
    assert_eq!(body["issues"][0]["code"], "invalid-value");
    assert_eq!(body["issues"][0]["severity"], "error");
  }
}
