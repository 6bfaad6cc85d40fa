//! The `WikiStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `lorekeep-store-sqlite`). The engine and API layers depend on this
//! abstraction, not on any concrete backend.
//!
//! The methods are deliberately record-level primitives: the engine
//! composes them into multi-step operations (graph sync, cascades) and
//! owns the sequencing. There is no transaction surface here — a crash
//! between two calls can leave derived rows stale until the next
//! successful save, which is an accepted tradeoff for a single-editor
//! workflow.

use std::future::Future;

use uuid::Uuid;

use crate::{
  document::{DocKind, Document, NewDoc},
  folder::{Folder, NewFolder},
  graph::{DocRef, Edge, NewRef, TagRow},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`WikiStore::list_docs`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DocQuery {
  /// If `true`, trashed documents are included.
  pub include_deleted: bool,
  /// Restrict to documents of a specific kind.
  pub kind:            Option<DocKind>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Lorekeep persistence backend.
///
/// Documents and folders are mutated in place; Edge and Tag rows are
/// derived and only ever replaced wholesale by the engine. All methods
/// return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait WikiStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Documents ─────────────────────────────────────────────────────────

  /// Create and persist a new document. The id and `updated_at` are
  /// assigned by the store.
  fn create_doc(
    &self,
    input: NewDoc,
  ) -> impl Future<Output = Result<Document, Self::Error>> + Send + '_;

  /// Retrieve a document by id. Returns `None` if not found.
  fn get_doc(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Document>, Self::Error>> + Send + '_;

  /// Find an *active* document by exact title within a campaign.
  /// If several documents share the title, the most recently updated
  /// one is returned.
  fn find_doc_by_title<'a>(
    &'a self,
    campaign_id: Uuid,
    title: &'a str,
  ) -> impl Future<Output = Result<Option<Document>, Self::Error>> + Send + 'a;

  /// List documents in a campaign, filtered by `query`.
  fn list_docs(
    &self,
    campaign_id: Uuid,
    query: DocQuery,
  ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send + '_;

  /// Write back every mutable field of an existing document row.
  fn update_doc<'a>(
    &'a self,
    doc: &'a Document,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Hard-delete a document row. Callers must remove referencing
  /// Edge/Tag/DocRef rows first.
  fn delete_doc(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Folders ───────────────────────────────────────────────────────────

  fn create_folder(
    &self,
    input: NewFolder,
  ) -> impl Future<Output = Result<Folder, Self::Error>> + Send + '_;

  fn get_folder(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Folder>, Self::Error>> + Send + '_;

  /// List folders in a campaign. Trashed folders are included only
  /// when `include_deleted` is set.
  fn list_folders(
    &self,
    campaign_id: Uuid,
    include_deleted: bool,
  ) -> impl Future<Output = Result<Vec<Folder>, Self::Error>> + Send + '_;

  fn update_folder<'a>(
    &'a self,
    folder: &'a Folder,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Hard-delete a folder row. Callers must delete or re-parent child
  /// folders and documents first.
  fn delete_folder(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Edges — derived rows ──────────────────────────────────────────────

  /// Delete every edge with `from_doc = id`.
  fn delete_edges_from(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete every edge referencing `id` in either direction.
  fn delete_edges_touching(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn insert_edges(
    &self,
    edges: Vec<Edge>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// All edges pointing at `id` — the document's backlinks.
  fn edges_into(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Vec<Edge>, Self::Error>> + Send + '_;

  /// All edges originating at `id`.
  fn edges_out_of(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Vec<Edge>, Self::Error>> + Send + '_;

  // ── Tags — derived rows ───────────────────────────────────────────────

  fn delete_tags_for(
    &self,
    doc_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn insert_tags(
    &self,
    tags: Vec<TagRow>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn tags_for(
    &self,
    doc_id: Uuid,
  ) -> impl Future<Output = Result<Vec<TagRow>, Self::Error>> + Send + '_;

  /// Active documents in `campaign_id` carrying the given tag.
  fn docs_with_tag<'a>(
    &'a self,
    campaign_id: Uuid,
    namespace: &'a str,
    value: &'a str,
  ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send + 'a;

  // ── Cross-references ──────────────────────────────────────────────────

  fn create_ref(
    &self,
    input: NewRef,
  ) -> impl Future<Output = Result<DocRef, Self::Error>> + Send + '_;

  /// All cross-reference rows pointing at `doc_id`.
  fn refs_to(
    &self,
    doc_id: Uuid,
  ) -> impl Future<Output = Result<Vec<DocRef>, Self::Error>> + Send + '_;

  fn delete_refs_to(
    &self,
    doc_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
