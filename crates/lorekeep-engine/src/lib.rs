//! The Lorekeep wiki engine — everything above the store and below the
//! presentation layer.
//!
//! [`WikiEngine`] is generic over any [`WikiStore`] backend and owns:
//!
//! - **graph synchronization** ([`WikiEngine::save_doc_content`]) — on
//!   every body save, the document's Edge and Tag rows are recomputed
//!   from scratch so they remain an exact function of the body;
//! - **index synthesis** — each active folder owns one index document
//!   whose sentinel-delimited region lists the folder subtree's pages;
//! - **folder tree cascades** — trash / restore / purge over whole
//!   folder subtrees, batched over one in-memory load of the campaign's
//!   tree rather than per-node queries;
//! - **campaign seeding** — the default folder set for a fresh
//!   campaign.
//!
//! Multi-step operations are sequences of independent store calls with
//! no enclosing transaction; a crash mid-sequence can leave derived
//! rows stale until the next successful save. All operations are safe
//! to retry.

mod cascade;
mod docs;
mod folders;
mod index;
mod sync;

pub mod error;

pub use docs::Backlink;
pub use error::{Error, Result};
pub use index::{
  INDEX_REGION_END, INDEX_REGION_START, index_title, splice_index_region,
};
pub use sync::SaveReport;

use lorekeep_core::store::WikiStore;

/// The engine facade. Cheap to construct; all state lives in the store.
pub struct WikiEngine<S> {
  store: S,
}

impl<S: WikiStore> WikiEngine<S> {
  pub fn new(store: S) -> Self { Self { store } }

  /// Direct access to the underlying store, for callers that need
  /// record-level reads the engine does not wrap.
  pub fn store(&self) -> &S { &self.store }
}
