//! Document — a markdown page inside a campaign.
//!
//! The body is the authoritative source of truth for a document's tags
//! and outbound links. Edge and Tag rows are cached derivatives of the
//! body and are recomputed from scratch on every save.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether a document is an ordinary page or the auto-synthesised index
/// page of a folder.
///
/// The discriminant is stored on the record so that synthesis and
/// filtering logic never has to guess from title or body patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocKind {
  Normal,
  Index,
}

/// A markdown page scoped to exactly one campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
  pub doc_id:      Uuid,
  pub campaign_id: Uuid,
  /// `None` means the document lives at the campaign root.
  pub folder_id:   Option<Uuid>,
  pub title:       String,
  pub body:        String,
  pub kind:        DocKind,
  pub shared:      bool,
  /// Intra-folder ordering; ties are broken by title.
  pub sort_index:  i64,
  pub updated_at:  DateTime<Utc>,
  /// `None` means active; `Some` means trashed (restorable until purged).
  pub deleted_at:  Option<DateTime<Utc>>,
}

impl Document {
  pub fn is_active(&self) -> bool { self.deleted_at.is_none() }
}

/// Input to [`crate::store::WikiStore::create_doc`].
/// The id and `updated_at` are always assigned by the store.
#[derive(Debug, Clone)]
pub struct NewDoc {
  pub campaign_id: Uuid,
  pub folder_id:   Option<Uuid>,
  pub title:       String,
  pub body:        String,
  pub kind:        DocKind,
  pub shared:      bool,
  pub sort_index:  i64,
}

impl NewDoc {
  /// Convenience constructor for an empty page at the campaign root.
  pub fn new(campaign_id: Uuid, title: impl Into<String>) -> Self {
    Self {
      campaign_id,
      folder_id: None,
      title: title.into(),
      body: String::new(),
      kind: DocKind::Normal,
      shared: false,
      sort_index: 0,
    }
  }
}
