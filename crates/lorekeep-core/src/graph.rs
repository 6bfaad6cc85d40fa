//! Derived graph rows — edges, tag rows, and cross-references.
//!
//! Edge and Tag rows have no independent lifecycle: the full set for a
//! document is deleted and recreated on every save of that document's
//! body. They are a cache of the body, never user-authored.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Edges ───────────────────────────────────────────────────────────────────

/// The source construct an edge was derived from. Currently only
/// wiki-links produce edges; the discriminant is stored so other edge
/// sources can coexist in the same table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
  Link,
}

/// A directed link between two documents, derived from the source
/// document's body. Exists only while the current body of `from_doc`
/// contains a link resolving to `to_doc`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
  pub campaign_id: Uuid,
  pub from_doc:    Uuid,
  pub to_doc:      Uuid,
  /// Display text as of the most recent save. When the same target is
  /// linked more than once in a body, the last occurrence's text wins.
  pub link_text:   String,
  pub kind:        EdgeKind,
  pub weight:      i64,
}

// ─── Tag rows ────────────────────────────────────────────────────────────────

/// A namespaced tag extracted from a document's body. Replaced
/// wholesale on every save, like [`Edge`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRow {
  pub doc_id:      Uuid,
  pub campaign_id: Uuid,
  pub namespace:   String,
  pub value:       String,
}

// ─── Cross-references ────────────────────────────────────────────────────────

/// What kind of collaborator record a cross-reference row belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefKind {
  NpcProfile,
  MapPin,
  Custom(String),
}

/// A row in a collaborator table (NPC profile, map pin) pointing at a
/// document. Purge operations must delete these before deleting the
/// document row itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocRef {
  pub ref_id:      Uuid,
  pub campaign_id: Uuid,
  pub doc_id:      Uuid,
  pub kind:        RefKind,
}

/// Input to [`crate::store::WikiStore::create_ref`].
#[derive(Debug, Clone)]
pub struct NewRef {
  pub campaign_id: Uuid,
  pub doc_id:      Uuid,
  pub kind:        RefKind,
}
