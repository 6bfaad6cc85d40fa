//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, UUIDs as hyphenated
//! lowercase strings, enum discriminants as their lowercase names.

use chrono::{DateTime, Utc};
use lorekeep_core::{
  document::{DocKind, Document},
  folder::Folder,
  graph::{DocRef, Edge, EdgeKind, RefKind, TagRow},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("bad timestamp {s:?}: {e}")))
}

// ─── DocKind ─────────────────────────────────────────────────────────────────

pub fn encode_doc_kind(k: DocKind) -> &'static str {
  match k {
    DocKind::Normal => "normal",
    DocKind::Index => "index",
  }
}

pub fn decode_doc_kind(s: &str) -> Result<DocKind> {
  match s {
    "normal" => Ok(DocKind::Normal),
    "index" => Ok(DocKind::Index),
    other => Err(Error::Decode(format!("unknown doc kind: {other:?}"))),
  }
}

// ─── EdgeKind ────────────────────────────────────────────────────────────────

pub fn encode_edge_kind(k: EdgeKind) -> &'static str {
  match k {
    EdgeKind::Link => "link",
  }
}

pub fn decode_edge_kind(s: &str) -> Result<EdgeKind> {
  match s {
    "link" => Ok(EdgeKind::Link),
    other => Err(Error::Decode(format!("unknown edge kind: {other:?}"))),
  }
}

// ─── RefKind ─────────────────────────────────────────────────────────────────

pub fn encode_ref_kind(k: &RefKind) -> String {
  match k {
    RefKind::NpcProfile => "npc_profile".to_string(),
    RefKind::MapPin => "map_pin".to_string(),
    RefKind::Custom(s) => s.clone(),
  }
}

pub fn decode_ref_kind(s: &str) -> RefKind {
  match s {
    "npc_profile" => RefKind::NpcProfile,
    "map_pin" => RefKind::MapPin,
    other => RefKind::Custom(other.to_string()),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `documents` row.
pub struct RawDocument {
  pub doc_id:      String,
  pub campaign_id: String,
  pub folder_id:   Option<String>,
  pub title:       String,
  pub body:        String,
  pub kind:        String,
  pub shared:      bool,
  pub sort_index:  i64,
  pub updated_at:  String,
  pub deleted_at:  Option<String>,
}

impl RawDocument {
  pub fn into_document(self) -> Result<Document> {
    Ok(Document {
      doc_id:      decode_uuid(&self.doc_id)?,
      campaign_id: decode_uuid(&self.campaign_id)?,
      folder_id:   self.folder_id.as_deref().map(decode_uuid).transpose()?,
      title:       self.title,
      body:        self.body,
      kind:        decode_doc_kind(&self.kind)?,
      shared:      self.shared,
      sort_index:  self.sort_index,
      updated_at:  decode_dt(&self.updated_at)?,
      deleted_at:  self.deleted_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}

/// Raw strings read directly from a `folders` row.
pub struct RawFolder {
  pub folder_id:   String,
  pub campaign_id: String,
  pub name:        String,
  pub parent_id:   Option<String>,
  pub shared:      bool,
  pub deleted_at:  Option<String>,
}

impl RawFolder {
  pub fn into_folder(self) -> Result<Folder> {
    Ok(Folder {
      folder_id:   decode_uuid(&self.folder_id)?,
      campaign_id: decode_uuid(&self.campaign_id)?,
      name:        self.name,
      parent_id:   self.parent_id.as_deref().map(decode_uuid).transpose()?,
      shared:      self.shared,
      deleted_at:  self.deleted_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}

/// Raw strings read directly from an `edges` row.
pub struct RawEdge {
  pub campaign_id: String,
  pub from_doc:    String,
  pub to_doc:      String,
  pub link_text:   String,
  pub kind:        String,
  pub weight:      i64,
}

impl RawEdge {
  pub fn into_edge(self) -> Result<Edge> {
    Ok(Edge {
      campaign_id: decode_uuid(&self.campaign_id)?,
      from_doc:    decode_uuid(&self.from_doc)?,
      to_doc:      decode_uuid(&self.to_doc)?,
      link_text:   self.link_text,
      kind:        decode_edge_kind(&self.kind)?,
      weight:      self.weight,
    })
  }
}

/// Raw strings read directly from a `tags` row.
pub struct RawTagRow {
  pub doc_id:      String,
  pub campaign_id: String,
  pub namespace:   String,
  pub value:       String,
}

impl RawTagRow {
  pub fn into_tag_row(self) -> Result<TagRow> {
    Ok(TagRow {
      doc_id:      decode_uuid(&self.doc_id)?,
      campaign_id: decode_uuid(&self.campaign_id)?,
      namespace:   self.namespace,
      value:       self.value,
    })
  }
}

/// Raw strings read directly from a `refs` row.
pub struct RawDocRef {
  pub ref_id:      String,
  pub campaign_id: String,
  pub doc_id:      String,
  pub kind:        String,
}

impl RawDocRef {
  pub fn into_doc_ref(self) -> Result<DocRef> {
    Ok(DocRef {
      ref_id:      decode_uuid(&self.ref_id)?,
      campaign_id: decode_uuid(&self.campaign_id)?,
      doc_id:      decode_uuid(&self.doc_id)?,
      kind:        decode_ref_kind(&self.kind),
    })
  }
}
