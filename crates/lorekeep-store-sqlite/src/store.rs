//! [`SqliteStore`] — the SQLite implementation of [`WikiStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use lorekeep_core::{
  document::{Document, NewDoc},
  folder::{Folder, NewFolder},
  graph::{DocRef, Edge, NewRef, TagRow},
  store::{DocQuery, WikiStore},
};

use crate::{
  Error, Result,
  encode::{
    RawDocRef, RawDocument, RawEdge, RawFolder, RawTagRow, encode_doc_kind,
    encode_dt, encode_edge_kind, encode_ref_kind, encode_uuid,
  },
  schema::SCHEMA,
};

const DOC_COLUMNS: &str = "doc_id, campaign_id, folder_id, title, body, \
                           kind, shared, sort_index, updated_at, deleted_at";

const FOLDER_COLUMNS: &str =
  "folder_id, campaign_id, name, parent_id, shared, deleted_at";

const EDGE_COLUMNS: &str =
  "campaign_id, from_doc, to_doc, link_text, kind, weight";

fn doc_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawDocument> {
  Ok(RawDocument {
    doc_id:      row.get(0)?,
    campaign_id: row.get(1)?,
    folder_id:   row.get(2)?,
    title:       row.get(3)?,
    body:        row.get(4)?,
    kind:        row.get(5)?,
    shared:      row.get(6)?,
    sort_index:  row.get(7)?,
    updated_at:  row.get(8)?,
    deleted_at:  row.get(9)?,
  })
}

fn folder_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawFolder> {
  Ok(RawFolder {
    folder_id:   row.get(0)?,
    campaign_id: row.get(1)?,
    name:        row.get(2)?,
    parent_id:   row.get(3)?,
    shared:      row.get(4)?,
    deleted_at:  row.get(5)?,
  })
}

fn edge_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawEdge> {
  Ok(RawEdge {
    campaign_id: row.get(0)?,
    from_doc:    row.get(1)?,
    to_doc:      row.get(2)?,
    link_text:   row.get(3)?,
    kind:        row.get(4)?,
    weight:      row.get(5)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Lorekeep wiki store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── WikiStore impl ──────────────────────────────────────────────────────────

impl WikiStore for SqliteStore {
  type Error = Error;

  // ── Documents ─────────────────────────────────────────────────────────────

  async fn create_doc(&self, input: NewDoc) -> Result<Document> {
    let doc = Document {
      doc_id:      Uuid::new_v4(),
      campaign_id: input.campaign_id,
      folder_id:   input.folder_id,
      title:       input.title,
      body:        input.body,
      kind:        input.kind,
      shared:      input.shared,
      sort_index:  input.sort_index,
      updated_at:  Utc::now(),
      deleted_at:  None,
    };

    let id_str       = encode_uuid(doc.doc_id);
    let campaign_str = encode_uuid(doc.campaign_id);
    let folder_str   = doc.folder_id.map(encode_uuid);
    let title        = doc.title.clone();
    let body         = doc.body.clone();
    let kind_str     = encode_doc_kind(doc.kind).to_owned();
    let shared       = doc.shared;
    let sort_index   = doc.sort_index;
    let updated_str  = encode_dt(doc.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO documents (
             doc_id, campaign_id, folder_id, title, body,
             kind, shared, sort_index, updated_at, deleted_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, NULL)",
          rusqlite::params![
            id_str,
            campaign_str,
            folder_str,
            title,
            body,
            kind_str,
            shared,
            sort_index,
            updated_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(doc)
  }

  async fn get_doc(&self, id: Uuid) -> Result<Option<Document>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawDocument> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {DOC_COLUMNS} FROM documents WHERE doc_id = ?1"),
              rusqlite::params![id_str],
              doc_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawDocument::into_document).transpose()
  }

  async fn find_doc_by_title(
    &self,
    campaign_id: Uuid,
    title: &str,
  ) -> Result<Option<Document>> {
    let campaign_str = encode_uuid(campaign_id);
    let title = title.to_owned();

    let raw: Option<RawDocument> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {DOC_COLUMNS} FROM documents
                 WHERE campaign_id = ?1 AND title = ?2 AND deleted_at IS NULL
                 ORDER BY updated_at DESC LIMIT 1"
              ),
              rusqlite::params![campaign_str, title],
              doc_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawDocument::into_document).transpose()
  }

  async fn list_docs(
    &self,
    campaign_id: Uuid,
    query: DocQuery,
  ) -> Result<Vec<Document>> {
    let campaign_str = encode_uuid(campaign_id);
    let kind_str = query.kind.map(encode_doc_kind).map(str::to_owned);
    let include_deleted = query.include_deleted;

    let raws: Vec<RawDocument> = self
      .conn
      .call(move |conn| {
        let mut sql =
          format!("SELECT {DOC_COLUMNS} FROM documents WHERE campaign_id = ?1");
        if !include_deleted {
          sql.push_str(" AND deleted_at IS NULL");
        }
        if kind_str.is_some() {
          sql.push_str(" AND kind = ?2");
        }
        sql.push_str(" ORDER BY sort_index, title");

        let mut stmt = conn.prepare(&sql)?;
        let rows = match kind_str {
          Some(kind) => stmt
            .query_map(rusqlite::params![campaign_str, kind], doc_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
          None => stmt
            .query_map(rusqlite::params![campaign_str], doc_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDocument::into_document).collect()
  }

  async fn update_doc(&self, doc: &Document) -> Result<()> {
    let id_str      = encode_uuid(doc.doc_id);
    let folder_str  = doc.folder_id.map(encode_uuid);
    let title       = doc.title.clone();
    let body        = doc.body.clone();
    let kind_str    = encode_doc_kind(doc.kind).to_owned();
    let shared      = doc.shared;
    let sort_index  = doc.sort_index;
    let updated_str = encode_dt(doc.updated_at);
    let deleted_str = doc.deleted_at.map(encode_dt);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE documents SET
             folder_id = ?2, title = ?3, body = ?4, kind = ?5,
             shared = ?6, sort_index = ?7, updated_at = ?8, deleted_at = ?9
           WHERE doc_id = ?1",
          rusqlite::params![
            id_str,
            folder_str,
            title,
            body,
            kind_str,
            shared,
            sort_index,
            updated_str,
            deleted_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete_doc(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM documents WHERE doc_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Folders ───────────────────────────────────────────────────────────────

  async fn create_folder(&self, input: NewFolder) -> Result<Folder> {
    let folder = Folder {
      folder_id:   Uuid::new_v4(),
      campaign_id: input.campaign_id,
      name:        input.name,
      parent_id:   input.parent_id,
      shared:      input.shared,
      deleted_at:  None,
    };

    let id_str       = encode_uuid(folder.folder_id);
    let campaign_str = encode_uuid(folder.campaign_id);
    let name         = folder.name.clone();
    let parent_str   = folder.parent_id.map(encode_uuid);
    let shared       = folder.shared;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO folders (folder_id, campaign_id, name, parent_id, shared, deleted_at)
           VALUES (?1, ?2, ?3, ?4, ?5, NULL)",
          rusqlite::params![id_str, campaign_str, name, parent_str, shared],
        )?;
        Ok(())
      })
      .await?;

    Ok(folder)
  }

  async fn get_folder(&self, id: Uuid) -> Result<Option<Folder>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawFolder> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {FOLDER_COLUMNS} FROM folders WHERE folder_id = ?1"
              ),
              rusqlite::params![id_str],
              folder_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawFolder::into_folder).transpose()
  }

  async fn list_folders(
    &self,
    campaign_id: Uuid,
    include_deleted: bool,
  ) -> Result<Vec<Folder>> {
    let campaign_str = encode_uuid(campaign_id);

    let raws: Vec<RawFolder> = self
      .conn
      .call(move |conn| {
        let mut sql =
          format!("SELECT {FOLDER_COLUMNS} FROM folders WHERE campaign_id = ?1");
        if !include_deleted {
          sql.push_str(" AND deleted_at IS NULL");
        }
        sql.push_str(" ORDER BY name");

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![campaign_str], folder_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawFolder::into_folder).collect()
  }

  async fn update_folder(&self, folder: &Folder) -> Result<()> {
    let id_str      = encode_uuid(folder.folder_id);
    let name        = folder.name.clone();
    let parent_str  = folder.parent_id.map(encode_uuid);
    let shared      = folder.shared;
    let deleted_str = folder.deleted_at.map(encode_dt);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE folders SET name = ?2, parent_id = ?3, shared = ?4, deleted_at = ?5
           WHERE folder_id = ?1",
          rusqlite::params![id_str, name, parent_str, shared, deleted_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete_folder(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM folders WHERE folder_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Edges ─────────────────────────────────────────────────────────────────

  async fn delete_edges_from(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM edges WHERE from_doc = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete_edges_touching(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM edges WHERE from_doc = ?1 OR to_doc = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn insert_edges(&self, edges: Vec<Edge>) -> Result<()> {
    if edges.is_empty() {
      return Ok(());
    }

    let rows: Vec<(String, String, String, String, String, i64)> = edges
      .iter()
      .map(|e| {
        (
          encode_uuid(e.campaign_id),
          encode_uuid(e.from_doc),
          encode_uuid(e.to_doc),
          e.link_text.clone(),
          encode_edge_kind(e.kind).to_owned(),
          e.weight,
        )
      })
      .collect();

    self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "INSERT INTO edges (campaign_id, from_doc, to_doc, link_text, kind, weight)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for (campaign, from, to, text, kind, weight) in rows {
          stmt.execute(rusqlite::params![
            campaign, from, to, text, kind, weight
          ])?;
        }
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn edges_into(&self, id: Uuid) -> Result<Vec<Edge>> {
    let id_str = encode_uuid(id);

    let raws: Vec<RawEdge> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {EDGE_COLUMNS} FROM edges WHERE to_doc = ?1"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], edge_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEdge::into_edge).collect()
  }

  async fn edges_out_of(&self, id: Uuid) -> Result<Vec<Edge>> {
    let id_str = encode_uuid(id);

    let raws: Vec<RawEdge> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {EDGE_COLUMNS} FROM edges WHERE from_doc = ?1"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], edge_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEdge::into_edge).collect()
  }

  // ── Tags ──────────────────────────────────────────────────────────────────

  async fn delete_tags_for(&self, doc_id: Uuid) -> Result<()> {
    let id_str = encode_uuid(doc_id);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM tags WHERE doc_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn insert_tags(&self, tags: Vec<TagRow>) -> Result<()> {
    if tags.is_empty() {
      return Ok(());
    }

    let rows: Vec<(String, String, String, String)> = tags
      .iter()
      .map(|t| {
        (
          encode_uuid(t.doc_id),
          encode_uuid(t.campaign_id),
          t.namespace.clone(),
          t.value.clone(),
        )
      })
      .collect();

    self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "INSERT INTO tags (doc_id, campaign_id, namespace, value)
           VALUES (?1, ?2, ?3, ?4)",
        )?;
        for (doc, campaign, namespace, value) in rows {
          stmt.execute(rusqlite::params![doc, campaign, namespace, value])?;
        }
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn tags_for(&self, doc_id: Uuid) -> Result<Vec<TagRow>> {
    let id_str = encode_uuid(doc_id);

    let raws: Vec<RawTagRow> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT doc_id, campaign_id, namespace, value FROM tags
           WHERE doc_id = ?1 ORDER BY namespace, value",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| {
            Ok(RawTagRow {
              doc_id:      row.get(0)?,
              campaign_id: row.get(1)?,
              namespace:   row.get(2)?,
              value:       row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTagRow::into_tag_row).collect()
  }

  async fn docs_with_tag(
    &self,
    campaign_id: Uuid,
    namespace: &str,
    value: &str,
  ) -> Result<Vec<Document>> {
    let campaign_str = encode_uuid(campaign_id);
    let namespace = namespace.to_owned();
    let value = value.to_owned();

    let raws: Vec<RawDocument> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT d.doc_id, d.campaign_id, d.folder_id, d.title, d.body,
                  d.kind, d.shared, d.sort_index, d.updated_at, d.deleted_at
           FROM documents d
           JOIN tags t ON t.doc_id = d.doc_id
           WHERE t.campaign_id = ?1 AND t.namespace = ?2 AND t.value = ?3
             AND d.deleted_at IS NULL
           ORDER BY d.title",
        )?;
        let rows = stmt
          .query_map(
            rusqlite::params![campaign_str, namespace, value],
            doc_from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDocument::into_document).collect()
  }

  // ── Cross-references ──────────────────────────────────────────────────────

  async fn create_ref(&self, input: NewRef) -> Result<DocRef> {
    let doc_ref = DocRef {
      ref_id:      Uuid::new_v4(),
      campaign_id: input.campaign_id,
      doc_id:      input.doc_id,
      kind:        input.kind,
    };

    let id_str       = encode_uuid(doc_ref.ref_id);
    let campaign_str = encode_uuid(doc_ref.campaign_id);
    let doc_str      = encode_uuid(doc_ref.doc_id);
    let kind_str     = encode_ref_kind(&doc_ref.kind);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO refs (ref_id, campaign_id, doc_id, kind)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, campaign_str, doc_str, kind_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(doc_ref)
  }

  async fn refs_to(&self, doc_id: Uuid) -> Result<Vec<DocRef>> {
    let id_str = encode_uuid(doc_id);

    let raws: Vec<RawDocRef> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT ref_id, campaign_id, doc_id, kind FROM refs WHERE doc_id = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| {
            Ok(RawDocRef {
              ref_id:      row.get(0)?,
              campaign_id: row.get(1)?,
              doc_id:      row.get(2)?,
              kind:        row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDocRef::into_doc_ref).collect()
  }

  async fn delete_refs_to(&self, doc_id: Uuid) -> Result<()> {
    let id_str = encode_uuid(doc_id);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM refs WHERE doc_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
