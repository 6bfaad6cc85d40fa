//! Graph synchronization — keeping Edge and Tag rows an exact function
//! of each document's current body.

use std::collections::HashMap;

use chrono::Utc;
use lorekeep_core::{
  document::{Document, NewDoc},
  graph::{Edge, EdgeKind, TagRow},
  store::WikiStore,
};
use lorekeep_markdown::{LinkTarget, normalize_tags, parse_links, parse_tags};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::{Error, Result, WikiEngine};

/// What a [`WikiEngine::save_doc_content`] call did.
///
/// Stub auto-creation is reported rather than silent: every document
/// the save materialized to satisfy a dangling title link is listed in
/// `created_stubs`.
#[derive(Debug, Clone, Serialize)]
pub struct SaveReport {
  pub doc:           Document,
  pub created_stubs: Vec<Document>,
  pub edge_count:    usize,
  pub tag_count:     usize,
}

impl<S: WikiStore> WikiEngine<S> {
  /// Persist a new body for `doc_id` and recompute its derived rows.
  ///
  /// 1. The body and a fresh `updated_at` are written unconditionally.
  /// 2. Wiki-links are parsed and resolved: id links to the addressed
  ///    document (skipped if missing), title links to the active
  ///    document with that exact title (auto-creating an empty stub at
  ///    the campaign root if none exists), folder links to the
  ///    folder's index document, `ref:` links to nothing.
  /// 3. The document's outgoing Edge set is deleted and reinserted.
  /// 4. Tags are parsed and normalized; the Tag set is deleted and
  ///    reinserted.
  ///
  /// Saving the same body twice yields identical Edge and Tag sets.
  pub async fn save_doc_content(
    &self,
    doc_id: Uuid,
    body: &str,
  ) -> Result<SaveReport> {
    let mut doc = self
      .store
      .get_doc(doc_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::DocNotFound(doc_id))?;

    doc.body = body.to_owned();
    doc.updated_at = Utc::now();
    self.store.update_doc(&doc).await.map_err(Error::store)?;

    let mut created_stubs: Vec<Document> = Vec::new();
    let mut edges: Vec<Edge> = Vec::new();
    // Distinct parsed targets can resolve to the same document; dedupe
    // again post-resolution (first position, last link text).
    let mut positions: HashMap<Uuid, usize> = HashMap::new();

    for link in parse_links(body) {
      let resolved = match link.target {
        LinkTarget::Doc { id } => {
          self.store.get_doc(id).await.map_err(Error::store)?
        }
        LinkTarget::Title { title } => {
          match self
            .store
            .find_doc_by_title(doc.campaign_id, &title)
            .await
            .map_err(Error::store)?
          {
            Some(existing) => Some(existing),
            None => {
              let stub = self.create_stub(doc.campaign_id, &title).await?;
              created_stubs.push(stub.clone());
              Some(stub)
            }
          }
        }
        LinkTarget::Folder { name } => {
          match self.find_active_folder_by_name(doc.campaign_id, &name).await? {
            Some(folder) => Some(self.ensure_index_doc(&folder).await?),
            None => None,
          }
        }
        // External reference collaborators never produce edges.
        LinkTarget::Reference { .. } => None,
      };
      let Some(target) = resolved else {
        continue;
      };

      if let Some(&i) = positions.get(&target.doc_id) {
        edges[i].link_text = link.link_text;
      } else {
        positions.insert(target.doc_id, edges.len());
        edges.push(Edge {
          campaign_id: doc.campaign_id,
          from_doc:    doc.doc_id,
          to_doc:      target.doc_id,
          link_text:   link.link_text,
          kind:        EdgeKind::Link,
          weight:      1,
        });
      }
    }

    let edge_count = edges.len();
    self
      .store
      .delete_edges_from(doc.doc_id)
      .await
      .map_err(Error::store)?;
    self.store.insert_edges(edges).await.map_err(Error::store)?;

    let tags = normalize_tags(parse_tags(body));
    let tag_rows: Vec<TagRow> = tags
      .into_iter()
      .map(|t| TagRow {
        doc_id:      doc.doc_id,
        campaign_id: doc.campaign_id,
        namespace:   t.namespace,
        value:       t.value,
      })
      .collect();
    let tag_count = tag_rows.len();
    self
      .store
      .delete_tags_for(doc.doc_id)
      .await
      .map_err(Error::store)?;
    self
      .store
      .insert_tags(tag_rows)
      .await
      .map_err(Error::store)?;

    debug!(
      doc = %doc.doc_id,
      edges = edge_count,
      tags = tag_count,
      stubs = created_stubs.len(),
      "synchronized document graph"
    );

    Ok(SaveReport { doc, created_stubs, edge_count, tag_count })
  }

  /// Materialize an empty document at the campaign root to satisfy a
  /// dangling title link.
  async fn create_stub(
    &self,
    campaign_id: Uuid,
    title: &str,
  ) -> Result<Document> {
    let mut input = NewDoc::new(campaign_id, title);
    input.sort_index = self.next_sort_index(campaign_id, None).await?;
    let stub = self.store.create_doc(input).await.map_err(Error::store)?;
    debug!(doc = %stub.doc_id, title = %stub.title, "auto-created stub document");
    Ok(stub)
  }
}
