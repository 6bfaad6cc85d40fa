//! Record-level document operations.

use chrono::Utc;
use lorekeep_core::{
  document::{Document, NewDoc},
  store::{DocQuery, WikiStore},
};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::{Error, Result, WikiEngine};

/// One inbound link, resolved to its (active) source document.
#[derive(Debug, Clone, Serialize)]
pub struct Backlink {
  pub doc:       Document,
  pub link_text: String,
}

impl<S: WikiStore> WikiEngine<S> {
  /// Create an empty document, placed last in its folder's ordering.
  pub async fn create_doc(
    &self,
    campaign_id: Uuid,
    title: &str,
    folder_id: Option<Uuid>,
  ) -> Result<Document> {
    if let Some(id) = folder_id {
      self.require_active_folder(id).await?;
    }

    let mut input = NewDoc::new(campaign_id, title);
    input.folder_id = folder_id;
    input.sort_index = self.next_sort_index(campaign_id, folder_id).await?;
    let doc = self.store.create_doc(input).await.map_err(Error::store)?;
    debug!(doc = %doc.doc_id, title = %doc.title, "created document");

    self.update_all_folder_indexes(campaign_id).await?;
    Ok(doc)
  }

  pub async fn rename_doc(
    &self,
    doc_id: Uuid,
    new_title: &str,
  ) -> Result<Document> {
    let mut doc = self.require_doc(doc_id).await?;
    doc.title = new_title.to_owned();
    doc.updated_at = Utc::now();
    self.store.update_doc(&doc).await.map_err(Error::store)?;

    self.update_all_folder_indexes(doc.campaign_id).await?;
    Ok(doc)
  }

  /// Move a document to another folder (or to the campaign root),
  /// placing it last in the destination's ordering.
  pub async fn move_doc(
    &self,
    doc_id: Uuid,
    folder_id: Option<Uuid>,
  ) -> Result<Document> {
    let mut doc = self.require_doc(doc_id).await?;
    if let Some(id) = folder_id {
      self.require_active_folder(id).await?;
    }

    doc.folder_id = folder_id;
    doc.sort_index = self.next_sort_index(doc.campaign_id, folder_id).await?;
    doc.updated_at = Utc::now();
    self.store.update_doc(&doc).await.map_err(Error::store)?;

    self.update_all_folder_indexes(doc.campaign_id).await?;
    Ok(doc)
  }

  /// Inbound links to `doc_id`, restricted to active source documents.
  pub async fn list_backlinks(&self, doc_id: Uuid) -> Result<Vec<Backlink>> {
    let edges = self.store.edges_into(doc_id).await.map_err(Error::store)?;
    let mut backlinks = Vec::with_capacity(edges.len());
    for edge in edges {
      let Some(source) =
        self.store.get_doc(edge.from_doc).await.map_err(Error::store)?
      else {
        continue;
      };
      if source.is_active() {
        backlinks.push(Backlink { doc: source, link_text: edge.link_text });
      }
    }
    Ok(backlinks)
  }

  /// Active documents in the campaign carrying `namespace:value`.
  pub async fn list_docs_with_tag(
    &self,
    campaign_id: Uuid,
    namespace: &str,
    value: &str,
  ) -> Result<Vec<Document>> {
    self
      .store
      .docs_with_tag(campaign_id, namespace, value)
      .await
      .map_err(Error::store)
  }

  pub(crate) async fn require_doc(&self, doc_id: Uuid) -> Result<Document> {
    self
      .store
      .get_doc(doc_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::DocNotFound(doc_id))
  }

  /// The next trailing `sort_index` within a folder (or the campaign
  /// root). Trashed documents still occupy their slots.
  pub(crate) async fn next_sort_index(
    &self,
    campaign_id: Uuid,
    folder_id: Option<Uuid>,
  ) -> Result<i64> {
    let docs = self
      .store
      .list_docs(campaign_id, DocQuery {
        include_deleted: true,
        ..Default::default()
      })
      .await
      .map_err(Error::store)?;
    Ok(
      docs
        .iter()
        .filter(|d| d.folder_id == folder_id)
        .map(|d| d.sort_index + 1)
        .max()
        .unwrap_or(0),
    )
  }
}
