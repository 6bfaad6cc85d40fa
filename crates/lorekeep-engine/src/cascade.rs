//! Folder tree cascades — trash, restore, and purge over whole
//! subtrees, plus the single-document analogues.
//!
//! Each cascade loads the campaign's folder and document sets once and
//! works off an in-memory adjacency map; mutations go back as a batch
//! of independent update calls. Cascades are idempotent over the same
//! target set, so a partially-failed run is safe to retry.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use lorekeep_core::{
  document::Document,
  folder::Folder,
  store::{DocQuery, WikiStore},
};
use tracing::info;
use uuid::Uuid;

use crate::{Error, Result, WikiEngine};

/// `root` plus every descendant folder id, parents before children.
/// Trashed folders are part of the tree for cascade purposes.
fn folder_subtree(folders: &[Folder], root: Uuid) -> Vec<Uuid> {
  let mut children: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
  for folder in folders {
    if let Some(parent) = folder.parent_id {
      children.entry(parent).or_default().push(folder.folder_id);
    }
  }

  let mut order = Vec::new();
  let mut seen: HashSet<Uuid> = HashSet::new();
  let mut stack = vec![root];
  while let Some(id) = stack.pop() {
    if seen.insert(id) {
      order.push(id);
      if let Some(kids) = children.get(&id) {
        stack.extend(kids);
      }
    }
  }
  order
}

impl<S: WikiStore> WikiEngine<S> {
  async fn all_folders(&self, campaign_id: Uuid) -> Result<Vec<Folder>> {
    self
      .store
      .list_folders(campaign_id, true)
      .await
      .map_err(Error::store)
  }

  async fn all_docs(&self, campaign_id: Uuid) -> Result<Vec<Document>> {
    self
      .store
      .list_docs(campaign_id, DocQuery {
        include_deleted: true,
        ..Default::default()
      })
      .await
      .map_err(Error::store)
  }

  /// Referential cleanup before a document row can be hard-deleted.
  async fn purge_doc_rows(&self, doc_id: Uuid) -> Result<()> {
    self
      .store
      .delete_edges_touching(doc_id)
      .await
      .map_err(Error::store)?;
    self
      .store
      .delete_tags_for(doc_id)
      .await
      .map_err(Error::store)?;
    self
      .store
      .delete_refs_to(doc_id)
      .await
      .map_err(Error::store)?;
    self.store.delete_doc(doc_id).await.map_err(Error::store)?;
    Ok(())
  }

  // ── Folder cascades ───────────────────────────────────────────────────────

  /// Soft-delete a folder, its descendant folders, and every document
  /// inside the subtree. Rows outside the subtree are untouched.
  pub async fn trash_folder(&self, folder_id: Uuid) -> Result<()> {
    let folder = self.require_folder(folder_id).await?;
    let campaign_id = folder.campaign_id;

    let folders = self.all_folders(campaign_id).await?;
    let subtree: HashSet<Uuid> =
      folder_subtree(&folders, folder_id).into_iter().collect();
    let now = Utc::now();

    for mut folder in folders {
      if subtree.contains(&folder.folder_id) && folder.is_active() {
        folder.deleted_at = Some(now);
        self
          .store
          .update_folder(&folder)
          .await
          .map_err(Error::store)?;
      }
    }
    for mut doc in self.all_docs(campaign_id).await? {
      if doc.folder_id.is_some_and(|f| subtree.contains(&f))
        && doc.is_active()
      {
        doc.deleted_at = Some(now);
        self.store.update_doc(&doc).await.map_err(Error::store)?;
      }
    }

    info!(folder = %folder_id, folders = subtree.len(), "trashed folder subtree");
    self.update_all_folder_indexes(campaign_id).await?;
    Ok(())
  }

  /// Restore a trashed folder subtree. A restored folder whose parent
  /// is missing or still trashed is re-parented to the campaign root,
  /// keeping every active parent chain fully active.
  pub async fn restore_folder(&self, folder_id: Uuid) -> Result<()> {
    let folder = self.require_folder(folder_id).await?;
    let campaign_id = folder.campaign_id;

    let folders = self.all_folders(campaign_id).await?;
    let subtree: HashSet<Uuid> =
      folder_subtree(&folders, folder_id).into_iter().collect();
    let by_id: HashMap<Uuid, &Folder> =
      folders.iter().map(|f| (f.folder_id, f)).collect();

    for folder in &folders {
      if !subtree.contains(&folder.folder_id) {
        continue;
      }
      let mut folder = folder.clone();
      folder.deleted_at = None;
      if let Some(parent) = folder.parent_id {
        // Parents inside the subtree are being restored in this same
        // pass and stay attached.
        let parent_ok = subtree.contains(&parent)
          || by_id.get(&parent).is_some_and(|p| p.is_active());
        if !parent_ok {
          folder.parent_id = None;
        }
      }
      self
        .store
        .update_folder(&folder)
        .await
        .map_err(Error::store)?;
    }
    for mut doc in self.all_docs(campaign_id).await? {
      if doc.folder_id.is_some_and(|f| subtree.contains(&f))
        && !doc.is_active()
      {
        doc.deleted_at = None;
        self.store.update_doc(&doc).await.map_err(Error::store)?;
      }
    }

    info!(folder = %folder_id, folders = subtree.len(), "restored folder subtree");
    self.update_all_folder_indexes(campaign_id).await?;
    Ok(())
  }

  /// Permanently delete a folder subtree and everything in it.
  /// Edge/Tag/DocRef cleanup strictly precedes each document's row
  /// deletion; child folders are deleted before their parents.
  pub async fn purge_folder(&self, folder_id: Uuid) -> Result<()> {
    let folder = self.require_folder(folder_id).await?;
    let campaign_id = folder.campaign_id;

    let folders = self.all_folders(campaign_id).await?;
    let order = folder_subtree(&folders, folder_id);
    let subtree: HashSet<Uuid> = order.iter().copied().collect();

    let mut purged_docs = 0;
    for doc in self.all_docs(campaign_id).await? {
      if doc.folder_id.is_some_and(|f| subtree.contains(&f)) {
        self.purge_doc_rows(doc.doc_id).await?;
        purged_docs += 1;
      }
    }
    for id in order.iter().rev() {
      self.store.delete_folder(*id).await.map_err(Error::store)?;
    }

    info!(
      folder = %folder_id,
      folders = order.len(),
      docs = purged_docs,
      "purged folder subtree"
    );
    self.update_all_folder_indexes(campaign_id).await?;
    Ok(())
  }

  // ── Single-document analogues ─────────────────────────────────────────────

  pub async fn trash_doc(&self, doc_id: Uuid) -> Result<Document> {
    let mut doc = self.require_doc(doc_id).await?;
    if doc.is_active() {
      doc.deleted_at = Some(Utc::now());
      self.store.update_doc(&doc).await.map_err(Error::store)?;
    }
    self.update_all_folder_indexes(doc.campaign_id).await?;
    Ok(doc)
  }

  /// Restore a trashed document. If its folder is missing or still
  /// trashed it is demoted to the campaign root; either way it gets a
  /// fresh trailing `sort_index` in its resulting folder.
  pub async fn restore_doc(&self, doc_id: Uuid) -> Result<Document> {
    let mut doc = self.require_doc(doc_id).await?;
    doc.deleted_at = None;

    if let Some(folder_id) = doc.folder_id {
      let folder_ok = self
        .store
        .get_folder(folder_id)
        .await
        .map_err(Error::store)?
        .is_some_and(|f| f.is_active());
      if !folder_ok {
        doc.folder_id = None;
      }
    }
    doc.sort_index =
      self.next_sort_index(doc.campaign_id, doc.folder_id).await?;
    self.store.update_doc(&doc).await.map_err(Error::store)?;

    self.update_all_folder_indexes(doc.campaign_id).await?;
    Ok(doc)
  }

  pub async fn purge_doc(&self, doc_id: Uuid) -> Result<()> {
    let doc = self.require_doc(doc_id).await?;
    self.purge_doc_rows(doc.doc_id).await?;
    info!(doc = %doc_id, "purged document");
    self.update_all_folder_indexes(doc.campaign_id).await?;
    Ok(())
  }
}
