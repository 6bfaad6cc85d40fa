//! Folder operations and campaign seeding.

use chrono::Utc;
use lorekeep_core::{
  folder::{Folder, NewFolder},
  store::WikiStore,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{Error, Result, WikiEngine, index::index_title};

/// Folders created for a fresh campaign, in display order.
const DEFAULT_FOLDERS: &[&str] =
  &["NPCs", "Locations", "Items", "Factions", "Quests", "Sessions"];

impl<S: WikiStore> WikiEngine<S> {
  /// Create a folder and its index document.
  pub async fn create_folder(
    &self,
    campaign_id: Uuid,
    name: &str,
    parent_id: Option<Uuid>,
  ) -> Result<Folder> {
    if let Some(id) = parent_id {
      self.require_active_folder(id).await?;
    }

    let mut input = NewFolder::new(campaign_id, name);
    input.parent_id = parent_id;
    let folder =
      self.store.create_folder(input).await.map_err(Error::store)?;
    debug!(folder = %folder.folder_id, name = %folder.name, "created folder");

    self.ensure_index_doc(&folder).await?;
    self.update_all_folder_indexes(campaign_id).await?;
    Ok(folder)
  }

  /// Rename a folder; its index document's title follows the new name
  /// and the campaign's indexes are re-synthesized.
  pub async fn rename_folder(
    &self,
    folder_id: Uuid,
    new_name: &str,
  ) -> Result<Folder> {
    let mut folder = self.require_folder(folder_id).await?;
    folder.name = new_name.to_owned();
    self
      .store
      .update_folder(&folder)
      .await
      .map_err(Error::store)?;

    let mut index_doc = self.ensure_index_doc(&folder).await?;
    index_doc.title = index_title(new_name);
    index_doc.updated_at = Utc::now();
    self
      .store
      .update_doc(&index_doc)
      .await
      .map_err(Error::store)?;

    self.update_all_folder_indexes(folder.campaign_id).await?;
    Ok(folder)
  }

  /// Create the default folder set for a campaign that has none yet.
  ///
  /// The guard is an explicit store query, so seeding is idempotent
  /// across processes: a campaign with any folder (active or trashed)
  /// is left untouched and an empty list is returned.
  pub async fn seed_campaign(&self, campaign_id: Uuid) -> Result<Vec<Folder>> {
    let existing = self
      .store
      .list_folders(campaign_id, true)
      .await
      .map_err(Error::store)?;
    if !existing.is_empty() {
      debug!(campaign = %campaign_id, "campaign already seeded, skipping");
      return Ok(Vec::new());
    }

    let mut created = Vec::with_capacity(DEFAULT_FOLDERS.len());
    for name in DEFAULT_FOLDERS {
      let folder = self
        .store
        .create_folder(NewFolder::new(campaign_id, *name))
        .await
        .map_err(Error::store)?;
      self.ensure_index_doc(&folder).await?;
      created.push(folder);
    }
    self.update_all_folder_indexes(campaign_id).await?;

    info!(campaign = %campaign_id, folders = created.len(), "seeded campaign");
    Ok(created)
  }

  pub(crate) async fn require_folder(
    &self,
    folder_id: Uuid,
  ) -> Result<Folder> {
    self
      .store
      .get_folder(folder_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::FolderNotFound(folder_id))
  }

  /// Like [`Self::require_folder`], but trashed folders also count as
  /// not found.
  pub(crate) async fn require_active_folder(
    &self,
    folder_id: Uuid,
  ) -> Result<Folder> {
    let folder = self.require_folder(folder_id).await?;
    if !folder.is_active() {
      return Err(Error::FolderNotFound(folder_id));
    }
    Ok(folder)
  }

  /// First active folder in the campaign with exactly `name`.
  pub(crate) async fn find_active_folder_by_name(
    &self,
    campaign_id: Uuid,
    name: &str,
  ) -> Result<Option<Folder>> {
    let folders = self
      .store
      .list_folders(campaign_id, false)
      .await
      .map_err(Error::store)?;
    Ok(folders.into_iter().find(|f| f.name == name))
  }
}
