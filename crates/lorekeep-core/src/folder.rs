//! Folder — a node in a campaign's folder tree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A folder within a campaign. Folders form a tree via `parent_id`.
///
/// Invariant: the parent chain of an active folder consists only of
/// active folders. Cascade operations maintain this by re-parenting
/// restored folders to the root when their parent remains deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
  pub folder_id:   Uuid,
  pub campaign_id: Uuid,
  pub name:        String,
  /// `None` means the folder sits at the campaign root.
  pub parent_id:   Option<Uuid>,
  pub shared:      bool,
  pub deleted_at:  Option<DateTime<Utc>>,
}

impl Folder {
  pub fn is_active(&self) -> bool { self.deleted_at.is_none() }
}

/// Input to [`crate::store::WikiStore::create_folder`].
#[derive(Debug, Clone)]
pub struct NewFolder {
  pub campaign_id: Uuid,
  pub name:        String,
  pub parent_id:   Option<Uuid>,
  pub shared:      bool,
}

impl NewFolder {
  pub fn new(campaign_id: Uuid, name: impl Into<String>) -> Self {
    Self {
      campaign_id,
      name: name.into(),
      parent_id: None,
      shared: false,
    }
  }
}
