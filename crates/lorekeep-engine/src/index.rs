//! Index synthesis — each active folder owns one auto-maintained index
//! document listing the pages in its subtree.

use std::collections::{HashMap, HashSet};

use lorekeep_core::{
  document::{DocKind, Document, NewDoc},
  folder::Folder,
  store::{DocQuery, WikiStore},
};
use tracing::debug;
use uuid::Uuid;

use crate::{Error, Result, WikiEngine};

/// Opening sentinel of the managed region, on its own line.
pub const INDEX_REGION_START: &str = "<!-- lorekeep:index -->";
/// Closing sentinel of the managed region.
pub const INDEX_REGION_END: &str = "<!-- /lorekeep:index -->";

/// Canonical title for a folder's index document.
pub fn index_title(folder_name: &str) -> String {
  format!("{folder_name} Index")
}

/// Replace the managed region of `body` with `listing`, leaving all
/// text outside the first matched sentinel pair untouched. A body
/// without a matched pair gets the region appended at the end; an
/// orphan sentinel in user prose never opens a region, so the text
/// after it survives every rewrite.
pub fn splice_index_region(body: &str, listing: &str) -> String {
  let region = if listing.is_empty() {
    format!("{INDEX_REGION_START}\n{INDEX_REGION_END}")
  } else {
    format!("{INDEX_REGION_START}\n{listing}\n{INDEX_REGION_END}")
  };

  // A start sentinel only opens the managed region when its end
  // sentinel follows with no further start sentinel in between.
  let mut search_from = 0;
  while let Some(rel) = body[search_from..].find(INDEX_REGION_START) {
    let start = search_from + rel;
    let scan_from = start + INDEX_REGION_START.len();
    let Some(end_rel) = body[scan_from..].find(INDEX_REGION_END) else {
      break;
    };
    let end = scan_from + end_rel;
    match body[scan_from..end].find(INDEX_REGION_START) {
      // Orphan start marker; try the next candidate.
      Some(next_rel) => search_from = scan_from + next_rel,
      None => {
        let end = end + INDEX_REGION_END.len();
        return format!("{}{}{}", &body[..start], region, &body[end..]);
      }
    }
  }

  if body.trim_end().is_empty() {
    region
  } else {
    format!("{}\n\n{}", body.trim_end(), region)
  }
}

impl<S: WikiStore> WikiEngine<S> {
  /// Find or create the canonical index document for `folder`.
  ///
  /// If several index documents exist under the folder (prior bug or
  /// race), the most recently updated one wins deterministically.
  pub async fn ensure_index_doc(&self, folder: &Folder) -> Result<Document> {
    let indexes = self
      .store
      .list_docs(folder.campaign_id, DocQuery {
        include_deleted: false,
        kind:            Some(DocKind::Index),
      })
      .await
      .map_err(Error::store)?;

    let existing = indexes
      .into_iter()
      .filter(|d| d.folder_id == Some(folder.folder_id))
      .max_by_key(|d| d.updated_at);
    if let Some(doc) = existing {
      return Ok(doc);
    }

    let mut input = NewDoc::new(folder.campaign_id, index_title(&folder.name));
    input.folder_id = Some(folder.folder_id);
    input.kind = DocKind::Index;
    input.body = splice_index_region("", "");
    let doc = self.store.create_doc(input).await.map_err(Error::store)?;
    debug!(doc = %doc.doc_id, folder = %folder.folder_id, "created index document");
    Ok(doc)
  }

  /// Recompute every active folder's index document in `campaign_id`.
  ///
  /// One full pass: the campaign's folders and active documents are
  /// loaded once, each folder's descendant set is derived from an
  /// in-memory adjacency map, and the index body is written back (via
  /// the graph synchronizer) only when it actually changed. Returns
  /// the number of index documents written.
  pub async fn update_all_folder_indexes(
    &self,
    campaign_id: Uuid,
  ) -> Result<usize> {
    let folders = self
      .store
      .list_folders(campaign_id, false)
      .await
      .map_err(Error::store)?;
    let docs = self
      .store
      .list_docs(campaign_id, DocQuery::default())
      .await
      .map_err(Error::store)?;

    let mut children: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for folder in &folders {
      if let Some(parent) = folder.parent_id {
        children.entry(parent).or_default().push(folder.folder_id);
      }
    }

    let mut writes = 0;
    for folder in &folders {
      // Descendant folder ids, including the folder itself.
      let mut subtree: HashSet<Uuid> = HashSet::new();
      let mut stack = vec![folder.folder_id];
      while let Some(id) = stack.pop() {
        if subtree.insert(id)
          && let Some(kids) = children.get(&id)
        {
          stack.extend(kids);
        }
      }

      let mut entries: Vec<&Document> = docs
        .iter()
        .filter(|d| {
          d.kind == DocKind::Normal
            && d.folder_id.is_some_and(|f| subtree.contains(&f))
        })
        .collect();
      entries.sort_by(|a, b| {
        a.sort_index
          .cmp(&b.sort_index)
          .then_with(|| a.title.cmp(&b.title))
      });
      let listing = entries
        .iter()
        .map(|d| format!("- [[{}]]", d.title))
        .collect::<Vec<_>>()
        .join("\n");

      let index_doc = self.ensure_index_doc(folder).await?;
      let next_body = splice_index_region(&index_doc.body, &listing);
      if next_body != index_doc.body {
        self.save_doc_content(index_doc.doc_id, &next_body).await?;
        writes += 1;
      }
    }

    debug!(campaign = %campaign_id, writes, "folder index synthesis pass");
    Ok(writes)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn splice_into_empty_body() {
    let spliced = splice_index_region("", "- [[Aldric]]");
    assert_eq!(
      spliced,
      "<!-- lorekeep:index -->\n- [[Aldric]]\n<!-- /lorekeep:index -->"
    );
  }

  #[test]
  fn splice_preserves_surrounding_text() {
    let body = "Intro prose.\n\n<!-- lorekeep:index -->\n- [[Old]]\n<!-- /lorekeep:index -->\n\nOutro prose.";
    let spliced = splice_index_region(body, "- [[New]]");
    assert_eq!(
      spliced,
      "Intro prose.\n\n<!-- lorekeep:index -->\n- [[New]]\n<!-- /lorekeep:index -->\n\nOutro prose."
    );
  }

  #[test]
  fn splice_appends_when_no_sentinels() {
    let spliced = splice_index_region("Just notes.\n", "- [[Aldric]]");
    assert_eq!(
      spliced,
      "Just notes.\n\n<!-- lorekeep:index -->\n- [[Aldric]]\n<!-- /lorekeep:index -->"
    );
  }

  #[test]
  fn splice_only_manages_first_pair() {
    let body = "<!-- lorekeep:index -->\n<!-- /lorekeep:index -->\n<!-- lorekeep:index -->\nkept\n<!-- /lorekeep:index -->";
    let spliced = splice_index_region(body, "- [[A]]");
    assert!(spliced.ends_with("kept\n<!-- /lorekeep:index -->"));
    assert!(spliced.starts_with(
      "<!-- lorekeep:index -->\n- [[A]]\n<!-- /lorekeep:index -->"
    ));
  }

  #[test]
  fn orphan_start_sentinel_never_captures_user_text() {
    let body = "Intro.\n<!-- lorekeep:index -->\nUser notes that must survive.";
    let once = splice_index_region(body, "- [[A]]");
    let twice = splice_index_region(&once, "- [[A]]");
    assert!(once.contains("User notes that must survive."));
    assert!(twice.contains("User notes that must survive."));
    assert_eq!(once, twice);
  }

  #[test]
  fn orphan_end_sentinel_is_ignored() {
    let body = "Prose.\n<!-- /lorekeep:index -->\nMore prose.";
    let once = splice_index_region(body, "- [[A]]");
    let twice = splice_index_region(&once, "- [[A]]");
    assert!(twice.contains("More prose."));
    assert_eq!(once, twice);
  }

  #[test]
  fn splice_is_idempotent() {
    let once = splice_index_region("notes", "- [[A]]\n- [[B]]");
    let twice = splice_index_region(&once, "- [[A]]\n- [[B]]");
    assert_eq!(once, twice);
  }

  #[test]
  fn index_title_format() {
    assert_eq!(index_title("NPCs"), "NPCs Index");
  }
}
