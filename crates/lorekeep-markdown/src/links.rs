//! Wiki-link extraction.
//!
//! Recognises `[[target]]` and `[[target|label]]` references. Target
//! forms:
//!
//! - `doc:<uuid>` — addressed by document id
//! - `folder:<name>` — addressed to a folder's index document
//! - `ref:<slug>:<id>` — an external reference collaborator (carried
//!   through but out of graph scope; it never produces an edge)
//! - anything else — an exact document title within the same campaign
//!
//! The output is deduplicated by target identity: each target appears
//! once, at its first position, with the display text of its *last*
//! occurrence.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Output types ────────────────────────────────────────────────────────────

/// What a wiki-link points at, before store resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "lowercase")]
pub enum LinkTarget {
  Doc { id: Uuid },
  Folder { name: String },
  Reference { slug: String, id: String },
  Title { title: String },
}

/// One outbound link. `link_text` is the label if one was given,
/// otherwise the target text as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedLink {
  pub target:    LinkTarget,
  pub link_text: String,
}

// ─── Parser ──────────────────────────────────────────────────────────────────

fn parse_target(target: &str) -> Option<LinkTarget> {
  if let Some(id) = target.strip_prefix("doc:") {
    // An unparsable id cannot resolve to anything; drop the link.
    return Uuid::parse_str(id.trim())
      .ok()
      .map(|id| LinkTarget::Doc { id });
  }
  if let Some(name) = target.strip_prefix("folder:") {
    let name = name.trim();
    if name.is_empty() {
      return None;
    }
    return Some(LinkTarget::Folder { name: name.to_string() });
  }
  if let Some(rest) = target.strip_prefix("ref:") {
    let (slug, id) = rest.split_once(':')?;
    if slug.is_empty() || id.is_empty() {
      return None;
    }
    return Some(LinkTarget::Reference {
      slug: slug.to_string(),
      id:   id.to_string(),
    });
  }
  Some(LinkTarget::Title { title: target.to_string() })
}

/// Extract all wiki-links from a body, in document order, deduplicated
/// by target identity (last write wins for the display text).
pub fn parse_links(body: &str) -> Vec<ParsedLink> {
  let mut out: Vec<ParsedLink> = Vec::new();
  let mut positions: HashMap<LinkTarget, usize> = HashMap::new();

  let mut cursor = 0;
  while let Some(open) = body[cursor..].find("[[") {
    let start = cursor + open + 2;
    let Some(close) = body[start..].find("]]") else {
      break;
    };
    let inner = &body[start..start + close];
    cursor = start + close + 2;

    let (target_raw, label) = match inner.split_once('|') {
      Some((t, l)) => (t.trim(), Some(l.trim())),
      None => (inner.trim(), None),
    };
    if target_raw.is_empty() {
      continue;
    }
    let Some(target) = parse_target(target_raw) else {
      continue;
    };
    let link_text = label
      .filter(|l| !l.is_empty())
      .unwrap_or(target_raw)
      .to_string();

    if let Some(&i) = positions.get(&target) {
      out[i].link_text = link_text;
    } else {
      positions.insert(target.clone(), out.len());
      out.push(ParsedLink { target, link_text });
    }
  }
  out
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn title_links_with_and_without_label() {
    let links = parse_links("See [[Greenwood Village]] and [[Elara|the bard]].");
    assert_eq!(links.len(), 2);
    assert_eq!(links[0].target, LinkTarget::Title {
      title: "Greenwood Village".into()
    });
    assert_eq!(links[0].link_text, "Greenwood Village");
    assert_eq!(links[1].target, LinkTarget::Title { title: "Elara".into() });
    assert_eq!(links[1].link_text, "the bard");
  }

  #[test]
  fn doc_folder_and_ref_forms() {
    let id = Uuid::new_v4();
    let body = format!(
      "[[doc:{id}|by id]] [[folder:Sessions]] [[ref:npc:4217|Captain]]"
    );
    let links = parse_links(&body);
    assert_eq!(links.len(), 3);
    assert_eq!(links[0].target, LinkTarget::Doc { id });
    assert_eq!(links[1].target, LinkTarget::Folder {
      name: "Sessions".into()
    });
    assert_eq!(links[2].target, LinkTarget::Reference {
      slug: "npc".into(),
      id:   "4217".into(),
    });
    assert_eq!(links[2].link_text, "Captain");
  }

  #[test]
  fn duplicate_targets_collapse_last_text_wins() {
    let links =
      parse_links("[[Elara|the bard]] then [[Gorim]] then [[Elara|my friend]]");
    assert_eq!(links.len(), 2);
    // First position kept, last label kept.
    assert_eq!(links[0].target, LinkTarget::Title { title: "Elara".into() });
    assert_eq!(links[0].link_text, "my friend");
    assert_eq!(links[1].target, LinkTarget::Title { title: "Gorim".into() });
  }

  #[test]
  fn malformed_links_are_skipped() {
    assert!(parse_links("[[]] [[|label]] [[doc:not-a-uuid]]").is_empty());
    assert!(parse_links("[[unclosed").is_empty());
    assert!(parse_links("[[ref:missingid]]").is_empty());
  }

  #[test]
  fn no_links_in_plain_prose() {
    assert!(parse_links("just [a markdown](link) and text").is_empty());
  }
}
