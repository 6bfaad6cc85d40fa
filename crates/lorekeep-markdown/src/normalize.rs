//! Tag list normalization — dedupe and canonical ordering.

use std::collections::HashSet;

use crate::tags::ParsedTag;

/// Deduplicate by `namespace:value` (keeping the first occurrence, so
/// the earliest `raw`/`source` survives) and sort by namespace, then
/// value. Idempotent: normalizing a normalized list is a no-op.
pub fn normalize_tags(tags: Vec<ParsedTag>) -> Vec<ParsedTag> {
  let mut seen: HashSet<(String, String)> = HashSet::new();
  let mut out: Vec<ParsedTag> = Vec::with_capacity(tags.len());
  for tag in tags {
    let key = (tag.namespace.clone(), tag.value.clone());
    if seen.insert(key) {
      out.push(tag);
    }
  }
  out.sort_by(|a, b| {
    a.namespace
      .cmp(&b.namespace)
      .then_with(|| a.value.cmp(&b.value))
  });
  out
}
