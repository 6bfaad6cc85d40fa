//! Namespaced tag extraction.
//!
//! Tags come from two places, extracted in this order:
//!
//! 1. a `tags:` key in the frontmatter block (flow list `[a, b]` or a
//!    block list of `- item` lines), and
//! 2. inline `@namespace:value` / `#namespace:value` annotations in
//!    the body text.
//!
//! Malformed entries (no `:`, or an empty namespace/value after
//! normalization) are dropped silently.

use serde::{Deserialize, Serialize};

// ─── Output type ─────────────────────────────────────────────────────────────

/// Where a tag was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagSource {
  Frontmatter,
  Inline,
}

/// A tag extracted from a markdown body. `namespace` and `value` are
/// already normalized; `raw` preserves the author's spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTag {
  pub namespace: String,
  pub value:     String,
  pub raw:       String,
  pub source:    TagSource,
  /// The sigil the tag was written with (`@` or `#`), if any.
  pub prefix:    Option<char>,
}

// ─── Normalization ───────────────────────────────────────────────────────────

/// Lowercase, drop quote characters, collapse every run of disallowed
/// characters to a single hyphen, and trim leading/trailing hyphens.
fn slugify(raw: &str, allowed: impl Fn(char) -> bool) -> String {
  let mut out = String::with_capacity(raw.len());
  let mut pending_hyphen = false;
  for c in raw.chars() {
    if c == '"' || c == '\'' {
      continue;
    }
    let c = c.to_ascii_lowercase();
    if allowed(c) {
      if pending_hyphen && !out.is_empty() {
        out.push('-');
      }
      pending_hyphen = false;
      out.push(c);
    } else {
      pending_hyphen = true;
    }
  }
  out
}

/// Namespace normalization permits alphanumerics and `_`.
pub fn normalize_namespace(raw: &str) -> String {
  slugify(raw, |c| c.is_ascii_alphanumeric() || c == '_')
}

/// Value normalization restricts to alphanumerics.
pub fn normalize_value(raw: &str) -> String {
  slugify(raw, |c| c.is_ascii_alphanumeric())
}

// ─── Raw-entry parsing ───────────────────────────────────────────────────────

/// Parse one raw entry of the form `[@#]?namespace:value`.
/// Returns `None` for malformed entries.
fn tag_from_raw(raw: &str, source: TagSource) -> Option<ParsedTag> {
  let trimmed = raw.trim();
  let (prefix, rest) = match trimmed.chars().next() {
    Some(c @ ('@' | '#')) => (Some(c), &trimmed[1..]),
    _ => (None, trimmed),
  };
  let (ns, val) = rest.split_once(':')?;
  let namespace = normalize_namespace(ns);
  let value = normalize_value(val);
  if namespace.is_empty() || value.is_empty() {
    return None;
  }
  Some(ParsedTag {
    namespace,
    value,
    raw: trimmed.to_string(),
    source,
    prefix,
  })
}

// ─── Frontmatter pass ────────────────────────────────────────────────────────

/// Extract raw tag strings from a leading `---` delimited frontmatter
/// block, if present. Both the flow form (`tags: [a, b]`) and the
/// block form (`tags:` followed by `- item` lines) are recognised.
fn frontmatter_raw_tags(body: &str) -> Vec<String> {
  let mut lines = body.lines();
  match lines.next() {
    Some(first) if first.trim_end() == "---" => {}
    _ => return Vec::new(),
  }

  let mut block: Vec<&str> = Vec::new();
  let mut closed = false;
  for line in lines {
    let t = line.trim_end();
    if t == "---" || t == "..." {
      closed = true;
      break;
    }
    block.push(line);
  }
  if !closed {
    return Vec::new();
  }

  let mut out = Vec::new();
  for (i, line) in block.iter().enumerate() {
    let Some(rest) = line.trim_start().strip_prefix("tags:") else {
      continue;
    };
    let rest = rest.trim();
    if !rest.is_empty() {
      // Flow list. Tolerate a missing bracket pair.
      let inner = rest
        .strip_prefix('[')
        .and_then(|r| r.strip_suffix(']'))
        .unwrap_or(rest);
      for item in inner.split(',') {
        let item = item.trim();
        if !item.is_empty() {
          out.push(item.to_string());
        }
      }
    } else {
      // Block list: `- item` lines until a non-list, non-blank line.
      for l in &block[i + 1..] {
        let l = l.trim();
        if l.is_empty() {
          continue;
        }
        let Some(item) = l.strip_prefix("- ") else {
          break;
        };
        let item = item.trim();
        if !item.is_empty() {
          out.push(item.to_string());
        }
      }
    }
    break; // only the first `tags:` key counts
  }
  out
}

// ─── Inline pass ─────────────────────────────────────────────────────────────

/// A match of `[@#]identifier:` — the value run starts at `value_start`.
struct InlineMatch {
  tag_start:   usize,
  value_start: usize,
  prefix:      char,
  ident_raw:   String,
}

fn find_inline_matches(body: &str) -> Vec<InlineMatch> {
  let bytes = body.as_bytes();
  let mut matches = Vec::new();
  let mut i = 0;
  while i < bytes.len() {
    let b = bytes[i];
    if b == b'@' || b == b'#' {
      let ident_start = i + 1;
      let mut j = ident_start;
      while j < bytes.len()
        && (bytes[j].is_ascii_alphanumeric() || bytes[j] == b'_')
      {
        j += 1;
      }
      if j > ident_start && j < bytes.len() && bytes[j] == b':' {
        matches.push(InlineMatch {
          tag_start:   i,
          value_start: j + 1,
          prefix:      b as char,
          ident_raw:   body[ident_start..j].to_string(),
        });
        i = j + 1;
        continue;
      }
    }
    i += 1;
  }
  matches
}

const TRAILING_PUNCTUATION: [char; 6] = ['.', ',', ';', ':', '!', '?'];

fn inline_tags(body: &str) -> Vec<ParsedTag> {
  let matches = find_inline_matches(body);
  let mut out = Vec::new();

  for (k, m) in matches.iter().enumerate() {
    let next_start = matches
      .get(k + 1)
      .map(|n| n.tag_start)
      .unwrap_or(body.len());
    let run = &body[m.value_start..next_start];

    // A value never crosses a line boundary. When another tag follows
    // on the same line, only the first whitespace-delimited token is
    // the value; otherwise the whole remaining run is.
    let (run, ended_by_tag) = match run.find('\n') {
      Some(nl) => (&run[..nl], false),
      None => (run, k + 1 < matches.len()),
    };
    let value_raw = if ended_by_tag && run.trim().contains(char::is_whitespace)
    {
      run.split_whitespace().next().unwrap_or("")
    } else {
      run.trim()
    };
    let value_raw = value_raw.trim_end_matches(TRAILING_PUNCTUATION);

    let namespace = normalize_namespace(&m.ident_raw);
    let value = normalize_value(value_raw);
    if namespace.is_empty() || value.is_empty() {
      continue;
    }
    out.push(ParsedTag {
      namespace,
      value,
      raw: format!("{}{}:{}", m.prefix, m.ident_raw, value_raw),
      source: TagSource::Inline,
      prefix: Some(m.prefix),
    });
  }
  out
}

// ─── Entry point ─────────────────────────────────────────────────────────────

/// Extract all tags from a markdown body, frontmatter first, then
/// inline annotations, each in document order.
pub fn parse_tags(body: &str) -> Vec<ParsedTag> {
  let mut tags: Vec<ParsedTag> = frontmatter_raw_tags(body)
    .iter()
    .filter_map(|raw| tag_from_raw(raw, TagSource::Frontmatter))
    .collect();
  tags.extend(inline_tags(body));
  tags
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn pairs(tags: &[ParsedTag]) -> Vec<(String, String)> {
    tags
      .iter()
      .map(|t| (t.namespace.clone(), t.value.clone()))
      .collect()
  }

  #[test]
  fn frontmatter_block_list_and_inline() {
    let body = "---\ntags:\n  - type:NPC\n  - terrain:Greenwood \
                Forest\n---\n\nSome prose. @Status:Alive\nSeen at \
                #location:Greenwood Village.";
    let tags = parse_tags(body);
    assert_eq!(
      pairs(&tags),
      vec![
        ("type".into(), "npc".into()),
        ("terrain".into(), "greenwood-forest".into()),
        ("status".into(), "alive".into()),
        ("location".into(), "greenwood-village".into()),
      ]
    );
  }

  #[test]
  fn frontmatter_flow_list() {
    let body = "---\ntags: [type:NPC, status:Alive]\n---\nbody";
    let tags = parse_tags(body);
    assert_eq!(
      pairs(&tags),
      vec![
        ("type".into(), "npc".into()),
        ("status".into(), "alive".into()),
      ]
    );
  }

  #[test]
  fn frontmatter_requires_closing_delimiter() {
    let body = "---\ntags: [type:NPC]\nno closing fence";
    assert!(parse_tags(body).is_empty());
  }

  #[test]
  fn block_list_stops_at_non_list_line() {
    let body =
      "---\ntags:\n  - type:NPC\ntitle: something\n  - status:Alive\n---\n";
    let tags = parse_tags(body);
    assert_eq!(pairs(&tags), vec![("type".into(), "npc".into())]);
  }

  #[test]
  fn malformed_entries_dropped_silently() {
    let body = "---\ntags: [nocolon, :empty, type:, type:NPC]\n---\n";
    let tags = parse_tags(body);
    assert_eq!(pairs(&tags), vec![("type".into(), "npc".into())]);
  }

  #[test]
  fn inline_value_takes_first_token_before_next_tag() {
    let body = "@type:NPC some prose @status:Alive";
    let tags = parse_tags(body);
    assert_eq!(
      pairs(&tags),
      vec![
        ("type".into(), "npc".into()),
        ("status".into(), "alive".into()),
      ]
    );
  }

  #[test]
  fn inline_value_extends_to_end_of_line() {
    let body = "#location:Greenwood Village.\nMore prose here.";
    let tags = parse_tags(body);
    assert_eq!(
      pairs(&tags),
      vec![("location".into(), "greenwood-village".into())]
    );
  }

  #[test]
  fn trailing_punctuation_stripped() {
    let tags = parse_tags("@status:Alive!");
    assert_eq!(pairs(&tags), vec![("status".into(), "alive".into())]);
  }

  #[test]
  fn sigil_and_raw_preserved() {
    let tags = parse_tags("@Status:Alive");
    assert_eq!(tags[0].prefix, Some('@'));
    assert_eq!(tags[0].raw, "@Status:Alive");
    assert_eq!(tags[0].source, TagSource::Inline);
  }

  #[test]
  fn email_addresses_are_not_tags() {
    // `gm@example.com:` — "example" is preceded by `@` but the run
    // after the identifier is not a colon until `.com`, which breaks
    // the identifier. No tag should surface from ordinary prose.
    let tags = parse_tags("mail gm@example.com for details");
    assert!(tags.is_empty());
  }

  #[test]
  fn normalization_rules() {
    assert_eq!(normalize_namespace("  My_Namespace "), "my_namespace");
    assert_eq!(normalize_value("Greenwood   Forest"), "greenwood-forest");
    assert_eq!(normalize_value("\"Quoted\""), "quoted");
    assert_eq!(normalize_value("--edge--"), "edge");
    assert_eq!(normalize_value("2025-1-04"), "2025-1-04");
  }
}
