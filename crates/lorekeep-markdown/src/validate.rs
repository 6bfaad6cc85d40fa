//! Tag validation against a namespace vocabulary.
//!
//! Validation issues are data, not errors: every call returns the full
//! list of issues found, in input order, and the caller decides whether
//! `error`-severity issues block anything. Only a malformed vocabulary
//! (an invalid regex pattern) is a hard error.

use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
  error::{Error, Result},
  tags::ParsedTag,
};

// ─── Vocabulary types ────────────────────────────────────────────────────────

/// How a namespace constrains its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamespaceKind {
  /// Values must come from the declared set.
  Closed,
  /// Any value is accepted.
  Open,
  /// Values outside the declared set (plus per-call supplements) are
  /// flagged as warnings, not errors.
  Semi,
}

/// One entry of the namespace vocabulary. Supplied by configuration;
/// never mutated by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespaceSpec {
  pub name:    String,
  pub kind:    NamespaceKind,
  /// Allowed (closed) or registered (semi) values.
  #[serde(default)]
  pub values:  Vec<String>,
  /// Optional regex the value must fully match, checked regardless of
  /// kind.
  #[serde(default)]
  pub pattern: Option<String>,
}

/// Options for [`validate_tags`].
#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
  /// Treat unknown namespaces as errors rather than warnings.
  pub strict_namespaces: bool,
  /// Per-call supplemental values for `semi` namespaces, keyed by
  /// namespace name.
  pub custom_values:     HashMap<String, Vec<String>>,
}

// ─── Issues ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Warn,
  Error,
}

/// Machine-readable issue codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueCode {
  UnknownNamespace,
  PatternMismatch,
  InvalidValue,
  UnregisteredValue,
}

impl IssueCode {
  /// The kebab-case string form, matching the serde representation.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::UnknownNamespace => "unknown-namespace",
      Self::PatternMismatch => "pattern-mismatch",
      Self::InvalidValue => "invalid-value",
      Self::UnregisteredValue => "unregistered-value",
    }
  }
}

/// One validation finding for one tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagIssue {
  pub code:      IssueCode,
  pub severity:  Severity,
  pub namespace: String,
  pub value:     String,
}

// ─── Validation ──────────────────────────────────────────────────────────────

/// Validate `tags` (normally already normalized and sorted) against a
/// vocabulary. Issues are appended in input-tag order; callers rely on
/// that ordering.
pub fn validate_tags(
  tags: &[ParsedTag],
  specs: &[NamespaceSpec],
  opts: &ValidateOptions,
) -> Result<Vec<TagIssue>> {
  let by_name: HashMap<&str, &NamespaceSpec> =
    specs.iter().map(|s| (s.name.as_str(), s)).collect();

  // Compile each pattern once per call, anchored to the full value.
  let mut patterns: HashMap<&str, Regex> = HashMap::new();
  for spec in specs {
    if let Some(pat) = &spec.pattern {
      let anchored = format!("^(?:{pat})$");
      let re = Regex::new(&anchored).map_err(|source| Error::InvalidPattern {
        namespace: spec.name.clone(),
        source,
      })?;
      patterns.insert(spec.name.as_str(), re);
    }
  }

  let mut issues = Vec::new();
  for tag in tags {
    let Some(spec) = by_name.get(tag.namespace.as_str()) else {
      issues.push(TagIssue {
        code:      IssueCode::UnknownNamespace,
        severity:  if opts.strict_namespaces {
          Severity::Error
        } else {
          Severity::Warn
        },
        namespace: tag.namespace.clone(),
        value:     tag.value.clone(),
      });
      continue;
    };

    // Pattern check applies regardless of kind, and does not
    // short-circuit the kind-specific check below.
    if let Some(re) = patterns.get(spec.name.as_str())
      && !re.is_match(&tag.value)
    {
      issues.push(TagIssue {
        code:      IssueCode::PatternMismatch,
        severity:  Severity::Error,
        namespace: tag.namespace.clone(),
        value:     tag.value.clone(),
      });
    }

    match spec.kind {
      NamespaceKind::Closed => {
        if !spec.values.iter().any(|v| v == &tag.value) {
          issues.push(TagIssue {
            code:      IssueCode::InvalidValue,
            severity:  Severity::Error,
            namespace: tag.namespace.clone(),
            value:     tag.value.clone(),
          });
        }
      }
      NamespaceKind::Semi => {
        let supplemental = opts
          .custom_values
          .get(&tag.namespace)
          .map(Vec::as_slice)
          .unwrap_or(&[]);
        let registered = spec.values.iter().any(|v| v == &tag.value)
          || supplemental.iter().any(|v| v == &tag.value);
        if !registered {
          issues.push(TagIssue {
            code:      IssueCode::UnregisteredValue,
            severity:  Severity::Warn,
            namespace: tag.namespace.clone(),
            value:     tag.value.clone(),
          });
        }
      }
      NamespaceKind::Open => {}
    }
  }
  Ok(issues)
}

// ─── Built-in vocabulary ─────────────────────────────────────────────────────

/// The default campaign vocabulary, used when configuration supplies
/// none.
pub fn builtin_specs() -> Vec<NamespaceSpec> {
  fn values(vs: &[&str]) -> Vec<String> {
    vs.iter().map(|v| v.to_string()).collect()
  }
  vec![
    NamespaceSpec {
      name:    "type".into(),
      kind:    NamespaceKind::Closed,
      values:  values(&[
        "npc", "pc", "location", "item", "faction", "quest", "event",
      ]),
      pattern: None,
    },
    NamespaceSpec {
      name:    "status".into(),
      kind:    NamespaceKind::Semi,
      values:  values(&["alive", "dead", "missing"]),
      pattern: None,
    },
    NamespaceSpec {
      name:    "session".into(),
      kind:    NamespaceKind::Open,
      values:  Vec::new(),
      pattern: Some(r"\d{4}-\d{2}-\d{2}".into()),
    },
    NamespaceSpec {
      name:    "location".into(),
      kind:    NamespaceKind::Open,
      values:  Vec::new(),
      pattern: None,
    },
    NamespaceSpec {
      name:    "terrain".into(),
      kind:    NamespaceKind::Open,
      values:  Vec::new(),
      pattern: None,
    },
  ]
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{normalize::normalize_tags, tags::parse_tags};

  fn codes(issues: &[TagIssue]) -> Vec<&'static str> {
    issues.iter().map(|i| i.code.as_str()).collect()
  }

  #[test]
  fn issue_order_follows_sorted_input() {
    let tags = normalize_tags(parse_tags(
      "@type:mountain @unknown:thing @session:2025-1-04",
    ));
    let issues =
      validate_tags(&tags, &builtin_specs(), &ValidateOptions::default())
        .unwrap();
    // Sorted namespaces: session, type, unknown.
    assert_eq!(
      codes(&issues),
      vec!["pattern-mismatch", "invalid-value", "unknown-namespace"]
    );
  }

  #[test]
  fn clean_tags_produce_no_issues() {
    let tags = normalize_tags(parse_tags("@type:NPC @status:Alive"));
    let issues =
      validate_tags(&tags, &builtin_specs(), &ValidateOptions::default())
        .unwrap();
    assert!(issues.is_empty());
  }

  #[test]
  fn unknown_namespace_severity_follows_strict_flag() {
    let tags = normalize_tags(parse_tags("@mystery:thing"));
    let lax =
      validate_tags(&tags, &builtin_specs(), &ValidateOptions::default())
        .unwrap();
    assert_eq!(lax[0].severity, Severity::Warn);

    let strict = validate_tags(&tags, &builtin_specs(), &ValidateOptions {
      strict_namespaces: true,
      ..Default::default()
    })
    .unwrap();
    assert_eq!(strict[0].severity, Severity::Error);
  }

  #[test]
  fn semi_namespace_accepts_custom_values() {
    let tags = normalize_tags(parse_tags("@status:petrified"));
    let without =
      validate_tags(&tags, &builtin_specs(), &ValidateOptions::default())
        .unwrap();
    assert_eq!(codes(&without), vec!["unregistered-value"]);
    assert_eq!(without[0].severity, Severity::Warn);

    let mut custom_values = HashMap::new();
    custom_values
      .insert("status".to_string(), vec!["petrified".to_string()]);
    let with = validate_tags(&tags, &builtin_specs(), &ValidateOptions {
      strict_namespaces: false,
      custom_values,
    })
    .unwrap();
    assert!(with.is_empty());
  }

  #[test]
  fn closed_namespace_with_pattern_emits_both_issues() {
    // A closed namespace that also declares a pattern surfaces both
    // problems for one malformed value; neither check short-circuits
    // the other.
    let specs = vec![NamespaceSpec {
      name:    "rank".into(),
      kind:    NamespaceKind::Closed,
      values:  vec!["s1".into(), "s2".into()],
      pattern: Some(r"s\d".into()),
    }];
    let tags = normalize_tags(parse_tags("@rank:gold"));
    let issues =
      validate_tags(&tags, &specs, &ValidateOptions::default()).unwrap();
    assert_eq!(codes(&issues), vec!["pattern-mismatch", "invalid-value"]);
  }

  #[test]
  fn invalid_pattern_is_a_hard_error() {
    let specs = vec![NamespaceSpec {
      name:    "broken".into(),
      kind:    NamespaceKind::Open,
      values:  Vec::new(),
      pattern: Some("(".into()),
    }];
    let tags = normalize_tags(parse_tags("@broken:x"));
    let err = validate_tags(&tags, &specs, &ValidateOptions::default());
    assert!(matches!(err, Err(Error::InvalidPattern { .. })));
  }
}
