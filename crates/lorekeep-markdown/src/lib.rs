//! Markdown annotation parsing for Lorekeep.
//!
//! This crate extracts the semantic annotations a wiki body carries —
//! namespaced tags and wiki-links — and validates tags against a
//! namespace vocabulary. It never touches storage; everything here is
//! a pure function over strings.
//!
//! Pipeline:
//!   raw markdown &str
//!     ├─ parse_tags()      → Vec<ParsedTag>   (document order)
//!     │    └─ normalize_tags() → deduped, sorted
//!     │         └─ validate_tags() → Vec<TagIssue>
//!     └─ parse_links()     → Vec<ParsedLink>  (deduped by target)

pub mod error;
pub mod links;
pub mod normalize;
pub mod tags;
pub mod validate;

pub use error::{Error, Result};
pub use links::{LinkTarget, ParsedLink, parse_links};
pub use normalize::normalize_tags;
pub use tags::{ParsedTag, TagSource, parse_tags};
pub use validate::{
  IssueCode, NamespaceKind, NamespaceSpec, Severity, TagIssue,
  ValidateOptions, builtin_specs, validate_tags,
};
