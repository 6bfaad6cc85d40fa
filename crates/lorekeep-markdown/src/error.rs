//! Error type for `lorekeep-markdown`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A namespace spec carries a pattern that is not a valid regex.
  /// This is a configuration error, not a tag-validation issue.
  #[error("invalid pattern for namespace {namespace:?}: {source}")]
  InvalidPattern {
    namespace: String,
    source:    regex::Error,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
