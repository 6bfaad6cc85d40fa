//! Error type for `lorekeep-engine`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("document not found: {0}")]
  DocNotFound(Uuid),

  #[error("folder not found: {0}")]
  FolderNotFound(Uuid),

  /// A backend failure, boxed so the engine stays generic over the
  /// store's error type.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
