//! Service error type.

use thiserror::Error;
use uuid::Uuid;

/// An error returned by a service operation.
#[derive(Debug, Error)]
pub enum Error {
  /// The backing store failed; published state was refreshed from storage.
  #[error("storage unavailable: {0}")]
  StorageUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// A mutation rejected by the domain rules.
  #[error(transparent)]
  Core(#[from] grimoire_core::Error),

  #[error("character not found: {0}")]
  CharacterNotFound(Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) fn storage<E>(err: E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  Error::StorageUnavailable(Box::new(err))
}
