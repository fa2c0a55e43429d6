//! Error type for `grimoire-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  /// A stored row whose key column disagrees with its document.
  #[error("corrupt row {key:?}: {reason}")]
  CorruptRow { key: String, reason: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
