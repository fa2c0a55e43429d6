//! Error types for the grimoire-transfer codec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The input is not JSON at all.
  #[error("invalid JSON file: {0}")]
  Parse(#[source] serde_json::Error),

  /// Well-formed JSON of the wrong shape. `position` is the offending array
  /// element, when there is one.
  #[error("invalid document{}: {reason}", entry_suffix(.position))]
  Invalid { position: Option<usize>, reason: String },

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),
}

fn entry_suffix(position: &Option<usize>) -> String {
  position.map(|p| format!(" (entry {p})")).unwrap_or_default()
}

impl Error {
  pub(crate) fn invalid(reason: impl Into<String>) -> Self {
    Self::Invalid { position: None, reason: reason.into() }
  }

  pub(crate) fn invalid_at(position: usize, reason: impl Into<String>) -> Self {
    Self::Invalid { position: Some(position), reason: reason.into() }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
