//! Error types for `grimoire-core`.

use thiserror::Error;

use crate::character::CharacterClassName;

#[derive(Debug, Error)]
pub enum Error {
  #[error("spell level {0} is outside 0..=9")]
  InvalidSpellLevel(u8),

  #[error("cantrips (level 0) have no spell slots")]
  CantripLevel,

  #[error("level {level} already has the maximum of {ceiling} slots")]
  SlotCeiling { level: u8, ceiling: u8 },

  #[error("slot {ordinal} does not exist at level {level} ({available} available)")]
  SlotOutOfRange { level: u8, ordinal: u8, available: u8 },

  #[error("character name must not be empty")]
  EmptyName,

  #[error("a character needs at least one class")]
  NoClasses,

  #[error("class {0} is listed more than once")]
  DuplicateClass(CharacterClassName),

  #[error("class level must be positive for {0}")]
  InvalidClassLevel(CharacterClassName),

  #[error("unknown character class: {0:?}")]
  UnknownClass(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
