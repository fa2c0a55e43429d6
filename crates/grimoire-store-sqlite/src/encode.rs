//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Documents are stored as compact JSON. Timestamps are RFC 3339 strings with
//! nanosecond precision and UUIDs hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use grimoire_core::{character::Character, spell::Spell};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

/// Fixed-width so that text ordering matches time ordering.
pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

// ─── Spells ──────────────────────────────────────────────────────────────────

/// Column values for one `spells` row, encoded ahead of the database call.
pub struct SpellRow {
  pub spell_index: String,
  pub name:        String,
  pub level:       u8,
  pub document:    String,
}

impl SpellRow {
  pub fn encode(spell: &Spell) -> Result<Self> {
    Ok(Self {
      spell_index: spell.index.clone(),
      name:        spell.name.clone(),
      level:       spell.level,
      document:    serde_json::to_string(spell)?,
    })
  }
}

/// Raw strings read directly from a `spells` row.
pub struct RawSpell {
  pub spell_index: String,
  pub document:    String,
}

impl RawSpell {
  pub fn into_spell(self) -> Result<Spell> {
    let spell: Spell = serde_json::from_str(&self.document)?;
    if spell.index != self.spell_index {
      return Err(Error::CorruptRow {
        key:    self.spell_index,
        reason: format!("document index is {:?}", spell.index),
      });
    }
    Ok(spell)
  }
}

// ─── Characters ──────────────────────────────────────────────────────────────

/// Column values for one `characters` row.
pub struct CharacterRow {
  pub uuid:     String,
  pub name:     String,
  pub document: String,
}

impl CharacterRow {
  pub fn encode(character: &Character) -> Result<Self> {
    Ok(Self {
      uuid:     encode_uuid(character.uuid),
      name:     character.name.clone(),
      document: serde_json::to_string(character)?,
    })
  }
}

/// Raw strings read directly from a `characters` row.
pub struct RawCharacter {
  pub uuid:     String,
  pub document: String,
}

impl RawCharacter {
  pub fn into_character(self) -> Result<Character> {
    let key = decode_uuid(&self.uuid)?;
    let character: Character = serde_json::from_str(&self.document)?;
    if character.uuid != key {
      return Err(Error::CorruptRow {
        key:    self.uuid,
        reason: format!("document uuid is {}", character.uuid),
      });
    }
    Ok(character)
  }
}
