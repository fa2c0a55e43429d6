//! Character: the mutable aggregate root of a sheet.
//!
//! A character is never modified in place once shared. Every mutation
//! (`toggle_known`, `with_spell_slots`, …) returns a fresh value that the
//! caller persists by replacing the stored record under the same `uuid`.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::{Error, Result, slots::SpellSlots};

// ─── Classes ─────────────────────────────────────────────────────────────────

/// The spellcasting classes a character can take levels in.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  AsRefStr,
)]
pub enum CharacterClassName {
  Bard,
  Cleric,
  Druid,
  Paladin,
  Ranger,
  Sorcerer,
  Warlock,
  Wizard,
}

/// A class and the number of levels taken in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterClass {
  pub name:  CharacterClassName,
  pub level: u32,
}

impl CharacterClass {
  pub fn new(name: CharacterClassName, level: u32) -> Self { Self { name, level } }
}

// ─── Character ───────────────────────────────────────────────────────────────

/// A player character. The serialised form uses the camelCase keys of the
/// exported `character.json` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
  pub uuid:                   Uuid,
  pub name:                   String,
  pub classes:                Vec<CharacterClass>,
  pub known_spell_indices:    IndexSet<String>,
  pub prepared_spell_indices: IndexSet<String>,
  pub spell_slots:            SpellSlots,
  /// Base64 data-URL thumbnail; decorative only.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image:                  Option<String>,
}

impl Character {
  /// A fresh character with a random UUID, no known or prepared spells and
  /// an all-zero slot table.
  pub fn new(name: impl Into<String>, classes: Vec<CharacterClass>) -> Result<Self> {
    let character = Self {
      uuid: Uuid::new_v4(),
      name: name.into().trim().to_owned(),
      classes,
      known_spell_indices: IndexSet::new(),
      prepared_spell_indices: IndexSet::new(),
      spell_slots: SpellSlots::default(),
      image: None,
    };
    character.validate()?;
    Ok(character)
  }

  /// Check the structural invariants: non-empty name, at least one class,
  /// unique class names, positive class levels.
  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::EmptyName);
    }
    validate_classes(&self.classes)
  }

  pub fn class_names(&self) -> impl Iterator<Item = CharacterClassName> + '_ {
    self.classes.iter().map(|c| c.name)
  }

  pub fn knows(&self, index: &str) -> bool { self.known_spell_indices.contains(index) }

  pub fn has_prepared(&self, index: &str) -> bool {
    self.prepared_spell_indices.contains(index)
  }

  // ── Copy-on-write mutations ───────────────────────────────────────────────

  /// Flip the known state of a spell.
  ///
  /// Forgetting a spell also unprepares it. Learning a spell leaves the
  /// prepared set alone.
  pub fn toggle_known(&self, index: &str) -> Self {
    let mut next = self.clone();
    if next.known_spell_indices.shift_remove(index) {
      next.prepared_spell_indices.shift_remove(index);
    } else {
      next.known_spell_indices.insert(index.to_owned());
    }
    next
  }

  /// Flip the prepared state of a spell. Never touches the known set, so a
  /// spell can be prepared without being known.
  pub fn toggle_prepared(&self, index: &str) -> Self {
    let mut next = self.clone();
    if !next.prepared_spell_indices.shift_remove(index) {
      next.prepared_spell_indices.insert(index.to_owned());
    }
    next
  }

  pub fn with_spell_slots(&self, spell_slots: SpellSlots) -> Self {
    Self { spell_slots, ..self.clone() }
  }

  pub fn renamed(&self, name: &str) -> Result<Self> {
    let name = name.trim();
    if name.is_empty() {
      return Err(Error::EmptyName);
    }
    Ok(Self { name: name.to_owned(), ..self.clone() })
  }

  pub fn with_image(&self, image: Option<String>) -> Self {
    Self { image, ..self.clone() }
  }
}

/// Classes must be non-empty, unique by name and have positive levels.
pub fn validate_classes(classes: &[CharacterClass]) -> Result<()> {
  if classes.is_empty() {
    return Err(Error::NoClasses);
  }
  for (i, class) in classes.iter().enumerate() {
    if class.level == 0 {
      return Err(Error::InvalidClassLevel(class.name));
    }
    if classes[..i].iter().any(|c| c.name == class.name) {
      return Err(Error::DuplicateClass(class.name));
    }
  }
  Ok(())
}

/// Parse a class name exactly as it appears in exported documents.
pub fn parse_class_name(s: &str) -> Result<CharacterClassName> {
  s.parse().map_err(|_| Error::UnknownClass(s.to_owned()))
}

#[cfg(test)]
pub(crate) mod test_helpers {
  use super::*;

  pub fn character(classes: &[CharacterClassName]) -> Character {
    Character::new(
      "Elminster",
      classes.iter().map(|&name| CharacterClass::new(name, 1)).collect(),
    )
    .unwrap()
  }
}

#[cfg(test)]
mod tests {
  use super::{test_helpers::character, *};
  use CharacterClassName::*;

  #[test]
  fn new_character_is_blank() {
    let c = character(&[Wizard]);
    assert!(c.known_spell_indices.is_empty());
    assert!(c.prepared_spell_indices.is_empty());
    assert_eq!(c.spell_slots, SpellSlots::default());
    assert!(c.image.is_none());
  }

  #[test]
  fn new_character_rejects_bad_input() {
    assert!(matches!(
      Character::new("  ", vec![CharacterClass::new(Wizard, 1)]),
      Err(Error::EmptyName)
    ));
    assert!(matches!(Character::new("Mordenkainen", vec![]), Err(Error::NoClasses)));
    assert!(matches!(
      Character::new(
        "Mordenkainen",
        vec![CharacterClass::new(Wizard, 3), CharacterClass::new(Wizard, 2)]
      ),
      Err(Error::DuplicateClass(Wizard))
    ));
    assert!(matches!(
      Character::new("Mordenkainen", vec![CharacterClass::new(Cleric, 0)]),
      Err(Error::InvalidClassLevel(Cleric))
    ));
  }

  #[test]
  fn forgetting_a_spell_also_unprepares_it() {
    let c = character(&[Wizard])
      .toggle_known("fireball")
      .toggle_prepared("fireball");
    assert!(c.knows("fireball") && c.has_prepared("fireball"));

    let c = c.toggle_known("fireball");
    assert!(!c.knows("fireball"));
    assert!(!c.has_prepared("fireball"));
  }

  #[test]
  fn toggling_prepared_never_changes_known() {
    let base = character(&[Wizard]).toggle_known("shield");
    let prepared = base.toggle_prepared("shield");
    assert_eq!(prepared.known_spell_indices, base.known_spell_indices);
    let unprepared = prepared.toggle_prepared("shield");
    assert_eq!(unprepared.known_spell_indices, base.known_spell_indices);
    assert!(!unprepared.has_prepared("shield"));
  }

  #[test]
  fn prepared_without_known_is_permitted() {
    let c = character(&[Cleric]).toggle_prepared("bless");
    assert!(c.has_prepared("bless"));
    assert!(!c.knows("bless"));
  }

  #[test]
  fn toggles_do_not_mutate_the_original() {
    let c = character(&[Bard]);
    let _ = c.toggle_known("vicious-mockery");
    assert!(c.known_spell_indices.is_empty());
  }

  #[test]
  fn serialises_with_document_keys() {
    let c = character(&[Druid]).toggle_known("entangle");
    let json = serde_json::to_value(&c).unwrap();
    assert_eq!(json["knownSpellIndices"], serde_json::json!(["entangle"]));
    assert_eq!(json["preparedSpellIndices"], serde_json::json!([]));
    assert_eq!(json["classes"][0]["name"], "Druid");
    assert_eq!(json["spellSlots"].as_array().unwrap().len(), 10);
    assert!(json.get("image").is_none());
  }

  #[test]
  fn duplicate_indices_collapse_on_load() {
    let c = character(&[Sorcerer]);
    let mut json = serde_json::to_value(&c).unwrap();
    json["knownSpellIndices"] = serde_json::json!(["light", "light", "shield"]);
    let loaded: Character = serde_json::from_value(json).unwrap();
    assert_eq!(loaded.known_spell_indices.len(), 2);
  }

  #[test]
  fn class_names_parse_exactly() {
    assert_eq!(parse_class_name("Warlock").unwrap(), Warlock);
    assert!(matches!(parse_class_name("warlock"), Err(Error::UnknownClass(_))));
    assert!(matches!(parse_class_name("Fighter"), Err(Error::UnknownClass(_))));
  }
}
