//! Spell types: the immutable entries of the reference catalog.
//!
//! Spells are created only by import and never edited in place. The catalog
//! is keyed by [`Spell::index`].

use serde::{Deserialize, Serialize};

use crate::{Error, Result, character::CharacterClassName};

/// Highest spell level; level 0 is a cantrip.
pub const MAX_SPELL_LEVEL: u8 = 9;

/// Check that `level` lies in `0..=MAX_SPELL_LEVEL`.
pub fn check_level(level: u8) -> Result<u8> {
  if level > MAX_SPELL_LEVEL {
    return Err(Error::InvalidSpellLevel(level));
  }
  Ok(level)
}

// ─── Components ──────────────────────────────────────────────────────────────

/// A casting component. Serialised as the single-letter abbreviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpellComponent {
  #[serde(rename = "V")]
  Verbal,
  #[serde(rename = "S")]
  Somatic,
  #[serde(rename = "M")]
  Material,
}

// ─── Spell ───────────────────────────────────────────────────────────────────

/// A catalog spell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spell {
  /// Stable unique identifier, e.g. `"fireball"`.
  pub index:         String,
  pub name:          String,
  pub desc:          Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub higher_level:  Option<Vec<String>>,
  pub range:         String,
  pub components:    Vec<SpellComponent>,
  /// Only meaningful when [`SpellComponent::Material`] is present.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub material:      Option<String>,
  pub concentration: bool,
  pub ritual:        bool,
  pub duration:      String,
  pub casting_time:  String,
  pub level:         u8,
  pub school:        String,
  /// Names of the classes with access to this spell.
  pub classes:       Vec<String>,
  #[serde(default)]
  pub subclasses:    Vec<String>,
}

impl Spell {
  pub fn is_cantrip(&self) -> bool { self.level == 0 }

  pub fn has_component(&self, component: SpellComponent) -> bool {
    self.components.contains(&component)
  }

  /// Whether any of `classes` can access this spell.
  pub fn available_to<I>(&self, classes: I) -> bool
  where
    I: IntoIterator<Item = CharacterClassName>,
  {
    classes
      .into_iter()
      .any(|class| self.classes.iter().any(|c| c == class.as_ref()))
  }

  /// Case-insensitive substring match over the full JSON form of the spell.
  ///
  /// Not field-targeted: a needle may match key names as well as values.
  /// An absent `higher_level` or `material` is left out of the JSON form, so
  /// its key name matches nothing.
  pub fn matches_text(&self, needle: &str) -> Result<bool> {
    if needle.is_empty() {
      return Ok(true);
    }
    let haystack = serde_json::to_string(self)?.to_lowercase();
    Ok(haystack.contains(&needle.to_lowercase()))
  }
}

#[cfg(test)]
pub(crate) mod test_helpers {
  use super::*;

  pub fn spell(index: &str, level: u8, classes: &[&str]) -> Spell {
    Spell {
      index:         index.into(),
      name:          index.replace('-', " "),
      desc:          vec![format!("The {index} spell.")],
      higher_level:  None,
      range:         "60 feet".into(),
      components:    vec![SpellComponent::Verbal, SpellComponent::Somatic],
      material:      None,
      concentration: false,
      ritual:        false,
      duration:      "Instantaneous".into(),
      casting_time:  "1 action".into(),
      level,
      school:        "Evocation".into(),
      classes:       classes.iter().map(|c| (*c).to_owned()).collect(),
      subclasses:    Vec::new(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::{test_helpers::spell, *};

  #[test]
  fn components_use_letter_abbreviations() {
    let json = serde_json::to_string(&vec![
      SpellComponent::Verbal,
      SpellComponent::Somatic,
      SpellComponent::Material,
    ])
    .unwrap();
    assert_eq!(json, r#"["V","S","M"]"#);
  }

  #[test]
  fn text_match_ignores_case_and_field() {
    let s = spell("fireball", 3, &["Wizard", "Sorcerer"]);
    assert!(s.matches_text("FIRE").unwrap());
    assert!(s.matches_text("sorcerer").unwrap());
    assert!(s.matches_text("instantaneous").unwrap());
    assert!(!s.matches_text("necromancy").unwrap());
  }

  #[test]
  fn absent_optional_fields_are_not_searched() {
    let mut s = spell("light", 0, &["Wizard"]);
    assert!(s.matches_text("casting_time").unwrap());
    assert!(!s.matches_text("material").unwrap());
    assert!(!s.matches_text("higher_level").unwrap());

    s.material = Some("A firefly".into());
    assert!(s.matches_text("material").unwrap());
    assert!(s.matches_text("firefly").unwrap());
  }

  #[test]
  fn availability_checks_class_names() {
    let s = spell("cure-wounds", 1, &["Cleric", "Druid"]);
    assert!(s.available_to([CharacterClassName::Wizard, CharacterClassName::Druid]));
    assert!(!s.available_to([CharacterClassName::Wizard]));
  }

  #[test]
  fn level_bounds() {
    assert!(check_level(9).is_ok());
    assert!(matches!(check_level(10), Err(Error::InvalidSpellLevel(10))));
  }
}
