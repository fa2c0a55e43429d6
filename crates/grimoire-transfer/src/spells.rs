//! Spell catalog import and export.
//!
//! Two input shapes are accepted per entry and may be mixed in one file:
//! the flat export shape (`"classes": ["Wizard"]`, `"school": "Evocation"`)
//! and the reference-data shape where `classes`, `subclasses` and `school`
//! are `{ "index": …, "name": … }` objects. Both normalise to plain names.
//! Unknown fields are dropped.

use std::collections::HashSet;

use grimoire_core::spell::{MAX_SPELL_LEVEL, Spell, SpellComponent};
use serde::Deserialize;

use crate::{Error, Result};

// ─── Input shape ─────────────────────────────────────────────────────────────

/// A name given either directly or as a reference object.
#[derive(Deserialize)]
#[serde(untagged)]
enum NameRef {
  Plain(String),
  Reference { name: String },
}

impl NameRef {
  fn into_name(self) -> String {
    match self {
      Self::Plain(name) | Self::Reference { name } => name,
    }
  }
}

#[derive(Deserialize)]
struct SpellEntry {
  index:         String,
  name:          String,
  desc:          Vec<String>,
  #[serde(default)]
  higher_level:  Option<Vec<String>>,
  range:         String,
  components:    Vec<SpellComponent>,
  #[serde(default)]
  material:      Option<String>,
  concentration: bool,
  ritual:        bool,
  duration:      String,
  casting_time:  String,
  level:         u8,
  school:        NameRef,
  classes:       Vec<NameRef>,
  #[serde(default)]
  subclasses:    Vec<NameRef>,
}

impl SpellEntry {
  fn into_spell(self) -> Spell {
    let material = if self.components.contains(&SpellComponent::Material) {
      self.material
    } else {
      None
    };
    Spell {
      index: self.index,
      name: self.name,
      desc: self.desc,
      higher_level: self.higher_level.filter(|blocks| !blocks.is_empty()),
      range: self.range,
      components: self.components,
      material,
      concentration: self.concentration,
      ritual: self.ritual,
      duration: self.duration,
      casting_time: self.casting_time,
      level: self.level,
      school: self.school.into_name(),
      classes: self.classes.into_iter().map(NameRef::into_name).collect(),
      subclasses: self.subclasses.into_iter().map(NameRef::into_name).collect(),
    }
  }
}

// ─── Public API ──────────────────────────────────────────────────────────────

/// Parse and validate a spell catalog.
///
/// Rejects the whole batch if any entry is missing a required field, has an
/// empty `index`, a level above 9, or repeats an index seen earlier.
pub fn import_spells(input: &str) -> Result<Vec<Spell>> {
  let value: serde_json::Value = serde_json::from_str(input).map_err(Error::Parse)?;
  let entries = match value {
    serde_json::Value::Array(entries) => entries,
    _ => return Err(Error::invalid("expected a JSON array of spells")),
  };

  let mut seen = HashSet::with_capacity(entries.len());
  let mut spells = Vec::with_capacity(entries.len());

  for (position, entry) in entries.into_iter().enumerate() {
    let entry: SpellEntry = serde_json::from_value(entry)
      .map_err(|e| Error::invalid_at(position, e.to_string()))?;

    if entry.index.trim().is_empty() {
      return Err(Error::invalid_at(position, "spell index must not be empty"));
    }
    if entry.level > MAX_SPELL_LEVEL {
      return Err(Error::invalid_at(
        position,
        format!("spell level {} is outside 0..={MAX_SPELL_LEVEL}", entry.level),
      ));
    }
    if !seen.insert(entry.index.clone()) {
      return Err(Error::invalid_at(
        position,
        format!("duplicate spell index {:?}", entry.index),
      ));
    }

    spells.push(entry.into_spell());
  }

  Ok(spells)
}

/// Serialise a catalog as pretty-printed JSON in the flat shape.
pub fn export_spells(spells: &[Spell]) -> Result<String> {
  Ok(serde_json::to_string_pretty(spells)?)
}
