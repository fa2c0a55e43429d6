//! Character import and export.
//!
//! Import pipeline:
//!   raw &str
//!     └─ check_shape()   → key sets, class names, index arrays, slot rows
//!          └─ serde      → Character
//!               └─ normalise (dedup indices, complete slot table)

use grimoire_core::{
  character::{Character, parse_class_name},
  spell::MAX_SPELL_LEVEL,
};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{Error, Result};

const REQUIRED_KEYS: [&str; 6] = [
  "uuid",
  "name",
  "classes",
  "knownSpellIndices",
  "preparedSpellIndices",
  "spellSlots",
];

const OPTIONAL_KEYS: [&str; 1] = ["image"];

const CLASS_KEYS: [&str; 2] = ["name", "level"];

const SLOT_KEYS: [&str; 3] = ["level", "available", "used"];

// ─── Shape checks ────────────────────────────────────────────────────────────

fn check_keys(
  object: &Map<String, Value>,
  required: &[&str],
  optional: &[&str],
  what: &str,
) -> Result<()> {
  if let Some(missing) = required.iter().find(|k| !object.contains_key(**k)) {
    return Err(Error::invalid(format!("{what} is missing {missing:?}")));
  }
  if let Some(extra) = object
    .keys()
    .find(|k| !required.contains(&k.as_str()) && !optional.contains(&k.as_str()))
  {
    return Err(Error::invalid(format!("{what} has unexpected key {extra:?}")));
  }
  Ok(())
}

fn as_array<'a>(object: &'a Map<String, Value>, key: &str) -> Result<&'a Vec<Value>> {
  object
    .get(key)
    .and_then(Value::as_array)
    .ok_or_else(|| Error::invalid(format!("{key:?} must be an array")))
}

fn as_object<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>> {
  value
    .as_object()
    .ok_or_else(|| Error::invalid(format!("{what} must be an object")))
}

fn check_classes(classes: &[Value]) -> Result<()> {
  if classes.is_empty() {
    return Err(Error::invalid("a character needs at least one class"));
  }
  for class in classes {
    let class = as_object(class, "class")?;
    check_keys(class, &CLASS_KEYS, &[], "class")?;
    let name = class
      .get("name")
      .and_then(Value::as_str)
      .ok_or_else(|| Error::invalid("class name must be a string"))?;
    parse_class_name(name).map_err(|e| Error::invalid(e.to_string()))?;
    if !class.get("level").is_some_and(Value::is_u64) {
      return Err(Error::invalid(format!("level of class {name} must be a number")));
    }
  }
  Ok(())
}

fn check_indices(object: &Map<String, Value>, key: &str) -> Result<()> {
  if !as_array(object, key)?.iter().all(Value::is_string) {
    return Err(Error::invalid(format!("{key:?} must contain only strings")));
  }
  Ok(())
}

fn check_slots(rows: &[Value]) -> Result<()> {
  let mut seen = [false; MAX_SPELL_LEVEL as usize + 1];
  for row in rows {
    let row = as_object(row, "spell slot")?;
    check_keys(row, &SLOT_KEYS, &[], "spell slot")?;
    if !SLOT_KEYS.iter().all(|k| row.get(*k).is_some_and(Value::is_u64)) {
      return Err(Error::invalid("spell slot fields must be non-negative numbers"));
    }
    let level = row.get("level").and_then(Value::as_u64).unwrap_or(u64::MAX);
    if level > u64::from(MAX_SPELL_LEVEL) {
      return Err(Error::invalid(format!("spell slot level {level} is outside 0..=9")));
    }
    if std::mem::replace(&mut seen[level as usize], true) {
      return Err(Error::invalid(format!("spell slot level {level} appears twice")));
    }
  }
  Ok(())
}

fn check_shape(value: &Value) -> Result<()> {
  let object = as_object(value, "character")?;
  check_keys(object, &REQUIRED_KEYS, &OPTIONAL_KEYS, "character")?;

  let Some(uuid) = object.get("uuid").and_then(Value::as_str) else {
    return Err(Error::invalid("\"uuid\" must be a string"));
  };
  if let Err(e) = Uuid::parse_str(uuid) {
    return Err(Error::invalid(format!("\"uuid\" is not a UUID: {e}")));
  }
  if !object.get("name").is_some_and(Value::is_string) {
    return Err(Error::invalid("\"name\" must be a string"));
  }
  if let Some(image) = object.get("image")
    && !(image.is_string() || image.is_null())
  {
    return Err(Error::invalid("\"image\" must be a string"));
  }

  check_classes(as_array(object, "classes")?)?;
  check_indices(object, "knownSpellIndices")?;
  check_indices(object, "preparedSpellIndices")?;
  check_slots(as_array(object, "spellSlots")?)
}

// ─── Public API ──────────────────────────────────────────────────────────────

/// Parse and strictly validate an exported character.
pub fn import_character(input: &str) -> Result<Character> {
  let value: Value = serde_json::from_str(input).map_err(Error::Parse)?;
  check_shape(&value)?;

  let character: Character =
    serde_json::from_value(value).map_err(|e| Error::invalid(e.to_string()))?;
  character.validate().map_err(|e| Error::invalid(e.to_string()))?;
  Ok(character)
}

/// Serialise a character as pretty-printed JSON.
pub fn export_character(character: &Character) -> Result<String> {
  Ok(serde_json::to_string_pretty(character)?)
}
