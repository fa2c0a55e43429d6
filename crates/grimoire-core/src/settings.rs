//! Cross-character preferences stored in the `global_settings` collection.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// A raw `{key, value}` pair as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSetting {
  pub key:   String,
  pub value: String,
}

/// The keys the application understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "camelCase")]
pub enum SettingKey {
  ColorTheme,
  PrimaryTheme,
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ColorTheme {
  #[default]
  Light,
  Dark,
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum PrimaryTheme {
  #[default]
  Blue,
  Purple,
  Red,
  Green,
  Pink,
  Indigo,
  Teal,
  Amber,
  DeepPurple,
}
