//! The `SheetStore` trait: the embedded document store behind the services.
//!
//! The trait is implemented by storage backends (e.g. `grimoire-store-sqlite`).
//! Services in `grimoire-service` depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{character::Character, settings::GlobalSetting, spell::Spell};

/// A keyed document store with three collections: `spells` (by index),
/// `characters` (by uuid) and `global_settings` (by key).
///
/// Writes replace the whole document under its key. Reads of a missing key
/// return `Ok(None)`, never an error.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait SheetStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Spells ────────────────────────────────────────────────────────────

  fn get_spell<'a>(
    &'a self,
    index: &'a str,
  ) -> impl Future<Output = Result<Option<Spell>, Self::Error>> + Send + 'a;

  /// All spells, ordered by index.
  fn list_spells(&self) -> impl Future<Output = Result<Vec<Spell>, Self::Error>> + Send + '_;

  /// Insert or replace each spell by index, atomically.
  fn put_spells(
    &self,
    spells: Vec<Spell>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Clear the collection and store `spells`, atomically.
  fn replace_spells(
    &self,
    spells: Vec<Spell>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Characters ────────────────────────────────────────────────────────

  fn get_character(
    &self,
    uuid: Uuid,
  ) -> impl Future<Output = Result<Option<Character>, Self::Error>> + Send + '_;

  /// All characters, in creation order.
  fn list_characters(
    &self,
  ) -> impl Future<Output = Result<Vec<Character>, Self::Error>> + Send + '_;

  /// Insert or replace a character by uuid.
  fn put_character(
    &self,
    character: Character,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete a character. Returns whether a record existed.
  fn delete_character(
    &self,
    uuid: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Settings ──────────────────────────────────────────────────────────

  fn get_setting<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<Option<GlobalSetting>, Self::Error>> + Send + 'a;

  fn put_setting(
    &self,
    setting: GlobalSetting,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
