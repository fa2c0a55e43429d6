//! [`CharacterService`]: the write path for characters.
//!
//! Every edit is a read-modify-write against storage, serialised per
//! character UUID. After each write the service re-reads the collection and
//! publishes it, together with the per-record streams handed out by
//! [`CharacterService::subscribe`]. Refreshes run one at a time, so the last
//! snapshot published is never older than the last write.

use std::{collections::HashMap, sync::Arc};

use grimoire_core::{
  character::{Character, CharacterClass},
  store::SheetStore,
};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  error::storage,
  published::{Published, Subscription},
};

pub struct CharacterService<S> {
  store:   Arc<S>,
  all:     Published<Vec<Character>>,
  records: Mutex<HashMap<Uuid, Published<Option<Character>>>>,
  locks:   Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
  publish: Mutex<()>,
}

impl<S: SheetStore> CharacterService<S> {
  /// Build the service and publish the stored collection.
  pub async fn open(store: Arc<S>) -> Result<Self> {
    let service = Self {
      store,
      all: Published::new(Vec::new()),
      records: Mutex::new(HashMap::new()),
      locks: Mutex::new(HashMap::new()),
      publish: Mutex::new(()),
    };
    service.refresh().await?;
    Ok(service)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// The stored record, or `None` if there is none.
  pub async fn get_by_uuid(&self, uuid: Uuid) -> Result<Option<Character>> {
    self.store.get_character(uuid).await.map_err(storage)
  }

  /// The last published collection.
  pub fn snapshot(&self) -> Vec<Character> { self.all.current() }

  pub fn subscribe_all(&self) -> Subscription<Vec<Character>> { self.all.subscribe() }

  /// A stream of one record; `None` while no such character exists.
  pub async fn subscribe(&self, uuid: Uuid) -> Subscription<Option<Character>> {
    let mut records = self.records.lock().await;
    records
      .entry(uuid)
      .or_insert_with(|| {
        let current = self.all.current().into_iter().find(|c| c.uuid == uuid);
        Published::new(current)
      })
      .subscribe()
  }

  // ── Whole-record writes ───────────────────────────────────────────────────

  /// Insert or replace a character by UUID.
  pub async fn upsert(&self, character: Character) -> Result<()> {
    character.validate()?;
    let lock = self.lock_for(character.uuid).await;
    let _guard = lock.lock().await;
    self.persist(character).await
  }

  /// Create and store a fresh character.
  pub async fn create(
    &self,
    name: &str,
    classes: Vec<CharacterClass>,
  ) -> Result<Character> {
    let character = Character::new(name, classes)?;
    self.upsert(character.clone()).await?;
    Ok(character)
  }

  /// Delete a character. Returns whether it existed.
  pub async fn remove(&self, uuid: Uuid) -> Result<bool> {
    let lock = self.lock_for(uuid).await;
    let _guard = lock.lock().await;
    match self.store.delete_character(uuid).await {
      Ok(existed) => {
        self.refresh().await?;
        Ok(existed)
      }
      Err(e) => {
        warn!(%uuid, error = %e, "failed to delete character");
        self.refresh_after_failure().await;
        Err(storage(e))
      }
    }
  }

  // ── Read-modify-write ─────────────────────────────────────────────────────

  /// Apply `f` to the stored record and persist the result.
  ///
  /// The record is read from storage while holding the character's lock, so
  /// concurrent mutations of one character apply one after another. An
  /// unchanged result is not written.
  pub async fn mutate<F>(&self, uuid: Uuid, f: F) -> Result<Character>
  where
    F: FnOnce(&Character) -> grimoire_core::Result<Character>,
  {
    let lock = self.lock_for(uuid).await;
    let _guard = lock.lock().await;

    let current = self
      .store
      .get_character(uuid)
      .await
      .map_err(storage)?
      .ok_or(Error::CharacterNotFound(uuid))?;

    let next = Character { uuid, ..f(&current)? };
    if next != current {
      self.persist(next.clone()).await?;
    }
    Ok(next)
  }

  pub async fn toggle_known(&self, uuid: Uuid, index: &str) -> Result<Character> {
    self.mutate(uuid, |c| Ok(c.toggle_known(index))).await
  }

  pub async fn toggle_prepared(&self, uuid: Uuid, index: &str) -> Result<Character> {
    self.mutate(uuid, |c| Ok(c.toggle_prepared(index))).await
  }

  pub async fn add_slot(&self, uuid: Uuid, level: u8) -> Result<Character> {
    self
      .mutate(uuid, |c| Ok(c.with_spell_slots(c.spell_slots.add_slot(level)?)))
      .await
  }

  pub async fn remove_slot(&self, uuid: Uuid, level: u8) -> Result<Character> {
    self
      .mutate(uuid, |c| Ok(c.with_spell_slots(c.spell_slots.remove_slot(level)?)))
      .await
  }

  pub async fn toggle_slot(
    &self,
    uuid: Uuid,
    level: u8,
    ordinal: u8,
    checked: bool,
  ) -> Result<Character> {
    self
      .mutate(uuid, |c| {
        Ok(c.with_spell_slots(c.spell_slots.toggle_slot(level, ordinal, checked)?))
      })
      .await
  }

  pub async fn spend_slot(&self, uuid: Uuid, level: u8) -> Result<Character> {
    self
      .mutate(uuid, |c| Ok(c.with_spell_slots(c.spell_slots.spend_slot(level)?)))
      .await
  }

  pub async fn long_rest(&self, uuid: Uuid) -> Result<Character> {
    self
      .mutate(uuid, |c| Ok(c.with_spell_slots(c.spell_slots.long_rest())))
      .await
  }

  /// Zero every slot level at or above the highest populated one. Returns
  /// the updated character and the reduced maximum level.
  pub async fn drop_levels_from_max(&self, uuid: Uuid) -> Result<(Character, u8)> {
    let mut new_max = 0;
    let character = self
      .mutate(uuid, |c| {
        let (slots, max) = c.spell_slots.drop_levels_from(c.spell_slots.max_level())?;
        new_max = max;
        Ok(c.with_spell_slots(slots))
      })
      .await?;
    Ok((character, new_max))
  }

  pub async fn rename(&self, uuid: Uuid, name: &str) -> Result<Character> {
    self.mutate(uuid, |c| c.renamed(name)).await
  }

  pub async fn set_image(&self, uuid: Uuid, image: Option<String>) -> Result<Character> {
    self.mutate(uuid, |c| Ok(c.with_image(image))).await
  }

  // ── Publication ───────────────────────────────────────────────────────────

  /// Re-read every character from storage and publish.
  pub async fn refresh(&self) -> Result<()> {
    let _publishing = self.publish.lock().await;
    let characters = self.store.list_characters().await.map_err(storage)?;

    let mut records = self.records.lock().await;
    records.retain(|_, record| record.has_subscribers());
    for (uuid, record) in records.iter() {
      record.publish(characters.iter().find(|c| c.uuid == *uuid).cloned());
    }
    drop(records);

    debug!(count = characters.len(), "published characters");
    self.all.publish(characters);
    Ok(())
  }

  async fn persist(&self, character: Character) -> Result<()> {
    let uuid = character.uuid;
    if let Err(e) = self.store.put_character(character).await {
      warn!(%uuid, error = %e, "failed to persist character");
      self.refresh_after_failure().await;
      return Err(storage(e));
    }
    self.refresh().await
  }

  async fn refresh_after_failure(&self) {
    if let Err(e) = self.refresh().await {
      warn!(error = %e, "refresh after failed write also failed");
    }
  }

  /// The edit lock for `uuid`. Locks nobody holds or waits on are dropped.
  async fn lock_for(&self, uuid: Uuid) -> Arc<Mutex<()>> {
    let mut locks = self.locks.lock().await;
    locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    locks.entry(uuid).or_default().clone()
  }

  #[cfg(test)]
  async fn tracked_locks(&self) -> usize { self.locks.lock().await.len() }
}
