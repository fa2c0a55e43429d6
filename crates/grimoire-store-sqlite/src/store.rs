//! [`SqliteStore`]: the SQLite implementation of [`SheetStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use grimoire_core::{
  character::Character, settings::GlobalSetting, spell::Spell, store::SheetStore,
};

use crate::{
  Result,
  encode::{CharacterRow, RawCharacter, RawSpell, SpellRow, encode_dt, encode_uuid},
  schema::SCHEMA,
};

const UPSERT_SPELL: &str = "
  INSERT INTO spells (spell_index, name, level, document)
  VALUES (?1, ?2, ?3, ?4)
  ON CONFLICT(spell_index) DO UPDATE SET
    name     = excluded.name,
    level    = excluded.level,
    document = excluded.document";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Grimoire document store backed by a single SQLite file.
///
/// Cloning is cheap - the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store - useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Write `spells` in one transaction, optionally clearing the table first.
  async fn write_spells(&self, spells: Vec<Spell>, clear: bool) -> Result<()> {
    let rows = spells
      .iter()
      .map(SpellRow::encode)
      .collect::<Result<Vec<_>>>()?;

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if clear {
          tx.execute("DELETE FROM spells", [])?;
        }
        {
          let mut stmt = tx.prepare(UPSERT_SPELL)?;
          for row in &rows {
            stmt.execute(rusqlite::params![
              row.spell_index,
              row.name,
              row.level,
              row.document,
            ])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── SheetStore impl ─────────────────────────────────────────────────────────

impl SheetStore for SqliteStore {
  type Error = crate::Error;

  // ── Spells ────────────────────────────────────────────────────────────────

  async fn get_spell(&self, index: &str) -> Result<Option<Spell>> {
    let index = index.to_owned();

    let raw: Option<RawSpell> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT spell_index, document FROM spells WHERE spell_index = ?1",
              rusqlite::params![index],
              |row| {
                Ok(RawSpell {
                  spell_index: row.get(0)?,
                  document:    row.get(1)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSpell::into_spell).transpose()
  }

  async fn list_spells(&self) -> Result<Vec<Spell>> {
    let raws: Vec<RawSpell> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT spell_index, document FROM spells ORDER BY spell_index")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawSpell {
              spell_index: row.get(0)?,
              document:    row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSpell::into_spell).collect()
  }

  async fn put_spells(&self, spells: Vec<Spell>) -> Result<()> {
    self.write_spells(spells, false).await
  }

  async fn replace_spells(&self, spells: Vec<Spell>) -> Result<()> {
    self.write_spells(spells, true).await
  }

  // ── Characters ────────────────────────────────────────────────────────────

  async fn get_character(&self, uuid: Uuid) -> Result<Option<Character>> {
    let id_str = encode_uuid(uuid);

    let raw: Option<RawCharacter> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT uuid, document FROM characters WHERE uuid = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawCharacter {
                  uuid:     row.get(0)?,
                  document: row.get(1)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCharacter::into_character).transpose()
  }

  async fn list_characters(&self) -> Result<Vec<Character>> {
    let raws: Vec<RawCharacter> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT uuid, document FROM characters ORDER BY created_at, rowid",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawCharacter {
              uuid:     row.get(0)?,
              document: row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCharacter::into_character).collect()
  }

  async fn put_character(&self, character: Character) -> Result<()> {
    let row = CharacterRow::encode(&character)?;
    let now = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO characters (uuid, name, document, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?4)
           ON CONFLICT(uuid) DO UPDATE SET
             name       = excluded.name,
             document   = excluded.document,
             updated_at = excluded.updated_at",
          rusqlite::params![row.uuid, row.name, row.document, now],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete_character(&self, uuid: Uuid) -> Result<bool> {
    let id_str = encode_uuid(uuid);

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM characters WHERE uuid = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;
    Ok(deleted > 0)
  }

  // ── Settings ──────────────────────────────────────────────────────────────

  async fn get_setting(&self, key: &str) -> Result<Option<GlobalSetting>> {
    let key = key.to_owned();

    let setting = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT key, value FROM global_settings WHERE key = ?1",
              rusqlite::params![key],
              |row| {
                Ok(GlobalSetting {
                  key:   row.get(0)?,
                  value: row.get(1)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;
    Ok(setting)
  }

  async fn put_setting(&self, setting: GlobalSetting) -> Result<()> {
    let now = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO global_settings (key, value, updated_at) VALUES (?1, ?2, ?3)
           ON CONFLICT(key) DO UPDATE SET
             value      = excluded.value,
             updated_at = excluded.updated_at",
          rusqlite::params![setting.key, setting.value, now],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
