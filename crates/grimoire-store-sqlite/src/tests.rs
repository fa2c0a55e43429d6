//! Integration tests for `SqliteStore` against an in-memory database.

use grimoire_core::{
  character::{Character, CharacterClass, CharacterClassName},
  settings::GlobalSetting,
  slots::SpellSlots,
  spell::{Spell, SpellComponent},
  store::SheetStore,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn spell(index: &str, level: u8) -> Spell {
  Spell {
    index:         index.into(),
    name:          index.replace('-', " "),
    desc:          vec![format!("The {index} spell.")],
    higher_level:  None,
    range:         "Self".into(),
    components:    vec![SpellComponent::Verbal],
    material:      None,
    concentration: false,
    ritual:        false,
    duration:      "1 minute".into(),
    casting_time:  "1 action".into(),
    level,
    school:        "Abjuration".into(),
    classes:       vec!["Wizard".into()],
    subclasses:    Vec::new(),
  }
}

fn wizard(name: &str) -> Character {
  Character::new(name, vec![CharacterClass::new(CharacterClassName::Wizard, 3)])
    .unwrap()
}

// ─── Spells ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn put_and_get_spell() {
  let s = store().await;
  s.put_spells(vec![spell("shield", 1)]).await.unwrap();

  let fetched = s.get_spell("shield").await.unwrap().unwrap();
  assert_eq!(fetched, spell("shield", 1));
}

#[tokio::test]
async fn get_spell_missing_returns_none() {
  let s = store().await;
  assert!(s.get_spell("wish").await.unwrap().is_none());
}

#[tokio::test]
async fn list_spells_ordered_by_index() {
  let s = store().await;
  s.put_spells(vec![spell("shield", 1), spell("alarm", 1), spell("light", 0)])
    .await
    .unwrap();

  let indices: Vec<_> = s
    .list_spells()
    .await
    .unwrap()
    .into_iter()
    .map(|sp| sp.index)
    .collect();
  assert_eq!(indices, ["alarm", "light", "shield"]);
}

#[tokio::test]
async fn put_spells_upserts_by_index() {
  let s = store().await;
  s.put_spells(vec![spell("shield", 1), spell("light", 0)])
    .await
    .unwrap();

  let mut changed = spell("shield", 1);
  changed.ritual = true;
  s.put_spells(vec![changed.clone()]).await.unwrap();

  let all = s.list_spells().await.unwrap();
  assert_eq!(all.len(), 2);
  assert_eq!(s.get_spell("shield").await.unwrap(), Some(changed));
}

#[tokio::test]
async fn replace_spells_clears_previous_catalog() {
  let s = store().await;
  s.put_spells(vec![spell("shield", 1), spell("light", 0)])
    .await
    .unwrap();

  s.replace_spells(vec![spell("fireball", 3)]).await.unwrap();

  let all = s.list_spells().await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].index, "fireball");
}

#[tokio::test]
async fn replace_spells_with_empty_batch_empties_catalog() {
  let s = store().await;
  s.put_spells(vec![spell("shield", 1)]).await.unwrap();
  s.replace_spells(Vec::new()).await.unwrap();
  assert!(s.list_spells().await.unwrap().is_empty());
}

#[tokio::test]
async fn rejected_batch_leaves_catalog_untouched() {
  let s = store().await;
  s.put_spells(vec![spell("shield", 1)]).await.unwrap();

  // The level CHECK constraint fails on the second row.
  let result = s
    .replace_spells(vec![spell("fireball", 3), spell("ascension", 12)])
    .await;
  assert!(result.is_err());

  let all = s.list_spells().await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].index, "shield");
}

// ─── Characters ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn put_and_get_character() {
  let s = store().await;
  let c = wizard("Mordenkainen").toggle_known("shield");
  s.put_character(c.clone()).await.unwrap();

  let fetched = s.get_character(c.uuid).await.unwrap().unwrap();
  assert_eq!(fetched, c);
}

#[tokio::test]
async fn get_character_missing_returns_none() {
  let s = store().await;
  assert!(s.get_character(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn put_character_replaces_whole_document() {
  let s = store().await;
  let c = wizard("Tasha").toggle_known("shield").toggle_prepared("shield");
  s.put_character(c.clone()).await.unwrap();

  let next = c
    .toggle_known("shield")
    .with_spell_slots(SpellSlots::default().add_slot(1).unwrap());
  s.put_character(next.clone()).await.unwrap();

  let fetched = s.get_character(c.uuid).await.unwrap().unwrap();
  assert!(!fetched.knows("shield"));
  assert!(!fetched.has_prepared("shield"));
  assert_eq!(fetched.spell_slots.get(1).unwrap().available, 1);
  assert_eq!(s.list_characters().await.unwrap().len(), 1);
}

#[tokio::test]
async fn list_characters_in_creation_order() {
  let s = store().await;
  let first = wizard("Bigby");
  let second = wizard("Otiluke");
  let third = wizard("Rary");
  for c in [&first, &second, &third] {
    s.put_character(c.clone()).await.unwrap();
  }

  // Rewriting the first character must not move it to the back.
  s.put_character(first.renamed("Bigby the Great").unwrap())
    .await
    .unwrap();

  let names: Vec<_> = s
    .list_characters()
    .await
    .unwrap()
    .into_iter()
    .map(|c| c.name)
    .collect();
  assert_eq!(names, ["Bigby the Great", "Otiluke", "Rary"]);
}

#[tokio::test]
async fn delete_character_reports_existence() {
  let s = store().await;
  let c = wizard("Leomund");
  s.put_character(c.clone()).await.unwrap();

  assert!(s.delete_character(c.uuid).await.unwrap());
  assert!(s.get_character(c.uuid).await.unwrap().is_none());
  assert!(!s.delete_character(c.uuid).await.unwrap());
}

#[tokio::test]
async fn image_survives_round_trip() {
  let s = store().await;
  let c = wizard("Drawmij").with_image(Some("data:image/png;base64,AAAA".into()));
  s.put_character(c.clone()).await.unwrap();

  let fetched = s.get_character(c.uuid).await.unwrap().unwrap();
  assert_eq!(fetched.image.as_deref(), Some("data:image/png;base64,AAAA"));
}

// ─── Settings ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn settings_upsert_by_key() {
  let s = store().await;
  assert!(s.get_setting("colorTheme").await.unwrap().is_none());

  s.put_setting(GlobalSetting { key: "colorTheme".into(), value: "light".into() })
    .await
    .unwrap();
  s.put_setting(GlobalSetting { key: "colorTheme".into(), value: "dark".into() })
    .await
    .unwrap();

  let fetched = s.get_setting("colorTheme").await.unwrap().unwrap();
  assert_eq!(fetched.value, "dark");
}

// ─── Persistence ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn reopened_file_keeps_documents() {
  let path = std::env::temp_dir().join(format!("grimoire-{}.db", Uuid::new_v4()));
  let c = wizard("Nystul");
  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.put_character(c.clone()).await.unwrap();
    s.put_spells(vec![spell("shield", 1)]).await.unwrap();
  }

  let s = SqliteStore::open(&path).await.unwrap();
  assert_eq!(s.get_character(c.uuid).await.unwrap(), Some(c));
  assert_eq!(s.list_spells().await.unwrap().len(), 1);

  drop(s);
  let _ = std::fs::remove_file(&path);
}
