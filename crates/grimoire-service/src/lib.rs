//! Application services for Grimoire.
//!
//! Each service wraps a shared [`SheetStore`], performs the storage side of
//! an operation and publishes the resulting state. Subscribers always see the
//! latest value, including on subscription.
//!
//! # Wiring
//!
//! ```rust,ignore
//! let store = grimoire_store_sqlite::SqliteStore::open("grimoire.db").await?;
//! let grimoire = grimoire_service::Grimoire::open(store).await?;
//! let view = grimoire.spell_view(uuid, SpellListType::Known, "fire").await?;
//! ```

pub mod catalog;
pub mod characters;
pub mod error;
pub mod published;
pub mod settings;

use std::sync::Arc;

use grimoire_core::{
  display::{DisplayedSpell, displayed_spells},
  lists::{
    SpellListType, ToggleVisibility, available_tabs, classify_lists, resolve_tab,
    toggle_visibility,
  },
  store::SheetStore,
};
use uuid::Uuid;

pub use catalog::{ImportMode, SpellCatalog};
pub use characters::CharacterService;
pub use error::{Error, Result};
pub use published::{Published, Subscription};
pub use settings::{Settings, Theme};

/// Every service over one store.
pub struct Grimoire<S> {
  pub characters: CharacterService<S>,
  pub catalog:    SpellCatalog<S>,
  pub settings:   Settings<S>,
}

/// The spell table as seen by one character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellView {
  pub tabs:       Vec<SpellListType>,
  pub active_tab: SpellListType,
  pub toggles:    ToggleVisibility,
  pub spells:     Vec<DisplayedSpell>,
}

impl<S: SheetStore> Grimoire<S> {
  pub async fn open(store: S) -> Result<Self> {
    let store = Arc::new(store);
    Ok(Self {
      characters: CharacterService::open(store.clone()).await?,
      catalog:    SpellCatalog::open(store.clone()).await?,
      settings:   Settings::open(store).await?,
    })
  }

  /// Build the spell table for `uuid` on the `requested` tab.
  ///
  /// A tab the character does not keep falls back to the class tab. Returns
  /// `None` if the character does not exist.
  pub async fn spell_view(
    &self,
    uuid: Uuid,
    requested: SpellListType,
    search: &str,
  ) -> Result<Option<SpellView>> {
    let Some(character) = self.characters.get_by_uuid(uuid).await? else {
      return Ok(None);
    };

    let lists = classify_lists(character.class_names());
    let active_tab = resolve_tab(requested, lists);
    let spells = displayed_spells(
      &self.catalog.snapshot(),
      Some(&character),
      active_tab,
      search,
    )?;

    Ok(Some(SpellView {
      tabs: available_tabs(&character, active_tab),
      active_tab,
      toggles: toggle_visibility(active_tab, lists),
      spells,
    }))
  }
}
