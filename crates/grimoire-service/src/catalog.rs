//! [`SpellCatalog`]: the published reference spell list.

use std::{fmt, sync::Arc};

use grimoire_core::{spell::Spell, store::SheetStore};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
  Result,
  error::storage,
  published::{Published, Subscription},
};

/// How an imported batch combines with the stored catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
  /// Clear the catalog, then store the batch.
  #[default]
  Replace,
  /// Upsert the batch by spell index.
  Merge,
}

impl fmt::Display for ImportMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      ImportMode::Replace => "replace",
      ImportMode::Merge => "merge",
    })
  }
}

pub struct SpellCatalog<S> {
  store:   Arc<S>,
  spells:  Published<Vec<Spell>>,
  publish: Mutex<()>,
}

impl<S: SheetStore> SpellCatalog<S> {
  /// Build the catalog and publish the stored spells.
  pub async fn open(store: Arc<S>) -> Result<Self> {
    let catalog = Self {
      store,
      spells: Published::new(Vec::new()),
      publish: Mutex::new(()),
    };
    catalog.fetch().await?;
    Ok(catalog)
  }

  /// Load every spell from storage, ordered by index, and publish.
  ///
  /// Fetches run one at a time, so a slow read never replaces a newer one.
  pub async fn fetch(&self) -> Result<Vec<Spell>> {
    let _publishing = self.publish.lock().await;
    let spells = self.store.list_spells().await.map_err(storage)?;
    debug!(count = spells.len(), "published spell catalog");
    self.spells.publish(spells.clone());
    Ok(spells)
  }

  /// Store a validated batch in one transaction and publish the result.
  /// Returns the size of the catalog afterwards.
  pub async fn import(&self, spells: Vec<Spell>, mode: ImportMode) -> Result<usize> {
    let count = spells.len();
    let written = match mode {
      ImportMode::Replace => self.store.replace_spells(spells).await,
      ImportMode::Merge => self.store.put_spells(spells).await,
    };
    if let Err(e) = written {
      warn!(%mode, error = %e, "failed to import spells");
      if let Err(refresh) = self.fetch().await {
        warn!(error = %refresh, "refresh after failed import also failed");
      }
      return Err(storage(e));
    }

    let total = self.fetch().await?.len();
    info!(%mode, imported = count, total, "imported spells");
    Ok(total)
  }

  pub async fn get(&self, index: &str) -> Result<Option<Spell>> {
    self.store.get_spell(index).await.map_err(storage)
  }

  /// The last published catalog.
  pub fn snapshot(&self) -> Vec<Spell> { self.spells.current() }

  pub fn subscribe(&self) -> Subscription<Vec<Spell>> { self.spells.subscribe() }
}
