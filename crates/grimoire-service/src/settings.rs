//! [`Settings`]: typed access to the global preferences.

use std::{str::FromStr, sync::Arc};

use grimoire_core::{
  settings::{ColorTheme, GlobalSetting, PrimaryTheme, SettingKey},
  store::SheetStore,
};
use tracing::{debug, warn};

use crate::{
  Result,
  error::storage,
  published::{Published, Subscription},
};

/// The resolved appearance preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Theme {
  pub color_theme:   ColorTheme,
  pub primary_theme: PrimaryTheme,
}

pub struct Settings<S> {
  store: Arc<S>,
  theme: Published<Theme>,
}

impl<S: SheetStore> Settings<S> {
  pub async fn open(store: Arc<S>) -> Result<Self> {
    let settings = Self { store, theme: Published::new(Theme::default()) };
    let theme = Theme {
      color_theme:   settings.read(SettingKey::ColorTheme).await?,
      primary_theme: settings.read(SettingKey::PrimaryTheme).await?,
    };
    settings.theme.publish(theme);
    Ok(settings)
  }

  pub async fn color_theme(&self) -> Result<ColorTheme> {
    self.read(SettingKey::ColorTheme).await
  }

  pub async fn set_color_theme(&self, color_theme: ColorTheme) -> Result<()> {
    self.write(SettingKey::ColorTheme, color_theme).await?;
    self.publish(Theme { color_theme, ..self.theme.current() });
    Ok(())
  }

  pub async fn primary_theme(&self) -> Result<PrimaryTheme> {
    self.read(SettingKey::PrimaryTheme).await
  }

  pub async fn set_primary_theme(&self, primary_theme: PrimaryTheme) -> Result<()> {
    self.write(SettingKey::PrimaryTheme, primary_theme).await?;
    self.publish(Theme { primary_theme, ..self.theme.current() });
    Ok(())
  }

  pub fn theme(&self) -> Theme { self.theme.current() }

  pub fn subscribe(&self) -> Subscription<Theme> { self.theme.subscribe() }

  /// Read a setting, falling back to the default when it is unset or holds
  /// a value this build does not recognise.
  async fn read<T>(&self, key: SettingKey) -> Result<T>
  where
    T: FromStr + Default,
  {
    let stored = self.store.get_setting(key.as_ref()).await.map_err(storage)?;
    Ok(match stored {
      None => T::default(),
      Some(setting) => setting.value.parse().unwrap_or_else(|_| {
        warn!(%key, value = %setting.value, "unrecognised setting value");
        T::default()
      }),
    })
  }

  async fn write(&self, key: SettingKey, value: impl ToString) -> Result<()> {
    let setting = GlobalSetting { key: key.to_string(), value: value.to_string() };
    self.store.put_setting(setting).await.map_err(|e| {
      warn!(%key, error = %e, "failed to store setting");
      storage(e)
    })
  }

  fn publish(&self, theme: Theme) {
    debug!(?theme, "published theme");
    self.theme.publish(theme);
  }
}

#[cfg(test)]
mod tests {
  use grimoire_store_sqlite::SqliteStore;

  use super::*;

  async fn store() -> Arc<SqliteStore> {
    Arc::new(SqliteStore::open_in_memory().await.unwrap())
  }

  #[tokio::test]
  async fn unset_keys_use_defaults() {
    let settings = Settings::open(store().await).await.unwrap();
    assert_eq!(settings.color_theme().await.unwrap(), ColorTheme::Light);
    assert_eq!(settings.primary_theme().await.unwrap(), PrimaryTheme::Blue);
    assert_eq!(settings.theme(), Theme::default());
  }

  #[tokio::test]
  async fn writes_persist_and_publish() {
    let store = store().await;
    let settings = Settings::open(store.clone()).await.unwrap();
    let mut sub = settings.subscribe();

    settings.set_color_theme(ColorTheme::Dark).await.unwrap();
    assert_eq!(sub.changed().await.map(|t| t.color_theme), Some(ColorTheme::Dark));

    settings.set_primary_theme(PrimaryTheme::DeepPurple).await.unwrap();
    let stored = store.get_setting("primaryTheme").await.unwrap().unwrap();
    assert_eq!(stored.value, "deepPurple");

    let reopened = Settings::open(store).await.unwrap();
    assert_eq!(reopened.theme(), Theme {
      color_theme:   ColorTheme::Dark,
      primary_theme: PrimaryTheme::DeepPurple,
    });
  }

  #[tokio::test]
  async fn unrecognised_value_falls_back() {
    let store = store().await;
    store
      .put_setting(GlobalSetting { key: "colorTheme".into(), value: "sepia".into() })
      .await
      .unwrap();

    let settings = Settings::open(store).await.unwrap();
    assert_eq!(settings.color_theme().await.unwrap(), ColorTheme::Light);
  }
}
