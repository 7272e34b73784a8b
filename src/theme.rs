use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::Error;
use crate::storage::{Storage, THEME_KEY};

/// User theme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Auto,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Auto => "auto",
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "auto" => Ok(Theme::Auto),
            other => Err(Error::BadRequest(format!("Unknown theme '{}'", other))),
        }
    }
}

/// Theme actually applied after resolving `Auto`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectiveTheme {
    #[default]
    Light,
    Dark,
}

impl EffectiveTheme {
    pub fn is_dark(&self) -> bool {
        matches!(self, EffectiveTheme::Dark)
    }
}

pub struct ThemeStore {
    storage: Arc<dyn Storage>,
    theme: Theme,
    system_prefers_dark: bool,
    tx: watch::Sender<EffectiveTheme>,
}

impl ThemeStore {
    /// Restores the saved preference; unknown or missing values fall back
    /// to light.
    pub fn load(storage: Arc<dyn Storage>, system_prefers_dark: bool) -> Self {
        let theme = match storage.get_item(THEME_KEY) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|_| {
                warn!(value = %raw, "Ignoring unknown stored theme");
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(e) => {
                warn!(error = %e, "Failed to read stored theme");
                Theme::default()
            }
        };
        let effective = resolve(theme, system_prefers_dark);
        let (tx, _) = watch::channel(effective);
        Self {
            storage,
            theme,
            system_prefers_dark,
            tx,
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn effective(&self) -> EffectiveTheme {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<EffectiveTheme> {
        self.tx.subscribe()
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        if let Err(e) = self.storage.set_item(THEME_KEY, theme.as_str()) {
            warn!(error = %e, "Failed to persist theme");
        }
        self.publish();
    }

    /// Flips between light and dark based on what is currently shown.
    pub fn toggle(&mut self) {
        let next = if self.effective().is_dark() {
            Theme::Light
        } else {
            Theme::Dark
        };
        self.set_theme(next);
    }

    pub fn set_system_preference(&mut self, prefers_dark: bool) {
        self.system_prefers_dark = prefers_dark;
        self.publish();
    }

    fn publish(&self) {
        let next = resolve(self.theme, self.system_prefers_dark);
        let changed = self.tx.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
        if changed {
            debug!(theme = ?next, "Effective theme changed");
        }
    }
}

fn resolve(theme: Theme, system_prefers_dark: bool) -> EffectiveTheme {
    match theme {
        Theme::Light => EffectiveTheme::Light,
        Theme::Dark => EffectiveTheme::Dark,
        Theme::Auto if system_prefers_dark => EffectiveTheme::Dark,
        Theme::Auto => EffectiveTheme::Light,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn storage() -> Arc<dyn Storage> {
        Arc::new(MemoryStorage::new())
    }

    #[test]
    fn defaults_to_light() {
        let store = ThemeStore::load(storage(), true);
        assert_eq!(store.theme(), Theme::Light);
        assert_eq!(store.effective(), EffectiveTheme::Light);
    }

    #[test]
    fn auto_follows_system_preference() {
        let storage = storage();
        storage.set_item(THEME_KEY, "auto").unwrap();
        let mut store = ThemeStore::load(storage, false);
        let mut rx = store.subscribe();
        assert_eq!(store.effective(), EffectiveTheme::Light);

        store.set_system_preference(true);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), EffectiveTheme::Dark);

        store.set_system_preference(true);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn set_theme_persists() {
        let storage = storage();
        let mut store = ThemeStore::load(storage.clone(), false);
        store.set_theme(Theme::Dark);
        assert_eq!(storage.get_item(THEME_KEY).unwrap().as_deref(), Some("dark"));

        let reloaded = ThemeStore::load(storage, false);
        assert_eq!(reloaded.effective(), EffectiveTheme::Dark);
    }

    #[test]
    fn toggle_flips_effective_theme() {
        let mut store = ThemeStore::load(storage(), true);
        store.set_theme(Theme::Auto);
        assert!(store.effective().is_dark());
        store.toggle();
        assert_eq!(store.theme(), Theme::Light);
        store.toggle();
        assert_eq!(store.theme(), Theme::Dark);
    }

    #[test]
    fn subscribers_wake_on_change() {
        let mut store = ThemeStore::load(storage(), false);
        let mut rx = store.subscribe();
        store.set_theme(Theme::Dark);
        tokio_test::block_on(async {
            rx.changed().await.unwrap();
        });
        assert_eq!(*rx.borrow(), EffectiveTheme::Dark);
    }

    #[test]
    fn garbage_stored_value_falls_back() {
        let storage = storage();
        storage.set_item(THEME_KEY, "sepia").unwrap();
        assert_eq!(ThemeStore::load(storage, false).theme(), Theme::Light);
    }
}
