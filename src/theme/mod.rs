//! UI preferences, persisted as one JSON object in the key-value store.
//!
//! There is no process-wide theme state: callers load a
//! [`ThemePreferences`] value through a [`PreferencesStore`] and pass it
//! (or the [`Theme`] resolved from it) to whatever needs it.

pub mod palette;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::storage::{KeyValueStore, PREFS_KEY};
use crate::utils::CareerLensResult;

pub use palette::{CardTheme, Palette, Theme};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryColor {
    #[default]
    Blue,
    Purple,
    Green,
    Orange,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CardStyle {
    #[default]
    Default,
    Rounded,
    Gradient,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Bold,
    Clean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemePreferences {
    pub theme_mode: ThemeMode,
    pub primary_color: PrimaryColor,
    pub card_style: CardStyle,
    pub font_style: FontStyle,
    pub animations_enabled: bool,
}

impl Default for ThemePreferences {
    fn default() -> Self {
        Self {
            theme_mode: ThemeMode::Dark,
            primary_color: PrimaryColor::Blue,
            card_style: CardStyle::Default,
            font_style: FontStyle::Normal,
            animations_enabled: true,
        }
    }
}

impl ThemePreferences {
    pub fn theme(&self) -> Theme {
        Theme::resolve(self)
    }
}

/// A partial change; unset fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreferencesPatch {
    pub theme_mode: Option<ThemeMode>,
    pub primary_color: Option<PrimaryColor>,
    pub card_style: Option<CardStyle>,
    pub font_style: Option<FontStyle>,
    pub animations_enabled: Option<bool>,
}

impl PreferencesPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, prefs: ThemePreferences) -> ThemePreferences {
        ThemePreferences {
            theme_mode: self.theme_mode.unwrap_or(prefs.theme_mode),
            primary_color: self.primary_color.unwrap_or(prefs.primary_color),
            card_style: self.card_style.unwrap_or(prefs.card_style),
            font_style: self.font_style.unwrap_or(prefs.font_style),
            animations_enabled: self.animations_enabled.unwrap_or(prefs.animations_enabled),
        }
    }
}

#[derive(Clone)]
pub struct PreferencesStore {
    store: Arc<dyn KeyValueStore>,
}

impl PreferencesStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored preferences, or the defaults when none are stored or they
    /// cannot be read.
    pub async fn load(&self) -> ThemePreferences {
        let raw = match self.store.get(PREFS_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return ThemePreferences::default(),
            Err(e) => {
                warn!("Could not read preferences, using defaults: {}", e);
                return ThemePreferences::default();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Ignoring unreadable preferences: {}", e);
            ThemePreferences::default()
        })
    }

    pub async fn save(&self, prefs: &ThemePreferences) -> CareerLensResult<()> {
        let raw = serde_json::to_string(prefs)?;
        self.store.set(PREFS_KEY, &raw).await?;
        debug!("Preferences saved: {}", raw);
        Ok(())
    }

    /// Merges `patch` into the stored preferences and persists the result.
    pub async fn update(&self, patch: PreferencesPatch) -> CareerLensResult<ThemePreferences> {
        let prefs = patch.apply(self.load().await);
        self.save(&prefs).await?;
        Ok(prefs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn store() -> (Arc<MemoryStore>, PreferencesStore) {
        let kv = Arc::new(MemoryStore::new());
        (kv.clone(), PreferencesStore::new(kv))
    }

    #[tokio::test]
    async fn test_defaults_when_nothing_stored() {
        let (_, prefs) = store();
        let loaded = prefs.load().await;
        assert_eq!(loaded, ThemePreferences::default());
        assert_eq!(loaded.theme_mode, ThemeMode::Dark);
        assert!(loaded.animations_enabled);
    }

    #[tokio::test]
    async fn test_stored_json_uses_camel_case() {
        let (kv, prefs) = store();
        prefs.save(&ThemePreferences::default()).await.unwrap();

        let raw = kv.get(PREFS_KEY).await.unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "themeMode": "dark",
                "primaryColor": "blue",
                "cardStyle": "default",
                "fontStyle": "normal",
                "animationsEnabled": true
            })
        );
    }

    #[tokio::test]
    async fn test_update_merges_only_given_fields() {
        let (_, prefs) = store();
        prefs
            .update(PreferencesPatch {
                primary_color: Some(PrimaryColor::Green),
                ..Default::default()
            })
            .await
            .unwrap();

        let updated = prefs
            .update(PreferencesPatch {
                theme_mode: Some(ThemeMode::Light),
                animations_enabled: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.primary_color, PrimaryColor::Green);
        assert_eq!(updated.theme_mode, ThemeMode::Light);
        assert!(!updated.animations_enabled);
        assert_eq!(updated.card_style, CardStyle::Default);
        assert_eq!(prefs.load().await, updated);
    }

    #[tokio::test]
    async fn test_partial_or_broken_json() {
        let (kv, prefs) = store();

        kv.set(PREFS_KEY, r#"{"cardStyle":"rounded"}"#).await.unwrap();
        let loaded = prefs.load().await;
        assert_eq!(loaded.card_style, CardStyle::Rounded);
        assert_eq!(loaded.theme_mode, ThemeMode::Dark);

        kv.set(PREFS_KEY, "{not json").await.unwrap();
        assert_eq!(prefs.load().await, ThemePreferences::default());
    }

    #[test]
    fn test_empty_patch() {
        assert!(PreferencesPatch::default().is_empty());
        let patch = PreferencesPatch {
            font_style: Some(FontStyle::Bold),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
