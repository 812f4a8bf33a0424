// src/infrastructure/preferences.rs
use crate::config::Settings;
use crate::domain::error::DomainResult;
use crate::domain::services::preferences::{PreferenceStore, SHOULD_INDEX_LINKS};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Preferences kept in process memory.
#[derive(Debug, Default)]
pub struct InMemoryPreferences {
    values: RwLock<HashMap<String, bool>>,
}

impl InMemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the preferences from the configured defaults.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut values = HashMap::new();
        values.insert(SHOULD_INDEX_LINKS.to_string(), settings.index_links);
        Self {
            values: RwLock::new(values),
        }
    }
}

#[async_trait]
impl PreferenceStore for InMemoryPreferences {
    async fn get_bool(&self, key: &str) -> DomainResult<Option<bool>> {
        Ok(self.values.read().await.get(key).copied())
    }

    async fn set_bool(&self, key: &str, value: bool) -> DomainResult<()> {
        self.values.write().await.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn given_settings_with_indexing_when_from_settings_then_preference_seeded() {
        let settings = Settings {
            index_links: true,
            ..Settings::default()
        };
        let prefs = InMemoryPreferences::from_settings(&settings);
        assert_eq!(prefs.get_bool(SHOULD_INDEX_LINKS).await.unwrap(), Some(true));
        assert_eq!(prefs.get_bool("unknown").await.unwrap(), None);
    }

    #[tokio::test]
    async fn given_value_when_set_bool_then_overwrites() {
        let prefs = InMemoryPreferences::new();
        prefs.set_bool(SHOULD_INDEX_LINKS, true).await.unwrap();
        prefs.set_bool(SHOULD_INDEX_LINKS, false).await.unwrap();
        assert_eq!(prefs.get_bool(SHOULD_INDEX_LINKS).await.unwrap(), Some(false));
    }
}
