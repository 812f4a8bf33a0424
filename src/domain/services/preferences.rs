// src/domain/services/preferences.rs
use crate::domain::error::DomainResult;
use async_trait::async_trait;

/// Preference key: index pages opened by following links with full content.
pub const SHOULD_INDEX_LINKS: &str = "shouldIndexLinks";

/// Key-value store of user preferences.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn get_bool(&self, key: &str) -> DomainResult<Option<bool>>;

    async fn set_bool(&self, key: &str, value: bool) -> DomainResult<()>;
}
