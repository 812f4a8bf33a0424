// src/domain/services/tab_source.rs
use crate::domain::error::DomainResult;
use crate::domain::tab::{Tab, Window};
use async_trait::async_trait;

/// Browser window and tab enumeration.
#[async_trait]
pub trait TabSource: Send + Sync {
    /// The window the caller is acting in; `DomainError::NoActiveWindow` if none.
    async fn active_window(&self) -> DomainResult<Window>;

    async fn tabs_in_window(&self, window_id: i64) -> DomainResult<Vec<Tab>>;
}
