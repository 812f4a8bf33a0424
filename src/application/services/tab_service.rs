// src/application/services/tab_service.rs
use crate::application::error::ApplicationResult;
use crate::application::outcome::BatchOutcome;
use crate::domain::tab::Tab;
use async_trait::async_trait;

/// Applies list membership to a batch of browser tabs.
#[async_trait]
pub trait TabService: Send + Sync {
    /// Materialize a page per tab and add every tab to the list.
    /// Without `tabs`, the tabs of the active window form the batch.
    async fn add_open_tabs_to_list(
        &self,
        list_id: i64,
        tabs: Option<Vec<Tab>>,
    ) -> ApplicationResult<BatchOutcome>;

    /// Remove every tab of the batch from the list.
    async fn remove_open_tabs_from_list(
        &self,
        list_id: i64,
        tabs: Option<Vec<Tab>>,
    ) -> ApplicationResult<BatchOutcome>;
}
