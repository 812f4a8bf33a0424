// src/application/services/list_service.rs
use crate::application::error::ApplicationResult;
use crate::domain::list::{ListEntry, ListQuery, ListSuggestion, PageList};
use async_trait::async_trait;

/// Service interface for user lists and their page membership
#[async_trait]
pub trait ListService: Send + Sync {
    /// Create a list and return its newly allocated id.
    async fn create_list(&self, name: &str) -> ApplicationResult<i64>;

    /// Resolve each name to an existing list (case-insensitive) or a newly created one.
    /// Ids are aligned with `names`.
    async fn create_lists_if_missing(&self, names: &[String]) -> ApplicationResult<Vec<i64>>;

    async fn rename_list(&self, id: i64, name: &str) -> ApplicationResult<()>;

    /// Delete the list record. Entries referencing it are left in place.
    async fn remove_list(&self, id: i64) -> ApplicationResult<()>;

    async fn fetch_all_lists(&self, query: &ListQuery) -> ApplicationResult<Vec<PageList>>;

    async fn fetch_list_by_id(&self, id: i64) -> ApplicationResult<Option<PageList>>;

    async fn fetch_list_ignore_case(&self, name: &str) -> ApplicationResult<Option<PageList>>;

    /// Entries of a list, oldest first.
    async fn fetch_list_pages_by_id(&self, id: i64) -> ApplicationResult<Vec<ListEntry>>;

    /// Lists containing the page.
    async fn fetch_list_pages_by_url(&self, url: &str) -> ApplicationResult<Vec<PageList>>;

    /// Lists whose name starts with `name`, flagged when they already contain `url`.
    async fn fetch_list_name_suggestions(
        &self,
        name: &str,
        url: &str,
    ) -> ApplicationResult<Vec<ListSuggestion>>;

    /// Materialize the page for `url` and add it to the list.
    async fn insert_page_to_list(&self, list_id: i64, url: &str) -> ApplicationResult<ListEntry>;

    /// Remove the page from the list; returns the number of entries removed.
    async fn remove_page_from_list(&self, list_id: i64, url: &str) -> ApplicationResult<usize>;
}
