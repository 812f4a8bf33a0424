// src/application/services/page_service.rs
use crate::application::error::ApplicationResult;
use crate::domain::page::Page;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Page materialization: every association refers to a page that exists and has been visited.
#[async_trait]
pub trait PageService: Send + Sync {
    /// Return the page for `url`, creating a stub if missing.
    /// A page that is new or has no visits gets one (`visit_time` or now) and is persisted.
    async fn ensure_page(&self, url: &str, visit_time: Option<DateTime<Utc>>) -> ApplicationResult<Page>;

    /// Point lookup by any form of the url.
    async fn find_page(&self, url: &str) -> ApplicationResult<Option<Page>>;

    /// Upsert a page.
    async fn save_page(&self, page: &Page) -> ApplicationResult<()>;

    /// Load the content of `url` (from tab `tab_id` when given) and persist a full page.
    /// An existing page keeps its visits; a stub is upgraded in place.
    async fn create_full_page(&self, tab_id: Option<i64>, url: &str) -> ApplicationResult<Page>;

    /// Append a visit to a page without one and persist it; other pages are returned as is.
    async fn ensure_visit(&self, page: Page) -> ApplicationResult<Page>;
}
