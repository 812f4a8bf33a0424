// src/application/services/tab_service_impl.rs
use crate::application::error::ApplicationResult;
use crate::application::outcome::{BatchOutcome, ItemResult, TabOutcome};
use crate::application::services::list_service_impl::require_list;
use crate::application::services::page_service::PageService;
use crate::application::services::tab_service::TabService;
use crate::domain::list::ListEntry;
use crate::domain::repositories::dispatcher::OperationDispatcher;
use crate::domain::repositories::operation::Operation;
use crate::domain::services::tab_source::TabSource;
use crate::domain::tab::Tab;
use crate::domain::url::normalize_url;
use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

pub struct TabServiceImpl {
    dispatcher: OperationDispatcher,
    pages: Arc<dyn PageService>,
    tab_source: Arc<dyn TabSource>,
}

impl std::fmt::Debug for TabServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabServiceImpl")
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

impl TabServiceImpl {
    pub fn new(
        dispatcher: OperationDispatcher,
        pages: Arc<dyn PageService>,
        tab_source: Arc<dyn TabSource>,
    ) -> Self {
        debug!("Creating new TabServiceImpl");
        Self {
            dispatcher,
            pages,
            tab_source,
        }
    }

    async fn resolve_tabs(&self, tabs: Option<Vec<Tab>>) -> ApplicationResult<Vec<Tab>> {
        match tabs {
            Some(tabs) => Ok(tabs),
            None => {
                let window = self.tab_source.active_window().await?;
                Ok(self.tab_source.tabs_in_window(window.window_id).await?)
            }
        }
    }

    /// Find or create the tab's page. Missing pages and stubs are loaded in
    /// full; when loading fails a stub is kept.
    async fn materialize(&self, tab: &Tab) -> ApplicationResult<String> {
        let page = match self.pages.find_page(&tab.url).await? {
            Some(page) if !page.is_stub => page,
            _ => match self.pages.create_full_page(Some(tab.tab_id), &tab.url).await {
                Ok(page) => page,
                Err(e) => {
                    warn!("Falling back to stub page for tab {}: {}", tab.tab_id, e);
                    self.pages.ensure_page(&tab.url, None).await?
                }
            },
        };
        let page = self.pages.ensure_visit(page).await?;
        Ok(page.url)
    }

    async fn insert_entry(&self, list_id: i64, tab: &Tab) -> ApplicationResult<usize> {
        let entry = ListEntry::new(list_id, normalize_url(&tab.url)?, tab.url.trim().to_string());
        let written = self
            .dispatcher
            .create(Operation::CreateListEntry { entry })
            .await?;
        Ok(usize::from(written))
    }

    async fn remove_entry(&self, list_id: i64, tab: &Tab) -> ApplicationResult<usize> {
        Ok(self
            .dispatcher
            .mutate(Operation::DeleteListEntries {
                list_id,
                url: normalize_url(&tab.url)?,
            })
            .await?)
    }
}

fn log_failures(outcome: &BatchOutcome) {
    for failed in outcome.failures() {
        warn!("Tab {} ({}) failed: {:?}", failed.tab_id, failed.url, failed);
    }
}

#[async_trait]
impl TabService for TabServiceImpl {
    #[instrument(skip(self, tabs), level = "debug")]
    async fn add_open_tabs_to_list(
        &self,
        list_id: i64,
        tabs: Option<Vec<Tab>>,
    ) -> ApplicationResult<BatchOutcome> {
        require_list(&self.dispatcher, list_id).await?;
        let tabs = self.resolve_tabs(tabs).await?;
        debug!("Adding {} tab(s) to list {}", tabs.len(), list_id);

        // page materialization and entry insertion do not wait on each other
        let (pages, entries) = tokio::join!(
            join_all(tabs.iter().map(|tab| self.materialize(tab))),
            join_all(tabs.iter().map(|tab| self.insert_entry(list_id, tab))),
        );

        let outcome = BatchOutcome {
            list_id,
            tabs: tabs
                .into_iter()
                .zip(pages.into_iter().zip(entries))
                .map(|(tab, (page, entry))| TabOutcome {
                    tab_id: tab.tab_id,
                    url: tab.url,
                    page: Some(ItemResult::from(page)),
                    entry: ItemResult::from(entry),
                })
                .collect(),
        };
        log_failures(&outcome);
        Ok(outcome)
    }

    #[instrument(skip(self, tabs), level = "debug")]
    async fn remove_open_tabs_from_list(
        &self,
        list_id: i64,
        tabs: Option<Vec<Tab>>,
    ) -> ApplicationResult<BatchOutcome> {
        let tabs = self.resolve_tabs(tabs).await?;
        let removed = join_all(tabs.iter().map(|tab| self.remove_entry(list_id, tab))).await;

        let outcome = BatchOutcome {
            list_id,
            tabs: tabs
                .into_iter()
                .zip(removed)
                .map(|(tab, entry)| TabOutcome {
                    tab_id: tab.tab_id,
                    url: tab.url,
                    page: None,
                    entry: ItemResult::from(entry),
                })
                .collect(),
        };
        log_failures(&outcome);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::list_service::ListService;
    use crate::domain::error::DomainError;
    use crate::domain::tab::Window;
    use crate::util::testing::TestContext;

    fn tabs() -> Vec<Tab> {
        vec![Tab::new(1, "https://a.com"), Tab::new(2, "https://b.com")]
    }

    #[tokio::test]
    async fn given_two_tabs_when_added_then_two_entries_and_visited_pages() {
        // Arrange
        let ctx = TestContext::new();
        let list = ctx.lists.create_list("Tabs").await.unwrap();

        // Act
        let outcome = ctx.tabs.add_open_tabs_to_list(list, Some(tabs())).await.unwrap();

        // Assert
        assert!(outcome.all_succeeded());
        assert_eq!(ctx.lists.fetch_list_pages_by_id(list).await.unwrap().len(), 2);
        for url in ["a.com", "b.com"] {
            let page = ctx.pages.find_page(url).await.unwrap().unwrap();
            assert!(page.has_visits());
            assert!(!page.is_stub);
        }
    }

    #[tokio::test]
    async fn given_unloadable_tab_when_added_then_stub_kept_and_batch_continues() {
        let ctx = TestContext::new();
        let list = ctx.lists.create_list("Tabs").await.unwrap();
        let batch = vec![Tab::new(1, "https://offline.test/x"), Tab::new(2, "https://b.com")];

        let outcome = ctx.tabs.add_open_tabs_to_list(list, Some(batch)).await.unwrap();

        assert!(outcome.all_succeeded());
        let page = ctx.pages.find_page("offline.test/x").await.unwrap().unwrap();
        assert!(page.is_stub);
        assert_eq!(page.visits.len(), 1);
    }

    #[tokio::test]
    async fn given_invalid_tab_url_when_added_then_failure_reported_per_tab() {
        let ctx = TestContext::new();
        let list = ctx.lists.create_list("Tabs").await.unwrap();
        let batch = vec![Tab::new(1, "not a url"), Tab::new(2, "https://b.com")];

        let outcome = ctx.tabs.add_open_tabs_to_list(list, Some(batch)).await.unwrap();

        assert!(!outcome.all_succeeded());
        assert_eq!(outcome.failures().count(), 1);
        assert!(outcome.tabs[1].is_ok());
        assert_eq!(ctx.lists.fetch_list_pages_by_id(list).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn given_no_tabs_when_added_then_active_window_is_used() {
        let ctx = TestContext::new();
        ctx.tab_source
            .set_windows(vec![Window {
                window_id: 7,
                focused: true,
                tabs: tabs(),
            }])
            .await;
        let list = ctx.lists.create_list("Window").await.unwrap();

        let outcome = ctx.tabs.add_open_tabs_to_list(list, None).await.unwrap();

        assert_eq!(outcome.tabs.len(), 2);
    }

    #[tokio::test]
    async fn given_no_active_window_when_added_then_error() {
        let ctx = TestContext::new();
        let list = ctx.lists.create_list("Window").await.unwrap();
        let err = ctx.tabs.add_open_tabs_to_list(list, None).await.unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::NoActiveWindow)));
    }

    #[tokio::test]
    async fn given_unknown_list_when_added_then_not_found() {
        let ctx = TestContext::new();
        let err = ctx.tabs.add_open_tabs_to_list(5, Some(tabs())).await.unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::ListNotFound(5))));
    }

    #[tokio::test]
    async fn given_added_tabs_when_removed_then_entries_deleted_pages_kept() {
        let ctx = TestContext::new();
        let list = ctx.lists.create_list("Tabs").await.unwrap();
        ctx.tabs.add_open_tabs_to_list(list, Some(tabs())).await.unwrap();

        let outcome = ctx
            .tabs
            .remove_open_tabs_from_list(list, Some(tabs()))
            .await
            .unwrap();

        assert!(outcome.tabs.iter().all(|t| t.entry.value() == Some(&1)));
        assert!(ctx.lists.fetch_list_pages_by_id(list).await.unwrap().is_empty());
        assert!(ctx.pages.find_page("a.com").await.unwrap().is_some());
    }
}
