// src/application/services/page_service_impl.rs
use crate::application::error::ApplicationResult;
use crate::application::services::page_service::PageService;
use crate::domain::page::Page;
use crate::domain::repositories::dispatcher::OperationDispatcher;
use crate::domain::repositories::operation::Operation;
use crate::domain::services::page_content::PageContentSource;
use crate::domain::url::normalize_url;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct PageServiceImpl {
    dispatcher: OperationDispatcher,
    content_source: Arc<dyn PageContentSource>,
}

impl std::fmt::Debug for PageServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageServiceImpl")
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

impl PageServiceImpl {
    pub fn new(dispatcher: OperationDispatcher, content_source: Arc<dyn PageContentSource>) -> Self {
        debug!("Creating new PageServiceImpl");
        Self {
            dispatcher,
            content_source,
        }
    }

    async fn find_normalized(&self, normalized: String) -> ApplicationResult<Option<Page>> {
        Ok(self
            .dispatcher
            .find_one(Operation::FindPageByUrl { url: normalized })
            .await?)
    }
}

#[async_trait]
impl PageService for PageServiceImpl {
    #[instrument(skip(self), level = "debug")]
    async fn ensure_page(&self, url: &str, visit_time: Option<DateTime<Utc>>) -> ApplicationResult<Page> {
        let normalized = normalize_url(url)?;
        let (mut page, created) = match self.find_normalized(normalized).await? {
            Some(page) => (page, false),
            None => (Page::stub(url, None)?, true),
        };

        if created || !page.has_visits() {
            page.add_visit(visit_time.unwrap_or_else(Utc::now));
            self.save_page(&page).await?;
            debug!("Materialized page {} (created: {})", page.url, created);
        }
        Ok(page)
    }

    #[instrument(skip(self), level = "debug")]
    async fn find_page(&self, url: &str) -> ApplicationResult<Option<Page>> {
        self.find_normalized(normalize_url(url)?).await
    }

    #[instrument(skip(self, page), level = "debug", fields(url = %page.url))]
    async fn save_page(&self, page: &Page) -> ApplicationResult<()> {
        self.dispatcher
            .create(Operation::SavePage { page: page.clone() })
            .await?;
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    async fn create_full_page(&self, tab_id: Option<i64>, url: &str) -> ApplicationResult<Page> {
        let content = self.content_source.load_content(tab_id, url).await?;
        let mut page = match self.find_page(url).await? {
            Some(existing) => existing,
            None => Page::stub(url, None)?,
        };
        page.fill_content(content);
        self.save_page(&page).await?;
        Ok(page)
    }

    #[instrument(skip(self, page), level = "debug", fields(url = %page.url))]
    async fn ensure_visit(&self, mut page: Page) -> ApplicationResult<Page> {
        if !page.has_visits() {
            page.add_visit(Utc::now());
            self.save_page(&page).await?;
        }
        Ok(page)
    }
}
