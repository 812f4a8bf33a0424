// src/application/services/list_service_impl.rs
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::list_service::ListService;
use crate::application::services::page_service::PageService;
use crate::domain::analytics::{AnalyticsEvent, AnalyticsSink};
use crate::domain::error::DomainError;
use crate::domain::list::{IdAllocator, ListEntry, ListQuery, ListSuggestion, PageList};
use crate::domain::repositories::dispatcher::OperationDispatcher;
use crate::domain::repositories::document_store::fold_case;
use crate::domain::repositories::operation::Operation;
use crate::domain::url::normalize_url;
use async_trait::async_trait;
use futures::future::join_all;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

/// Fetch a list or fail with `ListNotFound`.
pub(crate) async fn require_list(
    dispatcher: &OperationDispatcher,
    list_id: i64,
) -> ApplicationResult<PageList> {
    dispatcher
        .find_one(Operation::FindListById { id: list_id })
        .await?
        .ok_or_else(|| DomainError::ListNotFound(list_id).into())
}

pub struct ListServiceImpl {
    dispatcher: OperationDispatcher,
    pages: Arc<dyn PageService>,
    analytics: Arc<dyn AnalyticsSink>,
    ids: Arc<IdAllocator>,
    suggestion_limit: usize,
    // serializes the create phase of create_lists_if_missing
    create_lock: Mutex<()>,
}

impl std::fmt::Debug for ListServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListServiceImpl")
            .field("dispatcher", &self.dispatcher)
            .field("suggestion_limit", &self.suggestion_limit)
            .finish_non_exhaustive()
    }
}

impl ListServiceImpl {
    pub fn new(
        dispatcher: OperationDispatcher,
        pages: Arc<dyn PageService>,
        analytics: Arc<dyn AnalyticsSink>,
        ids: Arc<IdAllocator>,
        suggestion_limit: usize,
    ) -> Self {
        debug!("Creating new ListServiceImpl");
        Self {
            dispatcher,
            pages,
            analytics,
            ids,
            suggestion_limit,
            create_lock: Mutex::new(()),
        }
    }

    fn validated_name(name: &str) -> ApplicationResult<&str> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApplicationError::Validation(
                "list name must not be empty".to_string(),
            ));
        }
        Ok(name)
    }

    /// Find by name, or create; a conflicting concurrent create is resolved by re-reading.
    async fn resolve_or_create(&self, name: &str) -> ApplicationResult<i64> {
        if let Some(list) = self.fetch_list_ignore_case(name).await? {
            return Ok(list.id);
        }
        match self.create_list(name).await {
            Ok(id) => Ok(id),
            Err(ApplicationError::Domain(err)) if err.is_conflict() => {
                warn!("Conflict creating list '{}', re-reading by name: {}", name, err);
                self.fetch_list_ignore_case(name)
                    .await?
                    .map(|list| list.id)
                    .ok_or_else(|| ApplicationError::Domain(err))
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl ListService for ListServiceImpl {
    #[instrument(skip(self), level = "debug")]
    async fn create_list(&self, name: &str) -> ApplicationResult<i64> {
        let list = PageList::new(self.ids.next_id(), Self::validated_name(name)?);
        let id = list.id;
        self.dispatcher.create(Operation::CreateList { list }).await?;
        self.analytics.track(AnalyticsEvent::CollectionCreated);
        debug!("Created list {} '{}'", id, name);
        Ok(id)
    }

    #[instrument(skip(self), level = "debug")]
    async fn create_lists_if_missing(&self, names: &[String]) -> ApplicationResult<Vec<i64>> {
        let names = names
            .iter()
            .map(|n| Self::validated_name(n))
            .collect::<ApplicationResult<Vec<_>>>()?;

        // one resolution per case-insensitive name
        let mut seen = HashSet::new();
        let distinct: Vec<&str> = names
            .iter()
            .copied()
            .filter(|n| seen.insert(fold_case(n)))
            .collect();

        let _guard = self.create_lock.lock().await;
        let resolved = join_all(distinct.iter().map(|name| self.resolve_or_create(name))).await;

        let mut ids = HashMap::with_capacity(distinct.len());
        for (name, result) in distinct.iter().zip(resolved) {
            ids.insert(fold_case(name), result?);
        }
        names
            .iter()
            .map(|n| {
                ids.get(&fold_case(n)).copied().ok_or_else(|| {
                    ApplicationError::Other(format!("list '{}' was not resolved", n))
                })
            })
            .collect()
    }

    #[instrument(skip(self), level = "debug")]
    async fn rename_list(&self, id: i64, name: &str) -> ApplicationResult<()> {
        let name = Self::validated_name(name)?.to_string();
        let affected = self
            .dispatcher
            .mutate(Operation::UpdateListName { id, name })
            .await?;
        debug!("Renamed {} list(s) with id {}", affected, id);
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    async fn remove_list(&self, id: i64) -> ApplicationResult<()> {
        let removed = self.dispatcher.mutate(Operation::DeleteList { id }).await?;
        self.analytics.track(AnalyticsEvent::CollectionRemoved);
        debug!("Removed {} list(s) with id {}", removed, id);
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    async fn fetch_all_lists(&self, query: &ListQuery) -> ApplicationResult<Vec<PageList>> {
        Ok(self
            .dispatcher
            .find_many(Operation::FindLists {
                excluded_ids: query.excluded_ids.clone(),
                skip: query.skip,
                limit: query.limit,
            })
            .await?)
    }

    async fn fetch_list_by_id(&self, id: i64) -> ApplicationResult<Option<PageList>> {
        Ok(self.dispatcher.find_one(Operation::FindListById { id }).await?)
    }

    async fn fetch_list_ignore_case(&self, name: &str) -> ApplicationResult<Option<PageList>> {
        Ok(self
            .dispatcher
            .find_one(Operation::FindListByNameIgnoreCase {
                name: name.to_string(),
            })
            .await?)
    }

    async fn fetch_list_pages_by_id(&self, id: i64) -> ApplicationResult<Vec<ListEntry>> {
        Ok(self
            .dispatcher
            .find_many(Operation::FindListEntriesByList { list_id: id })
            .await?)
    }

    #[instrument(skip(self), level = "debug")]
    async fn fetch_list_pages_by_url(&self, url: &str) -> ApplicationResult<Vec<PageList>> {
        let entries: Vec<ListEntry> = self
            .dispatcher
            .find_many(Operation::FindListEntriesByUrl {
                url: normalize_url(url)?,
            })
            .await?;
        if entries.is_empty() {
            return Ok(Vec::new());
        }
        let ids = entries.iter().map(|e| e.list_id).collect();
        Ok(self
            .dispatcher
            .find_many(Operation::FindListsIncluding { ids })
            .await?)
    }

    #[instrument(skip(self), level = "debug")]
    async fn fetch_list_name_suggestions(
        &self,
        name: &str,
        url: &str,
    ) -> ApplicationResult<Vec<ListSuggestion>> {
        let lists: Vec<PageList> = self
            .dispatcher
            .find_many(Operation::FindListsByNamePrefix {
                prefix: name.to_string(),
                limit: self.suggestion_limit,
            })
            .await?;
        let entries: Vec<ListEntry> = self
            .dispatcher
            .find_many(Operation::FindListEntriesByUrl {
                url: normalize_url(url)?,
            })
            .await?;
        let containing: HashSet<i64> = entries.iter().map(|e| e.list_id).collect();

        Ok(lists
            .into_iter()
            .map(|list| ListSuggestion {
                active: containing.contains(&list.id),
                list,
            })
            .collect())
    }

    #[instrument(skip(self), level = "debug")]
    async fn insert_page_to_list(&self, list_id: i64, url: &str) -> ApplicationResult<ListEntry> {
        require_list(&self.dispatcher, list_id).await?;
        let page = self.pages.ensure_page(url, None).await?;

        let entry = ListEntry::new(list_id, page.url, url.trim().to_string());
        let written = self
            .dispatcher
            .create(Operation::CreateListEntry {
                entry: entry.clone(),
            })
            .await?;
        if !written {
            debug!("Page {} already in list {}", entry.page_url, list_id);
        }
        self.analytics.track(AnalyticsEvent::PageInserted);
        Ok(entry)
    }

    #[instrument(skip(self), level = "debug")]
    async fn remove_page_from_list(&self, list_id: i64, url: &str) -> ApplicationResult<usize> {
        let removed = self
            .dispatcher
            .mutate(Operation::DeleteListEntries {
                list_id,
                url: normalize_url(url)?,
            })
            .await?;
        self.analytics.track(AnalyticsEvent::PageRemoved);
        Ok(removed)
    }
}
