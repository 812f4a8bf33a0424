// src/infrastructure/annotation_query.rs
use crate::domain::annotation::{
    Annotation, AnnotationBookmark, AnnotationListEntry, AnnotationWithRelations,
    PageAnnotationsQuery,
};
use crate::domain::error::DomainResult;
use crate::domain::repositories::dispatcher::OperationDispatcher;
use crate::domain::repositories::operation::Operation;
use crate::domain::services::annotation_query::AnnotationQuery;
use crate::domain::tag::TagRecord;
use crate::domain::url::normalize_url;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

/// Resolves page-scoped listings with plain store queries: one for the
/// annotations, then one per relation collection for the whole page of results.
#[derive(Debug, Clone)]
pub struct StoreAnnotationQuery {
    dispatcher: OperationDispatcher,
}

impl StoreAnnotationQuery {
    pub fn new(dispatcher: OperationDispatcher) -> Self {
        Self { dispatcher }
    }

    async fn bookmarked(&self, urls: Vec<String>) -> DomainResult<HashSet<String>> {
        let bookmarks: Vec<AnnotationBookmark> = self
            .dispatcher
            .find_many(Operation::FindBookmarksByUrls { urls })
            .await?;
        Ok(bookmarks.into_iter().map(|b| b.url).collect())
    }
}

#[async_trait]
impl AnnotationQuery for StoreAnnotationQuery {
    #[instrument(skip(self), level = "debug")]
    async fn list_annots_by_page(
        &self,
        query: &PageAnnotationsQuery,
    ) -> DomainResult<Vec<AnnotationWithRelations>> {
        let page_url = normalize_url(&query.url)?;

        // bookmark filtering happens before paging, so page in memory then
        let annotations: Vec<Annotation> = if query.bookmarks_only {
            let all: Vec<Annotation> = self
                .dispatcher
                .find_many(Operation::FindAnnotationsByPage {
                    page_url,
                    skip: None,
                    limit: None,
                })
                .await?;
            let marked = self
                .bookmarked(all.iter().map(|a| a.url.clone()).collect())
                .await?;
            all.into_iter()
                .filter(|a| marked.contains(&a.url))
                .skip(query.skip.unwrap_or(0))
                .take(query.limit.unwrap_or(usize::MAX))
                .collect()
        } else {
            self.dispatcher
                .find_many(Operation::FindAnnotationsByPage {
                    page_url,
                    skip: query.skip,
                    limit: query.limit,
                })
                .await?
        };
        if annotations.is_empty() {
            return Ok(Vec::new());
        }

        let urls: Vec<String> = annotations.iter().map(|a| a.url.clone()).collect();
        let marked = self.bookmarked(urls.clone()).await?;
        let tags: Vec<TagRecord> = self
            .dispatcher
            .find_many(Operation::FindTagsByUrls { urls: urls.clone() })
            .await?;
        let entries: Vec<AnnotationListEntry> = self
            .dispatcher
            .find_many(Operation::FindAnnotListEntriesByUrls { urls })
            .await?;

        let mut tags_by_url: HashMap<String, Vec<String>> = HashMap::new();
        for tag in tags {
            tags_by_url.entry(tag.url).or_default().push(tag.name);
        }
        let mut lists_by_url: HashMap<String, Vec<i64>> = HashMap::new();
        for entry in entries {
            lists_by_url.entry(entry.url).or_default().push(entry.list_id);
        }

        debug!("Resolved relations for {} annotation(s)", annotations.len());
        Ok(annotations
            .into_iter()
            .map(|annotation| {
                let mut tags = tags_by_url.remove(&annotation.url).unwrap_or_default();
                tags.sort();
                let mut lists = lists_by_url.remove(&annotation.url).unwrap_or_default();
                lists.sort_unstable();
                AnnotationWithRelations {
                    has_bookmark: marked.contains(&annotation.url),
                    tags,
                    lists,
                    annotation,
                }
            })
            .collect())
    }
}
