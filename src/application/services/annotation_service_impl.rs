// src/application/services/annotation_service_impl.rs
use crate::application::error::ApplicationResult;
use crate::application::outcome::{ItemResult, TagPatchOutcome, TagResult};
use crate::application::services::annotation_service::AnnotationService;
use crate::application::services::list_service_impl::require_list;
use crate::application::services::page_service::PageService;
use crate::domain::annotation::{
    Annotation, AnnotationBookmark, AnnotationListEntry, AnnotationWithRelations, NewAnnotation,
    PageAnnotationsQuery,
};
use crate::domain::error::DomainResult;
use crate::domain::list::PageList;
use crate::domain::page::Page;
use crate::domain::repositories::dispatcher::OperationDispatcher;
use crate::domain::repositories::operation::Operation;
use crate::domain::services::annotation_query::AnnotationQuery;
use crate::domain::services::preferences::{PreferenceStore, SHOULD_INDEX_LINKS};
use crate::domain::tag::{Tag, TagRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

pub struct AnnotationServiceImpl {
    dispatcher: OperationDispatcher,
    pages: Arc<dyn PageService>,
    query: Arc<dyn AnnotationQuery>,
    preferences: Arc<dyn PreferenceStore>,
}

impl std::fmt::Debug for AnnotationServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationServiceImpl")
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

impl AnnotationServiceImpl {
    pub fn new(
        dispatcher: OperationDispatcher,
        pages: Arc<dyn PageService>,
        query: Arc<dyn AnnotationQuery>,
        preferences: Arc<dyn PreferenceStore>,
    ) -> Self {
        debug!("Creating new AnnotationServiceImpl");
        Self {
            dispatcher,
            pages,
            query,
            preferences,
        }
    }

    async fn create_tag(&self, url: &str, name: &str) -> DomainResult<usize> {
        let tag = Tag::new(name)?;
        let written = self
            .dispatcher
            .create(Operation::CreateTag {
                tag: TagRecord::new(&tag, url),
            })
            .await?;
        Ok(usize::from(written))
    }

    async fn remove_tag(&self, url: &str, name: &str) -> DomainResult<usize> {
        self.dispatcher
            .mutate(Operation::DeleteTag {
                name: name.trim().to_string(),
                url: url.to_string(),
            })
            .await
    }
}

fn tag_results(names: &[&str], results: Vec<DomainResult<usize>>) -> Vec<TagResult> {
    names
        .iter()
        .zip(results)
        .map(|(name, result)| {
            if let Err(e) = &result {
                warn!("Tag '{}' failed: {}", name, e);
            }
            TagResult {
                name: name.to_string(),
                result: ItemResult::from(result),
            }
        })
        .collect()
}

/// Distinct names in first-seen order.
fn distinct(names: &[String]) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::with_capacity(names.len());
    for name in names.iter().map(|n| n.trim()) {
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

#[async_trait]
impl AnnotationService for AnnotationServiceImpl {
    #[instrument(skip(self, fields), level = "debug", fields(page_url = %fields.page_url))]
    async fn create_annotation(&self, fields: NewAnnotation) -> ApplicationResult<String> {
        let page = self.pages.ensure_page(&fields.page_url, None).await?;

        let mut annotation = Annotation::from_new(fields)?;
        if annotation.page_title.is_empty() {
            annotation.page_title = page.title;
        }
        let url = annotation.url.clone();
        self.dispatcher
            .create(Operation::CreateAnnotation { annotation })
            .await?;
        debug!("Created annotation {}", url);
        Ok(url)
    }

    #[instrument(skip(self, comment), level = "debug")]
    async fn edit_annotation(
        &self,
        url: &str,
        comment: &str,
        last_edited: Option<DateTime<Utc>>,
    ) -> ApplicationResult<bool> {
        let affected = self
            .dispatcher
            .mutate(Operation::EditAnnotation {
                url: url.to_string(),
                comment: comment.to_string(),
                last_edited: last_edited.unwrap_or_else(Utc::now),
            })
            .await?;
        Ok(affected > 0)
    }

    #[instrument(skip(self), level = "debug")]
    async fn delete_annotation(&self, url: &str) -> ApplicationResult<bool> {
        let removed = self
            .dispatcher
            .mutate(Operation::DeleteAnnotation {
                url: url.to_string(),
            })
            .await?;
        Ok(removed > 0)
    }

    async fn get_annotation_by_url(&self, url: &str) -> ApplicationResult<Option<Annotation>> {
        Ok(self
            .dispatcher
            .find_one(Operation::FindAnnotationByUrl {
                url: url.to_string(),
            })
            .await?)
    }

    #[instrument(skip(self), level = "debug")]
    async fn get_all_annotations_by_url(
        &self,
        query: &PageAnnotationsQuery,
    ) -> ApplicationResult<Vec<AnnotationWithRelations>> {
        Ok(self.query.list_annots_by_page(query).await?)
    }

    #[instrument(skip(self), level = "debug")]
    async fn toggle_annot_bookmark(&self, url: &str) -> ApplicationResult<bool> {
        if self.annot_has_bookmark(url).await? {
            self.delete_bookmark_by_url(url).await?;
            return Ok(false);
        }
        self.dispatcher
            .create(Operation::CreateBookmark {
                bookmark: AnnotationBookmark {
                    url: url.to_string(),
                    created_at: Utc::now(),
                },
            })
            .await?;
        Ok(true)
    }

    async fn annot_has_bookmark(&self, url: &str) -> ApplicationResult<bool> {
        let bookmark: Option<AnnotationBookmark> = self
            .dispatcher
            .find_one(Operation::FindBookmarkByUrl {
                url: url.to_string(),
            })
            .await?;
        Ok(bookmark.is_some())
    }

    #[instrument(skip(self), level = "debug")]
    async fn delete_bookmark_by_url(&self, url: &str) -> ApplicationResult<bool> {
        let removed = self
            .dispatcher
            .mutate(Operation::DeleteBookmarkByUrl {
                url: url.to_string(),
            })
            .await?;
        Ok(removed > 0)
    }

    #[instrument(skip(self), level = "debug")]
    async fn insert_annot_to_list(&self, list_id: i64, url: &str) -> ApplicationResult<bool> {
        require_list(&self.dispatcher, list_id).await?;
        Ok(self
            .dispatcher
            .create(Operation::CreateAnnotListEntry {
                entry: AnnotationListEntry {
                    list_id,
                    url: url.to_string(),
                    created_at: Utc::now(),
                },
            })
            .await?)
    }

    #[instrument(skip(self), level = "debug")]
    async fn remove_annot_from_list(&self, list_id: i64, url: &str) -> ApplicationResult<usize> {
        require_list(&self.dispatcher, list_id).await?;
        Ok(self
            .dispatcher
            .mutate(Operation::DeleteAnnotListEntry {
                list_id,
                url: url.to_string(),
            })
            .await?)
    }

    async fn fetch_lists_for_annotation(&self, url: &str) -> ApplicationResult<Vec<PageList>> {
        let entries: Vec<AnnotationListEntry> = self
            .dispatcher
            .find_many(Operation::FindAnnotListEntriesByUrl {
                url: url.to_string(),
            })
            .await?;
        if entries.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .dispatcher
            .find_many(Operation::FindListsIncluding {
                ids: entries.iter().map(|e| e.list_id).collect(),
            })
            .await?)
    }

    async fn get_tags_by_url(&self, url: &str) -> ApplicationResult<Vec<String>> {
        let tags: Vec<TagRecord> = self
            .dispatcher
            .find_many(Operation::FindTagsByUrl {
                url: url.to_string(),
            })
            .await?;
        Ok(tags.into_iter().map(|t| t.name).collect())
    }

    #[instrument(skip(self), level = "debug")]
    async fn add_tag(&self, url: &str, name: &str) -> ApplicationResult<bool> {
        Ok(self.create_tag(url, name).await? > 0)
    }

    #[instrument(skip(self), level = "debug")]
    async fn delete_tag(&self, url: &str, name: &str) -> ApplicationResult<usize> {
        Ok(self.remove_tag(url, name).await?)
    }

    #[instrument(skip(self), level = "debug")]
    async fn edit_annotation_tags(
        &self,
        to_add: &[String],
        to_delete: &[String],
        url: &str,
    ) -> ApplicationResult<TagPatchOutcome> {
        let to_delete = distinct(to_delete);
        // a name on both sides resolves to deleted
        let to_add: Vec<&str> = distinct(to_add)
            .into_iter()
            .filter(|name| !to_delete.contains(name))
            .collect();

        // the delete phase settles completely before any add starts
        let deleted = join_all(to_delete.iter().map(|name| self.remove_tag(url, name))).await;
        let added = join_all(to_add.iter().map(|name| self.create_tag(url, name))).await;

        let outcome = TagPatchOutcome {
            url: url.to_string(),
            deleted: tag_results(&to_delete, deleted),
            added: tag_results(&to_add, added),
        };
        debug!(
            "Patched tags of {}: -{} +{}",
            url,
            outcome.deleted.len(),
            outcome.added.len()
        );
        Ok(outcome)
    }

    #[instrument(skip(self), level = "debug")]
    async fn index_page_from_tab(&self, tab_id: i64, url: &str) -> ApplicationResult<Page> {
        let index_links = self
            .preferences
            .get_bool(SHOULD_INDEX_LINKS)
            .await?
            .unwrap_or(false);

        if !index_links {
            return self.pages.ensure_page(url, None).await;
        }
        let page = self.pages.create_full_page(Some(tab_id), url).await?;
        self.pages.ensure_visit(page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::list_service::ListService;
    use crate::domain::annotation::NewAnnotationBuilder;
    use crate::domain::error::DomainError;
    use crate::domain::repositories::document_store::Collection;
    use crate::util::testing::TestContext;

    fn new_annotation(page_url: &str) -> NewAnnotation {
        NewAnnotationBuilder::default()
            .page_url(page_url)
            .body("quoted")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn given_new_annotation_when_created_then_page_is_materialized_first() {
        // Arrange
        let ctx = TestContext::new();

        // Act
        let url = ctx
            .annotations
            .create_annotation(new_annotation("https://example.com/a"))
            .await
            .unwrap();

        // Assert
        assert!(url.starts_with("example.com/a#"));
        let page = ctx.pages.find_page("example.com/a").await.unwrap().unwrap();
        assert_eq!(page.visits.len(), 1);
        let annotation = ctx.annotations.get_annotation_by_url(&url).await.unwrap().unwrap();
        assert_eq!(annotation.created_when, annotation.last_edited);
        assert_eq!(annotation.page_title, page.title);
    }

    #[tokio::test]
    async fn given_annotation_when_edited_then_only_comment_and_last_edited_change() {
        let ctx = TestContext::new();
        let url = ctx
            .annotations
            .create_annotation(new_annotation("https://a.com"))
            .await
            .unwrap();
        let before = ctx.annotations.get_annotation_by_url(&url).await.unwrap().unwrap();
        let edited_at = before.created_when + chrono::Duration::minutes(1);

        assert!(ctx
            .annotations
            .edit_annotation(&url, "a note", Some(edited_at))
            .await
            .unwrap());

        let after = ctx.annotations.get_annotation_by_url(&url).await.unwrap().unwrap();
        assert_eq!(after.comment, "a note");
        assert_eq!(after.last_edited, edited_at);
        assert_eq!(after.body, before.body);
        assert_eq!(after.created_when, before.created_when);
    }

    #[tokio::test]
    async fn given_bookmark_toggled_twice_then_true_then_false() {
        let ctx = TestContext::new();
        assert!(ctx.annotations.toggle_annot_bookmark("a.com#1").await.unwrap());
        assert!(ctx.annotations.annot_has_bookmark("a.com#1").await.unwrap());
        assert!(!ctx.annotations.toggle_annot_bookmark("a.com#1").await.unwrap());
        assert!(!ctx.annotations.annot_has_bookmark("a.com#1").await.unwrap());
    }

    #[tokio::test]
    async fn given_unknown_list_when_insert_annot_then_not_found_and_no_join_row() {
        let ctx = TestContext::new();
        let err = ctx
            .annotations
            .insert_annot_to_list(99, "a.com#1")
            .await
            .unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::ListNotFound(99))));
        assert_eq!(ctx.store.count(Collection::AnnotListEntries).await, 0);
    }

    #[tokio::test]
    async fn given_same_tag_added_and_deleted_when_patch_then_tag_is_deleted() {
        let ctx = TestContext::new();
        ctx.annotations.add_tag("a.com#1", "a").await.unwrap();

        let outcome = ctx
            .annotations
            .edit_annotation_tags(&["a".into(), "b".into()], &["a".into()], "a.com#1")
            .await
            .unwrap();

        assert!(outcome.all_succeeded());
        assert_eq!(outcome.deleted.len(), 1);
        assert_eq!(outcome.added.len(), 1);
        let tags = ctx.annotations.get_tags_by_url("a.com#1").await.unwrap();
        assert_eq!(tags, vec!["b".to_string()]);
    }

    #[tokio::test]
    async fn given_invalid_tag_when_patch_then_reported_per_tag() {
        let ctx = TestContext::new();
        let outcome = ctx
            .annotations
            .edit_annotation_tags(&["ok".into(), "bad,tag".into()], &[], "a.com#1")
            .await
            .unwrap();
        assert!(!outcome.all_succeeded());
        assert!(outcome.added[0].result.is_ok());
        assert!(!outcome.added[1].result.is_ok());
    }

    #[tokio::test]
    async fn given_relations_when_list_by_page_then_enriched_newest_first() {
        let ctx = TestContext::new();
        let list = ctx.lists.create_list("Notes").await.unwrap();
        let mut urls = Vec::new();
        for ms in [1_000i64, 2_000, 3_000] {
            let fields = NewAnnotationBuilder::default()
                .page_url("https://a.com/p")
                .created_when(DateTime::from_timestamp_millis(ms))
                .build()
                .unwrap();
            urls.push(ctx.annotations.create_annotation(fields).await.unwrap());
        }
        ctx.annotations.toggle_annot_bookmark(&urls[0]).await.unwrap();
        ctx.annotations.add_tag(&urls[0], "x").await.unwrap();
        ctx.annotations.insert_annot_to_list(list, &urls[0]).await.unwrap();

        let all = ctx
            .annotations
            .get_all_annotations_by_url(&PageAnnotationsQuery {
                url: "https://www.a.com/p/".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        let order: Vec<&str> = all.iter().map(|a| a.annotation.url.as_str()).collect();
        assert_eq!(order, vec![urls[2].as_str(), urls[1].as_str(), urls[0].as_str()]);
        assert!(all[2].has_bookmark);
        assert_eq!(all[2].tags, vec!["x".to_string()]);
        assert_eq!(all[2].lists, vec![list]);

        let marked = ctx
            .annotations
            .get_all_annotations_by_url(&PageAnnotationsQuery {
                url: "a.com/p".into(),
                bookmarks_only: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(marked.len(), 1);
    }

    #[tokio::test]
    async fn given_indexing_disabled_when_index_page_from_tab_then_stub_page() {
        let ctx = TestContext::new();
        let page = ctx.annotations.index_page_from_tab(1, "https://a.com").await.unwrap();
        assert!(page.is_stub);
        assert_eq!(page.visits.len(), 1);
    }

    #[tokio::test]
    async fn given_indexing_enabled_when_index_page_from_tab_then_full_page_with_visit() {
        let ctx = TestContext::new();
        ctx.preferences.set_bool(SHOULD_INDEX_LINKS, true).await.unwrap();
        let page = ctx.annotations.index_page_from_tab(1, "https://a.com").await.unwrap();
        assert!(!page.is_stub);
        assert_eq!(page.visits.len(), 1);
    }
}
