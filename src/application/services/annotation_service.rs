// src/application/services/annotation_service.rs
use crate::application::error::ApplicationResult;
use crate::application::outcome::TagPatchOutcome;
use crate::domain::annotation::{
    Annotation, AnnotationWithRelations, NewAnnotation, PageAnnotationsQuery,
};
use crate::domain::list::PageList;
use crate::domain::page::Page;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Service interface for annotations and their bookmark, tag and list relations
#[async_trait]
pub trait AnnotationService: Send + Sync {
    /// Materialize the annotated page, persist the annotation and return its url.
    async fn create_annotation(&self, fields: NewAnnotation) -> ApplicationResult<String>;

    /// Update comment and last-edited time only. Returns whether a record matched.
    async fn edit_annotation(
        &self,
        url: &str,
        comment: &str,
        last_edited: Option<DateTime<Utc>>,
    ) -> ApplicationResult<bool>;

    /// Delete the annotation record; relations are left to the caller.
    async fn delete_annotation(&self, url: &str) -> ApplicationResult<bool>;

    async fn get_annotation_by_url(&self, url: &str) -> ApplicationResult<Option<Annotation>>;

    async fn get_all_annotations_by_url(
        &self,
        query: &PageAnnotationsQuery,
    ) -> ApplicationResult<Vec<AnnotationWithRelations>>;

    /// Flip bookmark state, returning `true` when the annotation is now bookmarked.
    async fn toggle_annot_bookmark(&self, url: &str) -> ApplicationResult<bool>;

    async fn annot_has_bookmark(&self, url: &str) -> ApplicationResult<bool>;

    /// One-way clear of the bookmark. Returns whether one existed.
    async fn delete_bookmark_by_url(&self, url: &str) -> ApplicationResult<bool>;

    async fn insert_annot_to_list(&self, list_id: i64, url: &str) -> ApplicationResult<bool>;

    async fn remove_annot_from_list(&self, list_id: i64, url: &str) -> ApplicationResult<usize>;

    async fn fetch_lists_for_annotation(&self, url: &str) -> ApplicationResult<Vec<PageList>>;

    /// Tag names of a page or annotation url, sorted.
    async fn get_tags_by_url(&self, url: &str) -> ApplicationResult<Vec<String>>;

    async fn add_tag(&self, url: &str, name: &str) -> ApplicationResult<bool>;

    async fn delete_tag(&self, url: &str, name: &str) -> ApplicationResult<usize>;

    /// Delete `to_delete`, then add `to_add`. Each phase runs concurrently.
    async fn edit_annotation_tags(
        &self,
        to_add: &[String],
        to_delete: &[String],
        url: &str,
    ) -> ApplicationResult<TagPatchOutcome>;

    /// Materialize a page opened from a link: full content when link indexing is enabled.
    async fn index_page_from_tab(&self, tab_id: i64, url: &str) -> ApplicationResult<Page>;
}
