// src/domain/services/annotation_query.rs
use crate::domain::annotation::{AnnotationWithRelations, PageAnnotationsQuery};
use crate::domain::error::DomainResult;
use async_trait::async_trait;

/// Page-scoped annotation listing with relations resolved.
#[async_trait]
pub trait AnnotationQuery: Send + Sync {
    async fn list_annots_by_page(
        &self,
        query: &PageAnnotationsQuery,
    ) -> DomainResult<Vec<AnnotationWithRelations>>;
}
