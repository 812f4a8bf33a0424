use pagemark::domain::annotation::{NewAnnotationBuilder, PageAnnotationsQuery};
use pagemark::domain::error::DomainError;
use pagemark::domain::repositories::document_store::Collection;
use pagemark::util::testing::TestContext;

async fn annotate(ctx: &TestContext, page_url: &str, body: &str) -> String {
    let fields = NewAnnotationBuilder::default()
        .page_url(page_url)
        .page_title("A page")
        .body(body)
        .build()
        .unwrap();
    ctx.annotations.create_annotation(fields).await.unwrap()
}

#[tokio::test]
async fn given_annotated_page_when_list_membership_changes_then_lists_follow() {
    // Arrange
    let ctx = TestContext::new();
    let url = annotate(&ctx, "https://a.com/article", "quote").await;
    let list = ctx.lists.create_list("Quotes").await.unwrap();

    // Act
    assert!(ctx.annotations.insert_annot_to_list(list, &url).await.unwrap());
    let lists = ctx.annotations.fetch_lists_for_annotation(&url).await.unwrap();

    // Assert
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0].name, "Quotes");

    let removed = ctx.annotations.remove_annot_from_list(list, &url).await.unwrap();
    assert_eq!(removed, 1);
    assert!(ctx
        .annotations
        .fetch_lists_for_annotation(&url)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn given_removed_list_when_remove_annot_then_not_found() {
    let ctx = TestContext::new();
    let url = annotate(&ctx, "https://a.com", "x").await;
    let list = ctx.lists.create_list("Gone").await.unwrap();
    ctx.annotations.insert_annot_to_list(list, &url).await.unwrap();
    ctx.lists.remove_list(list).await.unwrap();

    let err = ctx
        .annotations
        .remove_annot_from_list(list, &url)
        .await
        .unwrap_err();

    assert!(matches!(err.as_domain(), Some(DomainError::ListNotFound(_))));
    // the join row outlives its list
    assert_eq!(ctx.store.count(Collection::AnnotListEntries).await, 1);
}

#[tokio::test]
async fn given_annotation_with_relations_when_deleted_then_relations_untouched() {
    let ctx = TestContext::new();
    let url = annotate(&ctx, "https://a.com", "x").await;
    ctx.annotations.add_tag(&url, "keep").await.unwrap();
    ctx.annotations.toggle_annot_bookmark(&url).await.unwrap();

    assert!(ctx.annotations.delete_annotation(&url).await.unwrap());

    assert!(ctx.annotations.get_annotation_by_url(&url).await.unwrap().is_none());
    assert_eq!(ctx.annotations.get_tags_by_url(&url).await.unwrap(), vec!["keep"]);
    assert!(ctx.annotations.annot_has_bookmark(&url).await.unwrap());
}

#[tokio::test]
async fn given_bookmark_when_delete_by_url_twice_then_one_way_clear() {
    let ctx = TestContext::new();
    ctx.annotations.toggle_annot_bookmark("a.com#5").await.unwrap();

    assert!(ctx.annotations.delete_bookmark_by_url("a.com#5").await.unwrap());
    assert!(!ctx.annotations.delete_bookmark_by_url("a.com#5").await.unwrap());
    assert!(!ctx.annotations.annot_has_bookmark("a.com#5").await.unwrap());
}

#[tokio::test]
async fn given_many_annotations_when_paged_then_skip_and_limit_apply() {
    let ctx = TestContext::new();
    for i in 0..5i64 {
        let fields = NewAnnotationBuilder::default()
            .page_url("https://a.com/long")
            .created_when(chrono::DateTime::from_timestamp_millis(1_000 + i))
            .build()
            .unwrap();
        ctx.annotations.create_annotation(fields).await.unwrap();
    }

    let page = ctx
        .annotations
        .get_all_annotations_by_url(&PageAnnotationsQuery {
            url: "a.com/long".to_string(),
            skip: Some(1),
            limit: Some(2),
            bookmarks_only: false,
        })
        .await
        .unwrap();

    let created: Vec<i64> = page
        .iter()
        .map(|a| a.annotation.created_when.timestamp_millis())
        .collect();
    assert_eq!(created, vec![1_003, 1_002]);
}

#[tokio::test]
async fn given_tag_added_twice_when_get_tags_then_single_entry() {
    let ctx = TestContext::new();
    assert!(ctx.annotations.add_tag("a.com#1", "rust").await.unwrap());
    assert!(!ctx.annotations.add_tag("a.com#1", "rust").await.unwrap());
    assert_eq!(ctx.annotations.delete_tag("a.com#1", "rust").await.unwrap(), 1);
    assert!(ctx.annotations.get_tags_by_url("a.com#1").await.unwrap().is_empty());
}
