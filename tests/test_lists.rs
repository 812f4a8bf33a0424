use pagemark::domain::analytics::AnalyticsEvent;
use pagemark::domain::error::DomainError;
use pagemark::domain::list::ListQuery;
use pagemark::domain::repositories::document_store::Collection;
use pagemark::util::testing::TestContext;

#[tokio::test]
async fn given_same_name_when_create_lists_concurrently_then_same_id() {
    // Arrange
    let ctx = TestContext::new();
    let names = vec!["Reading".to_string()];

    // Act
    let (first, second) = tokio::join!(
        ctx.lists.create_lists_if_missing(&names),
        ctx.lists.create_lists_if_missing(&names)
    );

    // Assert
    assert_eq!(first.unwrap(), second.unwrap());
    assert_eq!(ctx.store.count(Collection::CustomLists).await, 1);
}

#[tokio::test]
async fn given_existing_list_when_create_if_missing_with_other_case_then_existing_id() {
    let ctx = TestContext::new();
    let id = ctx.lists.create_list("Research").await.unwrap();

    let ids = ctx
        .lists
        .create_lists_if_missing(&["research".to_string(), "New".to_string()])
        .await
        .unwrap();

    assert_eq!(ids[0], id);
    assert_ne!(ids[1], id);
}

#[tokio::test]
async fn given_list_with_entries_when_removed_then_entries_remain() {
    // Arrange
    let ctx = TestContext::new();
    let id = ctx.lists.create_list("Doomed").await.unwrap();
    ctx.lists
        .insert_page_to_list(id, "https://a.com/page")
        .await
        .unwrap();

    // Act
    ctx.lists.remove_list(id).await.unwrap();

    // Assert: deletion does not cascade to the join rows
    assert!(ctx.lists.fetch_list_by_id(id).await.unwrap().is_none());
    assert_eq!(ctx.store.count(Collection::PageListEntries).await, 1);
    assert_eq!(ctx.lists.fetch_list_pages_by_id(id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn given_inserted_page_when_fetch_by_url_then_list_found() {
    let ctx = TestContext::new();
    let id = ctx.lists.create_list("Docs").await.unwrap();
    ctx.lists
        .insert_page_to_list(id, "https://www.rust-lang.org/learn/")
        .await
        .unwrap();

    let lists = ctx
        .lists
        .fetch_list_pages_by_url("rust-lang.org/learn")
        .await
        .unwrap();

    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0].id, id);
    let page = ctx.pages.find_page("rust-lang.org/learn").await.unwrap().unwrap();
    assert!(page.has_visits());
}

#[tokio::test]
async fn given_page_with_port_when_removed_by_normalized_url_then_entry_deleted() {
    let ctx = TestContext::new();
    let id = ctx.lists.create_list("Local").await.unwrap();
    let entry = ctx
        .lists
        .insert_page_to_list(id, "http://localhost:8080/app")
        .await
        .unwrap();
    assert_eq!(entry.page_url, "localhost:8080/app");

    let lists = ctx.lists.fetch_list_pages_by_url(&entry.page_url).await.unwrap();
    assert_eq!(lists.len(), 1);

    let removed = ctx.lists.remove_page_from_list(id, &entry.page_url).await.unwrap();
    assert_eq!(removed, 1);
    assert!(ctx.lists.fetch_list_pages_by_id(id).await.unwrap().is_empty());
}

#[tokio::test]
async fn given_missing_entry_when_remove_page_then_zero_and_no_error() {
    let ctx = TestContext::new();
    let id = ctx.lists.create_list("Empty").await.unwrap();
    let removed = ctx.lists.remove_page_from_list(id, "a.com").await.unwrap();
    assert_eq!(removed, 0);
    assert_eq!(
        ctx.analytics.events(),
        vec![AnalyticsEvent::CollectionCreated, AnalyticsEvent::PageRemoved]
    );
}

#[tokio::test]
async fn given_many_lists_when_fetch_all_with_exclusions_then_paged_by_id() {
    let ctx = TestContext::new();
    let mut ids = Vec::new();
    for name in ["a", "b", "c", "d"] {
        ids.push(ctx.lists.create_list(name).await.unwrap());
    }

    let lists = ctx
        .lists
        .fetch_all_lists(&ListQuery {
            excluded_ids: vec![ids[0]],
            skip: Some(1),
            limit: Some(2),
        })
        .await
        .unwrap();

    let fetched: Vec<i64> = lists.iter().map(|l| l.id).collect();
    assert_eq!(fetched, vec![ids[2], ids[3]]);
}

#[tokio::test]
async fn given_renamed_list_when_fetch_ignore_case_then_new_name_resolves() {
    let ctx = TestContext::new();
    let id = ctx.lists.create_list("Old").await.unwrap();
    ctx.lists.rename_list(id, "Shiny").await.unwrap();

    assert!(ctx.lists.fetch_list_ignore_case("old").await.unwrap().is_none());
    let list = ctx.lists.fetch_list_ignore_case("SHINY").await.unwrap().unwrap();
    assert_eq!(list.id, id);
}

#[tokio::test]
async fn given_unknown_list_when_insert_page_then_list_not_found() {
    let ctx = TestContext::new();
    let err = ctx
        .lists
        .insert_page_to_list(404, "https://a.com")
        .await
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::ListNotFound(404))));
}

#[tokio::test]
async fn given_concurrent_ensure_page_when_same_url_then_single_visited_page() {
    let ctx = TestContext::new();

    let (a, b) = tokio::join!(
        ctx.pages.ensure_page("https://a.com/x", None),
        ctx.pages.ensure_page("https://a.com/x/", None)
    );

    assert_eq!(a.unwrap().url, b.unwrap().url);
    assert_eq!(ctx.store.count(Collection::Pages).await, 1);
    let page = ctx.pages.find_page("a.com/x").await.unwrap().unwrap();
    assert!(!page.visits.is_empty());
}
