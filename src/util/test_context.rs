//! Isolated service graph for tests.
//!
//! Every context owns its own in-memory store, so tests can run in parallel.

use std::sync::Arc;

use crate::application::services::{AnnotationService, ListService, PageService, TabService};
use crate::domain::list::IdAllocator;
use crate::domain::repositories::dispatcher::OperationDispatcher;
use crate::infrastructure::di::service_container::{Collaborators, ServiceContainer};
use crate::infrastructure::preferences::InMemoryPreferences;
use crate::infrastructure::repositories::memory::InMemoryDocumentStore;
use crate::infrastructure::tabs::StaticTabSource;
use crate::remote::RemoteInterface;
use crate::util::testing::{init_test_env, RecordingAnalytics, StubContentSource};

/// Services wired against in-memory collaborators, with handles to inspect them.
pub struct TestContext {
    pub store: Arc<InMemoryDocumentStore>,
    pub dispatcher: OperationDispatcher,
    pub analytics: Arc<RecordingAnalytics>,
    pub tab_source: Arc<StaticTabSource>,
    pub preferences: Arc<InMemoryPreferences>,
    pub pages: Arc<dyn PageService>,
    pub lists: Arc<dyn ListService>,
    pub annotations: Arc<dyn AnnotationService>,
    pub tabs: Arc<dyn TabService>,
    pub remote: RemoteInterface,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    pub fn new() -> Self {
        let _ = init_test_env();
        let store = Arc::new(InMemoryDocumentStore::new());
        let analytics = Arc::new(RecordingAnalytics::default());
        let tab_source = Arc::new(StaticTabSource::default());
        let preferences = Arc::new(InMemoryPreferences::new());

        let container = ServiceContainer::with_collaborators(
            Collaborators {
                store: store.clone(),
                content_source: Arc::new(StubContentSource),
                tab_source: tab_source.clone(),
                preferences: preferences.clone(),
                analytics: analytics.clone(),
            },
            Arc::new(IdAllocator::new()),
            10,
        );
        let remote = container.remote();

        Self {
            store,
            dispatcher: container.dispatcher,
            analytics,
            tab_source,
            preferences,
            pages: container.page_service,
            lists: container.list_service,
            annotations: container.annotation_service,
            tabs: container.tab_service,
            remote,
        }
    }
}
