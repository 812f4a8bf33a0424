// src/infrastructure/di/service_container.rs
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::{AnnotationService, ListService, PageService, TabService};
use crate::application::{AnnotationServiceImpl, ListServiceImpl, PageServiceImpl, TabServiceImpl};
use crate::config::Settings;
use crate::domain::analytics::AnalyticsSink;
use crate::domain::list::{IdAllocator, PageList};
use crate::domain::repositories::dispatcher::OperationDispatcher;
use crate::domain::repositories::document_store::DocumentStore;
use crate::domain::repositories::operation::Operation;
use crate::domain::services::page_content::PageContentSource;
use crate::domain::services::preferences::PreferenceStore;
use crate::domain::services::tab_source::TabSource;
use crate::infrastructure::analytics::TracingAnalytics;
use crate::infrastructure::annotation_query::StoreAnnotationQuery;
use crate::infrastructure::http::HttpPageContentSource;
use crate::infrastructure::preferences::InMemoryPreferences;
use crate::infrastructure::repositories::sqlite::repository::SqliteDocumentStore;
use crate::infrastructure::tabs::StaticTabSource;
use crate::remote::RemoteInterface;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// External collaborators the services are wired against.
pub struct Collaborators {
    pub store: Arc<dyn DocumentStore>,
    pub content_source: Arc<dyn PageContentSource>,
    pub tab_source: Arc<dyn TabSource>,
    pub preferences: Arc<dyn PreferenceStore>,
    pub analytics: Arc<dyn AnalyticsSink>,
}

/// Production service container - single source of truth for service creation
pub struct ServiceContainer {
    pub dispatcher: OperationDispatcher,
    pub page_service: Arc<dyn PageService>,
    pub list_service: Arc<dyn ListService>,
    pub annotation_service: Arc<dyn AnnotationService>,
    pub tab_service: Arc<dyn TabService>,
}

impl ServiceContainer {
    /// Create all services from configuration. The database must exist.
    #[instrument(skip_all, level = "debug")]
    pub async fn new(config: &Settings) -> ApplicationResult<Self> {
        let store = Self::create_store(&config.db_url)?;
        let content_source = HttpPageContentSource::new(Duration::from_secs(config.fetch_timeout_secs))
            .map_err(|e| ApplicationError::Other(format!("Failed to create HTTP client: {}", e)))?;
        let tab_source = match &config.tabs_file {
            Some(path) => StaticTabSource::from_file(Path::new(path))?,
            None => StaticTabSource::default(),
        };

        let collaborators = Collaborators {
            store: store.clone(),
            content_source: Arc::new(content_source),
            tab_source: Arc::new(tab_source),
            preferences: Arc::new(InMemoryPreferences::from_settings(config)),
            analytics: Arc::new(TracingAnalytics),
        };

        let ids = Self::create_id_allocator(&OperationDispatcher::new(store)).await?;
        Ok(Self::with_collaborators(collaborators, ids, config.suggestion_limit))
    }

    /// Wire the services with explicit dependency injection
    pub fn with_collaborators(
        collaborators: Collaborators,
        ids: Arc<IdAllocator>,
        suggestion_limit: usize,
    ) -> Self {
        let dispatcher = OperationDispatcher::new(collaborators.store);

        let page_service: Arc<dyn PageService> = Arc::new(PageServiceImpl::new(
            dispatcher.clone(),
            collaborators.content_source,
        ));
        let list_service = Arc::new(ListServiceImpl::new(
            dispatcher.clone(),
            page_service.clone(),
            collaborators.analytics,
            ids,
            suggestion_limit,
        ));
        let annotation_service = Arc::new(AnnotationServiceImpl::new(
            dispatcher.clone(),
            page_service.clone(),
            Arc::new(StoreAnnotationQuery::new(dispatcher.clone())),
            collaborators.preferences,
        ));
        let tab_service = Arc::new(TabServiceImpl::new(
            dispatcher.clone(),
            page_service.clone(),
            collaborators.tab_source,
        ));

        Self {
            dispatcher,
            page_service,
            list_service,
            annotation_service,
            tab_service,
        }
    }

    /// The by-name interface over all services.
    pub fn remote(&self) -> RemoteInterface {
        RemoteInterface::new(
            self.page_service.clone(),
            self.list_service.clone(),
            self.annotation_service.clone(),
            self.tab_service.clone(),
        )
    }

    fn create_store(db_url: &str) -> ApplicationResult<Arc<dyn DocumentStore>> {
        if db_url != ":memory:" && !Path::new(db_url).exists() {
            return Err(ApplicationError::Other(format!(
                "Database not found at '{}'. Create one with 'pagemark create-db {}' or set PAGEMARK_DB_URL",
                db_url, db_url
            )));
        }

        // Create the store, runs all migrations
        let store = SqliteDocumentStore::from_url(db_url).map_err(|e| {
            ApplicationError::Other(format!("Failed to open document store: {}", e))
        })?;
        Ok(Arc::new(store))
    }

    /// Seed the allocator above the newest persisted list id.
    async fn create_id_allocator(dispatcher: &OperationDispatcher) -> ApplicationResult<Arc<IdAllocator>> {
        let newest: Vec<PageList> = dispatcher.find_many(Operation::FindNewestList).await?;
        let floor = newest.first().map_or(0, |list| list.id);
        debug!("Allocating list ids after {}", floor);
        Ok(Arc::new(IdAllocator::starting_after(floor)))
    }
}
