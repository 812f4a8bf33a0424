// src/util/testing.rs

use std::env;
use std::sync::{Mutex, OnceLock};
use tracing::{debug, info, instrument};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::config::{ENV_DB_URL, ENV_INDEX_LINKS};
use crate::domain::analytics::{AnalyticsEvent, AnalyticsSink};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::services::page_content::{PageContent, PageContentSource};
use async_trait::async_trait;

pub use crate::util::test_context::TestContext;

/// Global test configuration, initialized exactly once.
#[derive(Debug)]
pub struct TestEnv {
    /// Database url used by tests that need a persistent store
    pub db_url: &'static str,
}

static TEST_ENV: OnceLock<TestEnv> = OnceLock::new();

/// Initializes the global test environment exactly once.
/// - Sets up logging
pub fn init_test_env() -> &'static TestEnv {
    TEST_ENV.get_or_init(|| {
        setup_test_logging();
        info!("Test environment initialized");
        TestEnv { db_url: ":memory:" }
    })
}

/// Logging setup only runs once; subsequent calls do nothing if `tracing` is already set.
fn setup_test_logging() {
    debug!("Attempting logger init from testing.rs");
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
        return;
    }

    let noisy_modules = ["html5ever", "reqwest", "hyper_util", "mio", "want", "diesel"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    subscriber.try_init().unwrap_or_else(|e| {
        eprintln!("Error: Failed to set up logging: {}", e);
    });
}

/// Restores the pagemark environment variables when dropped.
#[derive(Debug, Clone)]
pub struct EnvGuard {
    db_url: Option<String>,
    index_links: Option<String>,
}

impl Default for EnvGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvGuard {
    pub fn new() -> Self {
        Self {
            db_url: env::var(ENV_DB_URL).ok(),
            index_links: env::var(ENV_INDEX_LINKS).ok(),
        }
    }
}

impl Drop for EnvGuard {
    #[instrument(level = "trace")]
    fn drop(&mut self) {
        env::remove_var(ENV_DB_URL);
        env::remove_var(ENV_INDEX_LINKS);
        if let Some(val) = &self.db_url {
            env::set_var(ENV_DB_URL, val);
        }
        if let Some(val) = &self.index_links {
            env::set_var(ENV_INDEX_LINKS, val);
        }
    }
}

/// Analytics sink remembering every event, in order.
#[derive(Debug, Default)]
pub struct RecordingAnalytics {
    events: Mutex<Vec<AnalyticsEvent>>,
}

impl RecordingAnalytics {
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl AnalyticsSink for RecordingAnalytics {
    fn track(&self, event: AnalyticsEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

/// Content source deriving title and text from the url.
/// Urls containing "offline" cannot be loaded.
#[derive(Debug, Default, Clone, Copy)]
pub struct StubContentSource;

#[async_trait]
impl PageContentSource for StubContentSource {
    async fn load_content(&self, _tab_id: Option<i64>, url: &str) -> DomainResult<PageContent> {
        if url.contains("offline") {
            return Err(DomainError::ContentUnavailable(format!("{} is offline", url)));
        }
        Ok(PageContent {
            full_url: url.to_string(),
            title: format!("Title of {}", url),
            text: format!("Content of {}", url),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn given_modified_env_when_guard_dropped_then_restored() {
        let _ = init_test_env();
        env::set_var(ENV_DB_URL, "/before.db");
        {
            let _guard = EnvGuard::new();
            env::set_var(ENV_DB_URL, "/during.db");
        }
        assert_eq!(env::var(ENV_DB_URL).unwrap(), "/before.db");
        env::remove_var(ENV_DB_URL);
    }

    #[tokio::test]
    async fn given_offline_url_when_load_content_then_unavailable() {
        let result = StubContentSource.load_content(None, "https://offline.test").await;
        assert!(matches!(result, Err(DomainError::ContentUnavailable(_))));
    }

    #[test]
    fn given_tracked_events_when_events_then_in_order() {
        let analytics = RecordingAnalytics::default();
        analytics.track(AnalyticsEvent::CollectionCreated);
        analytics.track(AnalyticsEvent::PageInserted);
        assert_eq!(
            analytics.events(),
            vec![AnalyticsEvent::CollectionCreated, AnalyticsEvent::PageInserted]
        );
    }
}
