// src/domain/analytics.rs
use std::fmt;

/// Fire-and-forget usage events emitted by the list store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalyticsEvent {
    CollectionCreated,
    CollectionRemoved,
    PageInserted,
    PageRemoved,
}

impl AnalyticsEvent {
    pub fn category(&self) -> &'static str {
        "Collections"
    }

    pub fn action(&self) -> &'static str {
        match self {
            AnalyticsEvent::CollectionCreated => "create",
            AnalyticsEvent::CollectionRemoved => "delete",
            AnalyticsEvent::PageInserted => "addPage",
            AnalyticsEvent::PageRemoved => "removePage",
        }
    }
}

impl fmt::Display for AnalyticsEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.category(), self.action())
    }
}

/// Sink for analytics events. Implementations must not fail the caller.
pub trait AnalyticsSink: Send + Sync {
    fn track(&self, event: AnalyticsEvent);
}
