// src/infrastructure/analytics.rs
use crate::domain::analytics::{AnalyticsEvent, AnalyticsSink};
use tracing::info;

/// Writes analytics events to the log instead of a remote collector.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAnalytics;

impl AnalyticsSink for TracingAnalytics {
    fn track(&self, event: AnalyticsEvent) {
        info!(
            category = event.category(),
            action = event.action(),
            "analytics event"
        );
    }
}
