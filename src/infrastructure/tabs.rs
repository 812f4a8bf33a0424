// src/infrastructure/tabs.rs
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::services::tab_source::TabSource;
use crate::domain::tab::{Tab, Window};
use async_trait::async_trait;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::debug;

/// Tab source over a fixed set of windows, replaceable at runtime.
#[derive(Debug, Default)]
pub struct StaticTabSource {
    windows: RwLock<Vec<Window>>,
}

impl StaticTabSource {
    pub fn new(windows: Vec<Window>) -> Self {
        Self {
            windows: RwLock::new(windows),
        }
    }

    /// Load windows from a JSON array of `{windowId, focused, tabs}` objects.
    pub fn from_file(path: &Path) -> DomainResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let windows: Vec<Window> = serde_json::from_str(&content)?;
        debug!("Loaded {} window(s) from {}", windows.len(), path.display());
        Ok(Self::new(windows))
    }

    pub async fn set_windows(&self, windows: Vec<Window>) {
        *self.windows.write().await = windows;
    }
}

#[async_trait]
impl TabSource for StaticTabSource {
    async fn active_window(&self) -> DomainResult<Window> {
        self.windows
            .read()
            .await
            .iter()
            .find(|w| w.focused)
            .cloned()
            .ok_or(DomainError::NoActiveWindow)
    }

    async fn tabs_in_window(&self, window_id: i64) -> DomainResult<Vec<Tab>> {
        self.windows
            .read()
            .await
            .iter()
            .find(|w| w.window_id == window_id)
            .map(|w| w.tabs.clone())
            .ok_or_else(|| DomainError::NotFound(format!("window {}", window_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(window_id: i64, focused: bool) -> Window {
        Window {
            window_id,
            focused,
            tabs: vec![Tab::new(window_id * 10, format!("https://w{}.com", window_id))],
        }
    }

    #[tokio::test]
    async fn given_no_focused_window_when_active_window_then_error() {
        let source = StaticTabSource::new(vec![window(1, false)]);
        assert!(matches!(
            source.active_window().await,
            Err(DomainError::NoActiveWindow)
        ));
    }

    #[tokio::test]
    async fn given_focused_window_when_tabs_in_window_then_returns_its_tabs() {
        let source = StaticTabSource::new(vec![window(1, false), window(2, true)]);
        let active = source.active_window().await.unwrap();
        assert_eq!(active.window_id, 2);
        let tabs = source.tabs_in_window(active.window_id).await.unwrap();
        assert_eq!(tabs, vec![Tab::new(20, "https://w2.com")]);
    }
}
