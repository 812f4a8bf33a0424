// src/domain/tab.rs
use serde::{Deserialize, Serialize};

/// An open browser tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub tab_id: i64,
    pub url: String,
}

impl Tab {
    pub fn new(tab_id: i64, url: impl Into<String>) -> Self {
        Self {
            tab_id,
            url: url.into(),
        }
    }
}

/// A browser window and its tabs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Window {
    pub window_id: i64,
    pub focused: bool,
    pub tabs: Vec<Tab>,
}
