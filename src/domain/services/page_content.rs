// src/domain/services/page_content.rs
use crate::domain::error::DomainResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Content extracted from a loaded page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    pub full_url: String,
    pub title: String,
    pub text: String,
}

/// Loads the content of a page, either from the tab it is open in or remotely.
#[async_trait]
pub trait PageContentSource: Send + Sync {
    async fn load_content(&self, tab_id: Option<i64>, url: &str) -> DomainResult<PageContent>;
}
