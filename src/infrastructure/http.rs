// src/infrastructure/http.rs
use crate::domain::error::DomainResult;
use crate::domain::services::page_content::{PageContent, PageContentSource};
use crate::infrastructure::error::InfrastructureError;
use async_trait::async_trait;
use itertools::Itertools;
use select::document::Document;
use select::predicate::{Name, Text};
use std::time::Duration;
use tracing::{debug, instrument};

const SKIPPED_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Loads page content over HTTP. The tab id is ignored: tabs cannot be read remotely.
#[derive(Debug, Clone)]
pub struct HttpPageContentSource {
    client: reqwest::Client,
}

impl HttpPageContentSource {
    pub fn new(timeout: Duration) -> Result<Self, InfrastructureError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pagemark/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

/// Extract the title and the visible text of an HTML document.
pub fn extract_content(full_url: &str, html: &str) -> PageContent {
    let document = Document::from(html);

    let title = document
        .find(Name("title"))
        .next()
        .map(|n| n.text().trim().to_owned())
        .unwrap_or_default();

    let text = document
        .find(Name("body"))
        .next()
        .map(|body| {
            body.find(Text)
                .filter(|node| {
                    node.parent()
                        .and_then(|p| p.name())
                        .map_or(true, |name| !SKIPPED_ELEMENTS.contains(&name))
                })
                .map(|node| node.text())
                .join(" ")
        })
        .map(|raw| raw.split_whitespace().join(" "))
        .unwrap_or_default();

    PageContent {
        full_url: full_url.to_string(),
        title,
        text,
    }
}

#[async_trait]
impl PageContentSource for HttpPageContentSource {
    #[instrument(skip(self), level = "debug")]
    async fn load_content(&self, _tab_id: Option<i64>, url: &str) -> DomainResult<PageContent> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(InfrastructureError::from)?;

        let status = response.status();
        if !status.is_success() {
            return Err(InfrastructureError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }
        if let Some(content_type) = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !content_type.contains("html") && !content_type.starts_with("text/") {
                return Err(InfrastructureError::UnsupportedContent(content_type.to_string()).into());
            }
        }

        let final_url = response.url().to_string();
        let body = response.text().await.map_err(InfrastructureError::from)?;
        debug!("Loaded {} bytes from {}", body.len(), final_url);
        Ok(extract_content(url, &body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_html_when_extract_content_then_title_and_visible_text() {
        let html = r#"<html><head><title> Rust Docs </title><style>body{}</style></head>
            <body><h1>Hello</h1><script>var x = 1;</script><p>world
            of   text</p></body></html>"#;
        let content = extract_content("https://a.com", html);
        assert_eq!(content.title, "Rust Docs");
        assert_eq!(content.text, "Hello world of text");
        assert_eq!(content.full_url, "https://a.com");
    }

    #[test]
    fn given_html_without_title_when_extract_content_then_empty_title() {
        let content = extract_content("https://a.com", "<body>only text</body>");
        assert_eq!(content.title, "");
        assert_eq!(content.text, "only text");
    }
}
