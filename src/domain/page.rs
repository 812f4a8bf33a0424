// src/domain/page.rs
use crate::domain::error::DomainResult;
use crate::domain::services::page_content::PageContent;
use crate::domain::url::{extract_domain, normalize_url};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single recorded view of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Visit {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub time: DateTime<Utc>,
}

/// Represents a page entity, identified by its normalized URL
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub url: String,
    pub full_url: String,
    pub domain: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub is_stub: bool,
    #[serde(default)]
    pub visits: Vec<Visit>,
}

impl Page {
    /// Creates a stub page: no content, no visits yet.
    pub fn stub(full_url: &str, title: Option<&str>) -> DomainResult<Self> {
        Ok(Self {
            url: normalize_url(full_url)?,
            full_url: full_url.trim().to_string(),
            domain: extract_domain(full_url)?,
            title: title.map_or_else(|| full_url.trim().to_string(), ToString::to_string),
            text: None,
            is_stub: true,
            visits: Vec::new(),
        })
    }

    /// Creates a fully indexed page from loaded content.
    pub fn from_content(content: PageContent) -> DomainResult<Self> {
        let mut page = Self::stub(&content.full_url, None)?;
        page.fill_content(content);
        Ok(page)
    }

    /// Replaces title and text with loaded content and clears the stub flag.
    /// Visits are kept.
    pub fn fill_content(&mut self, content: PageContent) {
        if !content.title.is_empty() {
            self.title = content.title;
        }
        self.text = Some(content.text);
        self.is_stub = false;
    }

    /// Appends a visit, keeping the sequence ordered.
    pub fn add_visit(&mut self, time: DateTime<Utc>) {
        let visit = Visit { time };
        let pos = self.visits.partition_point(|v| *v <= visit);
        self.visits.insert(pos, visit);
    }

    pub fn has_visits(&self) -> bool {
        !self.visits.is_empty()
    }

    pub fn latest_visit(&self) -> Option<DateTime<Utc>> {
        self.visits.last().map(|v| v.time)
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("url", &self.url)
            .field("title", &self.title)
            .field("is_stub", &self.is_stub)
            .field("visits", &self.visits.len())
            .finish()
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn given_full_url_when_create_stub_then_identity_is_normalized() {
        let page = Page::stub("https://www.example.com/x/", None).unwrap();
        assert_eq!(page.url, "example.com/x");
        assert_eq!(page.full_url, "https://www.example.com/x/");
        assert_eq!(page.domain, "example.com");
        assert!(page.is_stub);
        assert!(!page.has_visits());
    }

    #[test]
    fn given_visits_out_of_order_when_add_visit_then_sequence_stays_sorted() {
        let mut page = Page::stub("https://a.com", None).unwrap();
        let now = Utc::now();
        page.add_visit(now);
        page.add_visit(now - Duration::minutes(5));
        page.add_visit(now + Duration::minutes(5));

        let times: Vec<_> = page.visits.iter().map(|v| v.time).collect();
        let mut sorted = times.clone();
        sorted.sort();
        assert_eq!(times, sorted);
        assert_eq!(page.latest_visit(), Some(now + Duration::minutes(5)));
    }

    #[test]
    fn given_stub_when_fill_content_then_page_is_upgraded_and_visits_kept() {
        let mut page = Page::stub("https://a.com/doc", None).unwrap();
        page.add_visit(Utc::now());
        page.fill_content(PageContent {
            full_url: "https://a.com/doc".to_string(),
            title: "Doc".to_string(),
            text: "body".to_string(),
        });
        assert!(!page.is_stub);
        assert_eq!(page.title, "Doc");
        assert_eq!(page.text.as_deref(), Some("body"));
        assert_eq!(page.visits.len(), 1);
    }

    #[test]
    fn given_page_when_serialize_then_uses_camel_case_and_millis() {
        let mut page = Page::stub("https://a.com", Some("A")).unwrap();
        page.add_visit(DateTime::from_timestamp_millis(1_700_000_000_000).unwrap());
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["fullUrl"], "https://a.com");
        assert_eq!(json["isStub"], true);
        assert_eq!(json["visits"][0]["time"], 1_700_000_000_000i64);
    }
}
