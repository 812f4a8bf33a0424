// src/domain/annotation.rs
use crate::domain::error::DomainResult;
use crate::domain::url::normalize_url;
use chrono::{DateTime, Utc};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Represents an annotation on a page. The `url` is its immutable identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub url: String,
    pub page_title: String,
    pub page_url: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub selector: Value,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_when: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_edited: DateTime<Utc>,
}

/// Caller-supplied fields for a new annotation
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[builder(setter(into))]
#[serde(rename_all = "camelCase")]
pub struct NewAnnotation {
    /// Full or normalized URL of the annotated page.
    pub page_url: String,
    #[builder(default)]
    #[serde(default)]
    pub page_title: String,
    /// Explicit identity; derived from page URL and creation time when absent.
    #[builder(default)]
    #[serde(default)]
    pub url: Option<String>,
    #[builder(default)]
    #[serde(default)]
    pub body: String,
    #[builder(default)]
    #[serde(default)]
    pub comment: String,
    #[builder(default)]
    #[serde(default)]
    pub selector: Value,
    #[builder(default)]
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub created_when: Option<DateTime<Utc>>,
}

impl Annotation {
    /// Builds the record: identity and page key are normalized, `last_edited`
    /// starts equal to `created_when`.
    pub fn from_new(fields: NewAnnotation) -> DomainResult<Self> {
        let created_when = fields.created_when.unwrap_or_else(Utc::now);
        let page_url = normalize_url(&fields.page_url)?;
        let url = match fields.url {
            Some(url) => url,
            None => format!("{}#{}", page_url, created_when.timestamp_millis()),
        };
        Ok(Self {
            url,
            page_title: fields.page_title,
            page_url,
            body: fields.body,
            comment: fields.comment,
            selector: fields.selector,
            created_when,
            last_edited: created_when,
        })
    }
}

/// Presence of this row marks an annotation as bookmarked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationBookmark {
    pub url: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

/// Join row between a list and an annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationListEntry {
    pub list_id: i64,
    pub url: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

/// Parameters of a page-scoped annotation listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageAnnotationsQuery {
    pub url: String,
    pub skip: Option<usize>,
    pub limit: Option<usize>,
    /// Only return bookmarked annotations.
    pub bookmarks_only: bool,
}

/// An annotation together with its relations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationWithRelations {
    #[serde(flatten)]
    pub annotation: Annotation,
    pub tags: Vec<String>,
    pub has_bookmark: bool,
    pub lists: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_minimal_fields_when_build_annotation_then_identity_is_derived() {
        let created = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        let fields = NewAnnotationBuilder::default()
            .page_url("https://www.example.com/article/")
            .page_title("Article")
            .body("quoted text")
            .created_when(Some(created))
            .build()
            .unwrap();

        let annotation = Annotation::from_new(fields).unwrap();
        assert_eq!(annotation.page_url, "example.com/article");
        assert_eq!(annotation.url, "example.com/article#1700000000123");
        assert_eq!(annotation.last_edited, annotation.created_when);
    }

    #[test]
    fn given_explicit_url_when_build_annotation_then_identity_is_kept() {
        let fields = NewAnnotationBuilder::default()
            .page_url("https://a.com")
            .url(Some("a.com#custom".to_string()))
            .build()
            .unwrap();
        let annotation = Annotation::from_new(fields).unwrap();
        assert_eq!(annotation.url, "a.com#custom");
    }

    #[test]
    fn given_missing_page_url_when_build_then_builder_fails() {
        assert!(NewAnnotationBuilder::default().body("x").build().is_err());
    }

    #[test]
    fn given_json_fields_when_deserialize_new_annotation_then_defaults_apply() {
        let fields: NewAnnotation =
            serde_json::from_value(serde_json::json!({ "pageUrl": "https://a.com", "comment": "hi" }))
                .unwrap();
        assert_eq!(fields.comment, "hi");
        assert!(fields.created_when.is_none());
        assert!(fields.selector.is_null());
    }
}
