// src/domain/tag.rs
use std::fmt;

use crate::domain::error::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};

/// Represents a single tag name as a value object
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag {
    value: String,
}

impl Tag {
    /// Creates a new Tag with validation
    pub fn new<S: AsRef<str>>(value: S) -> DomainResult<Self> {
        let value = value.as_ref().trim().to_string();

        if value.is_empty() {
            return Err(DomainError::InvalidTag("Tag cannot be empty".to_string()));
        }

        if value.contains(',') {
            return Err(DomainError::InvalidTag(format!(
                "Tag cannot contain commas: {}",
                value
            )));
        }

        Ok(Self { value })
    }

    /// Get the tag value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Validate a batch of names, keeping first-seen order and dropping duplicates.
    pub fn parse_all<S: AsRef<str>>(names: &[S]) -> DomainResult<Vec<Tag>> {
        let mut result: Vec<Tag> = Vec::with_capacity(names.len());
        for name in names {
            let tag = Tag::new(name)?;
            if !result.contains(&tag) {
                result.push(tag);
            }
        }
        Ok(result)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Stored tag row; `url` points at a page or an annotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagRecord {
    pub name: String,
    pub url: String,
}

impl TagRecord {
    pub fn new(tag: &Tag, url: &str) -> Self {
        Self {
            name: tag.value().to_string(),
            url: url.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_valid_tag_value_when_create_tag_then_returns_trimmed_tag() {
        let tag = Tag::new(" reading list ").unwrap();
        assert_eq!(tag.value(), "reading list");
    }

    #[test]
    fn given_invalid_tag_value_when_create_tag_then_returns_error() {
        assert!(Tag::new("").is_err());
        assert!(Tag::new("   ").is_err());
        assert!(Tag::new("a,b").is_err());
    }

    #[test]
    fn given_names_with_duplicates_when_parse_all_then_keeps_first_occurrence_order() {
        let tags = Tag::parse_all(&["b", "a", "b "]).unwrap();
        let values: Vec<&str> = tags.iter().map(Tag::value).collect();
        assert_eq!(values, vec!["b", "a"]);
    }

    #[test]
    fn given_one_invalid_name_when_parse_all_then_whole_batch_fails() {
        assert!(Tag::parse_all(&["ok", ""]).is_err());
    }
}
