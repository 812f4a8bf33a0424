// src/domain/repositories/document_store.rs
use crate::domain::error::DomainResult;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;

/*
   Document store interface
   Collections hold schemaless JSON documents, unique per primary key. The store
   knows nothing about references between collections: list entries, tags and
   bookmarks are plain documents whose integrity is maintained by the services.
*/

/// Named collections of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Pages,
    CustomLists,
    PageListEntries,
    Annotations,
    AnnotBookmarks,
    AnnotListEntries,
    Tags,
}

impl Collection {
    pub const ALL: [Collection; 7] = [
        Collection::Pages,
        Collection::CustomLists,
        Collection::PageListEntries,
        Collection::Annotations,
        Collection::AnnotBookmarks,
        Collection::AnnotListEntries,
        Collection::Tags,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Pages => "pages",
            Collection::CustomLists => "customLists",
            Collection::PageListEntries => "pageListEntries",
            Collection::Annotations => "annotations",
            Collection::AnnotBookmarks => "annotBookmarks",
            Collection::AnnotListEntries => "annotListEntries",
            Collection::Tags => "tags",
        }
    }

    /// Fields forming the primary key, in key order.
    pub fn primary_key(&self) -> &'static [&'static str] {
        match self {
            Collection::Pages => &["url"],
            Collection::CustomLists => &["id"],
            Collection::PageListEntries => &["listId", "pageUrl"],
            Collection::Annotations => &["url"],
            Collection::AnnotBookmarks => &["url"],
            Collection::AnnotListEntries => &["listId", "url"],
            Collection::Tags => &["name", "url"],
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Case folding used by the case-insensitive conditions. ASCII only, the same
/// folding as SQLite's `lower()`, so every store agrees on what matches.
pub fn fold_case(value: &str) -> String {
    value.to_ascii_lowercase()
}

/// A single predicate on a top-level document field.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(&'static str, Value),
    EqIgnoreCase(&'static str, String),
    StartsWithIgnoreCase(&'static str, String),
    In(&'static str, Vec<Value>),
    NotIn(&'static str, Vec<Value>),
}

impl Condition {
    pub fn field(&self) -> &'static str {
        match self {
            Condition::Eq(f, _)
            | Condition::EqIgnoreCase(f, _)
            | Condition::StartsWithIgnoreCase(f, _)
            | Condition::In(f, _)
            | Condition::NotIn(f, _) => f,
        }
    }

    pub fn matches(&self, document: &Value) -> bool {
        let field = document.get(self.field()).unwrap_or(&Value::Null);
        match self {
            Condition::Eq(_, expected) => field == expected,
            Condition::EqIgnoreCase(_, expected) => field
                .as_str()
                .is_some_and(|s| fold_case(s) == fold_case(expected)),
            Condition::StartsWithIgnoreCase(_, prefix) => field
                .as_str()
                .is_some_and(|s| fold_case(s).starts_with(&fold_case(prefix))),
            Condition::In(_, values) => values.contains(field),
            Condition::NotIn(_, values) => !values.contains(field),
        }
    }
}

/// Conjunction of conditions; the empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &'static str, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Eq(field, value.into()));
        self
    }

    pub fn eq_ignore_case(mut self, field: &'static str, value: impl Into<String>) -> Self {
        self.conditions
            .push(Condition::EqIgnoreCase(field, value.into()));
        self
    }

    pub fn starts_with_ignore_case(mut self, field: &'static str, prefix: impl Into<String>) -> Self {
        self.conditions
            .push(Condition::StartsWithIgnoreCase(field, prefix.into()));
        self
    }

    pub fn is_in<V: Into<Value>>(mut self, field: &'static str, values: impl IntoIterator<Item = V>) -> Self {
        self.conditions
            .push(Condition::In(field, values.into_iter().map(Into::into).collect()));
        self
    }

    pub fn not_in<V: Into<Value>>(mut self, field: &'static str, values: impl IntoIterator<Item = V>) -> Self {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if !values.is_empty() {
            self.conditions.push(Condition::NotIn(field, values));
        }
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, document: &Value) -> bool {
        self.conditions.iter().all(|c| c.matches(document))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Ordering and paging of a plural find.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    pub order_by: Option<(&'static str, SortDirection)>,
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

impl FindOptions {
    pub fn ordered(field: &'static str, direction: SortDirection) -> Self {
        Self {
            order_by: Some((field, direction)),
            ..Self::default()
        }
    }

    pub fn paged(mut self, skip: Option<usize>, limit: Option<usize>) -> Self {
        self.skip = skip;
        self.limit = limit;
        self
    }
}

/// What a create does when a document with the same primary key exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnConflict {
    /// Surface `DomainError::Conflict`.
    Fail,
    /// Keep the existing document; the create is a no-op.
    Ignore,
    /// Overwrite the existing document.
    Replace,
}

/// Compute the primary key of `document` in `collection` as a canonical string.
pub fn primary_key_of(collection: Collection, document: &Value) -> DomainResult<String> {
    let mut parts = Vec::with_capacity(collection.primary_key().len());
    for field in collection.primary_key() {
        match document.get(*field) {
            Some(value) if !value.is_null() => parts.push(value.clone()),
            _ => {
                return Err(crate::domain::error::DomainError::Storage(format!(
                    "{} document without key field '{}'",
                    collection, field
                )))
            }
        }
    }
    Ok(Value::Array(parts).to_string())
}

/// Reject update sets that touch primary key fields.
pub fn ensure_updatable(collection: Collection, updates: &Map<String, Value>) -> DomainResult<()> {
    match collection
        .primary_key()
        .iter()
        .find(|field| updates.contains_key(**field))
    {
        Some(field) => Err(crate::domain::error::DomainError::Storage(format!(
            "cannot update key field '{}' of {}",
            field, collection
        ))),
        None => Ok(()),
    }
}

/// Repository of JSON documents grouped in collections
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// First document matching `filter`.
    async fn find_object(&self, collection: Collection, filter: &Filter) -> DomainResult<Option<Value>>;

    /// All documents matching `filter`, ordered and paged by `options`.
    async fn find_objects(
        &self,
        collection: Collection,
        filter: &Filter,
        options: &FindOptions,
    ) -> DomainResult<Vec<Value>>;

    /// Insert a document. Returns whether it was written.
    async fn create_object(
        &self,
        collection: Collection,
        document: Value,
        on_conflict: OnConflict,
    ) -> DomainResult<bool>;

    /// Merge `updates` into every matching document. Key fields cannot be updated.
    async fn update_objects(
        &self,
        collection: Collection,
        filter: &Filter,
        updates: Map<String, Value>,
    ) -> DomainResult<usize>;

    /// Delete every matching document, returning the number removed.
    async fn delete_objects(&self, collection: Collection, filter: &Filter) -> DomainResult<usize>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn given_document_when_matching_conditions_then_all_must_hold() {
        let doc = json!({ "id": 3, "name": "Research" });
        assert!(Filter::new().eq("id", 3).matches(&doc));
        assert!(Filter::new().eq_ignore_case("name", "research").matches(&doc));
        assert!(Filter::new().starts_with_ignore_case("name", "RES").matches(&doc));
        assert!(!Filter::new().eq("id", 3).eq("name", "other").matches(&doc));
        assert!(Filter::new().matches(&doc));
    }

    #[test]
    fn given_non_ascii_name_when_matching_ignore_case_then_only_ascii_folds() {
        let doc = json!({ "name": "Ärger Log" });
        assert!(Filter::new().eq_ignore_case("name", "Ärger log").matches(&doc));
        assert!(Filter::new().starts_with_ignore_case("name", "ÄRG").matches(&doc));
        assert!(!Filter::new().starts_with_ignore_case("name", "ärg").matches(&doc));
    }

    #[test]
    fn given_membership_conditions_when_matching_then_in_and_not_in_apply() {
        let doc = json!({ "id": 3 });
        assert!(Filter::new().is_in("id", [1, 3]).matches(&doc));
        assert!(!Filter::new().not_in("id", [3]).matches(&doc));
        assert!(Filter::new().not_in("id", Vec::<i64>::new()).is_empty());
    }

    #[test]
    fn given_composite_key_collection_when_primary_key_of_then_joins_fields() {
        let doc = json!({ "listId": 7, "pageUrl": "a.com", "fullUrl": "https://a.com" });
        let key = primary_key_of(Collection::PageListEntries, &doc).unwrap();
        assert_eq!(key, r#"[7,"a.com"]"#);
        assert!(primary_key_of(Collection::Pages, &doc).is_err());
    }

    #[test]
    fn given_collection_name_when_from_name_then_round_trips() {
        for collection in Collection::ALL {
            assert_eq!(Collection::from_name(collection.name()), Some(collection));
        }
        assert_eq!(Collection::from_name("bogus"), None);
    }
}
