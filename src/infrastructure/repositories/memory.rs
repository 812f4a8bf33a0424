// src/infrastructure/repositories/memory.rs
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::repositories::document_store::{
    ensure_updatable, primary_key_of, Collection, DocumentStore, Filter, FindOptions, OnConflict, SortDirection,
};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use tracing::{instrument, trace};

type Documents = BTreeMap<String, Value>;

/// Document store held in process memory. Used for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<Collection, Documents>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection.
    pub async fn count(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .await
            .get(&collection)
            .map_or(0, BTreeMap::len)
    }
}

/// Total order over JSON scalars used for sorting: null < bool < number < string.
pub(crate) fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => x
                .as_f64()
                .partial_cmp(&y.as_f64())
                .unwrap_or(Ordering::Equal),
        },
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

fn apply_options(mut documents: Vec<Value>, options: &FindOptions) -> Vec<Value> {
    if let Some((field, direction)) = options.order_by {
        documents.sort_by(|a, b| {
            let a = a.get(field).unwrap_or(&Value::Null);
            let b = b.get(field).unwrap_or(&Value::Null);
            match direction {
                SortDirection::Ascending => compare_values(a, b),
                SortDirection::Descending => compare_values(b, a),
            }
        });
    }
    documents
        .into_iter()
        .skip(options.skip.unwrap_or(0))
        .take(options.limit.unwrap_or(usize::MAX))
        .collect()
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn find_object(&self, collection: Collection, filter: &Filter) -> DomainResult<Option<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.values().find(|doc| filter.matches(doc)).cloned()))
    }

    async fn find_objects(
        &self,
        collection: Collection,
        filter: &Filter,
        options: &FindOptions,
    ) -> DomainResult<Vec<Value>> {
        let collections = self.collections.read().await;
        let matching: Vec<Value> = collections
            .get(&collection)
            .map(|docs| docs.values().filter(|doc| filter.matches(doc)).cloned().collect())
            .unwrap_or_default();
        Ok(apply_options(matching, options))
    }

    #[instrument(skip(self, document), level = "trace")]
    async fn create_object(
        &self,
        collection: Collection,
        document: Value,
        on_conflict: OnConflict,
    ) -> DomainResult<bool> {
        if !document.is_object() {
            return Err(DomainError::Storage(format!(
                "{} documents must be JSON objects",
                collection
            )));
        }
        let key = primary_key_of(collection, &document)?;
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();

        if docs.contains_key(&key) {
            match on_conflict {
                OnConflict::Fail => {
                    return Err(DomainError::Conflict(format!(
                        "{} already contains {}",
                        collection, key
                    )))
                }
                OnConflict::Ignore => {
                    trace!("Ignoring duplicate {} {}", collection, key);
                    return Ok(false);
                }
                OnConflict::Replace => {}
            }
        }
        docs.insert(key, document);
        Ok(true)
    }

    async fn update_objects(
        &self,
        collection: Collection,
        filter: &Filter,
        updates: Map<String, Value>,
    ) -> DomainResult<usize> {
        ensure_updatable(collection, &updates)?;
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(&collection) else {
            return Ok(0);
        };

        let mut affected = 0;
        for doc in docs.values_mut().filter(|doc| filter.matches(doc)) {
            if let Some(fields) = doc.as_object_mut() {
                for (field, value) in &updates {
                    fields.insert(field.clone(), value.clone());
                }
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn delete_objects(&self, collection: Collection, filter: &Filter) -> DomainResult<usize> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(&collection) else {
            return Ok(0);
        };
        let before = docs.len();
        docs.retain(|_, doc| !filter.matches(doc));
        Ok(before - docs.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn given_ignore_policy_when_duplicate_create_then_existing_document_kept() {
        let store = InMemoryDocumentStore::new();
        let doc = json!({ "name": "a", "url": "x.com", "extra": 1 });
        assert!(store
            .create_object(Collection::Tags, doc, OnConflict::Ignore)
            .await
            .unwrap());
        let dup = json!({ "name": "a", "url": "x.com", "extra": 2 });
        assert!(!store
            .create_object(Collection::Tags, dup, OnConflict::Ignore)
            .await
            .unwrap());

        let found = store
            .find_object(Collection::Tags, &Filter::new().eq("name", "a"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found["extra"], json!(1));
        assert_eq!(store.count(Collection::Tags).await, 1);
    }

    #[tokio::test]
    async fn given_replace_policy_when_duplicate_create_then_document_overwritten() {
        let store = InMemoryDocumentStore::new();
        store
            .create_object(Collection::Pages, json!({ "url": "a.com", "title": "old" }), OnConflict::Replace)
            .await
            .unwrap();
        store
            .create_object(Collection::Pages, json!({ "url": "a.com", "title": "new" }), OnConflict::Replace)
            .await
            .unwrap();
        let page = store
            .find_object(Collection::Pages, &Filter::new().eq("url", "a.com"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(page["title"], json!("new"));
    }

    #[tokio::test]
    async fn given_documents_when_find_with_options_then_sorted_and_paged() {
        let store = InMemoryDocumentStore::new();
        for id in [5, 1, 3, 4, 2] {
            store
                .create_object(
                    Collection::CustomLists,
                    json!({ "id": id, "name": format!("list {}", id) }),
                    OnConflict::Fail,
                )
                .await
                .unwrap();
        }
        let options = FindOptions::ordered("id", SortDirection::Descending).paged(Some(1), Some(2));
        let docs = store
            .find_objects(Collection::CustomLists, &Filter::new(), &options)
            .await
            .unwrap();
        let ids: Vec<i64> = docs.iter().map(|d| d["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![4, 3]);
    }

    #[tokio::test]
    async fn given_key_field_in_updates_when_update_then_rejected() {
        let store = InMemoryDocumentStore::new();
        let mut updates = Map::new();
        updates.insert("id".to_string(), json!(9));
        let result = store
            .update_objects(Collection::CustomLists, &Filter::new(), updates)
            .await;
        assert!(matches!(result, Err(DomainError::Storage(_))));
    }

    #[tokio::test]
    async fn given_matching_documents_when_delete_then_returns_count() {
        let store = InMemoryDocumentStore::new();
        for name in ["a", "b"] {
            store
                .create_object(Collection::Tags, json!({ "name": name, "url": "x.com" }), OnConflict::Fail)
                .await
                .unwrap();
        }
        let removed = store
            .delete_objects(Collection::Tags, &Filter::new().eq("url", "x.com"))
            .await
            .unwrap();
        assert_eq!(removed, 2);
        let removed = store
            .delete_objects(Collection::Tags, &Filter::new().eq("url", "x.com"))
            .await
            .unwrap();
        assert_eq!(removed, 0);
    }

    #[test]
    fn given_mixed_numbers_when_compare_values_then_numeric_order() {
        assert_eq!(compare_values(&json!(2), &json!(10)), Ordering::Less);
        assert_eq!(compare_values(&json!(2.5), &json!(2)), Ordering::Greater);
        assert_eq!(compare_values(&Value::Null, &json!("a")), Ordering::Less);
    }
}
