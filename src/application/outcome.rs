// src/application/outcome.rs
use serde::Serialize;
use std::fmt::Display;

/// Result of one item of a fan-out.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ItemResult<T> {
    Succeeded { value: T },
    Failed { error: String },
}

impl<T> ItemResult<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, ItemResult::Succeeded { .. })
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            ItemResult::Succeeded { value } => Some(value),
            ItemResult::Failed { .. } => None,
        }
    }
}

impl<T, E: Display> From<Result<T, E>> for ItemResult<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => ItemResult::Succeeded { value },
            Err(e) => ItemResult::Failed {
                error: e.to_string(),
            },
        }
    }
}

/// Per-tab outcome of a tab batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabOutcome {
    pub tab_id: i64,
    pub url: String,
    /// Normalized url of the materialized page; absent on the remove path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<ItemResult<String>>,
    /// Number of list entries written or removed.
    pub entry: ItemResult<usize>,
}

impl TabOutcome {
    pub fn is_ok(&self) -> bool {
        self.entry.is_ok() && self.page.as_ref().map_or(true, ItemResult::is_ok)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub list_id: i64,
    pub tabs: Vec<TabOutcome>,
}

impl BatchOutcome {
    pub fn all_succeeded(&self) -> bool {
        self.tabs.iter().all(TabOutcome::is_ok)
    }

    pub fn failures(&self) -> impl Iterator<Item = &TabOutcome> {
        self.tabs.iter().filter(|t| !t.is_ok())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagResult {
    pub name: String,
    pub result: ItemResult<usize>,
}

/// Outcome of a tag patch: the delete phase, then the add phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagPatchOutcome {
    pub url: String,
    pub deleted: Vec<TagResult>,
    pub added: Vec<TagResult>,
}

impl TagPatchOutcome {
    pub fn all_succeeded(&self) -> bool {
        self.deleted
            .iter()
            .chain(self.added.iter())
            .all(|t| t.result.is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn given_failed_item_when_serialized_then_tagged_with_status() {
        let item: ItemResult<usize> = Err::<usize, _>("boom").into();
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({ "status": "failed", "error": "boom" })
        );
    }

    #[test]
    fn given_one_failed_page_when_all_succeeded_then_false() {
        let outcome = BatchOutcome {
            list_id: 1,
            tabs: vec![
                TabOutcome {
                    tab_id: 1,
                    url: "https://a.com".into(),
                    page: Some(ItemResult::Succeeded { value: "a.com".into() }),
                    entry: ItemResult::Succeeded { value: 1 },
                },
                TabOutcome {
                    tab_id: 2,
                    url: "https://b.com".into(),
                    page: Some(ItemResult::Failed { error: "offline".into() }),
                    entry: ItemResult::Succeeded { value: 1 },
                },
            ],
        };
        assert!(!outcome.all_succeeded());
        assert_eq!(outcome.failures().count(), 1);
    }
}
