// src/domain/list.rs
use crate::domain::repositories::document_store::fold_case;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};

/// A user-defined list of pages and annotations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageList {
    pub id: i64,
    pub name: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl PageList {
    pub fn new(id: i64, name: &str) -> Self {
        Self {
            id,
            name: name.trim().to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn name_matches(&self, name: &str) -> bool {
        fold_case(&self.name) == fold_case(name.trim())
    }
}

/// Join row between a list and a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntry {
    pub list_id: i64,
    pub page_url: String,
    pub full_url: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl ListEntry {
    pub fn new(list_id: i64, page_url: String, full_url: String) -> Self {
        Self {
            list_id,
            page_url,
            full_url,
            created_at: Utc::now(),
        }
    }
}

/// A name suggestion, flagged when the list already holds the page in question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSuggestion {
    #[serde(flatten)]
    pub list: PageList,
    pub active: bool,
}

/// Paging parameters for listing all lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListQuery {
    pub excluded_ids: Vec<i64>,
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

/// Allocates list ids that are unique within the process and sortable by
/// creation order.
///
/// Ids are millisecond timestamps, bumped past the last handed-out id when the
/// clock stalls or steps back.
#[derive(Debug, Default)]
pub struct IdAllocator {
    last: AtomicI64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start above an id already known to be taken, e.g. the highest persisted one.
    pub fn starting_after(floor: i64) -> Self {
        Self {
            last: AtomicI64::new(floor),
        }
    }

    pub fn next_id(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let mut current = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(current + 1);
            match self.last.compare_exchange_weak(
                current,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(actual) => current = actual,
            }
        }
    }
}
