// src/domain/repositories/operation.rs
use crate::domain::annotation::{Annotation, AnnotationBookmark, AnnotationListEntry};
use crate::domain::error::DomainResult;
use crate::domain::list::{ListEntry, PageList};
use crate::domain::page::Page;
use crate::domain::repositories::document_store::{
    Collection, Filter, FindOptions, OnConflict, SortDirection,
};
use crate::domain::tag::TagRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/*
   Operation registry
   Every persistence need of the stores is declared here as one variant. The match
   arms of `name`, `collection` and `verb` form the declarative table; `plan` binds
   the typed arguments into the filter, document or update set of a store call.
   Schema changes of a collection are absorbed here without touching store logic.
*/

/// Store verb with the shape of its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    FindObject,
    FindObjects,
    CreateObject(OnConflict),
    UpdateObject,
    DeleteObject,
    DeleteObjects,
}

/// Named logical operations against the document collections.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    // pages
    FindPageByUrl { url: String },
    SavePage { page: Page },

    // lists
    CreateList { list: PageList },
    FindListById { id: i64 },
    FindListByNameIgnoreCase { name: String },
    FindLists { excluded_ids: Vec<i64>, skip: Option<usize>, limit: Option<usize> },
    FindListsIncluding { ids: Vec<i64> },
    FindListsByNamePrefix { prefix: String, limit: usize },
    FindNewestList,
    UpdateListName { id: i64, name: String },
    DeleteList { id: i64 },

    // page list entries
    CreateListEntry { entry: ListEntry },
    FindListEntriesByList { list_id: i64 },
    FindListEntriesByUrl { url: String },
    DeleteListEntries { list_id: i64, url: String },

    // annotations
    CreateAnnotation { annotation: Annotation },
    FindAnnotationByUrl { url: String },
    FindAnnotationsByPage { page_url: String, skip: Option<usize>, limit: Option<usize> },
    EditAnnotation { url: String, comment: String, last_edited: DateTime<Utc> },
    DeleteAnnotation { url: String },

    // annotation bookmarks
    CreateBookmark { bookmark: AnnotationBookmark },
    FindBookmarkByUrl { url: String },
    FindBookmarksByUrls { urls: Vec<String> },
    DeleteBookmarkByUrl { url: String },

    // annotation list entries
    CreateAnnotListEntry { entry: AnnotationListEntry },
    FindAnnotListEntriesByUrl { url: String },
    FindAnnotListEntriesByUrls { urls: Vec<String> },
    DeleteAnnotListEntry { list_id: i64, url: String },

    // tags
    CreateTag { tag: TagRecord },
    FindTagsByUrl { url: String },
    FindTagsByUrls { urls: Vec<String> },
    DeleteTag { name: String, url: String },
}

/// A resolved operation, ready to be issued against the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub collection: Collection,
    pub verb: Verb,
    pub filter: Filter,
    pub options: FindOptions,
    pub document: Option<Value>,
    pub updates: Map<String, Value>,
}

impl Plan {
    fn new(collection: Collection, verb: Verb) -> Self {
        Self {
            collection,
            verb,
            filter: Filter::new(),
            options: FindOptions::default(),
            document: None,
            updates: Map::new(),
        }
    }

    fn filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    fn options(mut self, options: FindOptions) -> Self {
        self.options = options;
        self
    }

    fn document<T: Serialize>(mut self, document: &T) -> DomainResult<Self> {
        self.document = Some(serde_json::to_value(document)?);
        Ok(self)
    }

    fn set(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.updates.insert(field.to_string(), value.into());
        self
    }
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::FindPageByUrl { .. } => "findPageByUrl",
            Operation::SavePage { .. } => "savePage",
            Operation::CreateList { .. } => "createList",
            Operation::FindListById { .. } => "findListById",
            Operation::FindListByNameIgnoreCase { .. } => "findListByNameIgnoreCase",
            Operation::FindLists { .. } => "findLists",
            Operation::FindListsIncluding { .. } => "findListsIncluding",
            Operation::FindListsByNamePrefix { .. } => "findListsByNamePrefix",
            Operation::FindNewestList => "findNewestList",
            Operation::UpdateListName { .. } => "updateListName",
            Operation::DeleteList { .. } => "deleteList",
            Operation::CreateListEntry { .. } => "createListEntry",
            Operation::FindListEntriesByList { .. } => "findListEntriesByList",
            Operation::FindListEntriesByUrl { .. } => "findListEntriesByUrl",
            Operation::DeleteListEntries { .. } => "deleteListEntries",
            Operation::CreateAnnotation { .. } => "createAnnotation",
            Operation::FindAnnotationByUrl { .. } => "findAnnotationByUrl",
            Operation::FindAnnotationsByPage { .. } => "findAnnotationsByPage",
            Operation::EditAnnotation { .. } => "editAnnotation",
            Operation::DeleteAnnotation { .. } => "deleteAnnotation",
            Operation::CreateBookmark { .. } => "createBookmark",
            Operation::FindBookmarkByUrl { .. } => "findBookmarkByUrl",
            Operation::FindBookmarksByUrls { .. } => "findBookmarksByUrls",
            Operation::DeleteBookmarkByUrl { .. } => "deleteBookmarkByUrl",
            Operation::CreateAnnotListEntry { .. } => "createAnnotListEntry",
            Operation::FindAnnotListEntriesByUrl { .. } => "findAnnotListEntriesByUrl",
            Operation::FindAnnotListEntriesByUrls { .. } => "findAnnotListEntriesByUrls",
            Operation::DeleteAnnotListEntry { .. } => "deleteAnnotListEntry",
            Operation::CreateTag { .. } => "createTag",
            Operation::FindTagsByUrl { .. } => "findTagsByUrl",
            Operation::FindTagsByUrls { .. } => "findTagsByUrls",
            Operation::DeleteTag { .. } => "deleteTag",
        }
    }

    pub fn collection(&self) -> Collection {
        match self {
            Operation::FindPageByUrl { .. } | Operation::SavePage { .. } => Collection::Pages,

            Operation::CreateList { .. }
            | Operation::FindListById { .. }
            | Operation::FindListByNameIgnoreCase { .. }
            | Operation::FindLists { .. }
            | Operation::FindListsIncluding { .. }
            | Operation::FindListsByNamePrefix { .. }
            | Operation::FindNewestList
            | Operation::UpdateListName { .. }
            | Operation::DeleteList { .. } => Collection::CustomLists,

            Operation::CreateListEntry { .. }
            | Operation::FindListEntriesByList { .. }
            | Operation::FindListEntriesByUrl { .. }
            | Operation::DeleteListEntries { .. } => Collection::PageListEntries,

            Operation::CreateAnnotation { .. }
            | Operation::FindAnnotationByUrl { .. }
            | Operation::FindAnnotationsByPage { .. }
            | Operation::EditAnnotation { .. }
            | Operation::DeleteAnnotation { .. } => Collection::Annotations,

            Operation::CreateBookmark { .. }
            | Operation::FindBookmarkByUrl { .. }
            | Operation::FindBookmarksByUrls { .. }
            | Operation::DeleteBookmarkByUrl { .. } => Collection::AnnotBookmarks,

            Operation::CreateAnnotListEntry { .. }
            | Operation::FindAnnotListEntriesByUrl { .. }
            | Operation::FindAnnotListEntriesByUrls { .. }
            | Operation::DeleteAnnotListEntry { .. } => Collection::AnnotListEntries,

            Operation::CreateTag { .. }
            | Operation::FindTagsByUrl { .. }
            | Operation::FindTagsByUrls { .. }
            | Operation::DeleteTag { .. } => Collection::Tags,
        }
    }

    pub fn verb(&self) -> Verb {
        match self {
            Operation::FindPageByUrl { .. }
            | Operation::FindListById { .. }
            | Operation::FindListByNameIgnoreCase { .. }
            | Operation::FindAnnotationByUrl { .. }
            | Operation::FindBookmarkByUrl { .. } => Verb::FindObject,

            Operation::FindLists { .. }
            | Operation::FindListsIncluding { .. }
            | Operation::FindListsByNamePrefix { .. }
            | Operation::FindNewestList
            | Operation::FindListEntriesByList { .. }
            | Operation::FindListEntriesByUrl { .. }
            | Operation::FindAnnotationsByPage { .. }
            | Operation::FindBookmarksByUrls { .. }
            | Operation::FindAnnotListEntriesByUrl { .. }
            | Operation::FindAnnotListEntriesByUrls { .. }
            | Operation::FindTagsByUrl { .. }
            | Operation::FindTagsByUrls { .. } => Verb::FindObjects,

            Operation::SavePage { .. } => Verb::CreateObject(OnConflict::Replace),
            Operation::CreateList { .. } | Operation::CreateAnnotation { .. } => {
                Verb::CreateObject(OnConflict::Fail)
            }
            // join rows and flags: duplicate inserts are no-ops
            Operation::CreateListEntry { .. }
            | Operation::CreateBookmark { .. }
            | Operation::CreateAnnotListEntry { .. }
            | Operation::CreateTag { .. } => Verb::CreateObject(OnConflict::Ignore),

            Operation::UpdateListName { .. } | Operation::EditAnnotation { .. } => Verb::UpdateObject,

            Operation::DeleteList { .. }
            | Operation::DeleteAnnotation { .. }
            | Operation::DeleteBookmarkByUrl { .. } => Verb::DeleteObject,

            Operation::DeleteListEntries { .. }
            | Operation::DeleteAnnotListEntry { .. }
            | Operation::DeleteTag { .. } => Verb::DeleteObjects,
        }
    }

    /// Bind the arguments into a store call.
    pub fn plan(&self) -> DomainResult<Plan> {
        let plan = Plan::new(self.collection(), self.verb());
        let plan = match self {
            Operation::FindPageByUrl { url } => plan.filter(Filter::new().eq("url", url.as_str())),
            Operation::SavePage { page } => plan.document(page)?,

            Operation::CreateList { list } => plan.document(list)?,
            Operation::FindListById { id } => plan.filter(Filter::new().eq("id", *id)),
            Operation::FindListByNameIgnoreCase { name } => {
                plan.filter(Filter::new().eq_ignore_case("name", name.trim()))
            }
            Operation::FindLists {
                excluded_ids,
                skip,
                limit,
            } => plan
                .filter(Filter::new().not_in("id", excluded_ids.iter().copied()))
                .options(FindOptions::ordered("id", SortDirection::Ascending).paged(*skip, *limit)),
            Operation::FindListsIncluding { ids } => plan
                .filter(Filter::new().is_in("id", ids.iter().copied()))
                .options(FindOptions::ordered("id", SortDirection::Ascending)),
            Operation::FindListsByNamePrefix { prefix, limit } => plan
                .filter(Filter::new().starts_with_ignore_case("name", prefix.trim()))
                .options(FindOptions::ordered("name", SortDirection::Ascending).paged(None, Some(*limit))),
            Operation::FindNewestList => plan.options(
                FindOptions::ordered("id", SortDirection::Descending).paged(None, Some(1)),
            ),
            Operation::UpdateListName { id, name } => plan
                .filter(Filter::new().eq("id", *id))
                .set("name", name.trim()),
            Operation::DeleteList { id } => plan.filter(Filter::new().eq("id", *id)),

            Operation::CreateListEntry { entry } => plan.document(entry)?,
            Operation::FindListEntriesByList { list_id } => plan
                .filter(Filter::new().eq("listId", *list_id))
                .options(FindOptions::ordered("createdAt", SortDirection::Ascending)),
            Operation::FindListEntriesByUrl { url } => {
                plan.filter(Filter::new().eq("pageUrl", url.as_str()))
            }
            Operation::DeleteListEntries { list_id, url } => plan.filter(
                Filter::new()
                    .eq("listId", *list_id)
                    .eq("pageUrl", url.as_str()),
            ),

            Operation::CreateAnnotation { annotation } => plan.document(annotation)?,
            Operation::FindAnnotationByUrl { url } => {
                plan.filter(Filter::new().eq("url", url.as_str()))
            }
            Operation::FindAnnotationsByPage {
                page_url,
                skip,
                limit,
            } => plan
                .filter(Filter::new().eq("pageUrl", page_url.as_str()))
                .options(
                    FindOptions::ordered("createdWhen", SortDirection::Descending).paged(*skip, *limit),
                ),
            Operation::EditAnnotation {
                url,
                comment,
                last_edited,
            } => plan
                .filter(Filter::new().eq("url", url.as_str()))
                .set("comment", comment.as_str())
                .set("lastEdited", last_edited.timestamp_millis()),
            Operation::DeleteAnnotation { url } => {
                plan.filter(Filter::new().eq("url", url.as_str()))
            }

            Operation::CreateBookmark { bookmark } => plan.document(bookmark)?,
            Operation::FindBookmarkByUrl { url } | Operation::DeleteBookmarkByUrl { url } => {
                plan.filter(Filter::new().eq("url", url.as_str()))
            }
            Operation::FindBookmarksByUrls { urls } => {
                plan.filter(Filter::new().is_in("url", urls.iter().map(String::as_str)))
            }

            Operation::CreateAnnotListEntry { entry } => plan.document(entry)?,
            Operation::FindAnnotListEntriesByUrl { url } => {
                plan.filter(Filter::new().eq("url", url.as_str()))
            }
            Operation::FindAnnotListEntriesByUrls { urls } => {
                plan.filter(Filter::new().is_in("url", urls.iter().map(String::as_str)))
            }
            Operation::DeleteAnnotListEntry { list_id, url } => plan.filter(
                Filter::new()
                    .eq("listId", *list_id)
                    .eq("url", url.as_str()),
            ),

            Operation::CreateTag { tag } => plan.document(tag)?,
            Operation::FindTagsByUrl { url } => plan
                .filter(Filter::new().eq("url", url.as_str()))
                .options(FindOptions::ordered("name", SortDirection::Ascending)),
            Operation::FindTagsByUrls { urls } => {
                plan.filter(Filter::new().is_in("url", urls.iter().map(String::as_str)))
            }
            Operation::DeleteTag { name, url } => plan.filter(
                Filter::new()
                    .eq("name", name.as_str())
                    .eq("url", url.as_str()),
            ),
        };
        Ok(plan)
    }
}
