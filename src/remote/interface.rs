// src/remote/interface.rs
use crate::application::services::{AnnotationService, ListService, PageService, TabService};
use crate::domain::annotation::{NewAnnotation, PageAnnotationsQuery};
use crate::domain::list::ListQuery;
use crate::remote::error::{RemoteError, RemoteResult};
use crate::remote::method::Method;
use crate::remote::params::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// One call: method name plus argument bag. `id` is echoed in the response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Request {
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// Exposes the services by method name.
#[derive(Clone)]
pub struct RemoteInterface {
    pages: Arc<dyn PageService>,
    lists: Arc<dyn ListService>,
    annotations: Arc<dyn AnnotationService>,
    tabs: Arc<dyn TabService>,
}

impl std::fmt::Debug for RemoteInterface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteInterface").finish_non_exhaustive()
    }
}

fn parse<T: DeserializeOwned>(method: Method, params: Value) -> RemoteResult<T> {
    let params = if params.is_null() { json!({}) } else { params };
    serde_json::from_value(params).map_err(|e| RemoteError::InvalidParams {
        method: method.name(),
        message: e.to_string(),
    })
}

fn reply<T: Serialize>(value: T) -> RemoteResult<Value> {
    serde_json::to_value(value).map_err(|e| RemoteError::Internal(e.to_string()))
}

impl RemoteInterface {
    pub fn new(
        pages: Arc<dyn PageService>,
        lists: Arc<dyn ListService>,
        annotations: Arc<dyn AnnotationService>,
        tabs: Arc<dyn TabService>,
    ) -> Self {
        Self {
            pages,
            lists,
            annotations,
            tabs,
        }
    }

    /// Invoke `method` with a JSON argument bag.
    #[instrument(skip(self, params), level = "debug")]
    pub async fn call(&self, method: &str, params: Value) -> RemoteResult<Value> {
        let method: Method = method.parse()?;
        self.dispatch(method, params).await
    }

    /// Handle a request, rendering failures as error responses.
    pub async fn handle(&self, request: Request) -> Value {
        let id = request.id.unwrap_or(Value::Null);
        match self.call(&request.method, request.params).await {
            Ok(result) => json!({ "id": id, "success": true, "result": result }),
            Err(e) => {
                warn!("{} failed: {}", request.method, e);
                let mut response = e.to_response();
                response["id"] = id;
                response
            }
        }
    }

    async fn dispatch(&self, method: Method, params: Value) -> RemoteResult<Value> {
        debug!("Dispatching {}", method);
        match method {
            // Lists
            Method::CreateCustomList => {
                let p: NameParams = parse(method, params)?;
                reply(self.lists.create_list(&p.name).await?)
            }
            Method::CreateCustomLists => {
                let p: NamesParams = parse(method, params)?;
                reply(self.lists.create_lists_if_missing(&p.names).await?)
            }
            Method::UpdateListName => {
                let p: RenameParams = parse(method, params)?;
                self.lists.rename_list(p.id, &p.name).await?;
                Ok(Value::Null)
            }
            Method::RemoveList => {
                let p: IdParams = parse(method, params)?;
                self.lists.remove_list(p.id).await?;
                Ok(Value::Null)
            }
            Method::FetchAllLists => {
                let query: ListQuery = parse(method, params)?;
                reply(self.lists.fetch_all_lists(&query).await?)
            }
            Method::FetchListById => {
                let p: IdParams = parse(method, params)?;
                reply(self.lists.fetch_list_by_id(p.id).await?)
            }
            Method::FetchListIgnoreCase => {
                let p: NameParams = parse(method, params)?;
                reply(self.lists.fetch_list_ignore_case(&p.name).await?)
            }
            Method::FetchListPagesById => {
                let p: IdParams = parse(method, params)?;
                reply(self.lists.fetch_list_pages_by_id(p.id).await?)
            }
            Method::FetchListPagesByUrl => {
                let p: UrlParams = parse(method, params)?;
                reply(self.lists.fetch_list_pages_by_url(&p.url).await?)
            }
            Method::FetchListNameSuggestions => {
                let p: SuggestionParams = parse(method, params)?;
                reply(self.lists.fetch_list_name_suggestions(&p.name, &p.url).await?)
            }
            Method::InsertPageToList => {
                let p: ListUrlParams = parse(method, params)?;
                reply(self.lists.insert_page_to_list(p.list_id, &p.url).await?)
            }
            Method::RemovePageFromList => {
                let p: ListUrlParams = parse(method, params)?;
                reply(self.lists.remove_page_from_list(p.list_id, &p.url).await?)
            }

            // Tab batches
            Method::AddOpenTabsToList => {
                let p: TabsParams = parse(method, params)?;
                reply(self.tabs.add_open_tabs_to_list(p.list_id, p.tabs).await?)
            }
            Method::RemoveOpenTabsFromList => {
                let p: TabsParams = parse(method, params)?;
                reply(self.tabs.remove_open_tabs_from_list(p.list_id, p.tabs).await?)
            }

            // Annotations
            Method::CreateAnnotation => {
                let fields: NewAnnotation = parse(method, params)?;
                reply(self.annotations.create_annotation(fields).await?)
            }
            Method::EditAnnotation => {
                let p: EditAnnotationParams = parse(method, params)?;
                reply(
                    self.annotations
                        .edit_annotation(&p.url, &p.comment, p.last_edited)
                        .await?,
                )
            }
            Method::DeleteAnnotation => {
                let p: UrlParams = parse(method, params)?;
                reply(self.annotations.delete_annotation(&p.url).await?)
            }
            Method::GetAnnotationByUrl => {
                let p: UrlParams = parse(method, params)?;
                reply(self.annotations.get_annotation_by_url(&p.url).await?)
            }
            Method::GetAllAnnotationsByUrl => {
                let query: PageAnnotationsQuery = parse(method, params)?;
                reply(self.annotations.get_all_annotations_by_url(&query).await?)
            }
            Method::ToggleAnnotBookmark => {
                let p: UrlParams = parse(method, params)?;
                reply(self.annotations.toggle_annot_bookmark(&p.url).await?)
            }
            Method::AnnotHasBookmark => {
                let p: UrlParams = parse(method, params)?;
                reply(self.annotations.annot_has_bookmark(&p.url).await?)
            }
            Method::DeleteBookmarkByUrl => {
                let p: UrlParams = parse(method, params)?;
                reply(self.annotations.delete_bookmark_by_url(&p.url).await?)
            }
            Method::InsertAnnotToList => {
                let p: ListUrlParams = parse(method, params)?;
                reply(self.annotations.insert_annot_to_list(p.list_id, &p.url).await?)
            }
            Method::RemoveAnnotFromList => {
                let p: ListUrlParams = parse(method, params)?;
                reply(self.annotations.remove_annot_from_list(p.list_id, &p.url).await?)
            }
            Method::FetchAnnotationLists => {
                let p: UrlParams = parse(method, params)?;
                reply(self.annotations.fetch_lists_for_annotation(&p.url).await?)
            }
            Method::EditAnnotationTags => {
                let p: TagPatchParams = parse(method, params)?;
                reply(
                    self.annotations
                        .edit_annotation_tags(&p.to_add, &p.to_delete, &p.url)
                        .await?,
                )
            }
            Method::AddAnnotationTag => {
                let p: TagParams = parse(method, params)?;
                reply(self.annotations.add_tag(&p.url, &p.tag).await?)
            }
            Method::DelAnnotationTag => {
                let p: TagParams = parse(method, params)?;
                reply(self.annotations.delete_tag(&p.url, &p.tag).await?)
            }
            Method::GetAnnotationTags => {
                let p: UrlParams = parse(method, params)?;
                reply(self.annotations.get_tags_by_url(&p.url).await?)
            }
            Method::IndexPageFromTab => {
                let p: TabPageParams = parse(method, params)?;
                reply(self.annotations.index_page_from_tab(p.tab_id, &p.url).await?)
            }

            // Pages
            Method::EnsurePage => {
                let p: EnsurePageParams = parse(method, params)?;
                reply(self.pages.ensure_page(&p.url, p.visit_time).await?)
            }
        }
    }
}
