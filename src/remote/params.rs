//! Argument bags of the remote methods. Keys are camelCase.

use crate::domain::tab::Tab;
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct NameParams {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamesParams {
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdParams {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenameParams {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UrlParams {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuggestionParams {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUrlParams {
    pub list_id: i64,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabsParams {
    pub list_id: i64,
    #[serde(default)]
    pub tabs: Option<Vec<Tab>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditAnnotationParams {
    pub url: String,
    pub comment: String,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_edited: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagPatchParams {
    #[serde(default)]
    pub to_add: Vec<String>,
    #[serde(default)]
    pub to_delete: Vec<String>,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagParams {
    pub url: String,
    pub tag: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabPageParams {
    pub tab_id: i64,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnsurePageParams {
    pub url: String,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub visit_time: Option<DateTime<Utc>>,
}
