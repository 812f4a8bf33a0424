pub mod annotation_query;
pub mod page_content;
pub mod preferences;
pub mod tab_source;
