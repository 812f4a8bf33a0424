pub mod analytics;
pub mod annotation_query;
pub mod di;
pub mod error;
pub mod http;
pub mod preferences;
pub mod repositories;
pub mod tabs;
