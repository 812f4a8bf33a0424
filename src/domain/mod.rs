pub mod analytics;
pub mod annotation;
pub mod error;
pub mod list;
pub mod page;
pub mod repositories;
pub mod services;
pub mod tab;
pub mod tag;
pub mod url;
