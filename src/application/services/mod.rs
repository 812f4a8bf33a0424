// src/application/services/mod.rs
pub mod annotation_service;
pub mod annotation_service_impl;
pub mod list_service;
pub mod list_service_impl;
pub mod page_service;
pub mod page_service_impl;
pub mod tab_service;
pub mod tab_service_impl;

pub use annotation_service::AnnotationService;
pub use list_service::ListService;
pub use page_service::PageService;
pub use tab_service::TabService;
