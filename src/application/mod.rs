// src/application/mod.rs
pub mod error;
pub mod outcome;
pub mod services;

// Re-export key services for easier imports
pub use services::annotation_service_impl::AnnotationServiceImpl;
pub use services::list_service_impl::ListServiceImpl;
pub use services::page_service_impl::PageServiceImpl;
pub use services::tab_service_impl::TabServiceImpl;
