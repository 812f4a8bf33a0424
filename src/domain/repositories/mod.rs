pub mod dispatcher;
pub mod document_store;
pub mod operation;
