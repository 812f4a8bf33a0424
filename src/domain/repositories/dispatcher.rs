// src/domain/repositories/dispatcher.rs
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::repositories::document_store::DocumentStore;
use crate::domain::repositories::operation::{Operation, Verb};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{instrument, trace};

/// Raw result of an executed operation.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutput {
    Object(Option<Value>),
    Objects(Vec<Value>),
    Created(bool),
    Affected(usize),
}

/// Resolves named operations into store calls.
#[derive(Clone)]
pub struct OperationDispatcher {
    store: Arc<dyn DocumentStore>,
}

impl std::fmt::Debug for OperationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationDispatcher")
            .field("store", &"Arc<dyn DocumentStore>")
            .finish()
    }
}

fn unexpected(op: &'static str, output: &OperationOutput) -> DomainError {
    DomainError::Storage(format!(
        "operation '{}' returned unexpected output: {:?}",
        op, output
    ))
}

impl OperationDispatcher {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    #[instrument(skip_all, level = "trace", fields(op = operation.name()))]
    pub async fn execute(&self, operation: Operation) -> DomainResult<OperationOutput> {
        let plan = operation.plan()?;
        trace!(collection = %plan.collection, verb = ?plan.verb, "dispatching");

        let output = match plan.verb {
            Verb::FindObject => {
                OperationOutput::Object(self.store.find_object(plan.collection, &plan.filter).await?)
            }
            Verb::FindObjects => OperationOutput::Objects(
                self.store
                    .find_objects(plan.collection, &plan.filter, &plan.options)
                    .await?,
            ),
            Verb::CreateObject(on_conflict) => {
                let document = plan.document.ok_or_else(|| {
                    DomainError::Storage(format!("operation '{}' has no document", operation.name()))
                })?;
                OperationOutput::Created(
                    self.store
                        .create_object(plan.collection, document, on_conflict)
                        .await?,
                )
            }
            Verb::UpdateObject => OperationOutput::Affected(
                self.store
                    .update_objects(plan.collection, &plan.filter, plan.updates)
                    .await?,
            ),
            Verb::DeleteObject | Verb::DeleteObjects => OperationOutput::Affected(
                self.store.delete_objects(plan.collection, &plan.filter).await?,
            ),
        };
        Ok(output)
    }

    /// Execute a singular find and deserialize the document.
    pub async fn find_one<T: DeserializeOwned>(&self, operation: Operation) -> DomainResult<Option<T>> {
        let name = operation.name();
        match self.execute(operation).await? {
            OperationOutput::Object(Some(value)) => Ok(Some(serde_json::from_value(value)?)),
            OperationOutput::Object(None) => Ok(None),
            other => Err(unexpected(name, &other)),
        }
    }

    /// Execute a plural find and deserialize every document.
    pub async fn find_many<T: DeserializeOwned>(&self, operation: Operation) -> DomainResult<Vec<T>> {
        let name = operation.name();
        match self.execute(operation).await? {
            OperationOutput::Objects(values) => values
                .into_iter()
                .map(|v| serde_json::from_value(v).map_err(DomainError::from))
                .collect(),
            other => Err(unexpected(name, &other)),
        }
    }

    /// Execute a create, returning whether a document was written.
    pub async fn create(&self, operation: Operation) -> DomainResult<bool> {
        let name = operation.name();
        match self.execute(operation).await? {
            OperationOutput::Created(written) => Ok(written),
            other => Err(unexpected(name, &other)),
        }
    }

    /// Execute an update or delete, returning the affected count.
    pub async fn mutate(&self, operation: Operation) -> DomainResult<usize> {
        let name = operation.name();
        match self.execute(operation).await? {
            OperationOutput::Affected(count) => Ok(count),
            other => Err(unexpected(name, &other)),
        }
    }
}
