//! Table store abstraction: whole-table scans and single-key reads/writes
//! over JSON documents keyed by `id`.

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;

/// A stored row: attribute name → JSON value.
pub type Document = Map<String, Value>;

/// Partition key attribute shared by every table.
pub const KEY_ATTRIBUTE: &str = "id";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("item `{id}` not found in table `{table}`")]
    NotFound { table: String, id: String },
    #[error("{operation} on table `{table}` failed: {message}")]
    Backend {
        operation: &'static str,
        table: String,
        message: String,
    },
    #[error("malformed item: {0}")]
    Decode(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Operations the record routes need from a table store.
///
/// Implementations must be safe to share across requests; every method is a
/// single round trip with no retries beyond what the underlying client does.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Every item in `table`, in store order.
    async fn scan(&self, table: &str) -> StoreResult<Vec<Document>>;

    async fn get(&self, table: &str, id: &str) -> StoreResult<Option<Document>>;

    /// Insert or replace the item keyed by its `id` attribute.
    async fn put(&self, table: &str, item: Document) -> StoreResult<()>;

    /// Apply `update` to an existing item and return the item as stored afterwards.
    /// Fails with `StoreError::NotFound` instead of creating the item.
    async fn update(
        &self,
        table: &str,
        id: &str,
        update: &UpdateExpression,
    ) -> StoreResult<Document>;

    /// Remove an existing item. Fails with `StoreError::NotFound` when absent.
    async fn delete(&self, table: &str, id: &str) -> StoreResult<()>;

    /// Cheap reachability check used by the readiness probe.
    async fn ping(&self, table: &str) -> StoreResult<()>;
}

/// A `SET` update over top-level attributes.
///
/// Every attribute goes through a `#name` placeholder so reserved words
/// (`name`, `order`, `comment`) are safe to assign.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateExpression {
    assignments: Vec<(String, Value)>,
}

impl UpdateExpression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `value` to `attribute`. The key attribute cannot be assigned.
    pub fn set(mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        let attribute = attribute.into();
        debug_assert_ne!(attribute, KEY_ATTRIBUTE, "the key attribute is immutable");
        self.assignments.push((attribute, value.into()));
        self
    }

    /// Expression text, e.g. `SET #name = :name, #price = :price`.
    pub fn expression(&self) -> String {
        let clauses = self
            .assignments
            .iter()
            .map(|(attribute, _)| format!("#{attribute} = :{attribute}"))
            .collect::<Vec<_>>();
        format!("SET {}", clauses.join(", "))
    }

    /// `#placeholder` → attribute name.
    pub fn attribute_names(&self) -> HashMap<String, String> {
        self.assignments
            .iter()
            .map(|(attribute, _)| (format!("#{attribute}"), attribute.clone()))
            .collect()
    }

    /// `:placeholder` → value.
    pub fn attribute_values(&self) -> impl Iterator<Item = (String, &Value)> {
        self.assignments
            .iter()
            .map(|(attribute, value)| (format!(":{attribute}"), value))
    }

    /// Apply the assignments to an in-memory document.
    pub fn apply(&self, document: &mut Document) {
        for (attribute, value) in &self.assignments {
            document.insert(attribute.clone(), value.clone());
        }
    }
}

/// Serialize a record into the document shape the stores take.
pub fn to_document<T: Serialize>(record: &T) -> StoreResult<Document> {
    match serde_json::to_value(record) {
        Ok(Value::Object(document)) => Ok(document),
        Ok(other) => Err(StoreError::Decode(format!(
            "record serialized to a non-object value: {other}"
        ))),
        Err(err) => Err(StoreError::Decode(err.to_string())),
    }
}

/// Deserialize a stored document into a typed record.
pub fn from_document<T: DeserializeOwned>(document: Document) -> StoreResult<T> {
    serde_json::from_value(Value::Object(document))
        .map_err(|err| StoreError::Decode(err.to_string()))
}

/// The `id` attribute of a document, if it is a string.
pub fn document_id(document: &Document) -> Option<&str> {
    document.get(KEY_ATTRIBUTE).and_then(Value::as_str)
}
