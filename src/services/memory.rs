//! In-memory store back-ends.
//!
//! Used for local runs with `--storage memory` and by the handler tests.
//! Tables and buckets spring into existence on first use; nothing is persisted.

use async_trait::async_trait;
use bytes::Bytes;
use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};
use tokio::sync::RwLock;

use super::{
    object_store::{ObjectStore, ObjectStoreResult},
    table_store::{
        Document, StoreError, StoreResult, TableStore, UpdateExpression, document_id,
    },
};

#[derive(Debug, Clone, Default)]
pub struct MemoryTableStore {
    tables: Arc<RwLock<HashMap<String, BTreeMap<String, Document>>>>,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn not_found(table: &str, id: &str) -> StoreError {
        StoreError::NotFound {
            table: table.to_string(),
            id: id.to_string(),
        }
    }
}

#[async_trait]
impl TableStore for MemoryTableStore {
    async fn scan(&self, table: &str) -> StoreResult<Vec<Document>> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(table)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn get(&self, table: &str, id: &str) -> StoreResult<Option<Document>> {
        let tables = self.tables.read().await;
        Ok(tables.get(table).and_then(|rows| rows.get(id)).cloned())
    }

    async fn put(&self, table: &str, item: Document) -> StoreResult<()> {
        let id = document_id(&item)
            .ok_or_else(|| StoreError::Decode("item has no string `id` attribute".into()))?
            .to_string();
        let mut tables = self.tables.write().await;
        tables.entry(table.to_string()).or_default().insert(id, item);
        Ok(())
    }

    async fn update(
        &self,
        table: &str,
        id: &str,
        update: &UpdateExpression,
    ) -> StoreResult<Document> {
        let mut tables = self.tables.write().await;
        let row = tables
            .get_mut(table)
            .and_then(|rows| rows.get_mut(id))
            .ok_or_else(|| Self::not_found(table, id))?;
        update.apply(row);
        Ok(row.clone())
    }

    async fn delete(&self, table: &str, id: &str) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .get_mut(table)
            .and_then(|rows| rows.remove(id))
            .map(|_| ())
            .ok_or_else(|| Self::not_found(table, id))
    }

    async fn ping(&self, _table: &str) -> StoreResult<()> {
        Ok(())
    }
}

/// Objects keyed by `(bucket, key)`; listing is in key order.
#[derive(Debug, Clone, Default)]
pub struct MemoryObjectStore {
    objects: Arc<RwLock<BTreeMap<(String, String), StoredObject>>>,
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: String,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        let objects = self.objects.read().await;
        objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn list_keys(&self, bucket: &str) -> ObjectStoreResult<Vec<String>> {
        let objects = self.objects.read().await;
        Ok(objects
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, key)| key.clone())
            .collect())
    }

    async fn put_public(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> ObjectStoreResult<()> {
        let mut objects = self.objects.write().await;
        objects.insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn exists(&self, bucket: &str, key: &str) -> ObjectStoreResult<bool> {
        Ok(self.object(bucket, key).await.is_some())
    }

    async fn ping(&self, _bucket: &str) -> ObjectStoreResult<()> {
        Ok(())
    }
}
