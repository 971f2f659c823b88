//! Object store abstraction and the image adapter built on top of it.
//!
//! `ImageStore` is what the image routes talk to: it turns keys into public
//! URLs, prefixes uploads with a timestamp, and reports every failure as an
//! `ObjectStoreError` value after logging it.

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::models::now_millis;

#[derive(Debug, Error)]
pub enum ObjectStoreError {
    #[error("{operation} on bucket `{bucket}` failed: {message}")]
    Backend {
        operation: &'static str,
        bucket: String,
        message: String,
    },
}

pub type ObjectStoreResult<T> = Result<T, ObjectStoreError>;

/// Bucket-level operations the image routes need.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Every key in `bucket`.
    async fn list_keys(&self, bucket: &str) -> ObjectStoreResult<Vec<String>>;

    /// Store `data` under `key` with public-read access.
    async fn put_public(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> ObjectStoreResult<()>;

    async fn exists(&self, bucket: &str, key: &str) -> ObjectStoreResult<bool>;

    /// Cheap reachability check used by the readiness probe.
    async fn ping(&self, bucket: &str) -> ObjectStoreResult<()>;
}

/// Image adapter over an `ObjectStore`: public URLs in, public URLs out.
#[derive(Clone)]
pub struct ImageStore {
    store: Arc<dyn ObjectStore>,
    region: String,
}

impl ImageStore {
    pub fn new(store: Arc<dyn ObjectStore>, region: impl Into<String>) -> Self {
        Self {
            store,
            region: region.into(),
        }
    }

    /// Public URL of every object in `bucket`.
    pub async fn list_all(&self, bucket: &str) -> ObjectStoreResult<Vec<String>> {
        match self.store.list_keys(bucket).await {
            Ok(keys) => {
                debug!("listed {} images in {}", keys.len(), bucket);
                Ok(keys.iter().map(|key| self.url_for(bucket, key)).collect())
            }
            Err(err) => {
                error!("{}", err);
                Err(err)
            }
        }
    }

    /// Store `data` under `{epoch-millis}_{filename}` and return its public URL.
    pub async fn write(
        &self,
        data: Bytes,
        filename: &str,
        content_type: &str,
        bucket: &str,
    ) -> ObjectStoreResult<String> {
        let key = format!("{}_{}", now_millis(), filename);
        let size = data.len();

        match self.store.put_public(bucket, &key, data, content_type).await {
            Ok(()) => {
                info!("stored image {} ({} bytes) in {}", key, size, bucket);
                Ok(self.url_for(bucket, &key))
            }
            Err(err) => {
                error!("{}", err);
                Err(err)
            }
        }
    }

    pub async fn exists(&self, bucket: &str, key: &str) -> ObjectStoreResult<bool> {
        self.store.exists(bucket, key).await
    }

    pub async fn ping(&self, bucket: &str) -> ObjectStoreResult<()> {
        self.store.ping(bucket).await
    }

    /// `https://{bucket}.s3-{region}.amazonaws.com/{key}`
    pub fn url_for(&self, bucket: &str, key: &str) -> String {
        format!("https://{}.s3-{}.amazonaws.com/{}", bucket, self.region, key)
    }
}
