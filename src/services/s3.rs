//! S3-backed `ObjectStore`.

use super::object_store::{ObjectStore, ObjectStoreError, ObjectStoreResult};
use async_trait::async_trait;
use aws_sdk_s3::{
    Client,
    error::{DisplayErrorContext, SdkError},
    operation::head_object::HeadObjectError,
    primitives::ByteStream,
    types::ObjectCannedAcl,
};
use bytes::Bytes;
use std::error::Error as StdError;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    #[instrument(skip(self))]
    async fn list_keys(&self, bucket: &str) -> ObjectStoreResult<Vec<String>> {
        let mut keys = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let output = self
                .client
                .list_objects_v2()
                .bucket(bucket)
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .map_err(|err| backend_error("ListObjectsV2", bucket, err))?;

            keys.extend(
                output
                    .contents()
                    .iter()
                    .filter_map(|object| object.key().map(str::to_string)),
            );

            match output.next_continuation_token() {
                Some(token) if output.is_truncated().unwrap_or(false) => {
                    continuation_token = Some(token.to_string());
                }
                _ => break,
            }
        }

        debug!("listed {} keys", keys.len());
        Ok(keys)
    }

    #[instrument(skip(self, data), fields(size = data.len()))]
    async fn put_public(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> ObjectStoreResult<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|err| backend_error("PutObject", bucket, err))?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn exists(&self, bucket: &str, key: &str) -> ObjectStoreResult<bool> {
        match self.client.head_object().bucket(bucket).key(key).send().await {
            Ok(_) => Ok(true),
            Err(err) => match err.into_service_error() {
                HeadObjectError::NotFound(_) => Ok(false),
                other => Err(ObjectStoreError::Backend {
                    operation: "HeadObject",
                    bucket: bucket.to_string(),
                    message: DisplayErrorContext(&other).to_string(),
                }),
            },
        }
    }

    async fn ping(&self, bucket: &str) -> ObjectStoreResult<()> {
        self.client
            .head_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(|err| backend_error("HeadBucket", bucket, err))?;
        Ok(())
    }
}

fn backend_error<E, R>(
    operation: &'static str,
    bucket: &str,
    err: SdkError<E, R>,
) -> ObjectStoreError
where
    E: StdError + 'static,
    R: std::fmt::Debug,
{
    ObjectStoreError::Backend {
        operation,
        bucket: bucket.to_string(),
        message: DisplayErrorContext(&err).to_string(),
    }
}
