use std::path::Path;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use mockall::automock;
use tracing::debug;

use super::credentials::BucketCredentials;
use super::error::{ObjectStoreError, StoreResult};

/// The capability set this crate needs from the remote object store.
///
/// One concrete implementation per SDK; [`S3Remote`] is the AWS one. The
/// mock generated here is what the behavioral tests run against.
#[automock]
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// List every key under `prefix`. A prefix with no matches is an empty
    /// listing, not an error.
    async fn list_objects(&self, bucket: &str, prefix: &str) -> StoreResult<Vec<String>>;

    /// Fetch the body of one object.
    async fn get_object(&self, bucket: &str, key: &str) -> StoreResult<ByteStream>;

    /// Write `body` to one object, replacing it if present.
    async fn put_object(&self, bucket: &str, key: &str, body: ByteStream) -> StoreResult<()>;

    /// Stream a local file up to `key`.
    async fn upload_file(&self, bucket: &str, key: &str, local_path: &Path) -> StoreResult<()>;

    /// Stream the object at `key` down into `local_path`.
    async fn download_file(&self, bucket: &str, key: &str, local_path: &Path) -> StoreResult<()>;

    /// Delete exactly the object named `key`.
    async fn delete_object(&self, bucket: &str, key: &str) -> StoreResult<()>;
}

/// [`RemoteStore`] backed by the AWS S3 SDK, one client per bucket so each
/// bucket can carry its own access keys.
pub struct S3Remote {
    client: Client,
}

impl S3Remote {
    /// Build a client from a shared AWS `config` with the bucket's static
    /// credentials applied on top.
    pub fn new(config: &SdkConfig, credentials: &BucketCredentials) -> Self {
        let provider = Credentials::new(
            credentials.access_key_id.clone(),
            credentials.secret_key.clone(),
            None,
            None,
            "object-store-client",
        );
        let s3_config = aws_sdk_s3::config::Builder::from(config)
            .credentials_provider(provider)
            .build();
        Self {
            client: Client::from_conf(s3_config),
        }
    }

    /// Wrap an already configured SDK client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RemoteStore for S3Remote {
    async fn list_objects(&self, bucket: &str, prefix: &str) -> StoreResult<Vec<String>> {
        let response = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .send()
            .await?;
        let keys: Vec<String> = response
            .contents()
            .iter()
            .filter_map(|object| object.key().map(str::to_owned))
            .collect();
        debug!(bucket, prefix, count = keys.len(), "listed objects");
        Ok(keys)
    }

    async fn get_object(&self, bucket: &str, key: &str) -> StoreResult<ByteStream> {
        let response = self.client.get_object().bucket(bucket).key(key).send().await?;
        Ok(response.body)
    }

    async fn put_object(&self, bucket: &str, key: &str, body: ByteStream) -> StoreResult<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await?;
        Ok(())
    }

    async fn upload_file(&self, bucket: &str, key: &str, local_path: &Path) -> StoreResult<()> {
        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| ObjectStoreError::Stream(e.to_string()))?;
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await?;
        Ok(())
    }

    async fn download_file(&self, bucket: &str, key: &str, local_path: &Path) -> StoreResult<()> {
        let response = self.client.get_object().bucket(bucket).key(key).send().await?;
        let mut reader = response.body.into_async_read();
        let mut file = tokio::fs::File::create(local_path).await?;
        tokio::io::copy(&mut reader, &mut file).await?;
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> StoreResult<()> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await?;
        Ok(())
    }
}
