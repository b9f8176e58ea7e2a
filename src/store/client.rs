use std::path::Path;
use std::sync::Arc;

use aws_config::{BehaviorVersion, SdkConfig};
use tracing::{debug, error, info, warn};

use super::credentials::BucketCredentials;
use super::error::{ObjectStoreError, StoreResult};
use super::remote::{RemoteStore, S3Remote};

/// One bucket bound to one remote-store connection. Read-only after
/// construction.
#[derive(Clone)]
pub struct BucketHandle {
    name: String,
    remote: Arc<dyn RemoteStore>,
}

impl BucketHandle {
    pub fn new(name: impl Into<String>, remote: Arc<dyn RemoteStore>) -> Self {
        Self {
            name: name.into(),
            remote,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Client for a source bucket and an optional destination bucket.
///
/// Every operation is a sequence of blocking-style awaited requests against
/// the remote service; nothing is retried and nothing runs concurrently.
/// Operations that need the destination return
/// [`ObjectStoreError::DestinationNotConfigured`] before touching the
/// network when it was not set up.
pub struct ObjectStoreClient {
    source: BucketHandle,
    destination: Option<BucketHandle>,
}

impl ObjectStoreClient {
    /// Create a client with the AWS configuration loaded from the
    /// environment, then one connection per configured bucket using that
    /// bucket's credentials.
    pub async fn connect(
        source: BucketCredentials,
        destination: Option<BucketCredentials>,
    ) -> Self {
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self::with_sdk_config(&config, source, destination)
    }

    /// Create a client on top of a prepared AWS `config` (region, endpoint,
    /// timeouts); each bucket's static credentials are applied per
    /// connection.
    pub fn with_sdk_config(
        config: &SdkConfig,
        source: BucketCredentials,
        destination: Option<BucketCredentials>,
    ) -> Self {
        let source = BucketHandle::new(
            source.bucket_name.clone(),
            Arc::new(S3Remote::new(config, &source)) as Arc<dyn RemoteStore>,
        );
        let destination = destination.map(|creds| {
            BucketHandle::new(
                creds.bucket_name.clone(),
                Arc::new(S3Remote::new(config, &creds)) as Arc<dyn RemoteStore>,
            )
        });
        Self::from_handles(source, destination)
    }

    /// Assemble a client from prebuilt handles. This is the seam for tests
    /// and for non-AWS [`RemoteStore`] implementations.
    pub fn from_handles(source: BucketHandle, destination: Option<BucketHandle>) -> Self {
        match &destination {
            Some(dst) => info!(
                "object store client ready: source bucket `{}`, destination bucket `{}`",
                source.name, dst.name
            ),
            None => warn!(
                "object store client ready: source bucket `{}`, destination bucket not configured",
                source.name
            ),
        }
        Self {
            source,
            destination,
        }
    }

    pub fn source_bucket(&self) -> &str {
        &self.source.name
    }

    pub fn destination_configured(&self) -> bool {
        self.destination.is_some()
    }

    /// List every key under `prefix` in the source bucket. A prefix with no
    /// matching objects yields an empty vector, not an error.
    pub async fn list_objects(&self, prefix: &str) -> StoreResult<Vec<String>> {
        self.source
            .remote
            .list_objects(&self.source.name, prefix)
            .await
            .map_err(|e| {
                error!("failed to list `{}` in bucket `{}`: {e}", prefix, self.source.name);
                e
            })
    }

    /// Stream the file at `local_path` into the source bucket under
    /// `destination_key`. No retry on failure.
    pub async fn upload_local_file(
        &self,
        local_path: impl AsRef<Path>,
        destination_key: &str,
    ) -> StoreResult<()> {
        let local_path = local_path.as_ref();
        debug!(
            "uploading `{}` to bucket `{}` key `{}`",
            local_path.display(),
            self.source.name,
            destination_key
        );
        self.source
            .remote
            .upload_file(&self.source.name, destination_key, local_path)
            .await
            .map_err(|e| {
                error!(
                    "failed to upload `{}` to bucket `{}` key `{}`: {e}",
                    local_path.display(),
                    self.source.name,
                    destination_key
                );
                e
            })
    }

    /// Fetch the object `source_prefix + file_name` from the source bucket
    /// into `local_dir/file_name`.
    pub async fn download_to_local(
        &self,
        source_prefix: &str,
        file_name: &str,
        local_dir: impl AsRef<Path>,
    ) -> StoreResult<()> {
        let key = format!("{source_prefix}{file_name}");
        let local_path = local_dir.as_ref().join(file_name);
        debug!(
            "downloading bucket `{}` key `{}` to `{}`",
            self.source.name,
            key,
            local_path.display()
        );
        self.source
            .remote
            .download_file(&self.source.name, &key, &local_path)
            .await
            .map_err(|e| {
                error!("failed to download `{}` from bucket `{}`: {e}", key, self.source.name);
                e
            })
    }

    /// Delete the single object `prefix + file_name` from the source
    /// bucket. Pass an empty `file_name` to delete the prefix key itself.
    pub async fn delete_object(&self, prefix: &str, file_name: &str) -> StoreResult<()> {
        let key = format!("{prefix}{file_name}");
        debug!("deleting bucket `{}` key `{}`", self.source.name, key);
        self.source
            .remote
            .delete_object(&self.source.name, &key)
            .await
            .map_err(|e| {
                error!("failed to delete `{}` from bucket `{}`: {e}", key, self.source.name);
                e
            })
    }

    /// Move everything under `source_prefix` in the source bucket to
    /// `destination_prefix` in the destination bucket.
    ///
    /// Objects are transferred one at a time in listing order, each named by
    /// the final path segment of its source key. When every transfer
    /// succeeds the source and destination marker keys are deleted and the
    /// call returns `Ok`. When any transfer fails only the source marker key
    /// is deleted and the first error is returned; objects already written
    /// to the destination are left in place.
    ///
    /// # Errors
    ///
    /// [`ObjectStoreError::DestinationNotConfigured`] when the client was
    /// built without destination credentials, and
    /// [`ObjectStoreError::EmptyPrefix`] when the source listing has no
    /// work to do.
    pub async fn copy_bucket_to_bucket(
        &self,
        source_prefix: &str,
        destination_prefix: &str,
    ) -> StoreResult<()> {
        let destination = self
            .destination
            .as_ref()
            .ok_or(ObjectStoreError::DestinationNotConfigured)?;

        info!(
            "transferring bucket `{}` prefix `{}` to bucket `{}` prefix `{}`",
            self.source.name, source_prefix, destination.name, destination_prefix
        );

        let keys = self
            .source
            .remote
            .list_objects(&self.source.name, source_prefix)
            .await
            .map_err(|e| {
                error!("failed to list `{}` in bucket `{}`: {e}", source_prefix, self.source.name);
                e
            })?;
        if keys.is_empty() {
            warn!(
                "nothing to copy: no objects under `{}` in bucket `{}`",
                source_prefix, self.source.name
            );
            return Err(ObjectStoreError::EmptyPrefix {
                bucket: self.source.name.clone(),
                prefix: source_prefix.to_owned(),
            });
        }

        match self.copy_objects(destination, &keys, destination_prefix).await {
            Ok(()) => {
                self.source
                    .remote
                    .delete_object(&self.source.name, source_prefix)
                    .await?;
                destination
                    .remote
                    .delete_object(&destination.name, destination_prefix)
                    .await?;
                info!(
                    "copied {} object(s) from bucket `{}` to bucket `{}`",
                    keys.len(),
                    self.source.name,
                    destination.name
                );
                Ok(())
            }
            Err(copy_err) => {
                error!(
                    "copy from bucket `{}` prefix `{}` failed: {copy_err}",
                    self.source.name, source_prefix
                );
                // Partially written destination objects stay behind; only
                // the source marker key is cleaned up.
                if let Err(delete_err) = self
                    .source
                    .remote
                    .delete_object(&self.source.name, source_prefix)
                    .await
                {
                    error!(
                        "failed to delete source marker `{}` after copy failure: {delete_err}",
                        source_prefix
                    );
                }
                Err(copy_err)
            }
        }
    }

    async fn copy_objects(
        &self,
        destination: &BucketHandle,
        keys: &[String],
        destination_prefix: &str,
    ) -> StoreResult<()> {
        for key in keys {
            let destination_key = format!("{destination_prefix}{}", object_file_name(key));
            debug!(
                "copying `{}` from bucket `{}` to bucket `{}` key `{}`",
                key, self.source.name, destination.name, destination_key
            );
            let body = self.source.remote.get_object(&self.source.name, key).await?;
            destination
                .remote
                .put_object(&destination.name, &destination_key, body)
                .await?;
        }
        Ok(())
    }
}

/// Final slash-delimited segment of `key`; a key with no `/` is its own
/// file name.
fn object_file_name(key: &str) -> &str {
    match key.rsplit_once('/') {
        Some((_, name)) => name,
        None => key,
    }
}
