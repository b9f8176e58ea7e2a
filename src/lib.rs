//! Thin client for moving objects into, out of, and between S3 buckets.
//!
//! [`ObjectStoreClient`] holds credentials for a source bucket and an
//! optional destination bucket and forwards list, upload, download, delete
//! and cross-bucket copy operations to the remote service. Transfers are
//! sequential and unretried; failures come back as [`ObjectStoreError`]
//! values, never panics.

mod store;

pub use store::client::{BucketHandle, ObjectStoreClient};
pub use store::credentials::BucketCredentials;
pub use store::error::{ObjectStoreError, StoreResult};
pub use store::remote::{MockRemoteStore, RemoteStore, S3Remote};
