use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::delete_object::DeleteObjectError;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::operation::list_objects_v2::ListObjectsV2Error;
use aws_sdk_s3::operation::put_object::PutObjectError;

pub type StoreResult<T> = Result<T, ObjectStoreError>;

/// Errors produced by object store operations.
///
/// `DestinationNotConfigured` is a usage mistake and is returned before any
/// network call is made; everything else is an operational failure from the
/// remote service or the local filesystem.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ObjectStoreError {
    #[error("destination bucket is not configured; construct the client with destination credentials")]
    DestinationNotConfigured,
    #[error("no objects found under prefix `{prefix}` in bucket `{bucket}`")]
    EmptyPrefix { bucket: String, prefix: String },
    #[error(transparent)]
    ListObjects(#[from] SdkError<ListObjectsV2Error>),
    #[error(transparent)]
    GetObject(#[from] SdkError<GetObjectError>),
    #[error(transparent)]
    PutObject(#[from] SdkError<PutObjectError>),
    #[error(transparent)]
    DeleteObject(#[from] SdkError<DeleteObjectError>),
    #[error("failed to stream object body: {0}")]
    Stream(String),
    #[error(transparent)]
    LocalIo(#[from] std::io::Error),
}

impl ObjectStoreError {
    /// True for failures that indicate a misconfigured client rather than a
    /// remote fault.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::DestinationNotConfigured)
    }
}
