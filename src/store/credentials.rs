use tracing::warn;

/// Static credentials for one bucket. Immutable once constructed.
#[derive(Clone)]
pub struct BucketCredentials {
    pub bucket_name: String,
    pub access_key_id: String,
    pub secret_key: String,
}

impl BucketCredentials {
    pub fn new(
        bucket_name: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            access_key_id: access_key_id.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Assemble credentials from individually optional fields, as read from
    /// loosely structured configuration.
    ///
    /// All three present yields credentials; none present yields `None`. A
    /// partial set is treated as not configured at all, with a warning, so a
    /// half-filled destination never produces a half-working client.
    pub fn from_parts(
        bucket_name: Option<String>,
        access_key_id: Option<String>,
        secret_key: Option<String>,
    ) -> Option<Self> {
        match (bucket_name, access_key_id, secret_key) {
            (Some(bucket_name), Some(access_key_id), Some(secret_key)) => Some(Self {
                bucket_name,
                access_key_id,
                secret_key,
            }),
            (None, None, None) => None,
            (bucket_name, access_key_id, secret_key) => {
                warn!(
                    bucket_name_set = bucket_name.is_some(),
                    access_key_id_set = access_key_id.is_some(),
                    secret_key_set = secret_key.is_some(),
                    "bucket credentials are only partially supplied; treating bucket as not configured"
                );
                None
            }
        }
    }
}

// Keep the secret out of debug output.
impl std::fmt::Debug for BucketCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BucketCredentials")
            .field("bucket_name", &self.bucket_name)
            .field("access_key_id", &self.access_key_id)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}
