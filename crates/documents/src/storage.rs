//! PDF artifact storage in S3.
//!
//! Uploads are best-effort from the caller's point of view: on failure
//! (e.g. missing bucket) the handler falls back to streaming the
//! rendered bytes directly to the client instead of returning a URL.

use aws_sdk_s3::primitives::ByteStream;

/// Errors from the artifact store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("S3 upload failed: {0}")]
    Upload(String),

    #[error("Artifact storage not configured: set S3_BUCKET")]
    NotConfigured,
}

/// Stores generated PDFs in a managed object store.
pub struct ArtifactStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    /// Public base URL for stored objects, e.g. a CDN or the bucket
    /// endpoint. Defaults to the virtual-hosted S3 URL.
    public_base_url: String,
}

impl ArtifactStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String, public_base_url: String) -> Self {
        Self {
            client,
            bucket,
            public_base_url,
        }
    }

    /// Build from the ambient AWS environment plus `S3_BUCKET` and
    /// optional `S3_PUBLIC_BASE_URL`. Returns `None` when no bucket is
    /// configured.
    pub async fn from_env() -> Option<Self> {
        let bucket = std::env::var("S3_BUCKET").ok()?;
        let config = aws_config::load_from_env().await;
        let client = aws_sdk_s3::Client::new(&config);
        let public_base_url = std::env::var("S3_PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("https://{bucket}.s3.amazonaws.com"));
        Some(Self::new(client, bucket, public_base_url))
    }

    /// Upload PDF bytes under `key`, returning the artifact's public URL.
    pub async fn put_pdf(&self, key: &str, bytes: Vec<u8>) -> Result<String, StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type("application/pdf")
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|err| StorageError::Upload(err.to_string()))?;

        Ok(format!("{}/{}", self.public_base_url, key))
    }
}
