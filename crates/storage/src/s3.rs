//! S3-backed object store.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use crate::{validate_object_name, Bucket, ObjectStore, StorageConfig, StorageError, StoredObject};

/// Maps each [`Bucket`] to `<prefix><bucket>` in S3.
pub struct S3Store {
    client: Client,
    bucket_prefix: String,
    public_base: String,
}

impl S3Store {
    pub fn new(client: Client, bucket_prefix: String, public_base: String) -> Self {
        Self {
            client,
            bucket_prefix,
            public_base: public_base.trim_end_matches('/').to_string(),
        }
    }

    /// Build a client from the ambient AWS environment, honouring a custom
    /// endpoint for S3-compatible services.
    pub async fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        let shared = aws_config::load_from_env().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &config.s3_endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }
        if shared.credentials_provider().is_none() {
            let access_key = std::env::var("AWS_ACCESS_KEY_ID").map_err(|_| {
                StorageError::Config("AWS credentials are required for the s3 backend".into())
            })?;
            let secret_key = std::env::var("AWS_SECRET_ACCESS_KEY").map_err(|_| {
                StorageError::Config("AWS_SECRET_ACCESS_KEY is required for the s3 backend".into())
            })?;
            builder = builder.credentials_provider(aws_credential_types::Credentials::new(
                access_key,
                secret_key,
                None,
                None,
                "clinica-env",
            ));
        }
        Ok(Self::new(
            Client::from_conf(builder.build()),
            config.s3_bucket_prefix.clone(),
            config.public_url.clone(),
        ))
    }

    fn s3_bucket(&self, bucket: Bucket) -> String {
        format!("{}{}", self.bucket_prefix, bucket.as_str())
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put(
        &self,
        bucket: Bucket,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        validate_object_name(name)?;
        let size = bytes.len();
        self.client
            .put_object()
            .bucket(self.s3_bucket(bucket))
            .key(name)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StorageError::Backend(format!("put_object failed: {e}")))?;
        tracing::debug!(%bucket, name, size, "Stored object in S3");
        Ok(StoredObject {
            bucket,
            path: name.to_string(),
            url: self.public_url(bucket, name),
        })
    }

    async fn delete(&self, bucket: Bucket, name: &str) -> Result<(), StorageError> {
        validate_object_name(name)?;
        self.client
            .delete_object()
            .bucket(self.s3_bucket(bucket))
            .key(name)
            .send()
            .await
            .map_err(|e| StorageError::Backend(format!("delete_object failed: {e}")))?;
        tracing::debug!(%bucket, name, "Removed object from S3");
        Ok(())
    }

    fn public_base(&self) -> &str {
        &self.public_base
    }
}
