//! Filesystem-backed object store.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::{validate_object_name, Bucket, ObjectStore, StorageError, StoredObject};

/// Stores objects as `<root>/<bucket>/<name>`.
pub struct LocalStore {
    root: PathBuf,
    public_base: String,
}

impl LocalStore {
    pub fn new(root: PathBuf, public_base: String) -> Self {
        Self {
            root,
            public_base: public_base.trim_end_matches('/').to_string(),
        }
    }

    /// Directory served publicly (one subdirectory per bucket).
    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    fn object_path(&self, bucket: Bucket, name: &str) -> Result<PathBuf, StorageError> {
        validate_object_name(name)?;
        Ok(self.root.join(bucket.as_str()).join(name))
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    async fn put(
        &self,
        bucket: Bucket,
        name: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        let path = self.object_path(bucket, name)?;
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        let size = bytes.len();
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(%bucket, name, size, "Stored object on disk");
        Ok(StoredObject {
            bucket,
            path: name.to_string(),
            url: self.public_url(bucket, name),
        })
    }

    async fn delete(&self, bucket: Bucket, name: &str) -> Result<(), StorageError> {
        let path = self.object_path(bucket, name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(%bucket, name, "Removed object from disk");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn public_base(&self) -> &str {
        &self.public_base
    }
}
