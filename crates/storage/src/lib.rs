//! Object storage for uploaded site images.
//!
//! Every backend implements [`ObjectStore`]: put bytes under a name inside
//! one of the fixed [`Bucket`]s, delete them again, and map names to the
//! public URLs stored in the database.
//!
//! - [`local::LocalStore`] -- files on disk, served by the API under `/storage`.
//! - [`s3::S3Store`] -- S3 or any S3-compatible service.
//! - [`memory::MemoryStore`] -- in-process map, used by tests.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

pub mod config;
pub mod error;
pub mod local;
pub mod memory;
pub mod s3;

pub use config::{StorageBackend, StorageConfig};
pub use error::StorageError;

/// The fixed set of buckets the site writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Bucket {
    /// Doctor photos, institute covers and gallery images.
    SiteImages,
    /// Health-plan (convênio) logos.
    ConvenioLogos,
}

impl Bucket {
    pub const ALL: [Bucket; 2] = [Bucket::SiteImages, Bucket::ConvenioLogos];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SiteImages => "site-images",
            Self::ConvenioLogos => "convenio-logos",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bucket {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| StorageError::UnknownBucket(s.to_string()))
    }
}

/// Where an object ended up after a successful put.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredObject {
    pub bucket: Bucket,
    /// Object name inside the bucket.
    pub path: String,
    /// Public URL to persist in content or entity rows.
    pub url: String,
}

/// A bucketed blob store with public URLs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `name`, replacing any existing object.
    async fn put(
        &self,
        bucket: Bucket,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, StorageError>;

    /// Remove an object. Deleting a missing object is not an error.
    async fn delete(&self, bucket: Bucket, name: &str) -> Result<(), StorageError>;

    /// Base URL objects are published under, without a trailing slash.
    fn public_base(&self) -> &str;

    /// Public URL for an object.
    fn public_url(&self, bucket: Bucket, name: &str) -> String {
        format!("{}/{}/{}", self.public_base(), bucket, name)
    }

    /// Reverse of [`ObjectStore::public_url`]. `None` for URLs this store
    /// did not produce (external links, other hosts).
    fn locate(&self, url: &str) -> Option<(Bucket, String)> {
        split_public_url(self.public_base(), url)
    }
}

/// Shared handle used by the API state.
pub type DynObjectStore = Arc<dyn ObjectStore>;

/// Split `<base>/<bucket>/<name>` back into its bucket and name.
pub fn split_public_url(base: &str, url: &str) -> Option<(Bucket, String)> {
    let rest = url.strip_prefix(base)?.strip_prefix('/')?;
    let (bucket, name) = rest.split_once('/')?;
    let bucket = bucket.parse().ok()?;
    validate_object_name(name).ok()?;
    Some((bucket, name.to_string()))
}

/// Object names are flat: ASCII letters, digits, `.`, `-` and `_`, not
/// starting with a dot.
pub fn validate_object_name(name: &str) -> Result<(), StorageError> {
    let valid = !name.is_empty()
        && name.len() <= 200
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidName(name.to_string()))
    }
}

/// Build the configured backend.
pub async fn build_store(config: &StorageConfig) -> Result<DynObjectStore, StorageError> {
    let store: DynObjectStore = match config.backend {
        StorageBackend::Local => Arc::new(local::LocalStore::new(
            config.local_path.clone(),
            config.public_url.clone(),
        )),
        StorageBackend::S3 => Arc::new(s3::S3Store::from_config(config).await?),
        StorageBackend::Memory => {
            tracing::warn!("Memory object store selected; uploads are lost on restart");
            Arc::new(memory::MemoryStore::new(config.public_url.clone()))
        }
    };
    tracing::info!(backend = ?config.backend, public_url = %store.public_base(), "Object store ready");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn bucket_names_round_trip() {
        for bucket in Bucket::ALL {
            assert_eq!(bucket.as_str().parse::<Bucket>().unwrap(), bucket);
        }
        assert_matches!("avatars".parse::<Bucket>(), Err(StorageError::UnknownBucket(_)));
    }

    #[test]
    fn object_names() {
        assert!(validate_object_name("3f2a.jpg").is_ok());
        assert!(validate_object_name("logo_unimed-2.png").is_ok());
        assert!(validate_object_name("").is_err());
        assert!(validate_object_name("../etc/passwd").is_err());
        assert!(validate_object_name("a/b.jpg").is_err());
        assert!(validate_object_name(".hidden").is_err());
    }

    #[test]
    fn split_public_url_accepts_own_urls() {
        let base = "http://localhost:3000/storage";
        assert_eq!(
            split_public_url(base, "http://localhost:3000/storage/site-images/a.jpg"),
            Some((Bucket::SiteImages, "a.jpg".to_string()))
        );
        assert_eq!(
            split_public_url(base, "http://localhost:3000/storage/convenio-logos/b.png"),
            Some((Bucket::ConvenioLogos, "b.png".to_string()))
        );
    }

    #[test]
    fn split_public_url_rejects_foreign_urls() {
        let base = "http://localhost:3000/storage";
        assert_eq!(split_public_url(base, "https://cdn.example.com/site-images/a.jpg"), None);
        assert_eq!(split_public_url(base, "http://localhost:3000/storage/other/a.jpg"), None);
        assert_eq!(split_public_url(base, "http://localhost:3000/storage/site-images/"), None);
        assert_eq!(split_public_url(base, "http://localhost:3000/storagesite-images/a.jpg"), None);
    }
}
