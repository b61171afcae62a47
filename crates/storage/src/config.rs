use std::path::PathBuf;

use crate::StorageError;

/// Which [`ObjectStore`](crate::ObjectStore) implementation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Local,
    S3,
    /// In-process only, for tests. Uploads vanish on restart and are not served.
    Memory,
}

impl StorageBackend {
    pub fn from_name(name: &str) -> Result<Self, StorageError> {
        match name {
            "local" => Ok(Self::Local),
            "s3" => Ok(Self::S3),
            "memory" => Ok(Self::Memory),
            other => Err(StorageError::Config(format!(
                "Unknown storage backend '{other}'. Must be one of: local, s3, memory"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::S3 => "s3",
            Self::Memory => "memory",
        }
    }
}

/// Object storage configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Root directory for the local backend; one subdirectory per bucket.
    pub local_path: PathBuf,
    /// Base URL objects are published under (no trailing slash).
    pub public_url: String,
    /// Prefix prepended to bucket names for the S3 backend.
    pub s3_bucket_prefix: String,
    /// Custom endpoint for S3-compatible services (MinIO, R2, ...).
    pub s3_endpoint: Option<String>,
}

impl StorageConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default                          |
    /// |----------------------|----------------------------------|
    /// | `STORAGE_BACKEND`    | `local`                          |
    /// | `STORAGE_LOCAL_PATH` | `./storage`                      |
    /// | `STORAGE_PUBLIC_URL` | `http://localhost:3000/storage`  |
    /// | `S3_BUCKET_PREFIX`   | (empty)                          |
    /// | `S3_ENDPOINT`        | (unset)                          |
    pub fn from_env() -> Self {
        let backend = StorageBackend::from_name(
            &std::env::var("STORAGE_BACKEND").unwrap_or_else(|_| "local".into()),
        )
        .expect("STORAGE_BACKEND must be local, s3 or memory");

        let local_path = std::env::var("STORAGE_LOCAL_PATH")
            .unwrap_or_else(|_| "./storage".into())
            .into();

        let public_url = std::env::var("STORAGE_PUBLIC_URL")
            .unwrap_or_else(|_| "http://localhost:3000/storage".into())
            .trim_end_matches('/')
            .to_string();

        let s3_bucket_prefix = std::env::var("S3_BUCKET_PREFIX").unwrap_or_default();
        let s3_endpoint = std::env::var("S3_ENDPOINT").ok().filter(|s| !s.is_empty());

        Self {
            backend,
            local_path,
            public_url,
            s3_bucket_prefix,
            s3_endpoint,
        }
    }

    /// In-memory configuration for tests.
    pub fn memory(public_url: &str) -> Self {
        Self {
            backend: StorageBackend::Memory,
            local_path: PathBuf::new(),
            public_url: public_url.trim_end_matches('/').to_string(),
            s3_bucket_prefix: String::new(),
            s3_endpoint: None,
        }
    }
}
