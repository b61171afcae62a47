/// Errors raised by object store backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid object name '{0}'")]
    InvalidName(String),

    #[error("Unknown bucket '{0}'")]
    UnknownBucket(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Storage configuration error: {0}")]
    Config(String),
}
