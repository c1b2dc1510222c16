use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by key-value backends regardless of where the bytes live.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the underlying medium failed.
    #[error("storage i/o failed for `{key}`")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    /// A value could not be encoded to or decoded from JSON.
    #[error("storage serialization failed for `{key}`")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    /// The backend refused the operation (quota, closed handle, ...).
    #[error("storage unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Wrap an I/O failure for the given collection key.
    pub fn io(key: &str, source: std::io::Error) -> Self {
        StorageError::Io {
            key: key.to_string(),
            source,
        }
    }

    /// Wrap a JSON failure for the given collection key.
    pub fn serialization(key: &str, source: serde_json::Error) -> Self {
        StorageError::Serialization {
            key: key.to_string(),
            source,
        }
    }
}
