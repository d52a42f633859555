/// Storage-specific errors
use foliofy_core::FolioError;
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A stored value could not be decoded (e.g. malformed decimal text)
    #[error("Corrupt {column} value: {value}")]
    CorruptValue { column: String, value: String },

    /// Domain rule rejected the write
    #[error(transparent)]
    Domain(#[from] FolioError),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StorageError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

impl From<StorageError> for FolioError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { entity, id } => FolioError::NotFound { entity, id },
            StorageError::Domain(inner) => inner,
            other => FolioError::storage(other.to_string()),
        }
    }
}
