//! Error types for tickstore
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in tickstore
#[derive(Debug, Error)]
pub enum StoreError {
    /// Input failed a precondition (empty text, empty search string)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Item id not present in the store
    #[error("Item not found: {0}")]
    NotFound(u64),

    /// Store has been shut down and accepts no further mutations
    #[error("Store is closed")]
    Closed,

    /// Internal storage failure (lock poisoning and similar)
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for tickstore operations
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = StoreError::Validation("empty text".to_string());
        assert_eq!(err.to_string(), "Validation failed: empty text");
    }

    #[test]
    fn test_not_found_error() {
        let err = StoreError::NotFound(42);
        assert_eq!(err.to_string(), "Item not found: 42");
    }

    #[test]
    fn test_closed_error() {
        assert_eq!(StoreError::Closed.to_string(), "Store is closed");
    }

    #[test]
    fn test_storage_error() {
        let err = StoreError::Storage("lock poisoned".to_string());
        assert_eq!(err.to_string(), "Storage error: lock poisoned");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only fs");
        let err: StoreError = io_err.into();
        assert!(matches!(err, StoreError::Io(_)));
        assert!(err.to_string().contains("read-only fs"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: StoreError = json_err.into();
        assert!(matches!(err, StoreError::Json(_)));
    }
}
