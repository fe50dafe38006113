use crate::app_error::StorageError;

/// Durable string key-value storage that survives restarts (the browser's
/// local storage in the web build, a file in the terminal build).
///
/// Reads and writes are synchronous. Implementations use interior
/// mutability so a single instance can be shared behind an `Arc`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
