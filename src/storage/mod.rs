pub mod json;
pub mod memory;

pub use json::JsonFileStorage;
pub use memory::MemoryStorage;

use crate::error::StorageError;

/// Trait for durable key/value slots holding serialized snapshots
pub trait Storage: Send + Sync {
    /// Read the raw contents of a slot, `None` if it was never written
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite a slot with new contents
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
