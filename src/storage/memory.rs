use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::Storage;
use crate::error::StorageError;

/// In-process storage, optionally capped at a byte quota per slot
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject any write whose value is longer than `bytes`
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    /// Seed a slot without going through the quota check
    pub fn with_slot(self, key: &str, value: &str) -> Self {
        self.slots().insert(key.to_string(), value.to_string());
        self
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            if value.len() > quota {
                return Err(StorageError::Rejected {
                    key: key.to_string(),
                    reason: format!("quota of {} bytes exceeded ({} bytes)", quota, value.len()),
                });
            }
        }

        self.slots().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
