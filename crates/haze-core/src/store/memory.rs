use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use super::{HashStore, ImageId};
use crate::error::StoreError;

/// Process-local store, mainly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    hashes: RwLock<HashMap<ImageId, String>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of puts that actually changed a value.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }
}

impl HashStore for MemoryStore {
    fn get(&self, id: &ImageId) -> Result<Option<String>, StoreError> {
        let hashes = self.hashes.read().map_err(|_| StoreError::Poisoned)?;
        Ok(hashes.get(id).filter(|h| !h.is_empty()).cloned())
    }

    fn put(&self, id: &ImageId, hash: &str) -> Result<(), StoreError> {
        let mut hashes = self.hashes.write().map_err(|_| StoreError::Poisoned)?;
        if hashes.get(id).map(String::as_str) == Some(hash) {
            return Ok(());
        }
        hashes.insert(id.clone(), hash.to_string());
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn len(&self) -> Result<usize, StoreError> {
        let hashes = self.hashes.read().map_err(|_| StoreError::Poisoned)?;
        Ok(hashes.values().filter(|h| !h.is_empty()).count())
    }
}
