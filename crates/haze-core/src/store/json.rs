use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{HashStore, ImageId};
use crate::error::StoreError;

/// A pretty-printed JSON object `{ "<image id>": "<hash>" }` on disk.
///
/// The whole map is held in memory and rewritten on every changing put,
/// through a sibling temp file that is renamed over the original.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    hashes: Mutex<BTreeMap<ImageId, String>>,
}

impl JsonFileStore {
    /// Open a store file, starting empty if it does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let hashes = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };
        tracing::debug!("Opened hash store {:?} ({} entries)", path, hashes.len());
        Ok(Self {
            path,
            hashes: Mutex::new(hashes),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, hashes: &BTreeMap<ImageId, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(hashes)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl HashStore for JsonFileStore {
    fn get(&self, id: &ImageId) -> Result<Option<String>, StoreError> {
        let hashes = self.hashes.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(hashes.get(id).filter(|h| !h.is_empty()).cloned())
    }

    fn put(&self, id: &ImageId, hash: &str) -> Result<(), StoreError> {
        let mut hashes = self.hashes.lock().map_err(|_| StoreError::Poisoned)?;
        if hashes.get(id).map(String::as_str) == Some(hash) {
            return Ok(());
        }
        let previous = hashes.insert(id.clone(), hash.to_string());
        if let Err(e) = self.persist(&hashes) {
            // Keep memory in line with disk.
            match previous {
                Some(old) => hashes.insert(id.clone(), old),
                None => hashes.remove(id),
            };
            return Err(e);
        }
        Ok(())
    }

    fn len(&self) -> Result<usize, StoreError> {
        let hashes = self.hashes.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(hashes.values().filter(|h| !h.is_empty()).count())
    }
}
