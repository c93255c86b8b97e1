//! Hash persistence keyed by image identity.
//!
//! The pipeline never writes anywhere itself; callers pair an encode with a
//! [`HashStore::put`]. Backends are swappable.

mod json;
mod memory;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::StoreError;

/// Stable identity of an image within a store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(String);

impl ImageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ImageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Trait that all hash stores implement.
///
/// An empty stored string reads back as `None`. Putting the value that is
/// already stored must not be observable (no rewrite, no write count).
pub trait HashStore: Send + Sync {
    /// Stored hash for an image, if any.
    fn get(&self, id: &ImageId) -> Result<Option<String>, StoreError>;

    /// Attach a hash to an image, replacing any previous value.
    fn put(&self, id: &ImageId, hash: &str) -> Result<(), StoreError>;

    /// Number of images with a stored hash.
    fn len(&self) -> Result<usize, StoreError>;

    fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl<S: HashStore + ?Sized> HashStore for Box<S> {
    fn get(&self, id: &ImageId) -> Result<Option<String>, StoreError> {
        (**self).get(id)
    }

    fn put(&self, id: &ImageId, hash: &str) -> Result<(), StoreError> {
        (**self).put(id, hash)
    }

    fn len(&self) -> Result<usize, StoreError> {
        (**self).len()
    }
}
