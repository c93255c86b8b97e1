//! Command implementations for the `haze` binary.

pub mod backfill;
pub mod config;
pub mod encode;
pub mod render;
pub mod show;

use std::path::{Path, PathBuf};

use haze_core::{Config, JsonFileStore};

/// Expand a leading `~` in a user-supplied path.
pub fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

/// Open the JSON hash store, preferring `--store` over `[store] path`.
pub fn open_store(path: Option<&Path>, config: &Config) -> anyhow::Result<JsonFileStore> {
    let path = match path {
        Some(path) => expand_path(path),
        None => config.store_path(),
    };
    tracing::debug!("Using hash store {:?}", path);
    Ok(JsonFileStore::open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use haze_core::HashStore;

    #[test]
    fn test_expand_path_keeps_plain_paths() {
        assert_eq!(
            expand_path(Path::new("/tmp/hashes.json")),
            PathBuf::from("/tmp/hashes.json")
        );
    }

    #[test]
    fn test_open_store_prefers_flag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        let store = open_store(Some(&path), &Config::default()).unwrap();
        assert_eq!(store.path(), path.as_path());
        assert!(store.is_empty().unwrap());
    }
}
