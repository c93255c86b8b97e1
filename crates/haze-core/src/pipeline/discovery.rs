//! Directory discovery: turns a directory tree into a backfill collection.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::backfill::{BackfillItem, Collection, Record};
use crate::config::DiscoveryConfig;

use super::source::Locator;

/// Finds image files under a root directory.
///
/// The root is one collection, named after the directory. Every directory
/// that directly holds images is a record. Image ids are
/// `<collection>/<path relative to root>` with `/` separators.
pub struct FileDiscovery {
    config: DiscoveryConfig,
    base_url: Option<String>,
}

impl FileDiscovery {
    pub fn new(config: DiscoveryConfig) -> Self {
        Self {
            config,
            base_url: None,
        }
    }

    /// Give each image a URL fallback: `<base_url>/<relative path>`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = Some(base_url.trim_end_matches('/').to_string());
        self
    }

    /// Discover all supported images below `root`.
    ///
    /// Records and images are sorted by path for deterministic ordering.
    pub fn discover(&self, root: &Path) -> Collection {
        let name = collection_name(root);
        let mut records: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();

        for entry in WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !self.is_supported(path) {
                continue;
            }
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            let record = relative
                .parent()
                .map(slash_path)
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| ".".to_string());
            records.entry(record).or_default().push(relative.to_path_buf());
        }

        let records = records
            .into_iter()
            .map(|(id, mut paths)| {
                paths.sort();
                let images = paths
                    .iter()
                    .map(|relative| self.item(root, &name, relative))
                    .collect();
                Record { id, images }
            })
            .collect::<Vec<_>>();

        tracing::debug!("Discovered {} records in {:?}", records.len(), root);
        Collection { name, records }
    }

    fn item(&self, root: &Path, collection: &str, relative: &Path) -> BackfillItem {
        let relative_str = slash_path(relative);
        let item = BackfillItem::new(
            format!("{collection}/{relative_str}"),
            Locator::Path(root.join(relative)),
        );
        match &self.base_url {
            Some(base) => item.with_fallback(Locator::Url(format!("{base}/{relative_str}"))),
            None => item,
        }
    }

    /// Check if a file has a supported extension.
    pub fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.config
                    .supported_formats
                    .iter()
                    .any(|fmt| fmt.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}

fn collection_name(root: &Path) -> String {
    root.canonicalize()
        .ok()
        .as_deref()
        .unwrap_or(root)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "root".to_string())
}

fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_is_supported() {
        let discovery = FileDiscovery::new(DiscoveryConfig::default());

        assert!(discovery.is_supported(Path::new("test.jpg")));
        assert!(discovery.is_supported(Path::new("test.JPG")));
        assert!(discovery.is_supported(Path::new("test.jpeg")));
        assert!(discovery.is_supported(Path::new("test.png")));
        assert!(discovery.is_supported(Path::new("test.webp")));
        assert!(!discovery.is_supported(Path::new("test.txt")));
        assert!(!discovery.is_supported(Path::new("README")));
    }

    #[test]
    fn test_discover_groups_by_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("blog");
        touch(&root, "cover.png");
        touch(&root, "post-2/b.jpg");
        touch(&root, "post-2/a.jpg");
        touch(&root, "post-1/hero.webp");
        touch(&root, "post-1/notes.txt");

        let collection = FileDiscovery::new(DiscoveryConfig::default()).discover(&root);

        assert_eq!(collection.name, "blog");
        let record_ids: Vec<_> = collection.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(record_ids, vec![".", "post-1", "post-2"]);

        let post_2: Vec<_> = collection.records[2]
            .images
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(post_2, vec!["blog/post-2/a.jpg", "blog/post-2/b.jpg"]);
        assert_eq!(
            collection.records[0].images[0].source,
            Locator::Path(root.join("cover.png"))
        );
        assert!(collection.records[0].images[0].fallback.is_none());
    }

    #[test]
    fn test_discover_with_base_url() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("gallery");
        touch(&root, "2024/sunset.jpg");

        let collection = FileDiscovery::new(DiscoveryConfig::default())
            .with_base_url("https://example.com/files/")
            .discover(&root);

        let item = &collection.records[0].images[0];
        assert_eq!(item.id.as_str(), "gallery/2024/sunset.jpg");
        assert_eq!(
            item.fallback,
            Some(Locator::Url(
                "https://example.com/files/2024/sunset.jpg".to_string()
            ))
        );
    }

    #[test]
    fn test_discover_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let collection = FileDiscovery::new(DiscoveryConfig::default()).discover(dir.path());
        assert!(collection.records.is_empty());
    }
}
