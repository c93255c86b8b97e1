//! Backfill: hash existing images with progress and a summary.

use clap::Args;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use haze_core::{
    BackfillDriver, BackfillMode, BackfillStats, Collection, Config, FileDiscovery, ItemOutcome,
    PlaceholderEncoder,
};

/// Arguments for the `backfill` command.
#[derive(Args, Debug)]
pub struct BackfillArgs {
    /// Directories to scan; each one is a collection
    #[arg(required_unless_present = "manifest")]
    pub dirs: Vec<PathBuf>,

    /// JSON manifest of collections → records → images instead of scanning
    #[arg(short, long, conflicts_with_all = ["dirs", "base_url"])]
    pub manifest: Option<PathBuf>,

    /// Hash store file (defaults to `store.path`)
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Recompute every hash, including images that already have one
    #[arg(long)]
    pub regenerate: bool,

    /// Public URL of each directory, used when a file cannot be read
    #[arg(long)]
    pub base_url: Option<String>,

    /// Print the final counters as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

/// Execute the backfill command.
pub async fn execute(args: BackfillArgs, config: &Config) -> anyhow::Result<()> {
    let collections = match &args.manifest {
        Some(manifest) => load_manifest(&super::expand_path(manifest))?,
        None => discover(&args.dirs, args.base_url.as_deref(), config)?,
    };
    let total = count_images(&collections);
    if total == 0 {
        tracing::warn!("No images found");
    }

    let store = super::open_store(args.store.as_deref(), config)?;
    let encoder = PlaceholderEncoder::from_config(config);
    let mode = if args.regenerate {
        BackfillMode::Regenerate
    } else {
        BackfillMode::Missing
    };
    tracing::info!(
        "Backfilling {} images in {} collections ({:?})",
        total,
        collections.len(),
        mode
    );

    let progress = create_progress_bar(total)?;
    let start_time = Instant::now();

    let stats = BackfillDriver::new(&encoder, &store, mode)
        .run_with(&collections, |item, outcome| {
            progress.inc(1);
            match outcome {
                ItemOutcome::Failed(_) => progress.set_message(format!("failed: {}", item.id)),
                _ => progress.set_message(item.id.to_string()),
            }
        })
        .await;

    progress.finish_and_clear();
    print_summary(&stats, start_time.elapsed());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    }
    Ok(())
}

/// Read a manifest: a JSON array of collections.
fn load_manifest(path: &Path) -> anyhow::Result<Vec<Collection>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read manifest {:?}: {e}", path))?;
    let collections: Vec<Collection> = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Invalid manifest {:?}: {e}", path))?;
    Ok(collections)
}

fn discover(
    dirs: &[PathBuf],
    base_url: Option<&str>,
    config: &Config,
) -> anyhow::Result<Vec<Collection>> {
    let mut discovery = FileDiscovery::new(config.discovery.clone());
    if let Some(base_url) = base_url {
        discovery = discovery.with_base_url(base_url);
    }

    dirs.iter()
        .map(|dir| {
            let dir = super::expand_path(dir);
            if !dir.is_dir() {
                anyhow::bail!(
                    "Not a directory: {:?}\n\n  Hint: backfill scans directories; use `haze encode` for single files.",
                    dir
                );
            }
            Ok(discovery.discover(&dir))
        })
        .collect()
}

fn count_images(collections: &[Collection]) -> u64 {
    collections
        .iter()
        .flat_map(|c| &c.records)
        .map(|r| r.images.len() as u64)
        .sum()
}

fn create_progress_bar(total: u64) -> anyhow::Result<indicatif::ProgressBar> {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
            )?
            .progress_chars("##-"),
    );
    pb.set_message("starting...");
    Ok(pb)
}

/// Print a formatted summary table after the run.
fn print_summary(stats: &BackfillStats, elapsed: Duration) {
    let rate = if elapsed.as_secs_f64() > 0.0 {
        stats.images_checked as f64 / elapsed.as_secs_f64()
    } else {
        0.0
    };

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("           Backfill Summary");
    eprintln!("  ====================================");
    eprintln!("    Collections:  {:>8}", stats.collections_scanned);
    eprintln!("    Records:      {:>8}", stats.records_scanned);
    eprintln!("    Images:       {:>8}", stats.images_checked);
    eprintln!("  ------------------------------------");
    eprintln!("    Created:      {:>8}", stats.hashes_created);
    if stats.skipped_existing > 0 {
        eprintln!("    Skipped:      {:>8}", stats.skipped_existing);
    }
    if stats.failed > 0 {
        eprintln!("    Failed:       {:>8}", stats.failed);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Duration:     {:>7.1}s", elapsed.as_secs_f64());
    eprintln!("    Rate:         {:>7.1} img/sec", rate);
    eprintln!("  ====================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use haze_core::{HashStore, ImageId, JsonFileStore};

    fn write_png(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let img = image_bytes();
        std::fs::write(path, img).unwrap();
    }

    // Minimal 1x1 red PNG.
    fn image_bytes() -> Vec<u8> {
        vec![
            0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48,
            0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00,
            0x00, 0x90, 0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, 0x08,
            0xD7, 0x63, 0xF8, 0xCF, 0xC0, 0x00, 0x00, 0x03, 0x01, 0x01, 0x00, 0x18, 0xDD, 0x8D,
            0xB0, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
        ]
    }

    #[test]
    fn test_load_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        std::fs::write(
            &path,
            r#"[{"name": "blog", "records": [{"id": "1", "images": [
                {"id": "blog/1/a.jpg", "source": "/srv/a.jpg"}
            ]}]}]"#,
        )
        .unwrap();

        let collections = load_manifest(&path).unwrap();
        assert_eq!(collections.len(), 1);
        assert_eq!(count_images(&collections), 1);
    }

    #[test]
    fn test_load_manifest_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        std::fs::write(&path, "{}").unwrap();
        assert!(load_manifest(&path).is_err());
        assert!(load_manifest(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_discover_rejects_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.png");
        write_png(&file);
        assert!(discover(&[file], None, &Config::default()).is_err());
    }

    #[tokio::test]
    async fn test_backfill_directory_into_store() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("uploads");
        write_png(&root.join("a.png"));
        write_png(&root.join("2024").join("b.png"));
        let store_path = dir.path().join("hashes.json");

        let args = BackfillArgs {
            dirs: vec![root],
            manifest: None,
            store: Some(store_path.clone()),
            regenerate: false,
            base_url: None,
            json: false,
        };
        execute(args, &Config::default()).await.unwrap();

        let store = JsonFileStore::open(&store_path).unwrap();
        assert_eq!(store.len().unwrap(), 2);
        assert!(store
            .get(&ImageId::from("uploads/2024/b.png"))
            .unwrap()
            .is_some());
    }
}
