//! Batch generation of hashes for images that already exist.
//!
//! Input is a tree of collections → records → images, produced either by
//! [`FileDiscovery`](crate::pipeline::FileDiscovery) or read from a JSON
//! manifest. Images are processed one at a time and a failure never stops
//! the run.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::PlaceholderError;
use crate::pipeline::{Locator, PlaceholderEncoder};
use crate::store::{HashStore, ImageId};

/// Which images a backfill touches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackfillMode {
    /// Only images without a stored hash
    #[default]
    Missing,
    /// Every image, overwriting stored hashes
    Regenerate,
}

/// A group of records with placeholders enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,
    #[serde(default)]
    pub records: Vec<Record>,
}

/// A unit holding images inside a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub images: Vec<BackfillItem>,
}

/// One image to hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackfillItem {
    pub id: ImageId,

    /// Where the image is normally read from
    pub source: Locator,

    /// Tried when `source` is unavailable, typically a public URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<Locator>,
}

impl BackfillItem {
    pub fn new(id: impl Into<ImageId>, source: Locator) -> Self {
        Self {
            id: id.into(),
            source,
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, fallback: Locator) -> Self {
        self.fallback = Some(fallback);
        self
    }
}

/// Result of processing a single image.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Created(String),
    SkippedExisting,
    Failed(String),
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BackfillStats {
    pub collections_scanned: u64,
    pub records_scanned: u64,
    pub images_checked: u64,
    pub hashes_created: u64,
    pub skipped_existing: u64,
    pub failed: u64,
}

impl BackfillStats {
    fn record(&mut self, outcome: &ItemOutcome) {
        self.images_checked += 1;
        match outcome {
            ItemOutcome::Created(_) => self.hashes_created += 1,
            ItemOutcome::SkippedExisting => self.skipped_existing += 1,
            ItemOutcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Walks collections and fills the store.
pub struct BackfillDriver<'a> {
    encoder: &'a PlaceholderEncoder,
    store: &'a dyn HashStore,
    mode: BackfillMode,
}

impl<'a> BackfillDriver<'a> {
    pub fn new(
        encoder: &'a PlaceholderEncoder,
        store: &'a dyn HashStore,
        mode: BackfillMode,
    ) -> Self {
        Self {
            encoder,
            store,
            mode,
        }
    }

    pub fn mode(&self) -> BackfillMode {
        self.mode
    }

    /// Process every image and return the counters.
    pub async fn run(&self, collections: &[Collection]) -> BackfillStats {
        self.run_with(collections, |_, _| {}).await
    }

    /// Like [`run`](Self::run), calling `on_item` after each image.
    pub async fn run_with<F>(&self, collections: &[Collection], mut on_item: F) -> BackfillStats
    where
        F: FnMut(&BackfillItem, &ItemOutcome),
    {
        let start = Instant::now();
        let mut stats = BackfillStats::default();

        for collection in collections {
            stats.collections_scanned += 1;
            tracing::debug!(
                "Collection {} ({} records)",
                collection.name,
                collection.records.len()
            );

            for record in &collection.records {
                stats.records_scanned += 1;
                for item in &record.images {
                    let outcome = self.process_item(item).await;
                    stats.record(&outcome);
                    on_item(item, &outcome);
                }
            }
        }

        tracing::info!(
            "Backfill finished in {:?}: {} checked, {} created, {} skipped, {} failed",
            start.elapsed(),
            stats.images_checked,
            stats.hashes_created,
            stats.skipped_existing,
            stats.failed
        );
        stats
    }

    /// Hash one image unless the mode says to keep its stored value.
    pub async fn process_item(&self, item: &BackfillItem) -> ItemOutcome {
        if self.mode == BackfillMode::Missing {
            match self.store.get(&item.id) {
                Ok(Some(_)) => {
                    tracing::debug!("Skipped {} (hash exists)", item.id);
                    return ItemOutcome::SkippedExisting;
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::error!("Failed: {} - {}", item.id, e);
                    return ItemOutcome::Failed(e.to_string());
                }
            }
        }

        let hash = match self.encode_item(item).await {
            Ok(hash) => hash,
            Err(e) => {
                tracing::error!("Failed: {} - {}", item.id, e);
                return ItemOutcome::Failed(e.to_string());
            }
        };

        if let Err(e) = self.store.put(&item.id, &hash) {
            tracing::error!("Failed: {} - {}", item.id, e);
            return ItemOutcome::Failed(e.to_string());
        }

        tracing::info!("Created hash for {}: {}", item.id, hash);
        ItemOutcome::Created(hash)
    }

    async fn encode_item(&self, item: &BackfillItem) -> Result<String, PlaceholderError> {
        match self.encoder.encode(&item.source).await {
            Err(PlaceholderError::SourceUnavailable { locator, source }) => {
                let Some(fallback) = &item.fallback else {
                    return Err(PlaceholderError::SourceUnavailable { locator, source });
                };
                tracing::warn!(
                    "{} unavailable ({}), trying {}",
                    locator,
                    source,
                    fallback
                );
                self.encoder.encode(fallback).await
            }
            other => other,
        }
    }
}
