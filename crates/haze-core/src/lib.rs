//! Haze Core - Embeddable blurred-placeholder pipeline.
//!
//! Haze turns an image into a short BlurHash string that is cheap to store,
//! and turns a stored hash back into a small PNG data URI that can be inlined
//! while the real image loads.
//!
//! # Architecture
//!
//! ```text
//! encode:  Locator → Source → Validate → Decode → Downsample → Codec → hash
//! render:  hash → Codec → Clamp → Rescale → PNG → data:image/png;base64,...
//! ```
//!
//! Persistence sits behind [`HashStore`]; the pipeline itself never writes.
//!
//! # Usage
//!
//! ```rust,ignore
//! use haze_core::{Config, Haze, ImageId, Locator, MemoryStore};
//!
//! #[tokio::main]
//! async fn main() -> haze_core::Result<()> {
//!     let haze = Haze::new(Config::load()?, MemoryStore::new());
//!
//!     let id = ImageId::from("gallery/sunset.jpg");
//!     haze.hash_on_upload(&id, &Locator::Path("./sunset.jpg".into())).await?;
//!     println!("{}", haze.placeholder_for(&id, 640, 480));
//!     Ok(())
//! }
//! ```

pub mod backfill;
pub mod codec;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod raster;
pub mod store;

pub use backfill::{
    BackfillDriver, BackfillItem, BackfillMode, BackfillStats, Collection, ItemOutcome, Record,
};
pub use codec::{Blurhash, HashCodec};
pub use config::Config;
pub use error::{
    CodecError, ConfigError, HazeError, PipelineResult, PlaceholderError, Result, SourceError,
    StoreError,
};
pub use pipeline::{
    FileDiscovery, ImageSource, Locator, PlaceholderEncoder, PlaceholderRenderer, RasterSource,
    FALLBACK_DATA_URI,
};
pub use raster::{ComponentCounts, PixelGrid, Raster};
pub use store::{HashStore, ImageId, JsonFileStore, MemoryStore};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// What [`Haze::hash_on_upload`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// A new hash was computed and stored
    Created(String),
    /// The image already had a hash; nothing was computed
    Existing(String),
}

impl UploadOutcome {
    pub fn hash(&self) -> &str {
        match self {
            Self::Created(hash) | Self::Existing(hash) => hash,
        }
    }
}

/// Haze service - explicit container for encoder, renderer and store.
pub struct Haze<S: HashStore> {
    config: Config,
    encoder: PlaceholderEncoder,
    renderer: PlaceholderRenderer,
    store: S,
}

impl<S: HashStore> Haze<S> {
    /// Build the default source and codec from `config` around `store`.
    pub fn new(config: Config, store: S) -> Self {
        tracing::debug!("Initializing Haze v{}", VERSION);
        let encoder = PlaceholderEncoder::from_config(&config);
        let renderer = PlaceholderRenderer::from_config(&config);
        Self::with_parts(config, encoder, renderer, store)
    }

    /// Assemble from explicit parts.
    pub fn with_parts(
        config: Config,
        encoder: PlaceholderEncoder,
        renderer: PlaceholderRenderer,
        store: S,
    ) -> Self {
        Self {
            config,
            encoder,
            renderer,
            store,
        }
    }

    /// Upload hook: hash an image once, right after it is stored.
    ///
    /// Returns the stored hash untouched if one exists. Encode failures are
    /// returned and nothing is written.
    pub async fn hash_on_upload(&self, id: &ImageId, locator: &Locator) -> Result<UploadOutcome> {
        if let Some(existing) = self.store.get(id)? {
            tracing::debug!("{} already has a hash", id);
            return Ok(UploadOutcome::Existing(existing));
        }

        let hash = self.encoder.encode(locator).await?;
        self.store.put(id, &hash)?;
        tracing::info!("Created hash for {}: {}", id, hash);
        Ok(UploadOutcome::Created(hash))
    }

    /// Placeholder data URI for a stored image, or the fallback.
    pub fn placeholder_for(&self, id: &ImageId, width: i64, height: i64) -> String {
        let hash = match self.store.get(id) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::warn!("Hash lookup for {} failed: {}", id, e);
                None
            }
        };
        self.renderer.render(hash.as_deref(), width, height)
    }

    /// Backfill driver over this service's encoder and store.
    pub fn backfill(&self, mode: BackfillMode) -> BackfillDriver<'_> {
        BackfillDriver::new(&self.encoder, &self.store, mode)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn encoder(&self) -> &PlaceholderEncoder {
        &self.encoder
    }

    pub fn renderer(&self) -> &PlaceholderRenderer {
        &self.renderer
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
