//! Encode orchestration: source -> validate -> decode -> downsample -> codec.

use std::sync::Arc;
use std::time::Instant;

use crate::codec::{Blurhash, HashCodec};
use crate::config::Config;
use crate::error::{PipelineResult, PlaceholderError};
use crate::raster::{ComponentCounts, Raster};

use super::decode::{format_to_string, ImageDecoder};
use super::downsample::Downsampler;
use super::source::{ImageSource, Locator, RasterSource};
use super::validate::Validator;

/// Produces storable hashes from source images.
///
/// Pure over its inputs: nothing is persisted here. Cloning is cheap; the
/// source and codec are shared.
#[derive(Clone)]
pub struct PlaceholderEncoder {
    source: Arc<dyn RasterSource>,
    codec: Arc<dyn HashCodec>,
    validator: Validator,
    decoder: ImageDecoder,
    downsampler: Downsampler,
    components: ComponentCounts,
}

impl PlaceholderEncoder {
    /// Create an encoder around explicit collaborators.
    pub fn new(
        config: &Config,
        source: Arc<dyn RasterSource>,
        codec: Arc<dyn HashCodec>,
    ) -> Self {
        Self {
            source,
            codec,
            validator: Validator::new(config.limits.clone()),
            decoder: ImageDecoder::new(config.limits.clone()),
            downsampler: Downsampler::new(config.placeholder.max_sample_width),
            components: config.placeholder.components(),
        }
    }

    /// Create an encoder with the filesystem/HTTP source and the BlurHash codec.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config,
            Arc::new(ImageSource::new(&config.source)),
            Arc::new(Blurhash::default()),
        )
    }

    /// Component counts used by [`encode`](Self::encode).
    pub fn default_components(&self) -> ComponentCounts {
        self.components
    }

    /// Encode with the configured component counts.
    pub async fn encode(&self, locator: &Locator) -> PipelineResult<String> {
        self.encode_with(locator, self.components).await
    }

    /// Load the locator and encode it with explicit component counts.
    pub async fn encode_with(
        &self,
        locator: &Locator,
        components: ComponentCounts,
    ) -> PipelineResult<String> {
        let start = Instant::now();
        let label = locator.to_string();
        tracing::debug!("Encoding: {}", label);

        let bytes = self
            .source
            .load(locator)
            .await
            .map_err(|source| PlaceholderError::SourceUnavailable {
                locator: label.clone(),
                source,
            })?;
        tracing::trace!("  Load: {:?} ({} bytes)", start.elapsed(), bytes.len());

        let this = self.clone();
        let hash =
            tokio::task::spawn_blocking(move || this.encode_bytes(&bytes, &label, components))
                .await
                .map_err(|e| PlaceholderError::EncodeFailure {
                    message: format!("Task join error: {e}"),
                })??;

        tracing::debug!("Encoded {} in {:?}", locator, start.elapsed());
        Ok(hash)
    }

    /// Synchronous half of the pipeline, starting from encoded image bytes.
    pub fn encode_bytes(
        &self,
        bytes: &[u8],
        locator: &str,
        components: ComponentCounts,
    ) -> PipelineResult<String> {
        self.validator.validate(bytes, locator)?;

        let decode_start = Instant::now();
        let decoded = self.decoder.decode(bytes, locator)?;
        tracing::trace!(
            "  Decode: {:?} ({} {}x{})",
            decode_start.elapsed(),
            format_to_string(decoded.format),
            decoded.raster.width(),
            decoded.raster.height()
        );

        self.encode_raster(&decoded.raster, components)
    }

    /// Downsample an already decoded raster and hand it to the codec.
    pub fn encode_raster(
        &self,
        raster: &Raster,
        components: ComponentCounts,
    ) -> PipelineResult<String> {
        let grid = self.downsampler.downsample(raster)?;

        let codec_start = Instant::now();
        let hash = self
            .codec
            .encode(&grid, components)
            .map_err(|e| PlaceholderError::EncodeFailure {
                message: format!("{}: {e}", self.codec.name()),
            })?;
        tracing::trace!("  Codec: {:?}", codec_start.elapsed());

        if hash.is_empty() {
            return Err(PlaceholderError::EncodeFailure {
                message: format!("{} returned an empty hash", self.codec.name()),
            });
        }
        Ok(hash)
    }
}
