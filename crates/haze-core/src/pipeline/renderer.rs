//! Placeholder rendering: stored hash -> PNG data URI.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageEncoder};
use std::sync::Arc;

use crate::codec::{Blurhash, HashCodec};
use crate::config::Config;
use crate::error::{PipelineResult, PlaceholderError};
use crate::raster::{PixelGrid, Raster};

use super::downsample::DEFAULT_MAX_WIDTH;

/// 1x1 transparent GIF returned whenever no placeholder can be produced.
pub const FALLBACK_DATA_URI: &str =
    "data:image/gif;base64,R0lGODlhAQABAAAAACH5BAEKAAEALAAAAAABAAEAAAICTAEAOw==";

const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Turns stored hashes into embeddable previews. Performs no I/O.
#[derive(Clone)]
pub struct PlaceholderRenderer {
    codec: Arc<dyn HashCodec>,
    max_sample_width: u32,
}

impl PlaceholderRenderer {
    pub fn new(codec: Arc<dyn HashCodec>, max_sample_width: u32) -> Self {
        Self {
            codec,
            max_sample_width: max_sample_width.max(1),
        }
    }

    /// Create a renderer with the BlurHash codec, honoring `placeholder.punch`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(Blurhash::with_punch(config.placeholder.punch)),
            config.placeholder.max_sample_width,
        )
    }

    /// Render a placeholder data URI.
    ///
    /// Never fails: a missing hash, a non-positive dimension, or any decode or
    /// serialization error yields [`FALLBACK_DATA_URI`]. Errors are logged.
    pub fn render(&self, hash: Option<&str>, width: i64, height: i64) -> String {
        let Some(hash) = hash.filter(|h| !h.is_empty()) else {
            return FALLBACK_DATA_URI.to_string();
        };
        if width <= 0 || height <= 0 {
            return FALLBACK_DATA_URI.to_string();
        }
        let (Ok(width), Ok(height)) = (u32::try_from(width), u32::try_from(height)) else {
            tracing::warn!("Placeholder size {}x{} out of range", width, height);
            return FALLBACK_DATA_URI.to_string();
        };

        match self.render_png(hash, width, height) {
            Ok(png) => format!("{PNG_DATA_URI_PREFIX}{}", BASE64.encode(png)),
            Err(e) => {
                tracing::warn!("Placeholder render failed ({}x{}): {}", width, height, e);
                FALLBACK_DATA_URI.to_string()
            }
        }
    }

    /// Dimensions passed to the codec for a `width` x `height` target.
    ///
    /// `decode_width = min(width, max_sample_width)` and
    /// `decode_height = floor(decode_width * height / width)`, at least 1.
    /// Exact integer floor.
    pub fn decode_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        let decode_width = width.min(self.max_sample_width);
        let decode_height = (decode_width as u64 * height as u64 / width.max(1) as u64).max(1);
        (decode_width, decode_height as u32)
    }

    /// Decode, clamp, rescale to `width`, and PNG-encode.
    ///
    /// The output height is re-derived from the rescale, not taken from
    /// `height`, which only fixes the aspect ratio of the decode.
    pub fn render_png(&self, hash: &str, width: u32, height: u32) -> PipelineResult<Vec<u8>> {
        if width == 0 || height == 0 {
            return Err(PlaceholderError::DecodeFailure {
                message: format!("invalid target size {width}x{height}"),
            });
        }
        let (decode_width, decode_height) = self.decode_dimensions(width, height);

        let decoded = self
            .codec
            .decode(hash, decode_width, decode_height)
            .map_err(|e| PlaceholderError::DecodeFailure {
                message: format!("{}: {e}", self.codec.name()),
            })?;
        let raster = Raster::from(&PixelGrid::from_decoded(&decoded));
        if (raster.width(), raster.height()) != (decode_width, decode_height) {
            return Err(PlaceholderError::DecodeFailure {
                message: format!(
                    "{} returned {}x{}, expected {}x{}",
                    self.codec.name(),
                    raster.width(),
                    raster.height(),
                    decode_width,
                    decode_height
                ),
            });
        }

        let mut image = raster.to_rgb_image();
        if width != decode_width {
            let scaled_height =
                (decode_height as u64 * width as u64 / decode_width as u64).max(1) as u32;
            image = imageops::resize(&image, width, scaled_height, FilterType::Triangle);
        }

        let mut png = Vec::new();
        PngEncoder::new(&mut png)
            .write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                ExtendedColorType::Rgb8,
            )
            .map_err(|e| PlaceholderError::RenderFailure {
                message: e.to_string(),
            })?;
        Ok(png)
    }
}

impl Default for PlaceholderRenderer {
    fn default() -> Self {
        Self::new(Arc::new(Blurhash::default()), DEFAULT_MAX_WIDTH)
    }
}
