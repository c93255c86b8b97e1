//! Image decoding with format detection and dimension limits.

use image::{ImageFormat, ImageReader};
use std::io::Cursor;

use crate::config::LimitsConfig;
use crate::error::PlaceholderError;
use crate::raster::Raster;

/// Image decoder with configurable limits.
#[derive(Debug, Clone)]
pub struct ImageDecoder {
    limits: LimitsConfig,
}

/// Result of decoding an image.
#[derive(Debug)]
pub struct DecodedImage {
    /// Flattened RGB pixels
    pub raster: Raster,
    /// Detected image format
    pub format: ImageFormat,
}

impl ImageDecoder {
    /// Create a new decoder with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Decode an in-memory buffer into a raster.
    ///
    /// The header is probed for dimensions first so an oversized image is
    /// rejected before its pixel buffer is allocated.
    pub fn decode(&self, bytes: &[u8], locator: &str) -> Result<DecodedImage, PlaceholderError> {
        let invalid = |message: String| PlaceholderError::InvalidImageData {
            locator: locator.to_string(),
            message,
        };

        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| invalid(format!("Cannot detect image format: {e}")))?;
        let format = reader
            .format()
            .ok_or_else(|| invalid("Cannot detect image format".to_string()))?;

        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| invalid(e.to_string()))?;
        let max_dim = self.limits.max_image_dimension;
        if width > max_dim || height > max_dim {
            return Err(PlaceholderError::ImageTooLarge {
                locator: locator.to_string(),
                width,
                height,
                max_dim,
            });
        }

        let image = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| invalid(e.to_string()))?;
        Ok(DecodedImage {
            raster: Raster::from_image(&image),
            format,
        })
    }
}

/// Convert an ImageFormat to a string representation.
pub fn format_to_string(format: ImageFormat) -> String {
    match format {
        ImageFormat::Jpeg => "jpeg".to_string(),
        ImageFormat::Png => "png".to_string(),
        ImageFormat::WebP => "webp".to_string(),
        ImageFormat::Gif => "gif".to_string(),
        ImageFormat::Tiff => "tiff".to_string(),
        ImageFormat::Bmp => "bmp".to_string(),
        _ => "unknown".to_string(),
    }
}
