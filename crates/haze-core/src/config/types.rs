//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::raster::ComponentCounts;

/// Placeholder encoding and rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceholderConfig {
    /// Horizontal basis components (1-9)
    pub components_x: u32,

    /// Vertical basis components (1-9)
    pub components_y: u32,

    /// Widest grid handed to the codec, on both encode and render
    pub max_sample_width: u32,

    /// Contrast multiplier applied to AC components when decoding
    pub punch: f32,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            components_x: 4,
            components_y: 3,
            max_sample_width: 200,
            punch: 1.0,
        }
    }
}

impl PlaceholderConfig {
    /// Component counts used when the caller does not pass its own.
    pub fn components(&self) -> ComponentCounts {
        ComponentCounts::new(self.components_x, self.components_y)
    }
}

/// Raster source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Deadline for a remote fetch in milliseconds
    pub fetch_timeout_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: 30_000,
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum source size in megabytes
    pub max_file_size_mb: u64,

    /// Maximum image dimension (width or height)
    pub max_image_dimension: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 100,
            max_image_dimension: 20_000,
        }
    }
}

/// Hash store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON file holding image id -> hash
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("~/.haze/hashes.json"),
        }
    }
}

/// Directory discovery settings for backfill.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// File extensions considered images
    pub supported_formats: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            supported_formats: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "webp".to_string(),
                "gif".to_string(),
                "bmp".to_string(),
                "tiff".to_string(),
            ],
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,

    /// Log format (pretty or json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
