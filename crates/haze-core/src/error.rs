//! Error types for the Haze placeholder pipeline.
//!
//! Errors are organized by stage: loading the source, decoding it, running the
//! codec, and persisting the result. Encode-side errors carry the locator so a
//! failed backfill line can be traced back to its image.

use thiserror::Error;

/// Top-level error type for Haze operations.
#[derive(Error, Debug)]
pub enum HazeError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Placeholder pipeline errors
    #[error("Placeholder error: {0}")]
    Placeholder(#[from] PlaceholderError),

    /// Hash store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Failures of a raster source while resolving a locator into bytes.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Path does not exist or is not a regular file
    #[error("not found")]
    NotFound,

    /// Remote answered with a non-success status
    #[error("HTTP {status}")]
    FetchFailed { status: u16 },

    /// Remote did not answer within the fetch deadline
    #[error("timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Transport-level failure (DNS, connection refused, TLS, ...)
    #[error("request failed: {0}")]
    Request(String),

    /// `data:` URL without a base64 payload
    #[error("invalid data URL: {0}")]
    InvalidDataUrl(String),

    /// Local read failure
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by a [`HashCodec`](crate::codec::HashCodec).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Component counts outside the supported range
    #[error("component counts must be between 1 and 9, got {x}x{y}")]
    InvalidComponents { x: u32, y: u32 },

    /// Nothing to encode
    #[error("cannot encode an empty pixel grid")]
    EmptyGrid,

    /// Rows of unequal length
    #[error("pixel grid is not rectangular")]
    RaggedGrid,

    /// Hash length disagrees with its size flag
    #[error("hash length {actual} does not match expected {expected}")]
    InvalidLength { expected: usize, actual: usize },

    /// Character outside the base-83 alphabet
    #[error("invalid base83 character {0:?}")]
    InvalidCharacter(char),

    /// Decode target with a zero dimension
    #[error("decode dimensions must be non-zero, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Placeholder pipeline errors, organized by stage.
#[derive(Error, Debug)]
pub enum PlaceholderError {
    /// The locator could not be resolved into bytes
    #[error("Source unavailable for {locator}: {source}")]
    SourceUnavailable {
        locator: String,
        #[source]
        source: SourceError,
    },

    /// The bytes are not a decodable raster
    #[error("Invalid image data for {locator}: {message}")]
    InvalidImageData { locator: String, message: String },

    /// Image dimensions exceed limit
    #[error("Image too large: {locator} ({width}x{height} > {max_dim})")]
    ImageTooLarge {
        locator: String,
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// A raster with a zero dimension reached the downsampler
    #[error("Raster has no pixels ({width}x{height})")]
    EmptyRaster { width: u32, height: u32 },

    /// The codec rejected the pixel grid
    #[error("Encode failed: {message}")]
    EncodeFailure { message: String },

    /// The codec rejected a stored hash or the requested dimensions
    #[error("Decode failed: {message}")]
    DecodeFailure { message: String },

    /// The reconstructed raster could not be serialized
    #[error("Render failed: {message}")]
    RenderFailure { message: String },
}

/// Errors from a [`HashStore`](crate::store::HashStore).
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backing file could not be read or written
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Backing file is not valid JSON
    #[error("store file is corrupt: {0}")]
    Json(#[from] serde_json::Error),

    /// A lock guarding the store was poisoned by a panicking writer
    #[error("store lock poisoned")]
    Poisoned,
}

/// Convenience type alias for Haze results.
pub type Result<T> = std::result::Result<T, HazeError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PlaceholderError>;
