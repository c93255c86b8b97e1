//! Placeholder pipeline components.
//!
//! - **source**: Resolve a locator into image bytes (file, memory, HTTP)
//! - **validate**: Size and magic-byte checks before decoding
//! - **decode**: Decode bytes into a raster
//! - **downsample**: Shrink a raster to the codec's sample width
//! - **encoder**: Orchestrates the encode path
//! - **renderer**: Hash back to a PNG data URI
//! - **discovery**: Find images in directories for backfill

pub mod decode;
pub mod discovery;
pub mod downsample;
pub mod encoder;
pub mod renderer;
pub mod source;
pub mod validate;

pub use decode::{DecodedImage, ImageDecoder};
pub use discovery::FileDiscovery;
pub use downsample::{Downsampler, DEFAULT_MAX_WIDTH};
pub use encoder::PlaceholderEncoder;
pub use renderer::{PlaceholderRenderer, FALLBACK_DATA_URI};
pub use source::{ImageSource, Locator, RasterSource};
pub use validate::Validator;
