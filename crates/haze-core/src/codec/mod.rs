//! Low-frequency hash codecs.
//!
//! The pipeline only talks to [`HashCodec`]; [`Blurhash`] is the implementation
//! shipped with the crate.

pub mod base83;
mod blurhash;
pub mod color;

pub use blurhash::{components, Blurhash};

use crate::error::CodecError;
use crate::raster::{ComponentCounts, DecodedGrid, PixelGrid};

/// Trait that all placeholder codecs implement.
///
/// `encode` must be deterministic. `decode` returns exactly `height` rows of
/// `width` pixels; channel values may exceed `0..=255` and are clamped by the
/// caller.
pub trait HashCodec: Send + Sync {
    /// Codec name for logging.
    fn name(&self) -> &str;

    /// Encode a pixel grid into a hash string.
    fn encode(&self, grid: &PixelGrid, components: ComponentCounts) -> Result<String, CodecError>;

    /// Reconstruct a `width` x `height` grid from a hash.
    fn decode(&self, hash: &str, width: u32, height: u32) -> Result<DecodedGrid, CodecError>;
}
