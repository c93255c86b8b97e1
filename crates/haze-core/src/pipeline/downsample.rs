//! Aspect-preserving reduction of a raster to the codec's sampling grid.

use image::imageops::{self, FilterType};

use crate::error::PlaceholderError;
use crate::raster::{PixelGrid, Raster};

/// Widest grid handed to the codec unless configured otherwise.
pub const DEFAULT_MAX_WIDTH: u32 = 200;

/// Shrinks rasters to at most `max_width` columns. Never upscales.
#[derive(Debug, Clone, Copy)]
pub struct Downsampler {
    max_width: u32,
}

impl Default for Downsampler {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WIDTH)
    }
}

impl Downsampler {
    pub fn new(max_width: u32) -> Self {
        Self {
            max_width: max_width.max(1),
        }
    }

    pub fn max_width(&self) -> u32 {
        self.max_width
    }

    /// Output dimensions for a `width` x `height` source.
    ///
    /// `height = floor(new_width * height / width)`, kept at one row or more.
    /// Returns `None` when either source dimension is zero.
    pub fn target_size(&self, width: u32, height: u32) -> Option<(u32, u32)> {
        if width == 0 || height == 0 {
            return None;
        }
        let new_width = width.min(self.max_width);
        let new_height = (new_width as u64 * height as u64 / width as u64).max(1);
        Some((new_width, new_height as u32))
    }

    /// Reduce a raster to the sampling grid.
    pub fn downsample(&self, raster: &Raster) -> Result<PixelGrid, PlaceholderError> {
        let (width, height) = (raster.width(), raster.height());
        let (new_width, new_height) = self
            .target_size(width, height)
            .ok_or(PlaceholderError::EmptyRaster { width, height })?;

        let source = raster.to_rgb_image();
        if (new_width, new_height) == (width, height) {
            return Ok(PixelGrid::from_image(&source));
        }

        let resized = imageops::resize(&source, new_width, new_height, FilterType::Triangle);
        tracing::trace!(
            "Downsampled {}x{} -> {}x{}",
            width,
            height,
            new_width,
            new_height
        );
        Ok(PixelGrid::from_image(&resized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raster(width: u32, height: u32) -> Raster {
        let pixels = (0..width * height)
            .map(|i| [(i % 251) as u8, (i % 13) as u8, 200])
            .collect();
        Raster::new(width, height, pixels).unwrap()
    }

    #[test]
    fn test_wide_raster_clamped_to_max_width() {
        let grid = Downsampler::default().downsample(&raster(400, 300)).unwrap();
        assert_eq!(grid.width(), 200);
        assert_eq!(grid.height(), 150);
    }

    #[test]
    fn test_aspect_ratio_preserved_within_a_pixel() {
        let downsampler = Downsampler::default();
        for (w, h) in [(201, 77), (640, 480), (1000, 333), (4000, 3001), (250, 1000)] {
            let (nw, nh) = downsampler.target_size(w, h).unwrap();
            assert_eq!(nw, 200);
            let exact = 200.0 * h as f64 / w as f64;
            assert!((nh as f64 - exact).abs() < 1.0, "{w}x{h} -> {nw}x{nh}");
        }
    }

    #[test]
    fn test_narrow_raster_is_not_upscaled() {
        let source = raster(120, 90);
        let grid = Downsampler::default().downsample(&source).unwrap();
        assert_eq!(grid.width(), 120);
        assert_eq!(grid.height(), 90);
        assert_eq!(grid.get(7, 3), source.pixel(7, 3));
    }

    #[test]
    fn test_exactly_max_width_unchanged() {
        let grid = Downsampler::default().downsample(&raster(200, 10)).unwrap();
        assert_eq!((grid.width(), grid.height()), (200, 10));
    }

    #[test]
    fn test_extreme_aspect_keeps_one_row() {
        assert_eq!(Downsampler::default().target_size(5000, 1), Some((200, 1)));
    }

    #[test]
    fn test_zero_width_is_error() {
        let empty = Raster::new(0, 5, vec![]).unwrap();
        let err = Downsampler::default().downsample(&empty).unwrap_err();
        assert!(matches!(
            err,
            PlaceholderError::EmptyRaster {
                width: 0,
                height: 5
            }
        ));
    }

    #[test]
    fn test_downsample_is_deterministic() {
        let source = raster(333, 211);
        let downsampler = Downsampler::new(100);
        assert_eq!(
            downsampler.downsample(&source).unwrap(),
            downsampler.downsample(&source).unwrap()
        );
    }

    #[test]
    fn test_solid_color_survives_resampling() {
        let source = Raster::new(300, 30, vec![[12, 34, 56]; 9000]).unwrap();
        let grid = Downsampler::default().downsample(&source).unwrap();
        assert!(grid.rows().iter().flatten().all(|&p| p == [12, 34, 56]));
    }
}
