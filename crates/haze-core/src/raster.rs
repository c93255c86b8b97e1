//! Pixel containers shared by the encode and render paths.
//!
//! Every constructor that accepts wider-than-8-bit channel values clamps them,
//! so a [`Raster`] or [`PixelGrid`] never holds anything outside `0..=255`.

use image::{DynamicImage, RgbImage};

/// One RGB pixel.
pub type Rgb = [u8; 3];

/// Raw codec output, `rows[y][x]`; channels may fall outside `0..=255`.
pub type DecodedGrid = Vec<Vec<[i32; 3]>>;

/// Clamp a channel value into `0..=255`.
pub fn clamp_channel(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// Clamp every channel of a pixel.
pub fn clamp_pixel([r, g, b]: [i32; 3]) -> Rgb {
    [clamp_channel(r), clamp_channel(g), clamp_channel(b)]
}

/// Number of basis components along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentCounts {
    pub x: u32,
    pub y: u32,
}

impl ComponentCounts {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl Default for ComponentCounts {
    fn default() -> Self {
        Self { x: 4, y: 3 }
    }
}

/// A decoded bitmap with a row-major pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl Raster {
    /// Build a raster from row-major pixels.
    ///
    /// Returns `None` if `pixels.len() != width * height`.
    pub fn new(width: u32, height: u32, pixels: Vec<Rgb>) -> Option<Self> {
        if pixels.len() != width as usize * height as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a raster from unclamped channel values, clamping each one.
    pub fn from_channels(width: u32, height: u32, channels: &[[i32; 3]]) -> Option<Self> {
        Self::new(
            width,
            height,
            channels.iter().copied().map(clamp_pixel).collect(),
        )
    }

    /// Flatten any decoded image to RGB, dropping alpha.
    pub fn from_image(image: &DynamicImage) -> Self {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        let pixels = rgb.pixels().map(|p| p.0).collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Copy into an `image` buffer for resampling and encoding.
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            image::Rgb(self.pixels[y as usize * self.width as usize + x as usize])
        })
    }
}

impl From<&PixelGrid> for Raster {
    fn from(grid: &PixelGrid) -> Self {
        Self {
            width: grid.width,
            height: grid.height,
            pixels: grid.rows.iter().flatten().copied().collect(),
        }
    }
}

/// A rectangular grid addressed as `grid[y][x]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    rows: Vec<Vec<Rgb>>,
}

impl PixelGrid {
    /// Build a grid from rows; `None` if the rows differ in length.
    pub fn from_rows(rows: Vec<Vec<Rgb>>) -> Option<Self> {
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != width) {
            return None;
        }
        Some(Self {
            width: width as u32,
            height: rows.len() as u32,
            rows,
        })
    }

    /// Clamp raw codec output into a grid.
    ///
    /// Short rows are padded with black so the result is always rectangular.
    pub fn from_decoded(decoded: &DecodedGrid) -> Self {
        let width = decoded.iter().map(Vec::len).max().unwrap_or(0);
        let rows = decoded
            .iter()
            .map(|row| {
                let mut out: Vec<Rgb> = row.iter().copied().map(clamp_pixel).collect();
                out.resize(width, [0, 0, 0]);
                out
            })
            .collect::<Vec<_>>();
        Self {
            width: width as u32,
            height: rows.len() as u32,
            rows,
        }
    }

    /// Read an `image` buffer row by row.
    pub fn from_image(image: &RgbImage) -> Self {
        let (width, height) = image.dimensions();
        let rows = (0..height)
            .map(|y| (0..width).map(|x| image.get_pixel(x, y).0).collect())
            .collect();
        Self {
            width,
            height,
            rows,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rows(&self) -> &[Vec<Rgb>] {
        &self.rows
    }

    /// Pixel at `(x, y)`, or `None` when out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<Rgb> {
        self.rows.get(y as usize)?.get(x as usize).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
