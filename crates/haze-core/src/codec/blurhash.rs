//! BlurHash: a cosine expansion of the image's linear-light color field,
//! quantized and serialized as base-83.
//!
//! Layout of a hash with `x * y` components:
//!
//! ```text
//! [size flag: 1][max AC: 1][DC: 4][AC: 2 each, x * y - 1 of them]
//! ```

use std::f32::consts::PI;

use super::base83;
use super::color::{linear_to_srgb, sign_pow, srgb_to_linear};
use super::HashCodec;
use crate::error::CodecError;
use crate::raster::{ComponentCounts, DecodedGrid, PixelGrid};

/// The BlurHash codec.
#[derive(Debug, Clone, Copy)]
pub struct Blurhash {
    punch: f32,
}

impl Default for Blurhash {
    fn default() -> Self {
        Self { punch: 1.0 }
    }
}

impl Blurhash {
    /// Codec whose decode scales AC components by `punch`.
    pub fn with_punch(punch: f32) -> Self {
        Self { punch }
    }

    pub fn punch(&self) -> f32 {
        self.punch
    }
}

/// Component counts encoded in a hash's size flag, after validating the whole hash.
pub fn components(hash: &str) -> Result<ComponentCounts, CodecError> {
    if let Some(c) = hash.chars().find(|&c| base83::digit(c).is_err()) {
        return Err(CodecError::InvalidCharacter(c));
    }
    if hash.len() < 6 {
        return Err(CodecError::InvalidLength {
            expected: 6,
            actual: hash.len(),
        });
    }

    let size_flag = base83::decode(&hash[..1])?;
    let counts = ComponentCounts::new(size_flag % 9 + 1, size_flag / 9 + 1);
    let expected = 4 + 2 * (counts.x * counts.y) as usize;
    if hash.len() != expected {
        return Err(CodecError::InvalidLength {
            expected,
            actual: hash.len(),
        });
    }
    Ok(counts)
}

/// `table[i * len + n] = cos(PI * i * n / len)`
fn cosine_table(components: u32, len: usize) -> Vec<f32> {
    let mut table = Vec::with_capacity(components as usize * len);
    for i in 0..components {
        for n in 0..len {
            table.push((PI * i as f32 * n as f32 / len as f32).cos());
        }
    }
    table
}

fn encode_dc([r, g, b]: [f32; 3]) -> u32 {
    let [r, g, b] = [r, g, b].map(|c| linear_to_srgb(c) as u32);
    (r << 16) + (g << 8) + b
}

fn encode_ac(value: [f32; 3], max_value: f32) -> u32 {
    let quant = |v: f32| {
        (sign_pow(v / max_value, 0.5) * 9.0 + 9.5)
            .floor()
            .clamp(0.0, 18.0) as u32
    };
    quant(value[0]) * 19 * 19 + quant(value[1]) * 19 + quant(value[2])
}

fn decode_dc(value: u32) -> [f32; 3] {
    [
        srgb_to_linear((value >> 16) as u8),
        srgb_to_linear((value >> 8) as u8),
        srgb_to_linear(value as u8),
    ]
}

fn decode_ac(value: u32, max_value: f32) -> [f32; 3] {
    let unquant = |q: u32| sign_pow((q as f32 - 9.0) / 9.0, 2.0) * max_value;
    [
        unquant(value / (19 * 19)),
        unquant((value / 19) % 19),
        unquant(value % 19),
    ]
}

impl HashCodec for Blurhash {
    fn name(&self) -> &str {
        "blurhash"
    }

    fn encode(&self, grid: &PixelGrid, components: ComponentCounts) -> Result<String, CodecError> {
        let ComponentCounts { x: cx, y: cy } = components;
        if !(1..=9).contains(&cx) || !(1..=9).contains(&cy) {
            return Err(CodecError::InvalidComponents { x: cx, y: cy });
        }
        if grid.is_empty() {
            return Err(CodecError::EmptyGrid);
        }

        let (width, height) = (grid.width() as usize, grid.height() as usize);
        let linear: Vec<[f32; 3]> = grid
            .rows()
            .iter()
            .flatten()
            .map(|&[r, g, b]| [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b)])
            .collect();
        let cos_x = cosine_table(cx, width);
        let cos_y = cosine_table(cy, height);

        let mut factors = Vec::with_capacity((cx * cy) as usize);
        for j in 0..cy as usize {
            for i in 0..cx as usize {
                let mut sum = [0.0f32; 3];
                for y in 0..height {
                    let basis_y = cos_y[j * height + y];
                    for x in 0..width {
                        let basis = basis_y * cos_x[i * width + x];
                        let pixel = linear[y * width + x];
                        sum[0] += basis * pixel[0];
                        sum[1] += basis * pixel[1];
                        sum[2] += basis * pixel[2];
                    }
                }
                let normalisation = if i == 0 && j == 0 { 1.0 } else { 2.0 };
                let scale = normalisation / (width * height) as f32;
                factors.push(sum.map(|c| c * scale));
            }
        }

        let (dc, ac) = factors.split_first().ok_or(CodecError::EmptyGrid)?;
        let mut hash = String::with_capacity(4 + 2 * ac.len());
        base83::encode_into((cx - 1) + (cy - 1) * 9, 1, &mut hash);

        let max_value = if ac.is_empty() {
            base83::encode_into(0, 1, &mut hash);
            1.0
        } else {
            let actual_max = ac
                .iter()
                .flat_map(|c| c.iter())
                .fold(0.0f32, |m, v| m.max(v.abs()));
            let quantised = (actual_max * 166.0 - 0.5).floor().clamp(0.0, 82.0) as u32;
            base83::encode_into(quantised, 1, &mut hash);
            (quantised + 1) as f32 / 166.0
        };

        base83::encode_into(encode_dc(*dc), 4, &mut hash);
        for factor in ac {
            base83::encode_into(encode_ac(*factor, max_value), 2, &mut hash);
        }
        Ok(hash)
    }

    fn decode(&self, hash: &str, width: u32, height: u32) -> Result<DecodedGrid, CodecError> {
        if width == 0 || height == 0 {
            return Err(CodecError::InvalidDimensions { width, height });
        }
        let ComponentCounts { x: cx, y: cy } = components(hash)?;

        let max_value = (base83::decode(&hash[1..2])? + 1) as f32 / 166.0 * self.punch;
        let mut colors = Vec::with_capacity((cx * cy) as usize);
        colors.push(decode_dc(base83::decode(&hash[2..6])?));
        for i in 1..(cx * cy) as usize {
            let value = base83::decode(&hash[4 + i * 2..6 + i * 2])?;
            colors.push(decode_ac(value, max_value));
        }

        let (w, h) = (width as usize, height as usize);
        let cos_x = cosine_table(cx, w);
        let cos_y = cosine_table(cy, h);

        let mut rows = Vec::with_capacity(h);
        for y in 0..h {
            let mut row = Vec::with_capacity(w);
            for x in 0..w {
                let mut sum = [0.0f32; 3];
                for j in 0..cy as usize {
                    let basis_y = cos_y[j * h + y];
                    for i in 0..cx as usize {
                        let basis = basis_y * cos_x[i * w + x];
                        let color = colors[i + j * cx as usize];
                        sum[0] += color[0] * basis;
                        sum[1] += color[1] * basis;
                        sum[2] += color[2] * basis;
                    }
                }
                row.push(sum.map(linear_to_srgb));
            }
            rows.push(row);
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: usize, height: usize, rgb: [u8; 3]) -> PixelGrid {
        PixelGrid::from_rows(vec![vec![rgb; width]; height]).unwrap()
    }

    fn gradient(width: usize, height: usize) -> PixelGrid {
        let rows = (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| [(x * 255 / width) as u8, (y * 255 / height) as u8, 96])
                    .collect()
            })
            .collect();
        PixelGrid::from_rows(rows).unwrap()
    }

    #[test]
    fn test_solid_red_hash() {
        let hash = Blurhash::default()
            .encode(&solid(8, 6, [255, 0, 0]), ComponentCounts::default())
            .unwrap();
        // Size flag for 4x3, then the DC digits for pure red.
        assert_eq!(&hash[..1], "L");
        assert_eq!(&hash[2..6], "TI:j");
        // A discrete cosine sum over a short row is not zero, so AC terms remain.
        assert_eq!(hash, "LsTI:j]9fQ]9|csUfQsUfQfQfQfQ");
    }

    #[test]
    fn test_hash_length_follows_components() {
        let grid = gradient(20, 10);
        let codec = Blurhash::default();
        for (x, y) in [(1, 1), (4, 3), (9, 9), (2, 7)] {
            let hash = codec.encode(&grid, ComponentCounts::new(x, y)).unwrap();
            assert_eq!(hash.len(), 4 + 2 * (x * y) as usize);
            assert_eq!(components(&hash).unwrap(), ComponentCounts::new(x, y));
        }
    }

    #[test]
    fn test_encode_is_deterministic() {
        let grid = gradient(64, 48);
        let codec = Blurhash::default();
        let first = codec.encode(&grid, ComponentCounts::default()).unwrap();
        let second = codec.encode(&grid, ComponentCounts::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_encode_rejects_bad_components() {
        let codec = Blurhash::default();
        let grid = solid(2, 2, [0, 0, 0]);
        assert_eq!(
            codec.encode(&grid, ComponentCounts::new(0, 3)),
            Err(CodecError::InvalidComponents { x: 0, y: 3 })
        );
        assert_eq!(
            codec.encode(&grid, ComponentCounts::new(4, 10)),
            Err(CodecError::InvalidComponents { x: 4, y: 10 })
        );
    }

    #[test]
    fn test_encode_rejects_empty_grid() {
        let grid = PixelGrid::from_rows(vec![]).unwrap();
        assert_eq!(
            Blurhash::default().encode(&grid, ComponentCounts::default()),
            Err(CodecError::EmptyGrid)
        );
    }

    #[test]
    fn test_decode_solid_color_stays_close() {
        let codec = Blurhash::default();
        let source = [40, 120, 200];
        let hash = codec
            .encode(&solid(200, 150, source), ComponentCounts::default())
            .unwrap();
        let decoded = codec.decode(&hash, 32, 24).unwrap();
        assert_eq!(decoded.len(), 24);
        assert!(decoded.iter().all(|row| row.len() == 32));
        for pixel in decoded.iter().flatten() {
            for c in 0..3 {
                let diff = (pixel[c] - source[c] as i32).abs();
                assert!(diff <= 8, "{pixel:?} vs {source:?}");
            }
        }
    }

    #[test]
    fn test_decode_small_solid_grid_keeps_hue() {
        let codec = Blurhash::default();
        let hash = codec
            .encode(&solid(4, 4, [255, 0, 0]), ComponentCounts::default())
            .unwrap();
        let decoded = codec.decode(&hash, 7, 5).unwrap();
        assert!(decoded.iter().flatten().all(|p| p[1] == 0 && p[2] == 0));
        assert_eq!(decoded[0][0], [255, 0, 0]);
    }

    #[test]
    fn test_decode_reference_hash() {
        let decoded = Blurhash::default()
            .decode("LEHV6nWB2yk8pyo0adR*.7kCMdnj", 32, 24)
            .unwrap();
        assert_eq!(decoded.len(), 24);
        assert!(decoded
            .iter()
            .flatten()
            .flatten()
            .all(|&c| (0..=255).contains(&c)));
    }

    #[test]
    fn test_decode_approximates_source() {
        let codec = Blurhash::default();
        let grid = gradient(40, 30);
        let hash = codec.encode(&grid, ComponentCounts::new(6, 6)).unwrap();
        let decoded = codec.decode(&hash, 40, 30).unwrap();
        let center = decoded[15][20];
        let original = grid.get(20, 15).unwrap();
        for c in 0..3 {
            assert!((center[c] - original[c] as i32).abs() < 40);
        }
    }

    #[test]
    fn test_decode_rejects_malformed_hashes() {
        let codec = Blurhash::default();
        assert!(matches!(
            codec.decode("L0", 4, 4),
            Err(CodecError::InvalidLength { .. })
        ));
        assert!(matches!(
            codec.decode("LEHV6nWB2yk8pyo0adR*.7kCMdn", 4, 4),
            Err(CodecError::InvalidLength {
                expected: 28,
                actual: 27
            })
        ));
        assert_eq!(
            codec.decode("LEHV6nWB2yk8pyo0adR*.7kCMdn\"", 4, 4),
            Err(CodecError::InvalidCharacter('"'))
        );
    }

    #[test]
    fn test_decode_rejects_zero_dimensions() {
        assert_eq!(
            Blurhash::default().decode("LEHV6nWB2yk8pyo0adR*.7kCMdnj", 0, 4),
            Err(CodecError::InvalidDimensions {
                width: 0,
                height: 4
            })
        );
    }

    #[test]
    fn test_punch_scales_contrast() {
        let hash = "LEHV6nWB2yk8pyo0adR*.7kCMdnj";
        let flat = Blurhash::with_punch(1e-6).decode(hash, 8, 8).unwrap();
        let first = flat[0][0];
        assert!(flat.iter().flatten().all(|&p| p == first));
    }
}
