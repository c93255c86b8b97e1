//! sRGB transfer functions.

/// 8-bit sRGB channel to linear light in `0.0..=1.0`.
pub fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// Linear light back to an sRGB channel; input is clamped to `0.0..=1.0` first.
pub fn linear_to_srgb(value: f32) -> i32 {
    let v = value.clamp(0.0, 1.0);
    if v <= 0.003_130_8 {
        (v * 12.92 * 255.0 + 0.5) as i32
    } else {
        ((1.055 * v.powf(1.0 / 2.4) - 0.055) * 255.0 + 0.5) as i32
    }
}

/// `|value|^exp` carrying the sign of `value`.
pub fn sign_pow(value: f32, exp: f32) -> f32 {
    value.abs().powf(exp).copysign(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_srgb_round_trip_is_stable() {
        for v in [0u8, 1, 10, 64, 128, 200, 254, 255] {
            assert_eq!(linear_to_srgb(srgb_to_linear(v)), v as i32);
        }
    }

    #[test]
    fn test_linear_to_srgb_clamps() {
        assert_eq!(linear_to_srgb(-3.0), 0);
        assert_eq!(linear_to_srgb(7.5), 255);
    }

    #[test]
    fn test_sign_pow_keeps_sign() {
        assert_eq!(sign_pow(-4.0, 0.5), -2.0);
        assert_eq!(sign_pow(3.0, 2.0), 9.0);
    }
}
