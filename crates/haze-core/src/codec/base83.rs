//! Base-83 digits used by the BlurHash wire format.

use crate::error::CodecError;

const ALPHABET: &[u8; 83] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz#$%*+,-.:;=?@[]^_{|}~";

/// Append `value` as exactly `length` base-83 digits, most significant first.
pub fn encode_into(value: u32, length: u32, out: &mut String) {
    for i in 1..=length {
        let digit = (value / 83u32.pow(length - i)) % 83;
        out.push(ALPHABET[digit as usize] as char);
    }
}

/// Encode `value` as exactly `length` base-83 digits.
pub fn encode(value: u32, length: u32) -> String {
    let mut out = String::with_capacity(length as usize);
    encode_into(value, length, &mut out);
    out
}

/// Index of a single character in the alphabet.
pub fn digit(c: char) -> Result<u32, CodecError> {
    ALPHABET
        .iter()
        .position(|&a| a as char == c)
        .map(|i| i as u32)
        .ok_or(CodecError::InvalidCharacter(c))
}

/// Decode a run of base-83 digits.
pub fn decode(s: &str) -> Result<u32, CodecError> {
    s.chars()
        .try_fold(0u32, |acc, c| Ok(acc.wrapping_mul(83).wrapping_add(digit(c)?)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_fixed_width() {
        assert_eq!(encode(0, 1), "0");
        assert_eq!(encode(21, 1), "L");
        assert_eq!(encode(0xFF0000, 4), "TI:j");
        assert_eq!(encode(82, 2), "0~");
    }

    #[test]
    fn test_decode_known_digits() {
        assert_eq!(decode("TI:j").unwrap(), 0xFF0000);
        assert_eq!(decode("~").unwrap(), 82);
    }

    #[test]
    fn test_decode_rejects_foreign_character() {
        assert_eq!(decode("a b"), Err(CodecError::InvalidCharacter(' ')));
        assert_eq!(decode("é"), Err(CodecError::InvalidCharacter('é')));
    }
}
