//! Input validation before decoding.

use crate::config::LimitsConfig;
use crate::error::PlaceholderError;

/// Validates loaded bytes before decoding.
#[derive(Debug, Clone)]
pub struct Validator {
    limits: LimitsConfig,
}

impl Validator {
    /// Create a new validator with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Perform quick validation before full decode.
    ///
    /// Checks:
    /// - Buffer is not empty
    /// - Buffer size is within limits
    /// - Buffer starts with a known image signature
    pub fn validate(&self, bytes: &[u8], locator: &str) -> Result<(), PlaceholderError> {
        let invalid = |message: String| PlaceholderError::InvalidImageData {
            locator: locator.to_string(),
            message,
        };

        if bytes.is_empty() {
            return Err(invalid("Source is empty".to_string()));
        }

        let max_bytes = self.limits.max_file_size_mb * 1024 * 1024;
        if bytes.len() as u64 > max_bytes {
            return Err(invalid(format!(
                "Source too large ({}MB > {}MB)",
                bytes.len() as u64 / (1024 * 1024),
                self.limits.max_file_size_mb
            )));
        }

        if !Self::is_valid_image_header(bytes) {
            return Err(invalid(
                "Unrecognized image format (invalid magic bytes)".to_string(),
            ));
        }

        Ok(())
    }

    /// Check if the header bytes match known image formats.
    fn is_valid_image_header(header: &[u8]) -> bool {
        if header.len() < 4 {
            return false;
        }

        // JPEG: FF D8 FF
        if header.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return true;
        }

        // PNG: 89 50 4E 47
        if header.starts_with(&[0x89, b'P', b'N', b'G']) {
            return true;
        }

        // GIF: GIF8
        if header.starts_with(b"GIF8") {
            return true;
        }

        // WebP: RIFF....WEBP
        if header.starts_with(b"RIFF") {
            return header.len() >= 12 && &header[8..12] == b"WEBP";
        }

        // BMP: BM
        if header.starts_with(b"BM") {
            return true;
        }

        // TIFF: II (little-endian) or MM (big-endian) followed by version 42
        header.starts_with(&[b'I', b'I', 0x2A, 0x00])
            || header.starts_with(&[b'M', b'M', 0x00, 0x2A])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> Validator {
        Validator::new(LimitsConfig::default())
    }

    #[test]
    fn test_magic_bytes_jpeg() {
        let header = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0, 0, 0, 0, 0];
        assert!(Validator::is_valid_image_header(&header));
    }

    #[test]
    fn test_magic_bytes_png() {
        let header = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        assert!(Validator::is_valid_image_header(&header));
    }

    #[test]
    fn test_magic_bytes_webp() {
        let header = [b'R', b'I', b'F', b'F', 0, 0, 0, 0, b'W', b'E', b'B', b'P'];
        assert!(Validator::is_valid_image_header(&header));
    }

    #[test]
    fn test_magic_bytes_riff_without_webp_rejected() {
        let header = [b'R', b'I', b'F', b'F', 0, 0, 0, 0, b'W', b'A', b'V', b'E'];
        assert!(!Validator::is_valid_image_header(&header));
    }

    #[test]
    fn test_magic_bytes_invalid() {
        let header = [0x00, 0x00, 0x00, 0x00, 0, 0, 0, 0, 0, 0, 0, 0];
        assert!(!Validator::is_valid_image_header(&header));
    }

    #[test]
    fn test_magic_bytes_tiff() {
        assert!(Validator::is_valid_image_header(&[b'I', b'I', 0x2A, 0x00]));
        assert!(Validator::is_valid_image_header(&[b'M', b'M', 0x00, 0x2A]));
        assert!(!Validator::is_valid_image_header(&[b'I', b'I', 0x00, 0x00]));
    }

    #[test]
    fn test_validate_rejects_empty() {
        let err = validator().validate(&[], "empty.png").unwrap_err();
        assert!(err.to_string().contains("empty.png"));
        assert!(matches!(err, PlaceholderError::InvalidImageData { .. }));
    }

    #[test]
    fn test_validate_rejects_text() {
        let err = validator()
            .validate(b"<html>not an image</html>", "page.html")
            .unwrap_err();
        assert!(err.to_string().contains("magic bytes"));
    }

    #[test]
    fn test_validate_rejects_oversized() {
        let limits = LimitsConfig {
            max_file_size_mb: 1,
            ..LimitsConfig::default()
        };
        let mut bytes = vec![0u8; 2 * 1024 * 1024];
        bytes[..4].copy_from_slice(&[0x89, b'P', b'N', b'G']);
        let err = Validator::new(limits).validate(&bytes, "big.png").unwrap_err();
        assert!(err.to_string().contains("too large"));
    }
}
