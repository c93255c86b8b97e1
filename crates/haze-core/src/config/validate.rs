//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let placeholder = &self.placeholder;
        if !(1..=9).contains(&placeholder.components_x) {
            return Err(ConfigError::ValidationError(
                "placeholder.components_x must be between 1 and 9".into(),
            ));
        }
        if !(1..=9).contains(&placeholder.components_y) {
            return Err(ConfigError::ValidationError(
                "placeholder.components_y must be between 1 and 9".into(),
            ));
        }
        if placeholder.max_sample_width == 0 {
            return Err(ConfigError::ValidationError(
                "placeholder.max_sample_width must be > 0".into(),
            ));
        }
        if !(placeholder.punch > 0.0) {
            return Err(ConfigError::ValidationError(
                "placeholder.punch must be > 0".into(),
            ));
        }
        if self.source.fetch_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "source.fetch_timeout_ms must be > 0".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if self.store.path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "store.path must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_components() {
        let mut config = Config::default();
        config.placeholder.components_x = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("components_x"));

        config.placeholder.components_x = 4;
        config.placeholder.components_y = 10;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("components_y"));
    }

    #[test]
    fn test_validate_rejects_zero_sample_width() {
        let mut config = Config::default();
        config.placeholder.max_sample_width = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_sample_width"));
    }

    #[test]
    fn test_validate_rejects_non_positive_punch() {
        let mut config = Config::default();
        config.placeholder.punch = 0.0;
        assert!(config.validate().is_err());

        config.placeholder.punch = f32::NAN;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("punch"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.source.fetch_timeout_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("fetch_timeout_ms"));
    }

    #[test]
    fn test_validate_rejects_empty_store_path() {
        let mut config = Config::default();
        config.store.path = Default::default();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("store.path"));
    }
}
