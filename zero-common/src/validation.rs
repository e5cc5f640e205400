//! Configuration validation for the Zero factor tools.
//!
//! Provides validation logic for configuration fields to ensure
//! all required values are present and within valid ranges.

use thiserror::Error;

use crate::config::{Config, DataSourceConfig, FactorConfig, ObservabilityConfig};

/// Configuration validation error.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Multiple validation errors: {0:?}")]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trait for validatable configuration sections.
pub trait Validate {
    /// Validate this configuration section.
    fn validate(&self) -> ValidationResult<()>;
}

impl Config {
    /// Validate the entire configuration.
    pub fn validate(&self) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if let Err(e) = self.observability.validate() {
            errors.push(e);
        }

        if let Err(e) = self.factor.validate() {
            errors.push(e);
        }

        if let Err(e) = self.data_source.validate() {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(())
        } else if errors.len() == 1 {
            Err(errors.remove(0))
        } else {
            Err(ValidationError::Multiple(errors))
        }
    }
}

impl Validate for ObservabilityConfig {
    fn validate(&self) -> ValidationResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_level".into(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            });
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.log_format.to_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_format".into(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            });
        }

        Ok(())
    }
}

fn positive(field: &str, value: usize) -> ValidationResult<()> {
    if value == 0 {
        return Err(ValidationError::InvalidValue {
            field: field.into(),
            reason: "must be at least 1".into(),
        });
    }
    Ok(())
}

impl Validate for FactorConfig {
    fn validate(&self) -> ValidationResult<()> {
        if self.symbol.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "factor.symbol".into(),
            });
        }

        positive("factor.rank_window", self.rank_window)?;
        positive("factor.corr_window", self.corr_window)?;
        positive("factor.horizon", self.horizon)?;

        if self.lookback_days == 0 {
            return Err(ValidationError::InvalidValue {
                field: "factor.lookback_days".into(),
                reason: "must be at least 1".into(),
            });
        }

        // A correlation of fewer than two points is meaningless.
        if self.min_samples < 2 {
            return Err(ValidationError::InvalidValue {
                field: "factor.min_samples".into(),
                reason: "must be at least 2".into(),
            });
        }

        // Sample standard deviation needs two months.
        if self.min_months < 2 {
            return Err(ValidationError::InvalidValue {
                field: "factor.min_months".into(),
                reason: "must be at least 2".into(),
            });
        }

        if let Some(w) = self.ma_windows.iter().find(|w| **w == 0) {
            return Err(ValidationError::InvalidValue {
                field: "factor.ma_windows".into(),
                reason: format!("window {} must be at least 1", w),
            });
        }

        if !(self.significance_level > 0.0 && self.significance_level < 1.0) {
            return Err(ValidationError::InvalidValue {
                field: "factor.significance_level".into(),
                reason: "must be within (0, 1)".into(),
            });
        }

        Ok(())
    }
}

impl Validate for DataSourceConfig {
    fn validate(&self) -> ValidationResult<()> {
        let valid_providers = ["eastmoney"];
        if !valid_providers.contains(&self.provider.to_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "data_source.provider".into(),
                reason: format!("must be one of: {}", valid_providers.join(", ")),
            });
        }

        let valid_adjust = ["qfq", "hfq", "none"];
        if !valid_adjust.contains(&self.adjust.to_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "data_source.adjust".into(),
                reason: format!("must be one of: {}", valid_adjust.join(", ")),
            });
        }

        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidValue {
                field: "data_source.timeout_secs".into(),
                reason: "must be at least 1".into(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = Config::default();
        config.observability.log_level = "invalid".into();
        let result = config.validate();
        assert!(result.is_err());
        if let Err(ValidationError::InvalidValue { field, .. }) = result {
            assert_eq!(field, "observability.log_level");
        }
    }

    #[test_case("rank_window" ; "rank window")]
    #[test_case("corr_window" ; "corr window")]
    #[test_case("horizon" ; "horizon")]
    fn test_zero_window_rejected(name: &str) {
        let mut factor = FactorConfig::default();
        match name {
            "rank_window" => factor.rank_window = 0,
            "corr_window" => factor.corr_window = 0,
            _ => factor.horizon = 0,
        }
        match factor.validate() {
            Err(ValidationError::InvalidValue { field, .. }) => {
                assert_eq!(field, format!("factor.{}", name));
            }
            other => panic!("expected invalid value, got {:?}", other),
        }
    }

    #[test]
    fn test_min_samples_and_months() {
        let mut factor = FactorConfig::default();
        factor.min_samples = 1;
        assert!(factor.validate().is_err());

        let mut factor = FactorConfig::default();
        factor.min_months = 1;
        assert!(factor.validate().is_err());
    }

    #[test]
    fn test_empty_symbol_missing() {
        let mut factor = FactorConfig::default();
        factor.symbol = "  ".into();
        assert!(matches!(
            factor.validate(),
            Err(ValidationError::MissingField { .. })
        ));
    }

    #[test_case(0.0 ; "zero")]
    #[test_case(1.0 ; "one")]
    #[test_case(f64::NAN ; "nan")]
    fn test_bad_significance_level(level: f64) {
        let mut factor = FactorConfig::default();
        factor.significance_level = level;
        assert!(factor.validate().is_err());
    }

    #[test]
    fn test_unknown_adjust_mode() {
        let mut config = Config::default();
        config.data_source.adjust = "split".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_multiple_errors_collected() {
        let mut config = Config::default();
        config.observability.log_format = "xml".into();
        config.factor.horizon = 0;
        config.data_source.timeout_secs = 0;
        match config.validate() {
            Err(ValidationError::Multiple(errors)) => assert_eq!(errors.len(), 3),
            other => panic!("expected multiple errors, got {:?}", other),
        }
    }
}
