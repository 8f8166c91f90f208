//! Anti-cheat configuration.

use mirra_core::error::ConfigError;
use serde::{Deserialize, Serialize};

use crate::rate_limiter::RateLimitConfig;
use crate::validation::ValidationThresholds;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
#[serde(default)]
pub struct GuardConfig {
    pub rate_limit: RateLimitConfig,
    pub validation: ValidationThresholds,
}

impl GuardConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rate_limit.validate()?;
        self.validation.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(GuardConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_override_keeps_defaults() {
        let cfg: GuardConfig =
            serde_json::from_str(r#"{ "rate_limit": { "max_uploads_per_hour": 3 } }"#).unwrap();
        assert_eq!(cfg.rate_limit.max_uploads_per_hour, 3);
        assert_eq!(cfg.rate_limit.max_uploads_per_day, RateLimitConfig::default().max_uploads_per_day);
        assert_eq!(cfg.validation, ValidationThresholds::default());
    }

    #[test]
    fn zero_cap_rejected() {
        let mut cfg = GuardConfig::default();
        cfg.rate_limit.max_uploads_per_day = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroLimit("max_uploads_per_day")));
    }
}
