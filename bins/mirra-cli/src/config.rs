//! Layered CLI configuration.
//!
//! Sources, lowest priority first: built-in defaults, an optional TOML file,
//! then `MIRRA__*` environment variables (`MIRRA__SCORING__QUALITY_WINDOW=5`
//! overrides `scoring.quality_window`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ::config::{Config, Environment, File, FileFormat};
use mirra_guard::GuardConfig;
use mirra_scoring::ScoringConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

const ENV_PREFIX: &str = "MIRRA";

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct MirraConfig {
    pub scoring: ScoringConfig,
    pub guard: GuardConfig,
}

impl MirraConfig {
    /// `<config_dir>/mirra/mirra.toml`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mirra")
            .join("mirra.toml")
    }

    /// Load and validate the layered configuration.
    ///
    /// An explicit `path` must exist; the default path is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_path(), false),
        };

        let settings = Config::builder()
            .add_source(File::new(&path.to_string_lossy(), FileFormat::Toml).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("failed to read config from {}", path.display()))?;

        let cfg: Self = settings
            .try_deserialize()
            .context("invalid configuration")?;
        cfg.scoring.validate().context("invalid [scoring] section")?;
        cfg.guard.validate().context("invalid [guard] section")?;

        debug!(path = %path.display(), "config: loaded");
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_path_ends_with_mirra_toml() {
        let path = MirraConfig::default_path();
        assert!(path.ends_with("mirra/mirra.toml"), "{path:?}");
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[scoring]\nquality_window = 4\n\n[scoring.thresholds]\nmin_days = 7\n\n[guard.rate_limit]\nmax_uploads_per_hour = 3"
        )
        .unwrap();

        let cfg = MirraConfig::load(Some(file.path())).unwrap();
        assert_eq!(cfg.scoring.quality_window, 4);
        assert_eq!(cfg.scoring.thresholds.min_days, 7);
        assert_eq!(cfg.scoring.thresholds.min_photos, ScoringConfig::default().thresholds.min_photos);
        assert_eq!(cfg.guard.rate_limit.max_uploads_per_hour, 3);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(MirraConfig::load(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn invalid_weights_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[scoring.weights]\nconsistency = 0.9").unwrap();

        let err = MirraConfig::load(Some(file.path())).unwrap_err();
        assert!(format!("{err:#}").contains("sum to 1.0"), "{err:#}");
    }
}
