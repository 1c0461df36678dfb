//! Code for loading program settings.
use crate::estimator::EvaluationWeights;
use crate::log::DEFAULT_LOG_LEVEL;
use crate::units::{Dimensionless, Energy};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default log level for program
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

/// Program settings from config file
#[derive(Debug, Deserialize, PartialEq)]
pub struct Settings {
    /// The default program log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Weighting parameters for tariff evaluation
    #[serde(default)]
    pub evaluation: EvaluationSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            evaluation: EvaluationSettings::default(),
        }
    }
}

/// Weighting parameters for tariff evaluation, as read from the settings file
#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct EvaluationSettings {
    /// Relative trust in a tariff's claimed expected mean price
    pub wt_expected: f64,
    /// Relative trust in a tariff's claimed price ceiling
    pub wt_max: f64,
    /// Maximum trust placed in a tariff's realized price
    pub wt_realized: f64,
    /// Sold volume at which realized-price confidence reaches half its maximum weight
    pub sold_threshold: f64,
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self {
            wt_expected: 0.6,
            wt_max: 0.4,
            wt_realized: 0.8,
            sold_threshold: 10000.0,
        }
    }
}

impl EvaluationSettings {
    /// Convert the raw parameters into validated evaluation weights
    pub fn to_weights(&self) -> Result<EvaluationWeights> {
        EvaluationWeights::new(
            Dimensionless(self.wt_expected),
            Dimensionless(self.wt_max),
            Dimensionless(self.wt_realized),
            Energy(self.sold_threshold),
        )
    }
}

impl Settings {
    /// Read the settings from the given file path.
    ///
    /// If the file is not present, default values for settings will be used
    ///
    /// # Returns
    ///
    /// The program settings as a `Settings` struct or an error if the file is invalid
    pub fn load_from_path(file_path: &Path) -> Result<Settings> {
        if !file_path.is_file() {
            return Ok(Settings::default());
        }

        let contents = fs::read_to_string(file_path)
            .with_context(|| format!("Could not read {}", file_path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Could not parse {}", file_path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use float_cmp::assert_approx_eq;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_settings_load_from_path_no_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("settings.toml"); // NB: doesn't exist
        assert_eq!(
            Settings::load_from_path(&file_path).unwrap(),
            Settings::default()
        );
    }

    #[test]
    fn test_settings_load_from_path() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("settings.toml");

        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "log_level = \"warn\"").unwrap();
            writeln!(file, "[evaluation]").unwrap();
            writeln!(file, "wt_expected = 1.0").unwrap();
            writeln!(file, "wt_max = 3.0").unwrap();
        }

        let settings = Settings::load_from_path(&file_path).unwrap();
        assert_eq!(settings.log_level, "warn");

        // Unspecified evaluation parameters keep their defaults
        assert_eq!(
            settings.evaluation,
            EvaluationSettings {
                wt_expected: 1.0,
                wt_max: 3.0,
                wt_realized: 0.8,
                sold_threshold: 10000.0
            }
        );
    }

    #[test]
    fn test_settings_load_from_path_invalid_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("settings.toml");

        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "log_level = ").unwrap();
        }

        assert_error!(
            Settings::load_from_path(&file_path),
            format!("Could not parse {}", file_path.display())
        );
    }

    #[test]
    fn test_default_evaluation_settings_produce_valid_weights() {
        let weights = EvaluationSettings::default().to_weights().unwrap();
        assert_approx_eq!(f64, weights.norm_wt_expected().0, 0.6);
        assert_approx_eq!(f64, weights.norm_wt_max().0, 0.4);
    }

    #[test]
    fn test_degenerate_evaluation_settings_rejected() {
        let settings = EvaluationSettings {
            wt_expected: 0.0,
            wt_max: 0.0,
            ..EvaluationSettings::default()
        };
        assert_error!(
            settings.to_weights(),
            "expected-mean and price-ceiling weights cannot both be zero"
        );
    }
}
