//! Configuration file support for prime-risk.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/prime-risk/config.toml`.

use crate::{Error, Result, RiskTiers, StatinIntensity, TreatmentSelection};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub treatment: TreatmentDefaults,

    #[serde(default)]
    pub tiers: RiskTiers,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Treatment options preselected when the caller does not choose them
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TreatmentDefaults {
    #[serde(default)]
    pub statin: StatinIntensity,

    #[serde(default)]
    pub ezetimibe: bool,

    #[serde(default)]
    pub pcsk9_inhibitor: bool,

    #[serde(default = "default_target_sbp")]
    pub target_sbp: f64,
}

impl Default for TreatmentDefaults {
    fn default() -> Self {
        Self {
            statin: StatinIntensity::default(),
            ezetimibe: false,
            pcsk9_inhibitor: false,
            target_sbp: default_target_sbp(),
        }
    }
}

impl TreatmentDefaults {
    /// The default selection as an engine input record
    pub fn to_selection(&self) -> TreatmentSelection {
        TreatmentSelection {
            statin_intensity: self.statin,
            ezetimibe: self.ezetimibe,
            pcsk9_inhibitor: self.pcsk9_inhibitor,
            target_sbp: self.target_sbp,
        }
    }
}

/// Rendering format for assessment output
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Output configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_target_sbp() -> f64 {
    130.0
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Check tier thresholds and the default treatment target
    pub fn validate(&self) -> Result<()> {
        self.tiers.validate()?;

        let errors = self.treatment.to_selection().validate();
        if !errors.is_empty() {
            return Err(Error::Config(errors.join("; ")));
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(PathBuf::from)
                .unwrap_or_default()
                .join(".config")
        });
        base.join("prime-risk").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
