//! Configuration file support for the wellness tools.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/wellness/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    /// Show internal error details to callers
    #[serde(default)]
    pub development: bool,

    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub validation: ValidationConfig,

    #[serde(default)]
    pub chat: ChatConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Inclusive numeric domain for a profile field
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Profile field domains enforced before the engine runs
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Reject unknown activity levels instead of letting the engine score them
    #[serde(default = "default_strict_activity_level")]
    pub strict_activity_level: bool,

    #[serde(default = "default_age_years")]
    pub age_years: Range,

    #[serde(default = "default_height_cm")]
    pub height_cm: Range,

    #[serde(default = "default_weight_kg")]
    pub weight_kg: Range,

    #[serde(default = "default_sleep_hours")]
    pub sleep_hours: Range,

    #[serde(default = "default_water_glasses")]
    pub water_glasses: Range,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            strict_activity_level: default_strict_activity_level(),
            age_years: default_age_years(),
            height_cm: default_height_cm(),
            weight_kg: default_weight_kg(),
            sleep_hours: default_sleep_hours(),
            water_glasses: default_water_glasses(),
        }
    }
}

impl ValidationConfig {
    /// Reject inverted or non-finite ranges
    pub fn check(&self) -> Result<()> {
        let ranges = [
            ("age_years", self.age_years),
            ("height_cm", self.height_cm),
            ("weight_kg", self.weight_kg),
            ("sleep_hours", self.sleep_hours),
            ("water_glasses", self.water_glasses),
        ];

        for (name, range) in ranges {
            if !range.min.is_finite() || !range.max.is_finite() || range.min > range.max {
                return Err(Error::Config(format!(
                    "validation.{}: invalid range [{}, {}]",
                    name, range.min, range.max
                )));
            }
        }
        Ok(())
    }
}

/// Chat proxy configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Reply returned when the upstream model reports quota exhaustion
    #[serde(default = "default_quota_fallback_reply")]
    pub quota_fallback_reply: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            quota_fallback_reply: default_quota_fallback_reply(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(std::env::temp_dir)
    });
    base.join("wellness")
}

fn default_strict_activity_level() -> bool {
    true
}

fn default_age_years() -> Range {
    Range::new(15.0, 80.0)
}

fn default_height_cm() -> Range {
    Range::new(100.0, 250.0)
}

fn default_weight_kg() -> Range {
    Range::new(30.0, 300.0)
}

fn default_sleep_hours() -> Range {
    Range::new(4.0, 12.0)
}

fn default_water_glasses() -> Range {
    Range::new(0.0, 12.0)
}

fn default_quota_fallback_reply() -> String {
    "I'm getting a lot of questions right now. In the meantime: stay hydrated, \
     aim for 7-9 hours of sleep, and try to move a little every day."
        .into()
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
        config.validation.check()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(std::env::temp_dir)
        });
        base.join("wellness").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
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
