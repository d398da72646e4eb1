use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::input::{parse_expiry, CreditInputs};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_format")]
    pub default_format: String,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_format() -> String {
    "text".to_string()
}
fn default_color() -> String {
    "auto".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_format: default_format(),
            color: default_color(),
        }
    }
}

/// Default credit inputs, used for any value not given on the command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreditDefaults {
    #[serde(default)]
    pub free: f64,
    #[serde(default)]
    pub package: f64,
    pub package_expiry: Option<String>,
    #[serde(default)]
    pub topup: f64,
    pub topup_expiry: Option<String>,
}

impl CreditDefaults {
    /// Fill every field of `inputs` that is still unset from these defaults.
    pub fn fill(&self, inputs: &mut CreditInputs) {
        fn amount(slot: &mut Option<String>, value: f64) {
            if slot.is_none() && value > 0.0 {
                *slot = Some(value.to_string());
            }
        }
        fn text(slot: &mut Option<String>, value: &Option<String>) {
            if slot.is_none() {
                slot.clone_from(value);
            }
        }

        amount(&mut inputs.free, self.free);
        amount(&mut inputs.package, self.package);
        text(&mut inputs.package_expiry, &self.package_expiry);
        amount(&mut inputs.topup, self.topup);
        text(&mut inputs.topup_expiry, &self.topup_expiry);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub credits: CreditDefaults,
}

impl AppConfig {
    /// Get the config file path, respecting XDG_CONFIG_HOME
    pub fn config_path() -> PathBuf {
        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("~"))
                    .join(".config")
            });
        config_dir.join("creditcalc").join("config.toml")
    }

    /// Load config from the default path, falling back to defaults if not found
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from `path`, falling back to defaults if the file is missing
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Serialize and write this config to the config file path.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Validate the config
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if !["text", "json"].contains(&self.settings.default_format.as_str()) {
            issues.push(format!(
                "Invalid default_format: '{}' (must be 'text' or 'json')",
                self.settings.default_format
            ));
        }
        if !["auto", "always", "never"].contains(&self.settings.color.as_str()) {
            issues.push(format!(
                "Invalid color: '{}' (must be 'auto', 'always', or 'never')",
                self.settings.color
            ));
        }

        let credits = &self.credits;
        for (name, value) in [
            ("free", credits.free),
            ("package", credits.package),
            ("topup", credits.topup),
        ] {
            if !value.is_finite() || value < 0.0 {
                issues.push(format!("Invalid {} amount: {} (must be >= 0)", name, value));
            }
        }
        for (name, value) in [
            ("package_expiry", &credits.package_expiry),
            ("topup_expiry", &credits.topup_expiry),
        ] {
            if let Some(raw) = value {
                if let Err(e) = parse_expiry(name, raw) {
                    issues.push(e.to_string());
                }
            }
        }
        if credits.package > 0.0 && credits.package_expiry.is_none() {
            issues.push("package amount is set but package_expiry is missing".to_string());
        }
        issues
    }
}
