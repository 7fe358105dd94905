//! Configuration loading and management

use super::schema::Config;
use super::validate::validate_config;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Environment variables that override individual config fields.
const TOKEN_ENV: &str = "TICKCORD_TOKEN";
const ACTIVITY_ENV: &str = "TICKCORD_ACTIVITY";

/// Configuration loader
pub struct ConfigLoader {
    config_dir: PathBuf,
}

impl ConfigLoader {
    /// Create a new config loader with the default config directory
    pub fn new() -> Self {
        let config_dir = dirs::home_dir()
            .map(|h| h.join(".tickcord"))
            .unwrap_or_else(|| PathBuf::from(".tickcord"));

        Self { config_dir }
    }

    /// Create a new config loader with a custom config directory
    pub fn with_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            config_dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Load configuration from file and environment
    pub fn load(&self) -> crate::Result<Config> {
        let config_path = self.config_dir.join("config.json");
        let mut merged = serde_json::to_value(Config::default())?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let file_value: Value = serde_json::from_str(&content)?;
            merge_values(&mut merged, file_value);
        }

        apply_env_overrides(&mut merged);

        let config: Config = serde_json::from_value(merged)?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Write a default config template for the admin to fill in, unless a
    /// config file already exists. Returns true when the template was
    /// written.
    pub fn write_default_if_missing(&self) -> crate::Result<bool> {
        if self.config_dir.join("config.json").exists() {
            return Ok(false);
        }
        self.save(&Config::default())?;
        Ok(true)
    }

    /// Save configuration to file
    pub fn save(&self, config: &Config) -> crate::Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        let config_path = self.config_dir.join("config.json");
        let content = serde_json::to_string_pretty(config)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                if let Some(existing) = base_map.get_mut(&key) {
                    merge_values(existing, value);
                } else {
                    base_map.insert(key, value);
                }
            }
        }
        (base_value, overlay_value) => {
            *base_value = overlay_value;
        }
    }
}

fn apply_env_overrides(config: &mut Value) {
    let overrides = [(TOKEN_ENV, "token"), (ACTIVITY_ENV, "activity")];
    for (env_key, field) in overrides {
        if let Ok(value) = std::env::var(env_key) {
            if let Some(discord) = config.get_mut("discord").and_then(Value::as_object_mut) {
                discord.insert(field.to_string(), Value::String(value));
            }
        }
    }
}
