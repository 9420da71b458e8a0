use std::path::PathBuf;

use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/order-tracker.toml";
const ENV_PREFIX: &str = "ORDER_TRACKER";
const STORAGE_FILE: &str = "storage.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            log_level: "warn".to_string(),
        }
    }
}

impl AppConfig {
    /// Path of the key-value file all orders and settings live in.
    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join(STORAGE_FILE)
    }
}

/// Command-line values that take precedence over file and environment.
#[derive(Debug, Default)]
pub struct Overrides {
    pub config: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

pub fn load(overrides: Overrides) -> Result<AppConfig> {
    let config_path = overrides.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(data_dir) = overrides.data_dir {
        settings.data_dir = data_dir;
    }
    if let Some(log_level) = overrides.log_level {
        settings.log_level = log_level;
    }

    Ok(settings)
}
