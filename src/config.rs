// Handles configuration loading, saving, and defaults.
use crate::context::AppContext;
use crate::model::TemporalMode;
use crate::storage::LocalStorage;
use anyhow::{Error, Result};
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::fs;

fn default_scrub_step() -> f64 {
    5.0
}

fn default_date_format() -> String {
    "%Y-%m-%d %H:%M".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    /// Mode the events view opens in.
    #[serde(default)]
    pub default_mode: TemporalMode,
    /// Slider movement per key press, in percent of the span.
    #[serde(default = "default_scrub_step")]
    pub scrub_step: f64,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// One of off, error, warn, info, debug, trace.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_mode: TemporalMode::default(),
            scrub_step: default_scrub_step(),
            date_format: default_date_format(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let mut config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        if !config.scrub_step.is_finite() || config.scrub_step <= 0.0 {
            log::warn!(
                "Ignoring invalid scrub_step {} in config, using {}",
                config.scrub_step,
                default_scrub_step()
            );
            config.scrub_step = default_scrub_step();
        }

        if StrftimeItems::new(&config.date_format).any(|item| matches!(item, Item::Error)) {
            log::warn!(
                "Ignoring invalid date_format '{}' in config",
                config.date_format
            );
            config.date_format = default_date_format();
        }

        Ok(config)
    }

    /// Loads the config, falling back to defaults when the file does not exist.
    /// Syntax and permission errors are still returned.
    pub fn load_or_default(ctx: &dyn AppContext) -> Result<Self> {
        match Self::load(ctx) {
            Ok(c) => Ok(c),
            Err(e) if Self::is_missing_config_error(&e) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// Whether an error returned by [`Config::load`] means the file was missing.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }

        for cause in err.chain() {
            if let Some(io_err) = cause.downcast_ref::<std::io::Error>()
                && io_err.kind() == std::io::ErrorKind::NotFound
            {
                return true;
            }
        }

        false
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        LocalStorage::with_lock(&path, || {
            let toml_str = toml::to_string_pretty(self)?;
            LocalStorage::atomic_write(&path, toml_str)?;
            Ok(())
        })?;
        Ok(())
    }

    pub fn get_path_string(ctx: &dyn AppContext) -> Result<String> {
        let path = ctx.get_config_file_path()?;
        Ok(path.to_string_lossy().to_string())
    }

    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.log_level
            .parse::<log::LevelFilter>()
            .unwrap_or(log::LevelFilter::Info)
    }
}
