//! Server configuration.
//!
//! Sources, later ones winning:
//!   built-in defaults
//!   ~/.config/lecsched/config.toml
//!   ./lecsched.toml
//!   LECSCHED__* environment variables (e.g. LECSCHED__GOOGLE__CLIENT_ID)
//!   PORT

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use lecsched_core::{PeriodTable, ScheduleExpander, SemesterAnchor};
use lecsched_provider_google::GoogleAppConfig;
use lecsched_provider_google::app_config::DEFAULT_REDIRECT_URI;
use serde::Deserialize;

pub const LOCAL_CONFIG_FILE: &str = "lecsched.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    /// Directory holding data_subject.json and data_lecturer.json
    pub data_dir: PathBuf,

    /// Date of week 1, day 1 (YYYY-MM-DD)
    pub semester_start: String,

    /// Offset attached to generated timestamps, e.g. +07:00
    pub utc_offset: String,

    #[serde(default)]
    pub google: GoogleAppConfig,
}

/// ~/.config/lecsched
pub fn config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .context("Could not determine config directory")?
        .join("lecsched"))
}

impl ServerConfig {
    /// Load `.env`, then every config source.
    pub fn load() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env");
        }

        let mut builder = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080)?
            .set_default("data_dir", "data")?
            .set_default("semester_start", "2025-02-03")?
            .set_default("utc_offset", "+00:00")?
            .set_default("google.redirect_uri", DEFAULT_REDIRECT_URI)?;

        if let Ok(dir) = config_dir() {
            builder = builder.add_source(File::from(dir.join("config.toml")).required(false));
        }

        let mut builder = builder
            .add_source(File::with_name(LOCAL_CONFIG_FILE).required(false))
            .add_source(
                Environment::with_prefix("LECSCHED")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        if let Ok(port) = std::env::var("PORT")
            && !port.trim().is_empty()
        {
            builder = builder.set_override("port", port.trim())?;
        }

        let config: ServerConfig = builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        Ok(config)
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }

    pub fn expander(&self) -> Result<ScheduleExpander> {
        let anchor = SemesterAnchor::parse(&self.semester_start, &self.utc_offset)?;
        Ok(ScheduleExpander::new(PeriodTable::default(), anchor))
    }
}
