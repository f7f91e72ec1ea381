use std::sync::Arc;

use anyhow::Result;
use lecsched_core::{CalendarProvider, ReferenceData, ScheduleExpander};
use lecsched_provider_google::GoogleProvider;

use crate::config::ServerConfig;

/// Shared application state. Everything inside is immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub reference: Arc<ReferenceData>,
    pub expander: Arc<ScheduleExpander>,
    pub provider: Arc<dyn CalendarProvider>,
}

impl AppState {
    pub fn new(
        reference: ReferenceData,
        expander: ScheduleExpander,
        provider: Arc<dyn CalendarProvider>,
    ) -> Self {
        AppState {
            reference: Arc::new(reference),
            expander: Arc::new(expander),
            provider,
        }
    }

    /// Load reference data and wire up the Google provider from `config`.
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let reference = ReferenceData::load(&config.data_dir)?;
        let expander = config.expander()?;

        if !config.google.is_configured() {
            tracing::warn!("Google OAuth client not configured; auth and calendar routes will fail");
        }
        let provider = Arc::new(GoogleProvider::new(config.google.clone()));

        Ok(AppState::new(reference, expander, provider))
    }
}
