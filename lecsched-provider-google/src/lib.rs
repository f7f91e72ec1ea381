//! Google Calendar provider for lecsched.
//!
//! Handles the OAuth consent/code-exchange flow and writes expanded class
//! events to the signed-in user's primary calendar.

pub mod app_config;
pub mod google_auth;
pub mod provider;
pub mod to_google;

pub use app_config::GoogleAppConfig;
pub use provider::GoogleProvider;
