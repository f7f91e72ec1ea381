//! Calendar provider interface.
//!
//! The server only talks to an external calendar through this trait, so
//! routes can be exercised against an in-memory fake and a different
//! provider can be dropped in without touching them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::event::CalendarEvent;
use crate::window::EventWindow;

/// OAuth tokens supplied by the caller. Passed through to the provider unchanged.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Tokens obtained by exchanging an authorization code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// Identity of the account behind an access token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub name: String,
}

#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// URL the user is redirected to for consent.
    fn consent_url(&self) -> Result<String, ProviderError>;

    async fn exchange_code(&self, code: &str, state: &str) -> Result<TokenGrant, ProviderError>;

    async fn user_info(&self, access_token: &str) -> Result<UserInfo, ProviderError>;

    /// Create one event on the user's primary calendar.
    async fn insert_event(
        &self,
        credentials: &Credentials,
        event: &CalendarEvent,
    ) -> Result<(), ProviderError>;

    /// Events on the primary calendar within `window`, recurring events expanded,
    /// ordered by start time.
    async fn list_events(
        &self,
        credentials: &Credentials,
        window: &EventWindow,
    ) -> Result<Vec<serde_json::Value>, ProviderError>;
}
