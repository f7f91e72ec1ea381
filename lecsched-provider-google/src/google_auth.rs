//! Google OAuth: consent URL, code exchange and the userinfo endpoint.

use anyhow::{Context, Result};
use google_calendar::Client;
use lecsched_core::{TokenGrant, UserInfo};
use serde::Deserialize;

use crate::app_config::GoogleAppConfig;

pub const SCOPES: &[&str] = &[
    "openid",
    "https://www.googleapis.com/auth/userinfo.profile",
    "https://www.googleapis.com/auth/userinfo.email",
    "https://www.googleapis.com/auth/calendar",
];

pub const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// A Google client bound to the app's OAuth credentials and the given tokens.
pub fn client(config: &GoogleAppConfig, access_token: &str, refresh_token: &str) -> Client {
    Client::new(
        config.client_id.clone(),
        config.client_secret.clone(),
        config.redirect_uri.clone(),
        access_token.to_string(),
        refresh_token.to_string(),
    )
}

pub fn consent_url(config: &GoogleAppConfig) -> Result<String> {
    let config = config.require()?;
    let scopes: Vec<String> = SCOPES.iter().map(|s| s.to_string()).collect();

    // The library generates its own state parameter
    Ok(client(config, "", "").user_consent_url(&scopes))
}

pub async fn exchange_code(config: &GoogleAppConfig, code: &str, state: &str) -> Result<TokenGrant> {
    let config = config.require()?;
    let mut client = client(config, "", "");

    let tokens = client
        .get_access_token(code, state)
        .await
        .context("Failed to exchange authorization code for tokens")?;

    Ok(TokenGrant {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        expires_in: tokens.expires_in,
    })
}

#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    name: String,
}

/// Outcome of a userinfo call, split so the caller can tell a rejected token
/// from a transport failure.
pub enum UserInfoError {
    Unauthorized(String),
    Other(anyhow::Error),
}

pub async fn user_info(http: &reqwest::Client, access_token: &str) -> Result<UserInfo, UserInfoError> {
    let response = http
        .get(USERINFO_URL)
        .bearer_auth(access_token)
        .send()
        .await
        .context("Failed to reach Google userinfo endpoint")
        .map_err(UserInfoError::Other)?;

    let status = response.status();
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        let body = response.text().await.unwrap_or_default();
        return Err(UserInfoError::Unauthorized(format!("{}: {}", status, body)));
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(UserInfoError::Other(anyhow::anyhow!(
            "Google userinfo returned {}: {}",
            status,
            body
        )));
    }

    let info: UserInfoResponse = response
        .json()
        .await
        .context("Failed to parse Google userinfo response")
        .map_err(UserInfoError::Other)?;

    Ok(UserInfo {
        id: info.id,
        email: info.email,
        name: info.name,
    })
}
