//! OAuth client configuration for the Google provider.
//!
//! Comes from the `[google]` section of the server configuration, e.g.
//!
//! ```toml
//! [google]
//! client_id = "your-client-id.apps.googleusercontent.com"
//! client_secret = "your-client-secret"
//! redirect_uri = "http://localhost:8080/api/auth/callback"
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8080/api/auth/callback";

#[derive(Clone, Serialize, Deserialize)]
pub struct GoogleAppConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
}

fn default_redirect_uri() -> String {
    DEFAULT_REDIRECT_URI.to_string()
}

impl Default for GoogleAppConfig {
    fn default() -> Self {
        GoogleAppConfig {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: default_redirect_uri(),
        }
    }
}

impl std::fmt::Debug for GoogleAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleAppConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

impl GoogleAppConfig {
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }

    /// Fail with setup instructions when the OAuth client isn't configured.
    pub fn require(&self) -> Result<&Self> {
        if !self.is_configured() {
            anyhow::bail!(
                "Google OAuth client is not configured.\n\n\
                Set google.client_id and google.client_secret in lecsched.toml,\n\
                or LECSCHED__GOOGLE__CLIENT_ID and LECSCHED__GOOGLE__CLIENT_SECRET.\n\n\
                See https://console.cloud.google.com/apis/credentials for setup."
            );
        }
        url::Url::parse(&self.redirect_uri)
            .map_err(|e| anyhow::anyhow!("Invalid google.redirect_uri '{}': {}", self.redirect_uri, e))?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_partial_section() {
        let config: GoogleAppConfig =
            serde_json::from_value(serde_json::json!({ "client_id": "abc" })).unwrap();

        assert_eq!(config.redirect_uri, DEFAULT_REDIRECT_URI);
        assert!(!config.is_configured());
        assert!(config.require().is_err());
    }

    #[test]
    fn test_require_checks_redirect_uri() {
        let config = GoogleAppConfig {
            client_id: "id".into(),
            client_secret: "secret".into(),
            redirect_uri: "not a url".into(),
        };
        assert!(config.require().is_err());

        let config = GoogleAppConfig {
            redirect_uri: DEFAULT_REDIRECT_URI.into(),
            ..config
        };
        assert!(config.require().is_ok());
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = GoogleAppConfig {
            client_secret: "hunter2".into(),
            ..Default::default()
        };
        assert!(!format!("{:?}", config).contains("hunter2"));
    }
}
