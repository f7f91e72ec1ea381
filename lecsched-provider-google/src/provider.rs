//! `CalendarProvider` backed by the Google Calendar API.

use async_trait::async_trait;
use google_calendar::types::{OrderBy, SendUpdates};
use google_calendar::{Client, ClientError};
use lecsched_core::{
    CalendarEvent, CalendarProvider, Credentials, EventWindow, ProviderError, TokenGrant, UserInfo,
};
use tracing::debug;

use crate::app_config::GoogleAppConfig;
use crate::google_auth::{self, UserInfoError};
use crate::to_google::ToGoogle;

/// Events are always written to and read from the user's primary calendar.
pub const CALENDAR_ID: &str = "primary";

#[derive(Debug, Clone)]
pub struct GoogleProvider {
    config: GoogleAppConfig,
    http: reqwest::Client,
}

impl GoogleProvider {
    pub fn new(config: GoogleAppConfig) -> Self {
        GoogleProvider {
            config,
            http: reqwest::Client::new(),
        }
    }
}

fn request_error(e: anyhow::Error) -> ProviderError {
    ProviderError::Request(format!("{:#}", e))
}

fn auth_error(e: anyhow::Error) -> ProviderError {
    ProviderError::Auth(format!("{:#}", e))
}

/// Why a call failed after at most one token refresh.
#[derive(Debug, PartialEq)]
enum RetryError<E> {
    Failed(E),
    RefreshFailed(E),
}

/// Run `call`. If it fails because the access token was rejected, refresh
/// once and run it again; the second outcome is final.
async fn with_refresh<T, E, C, CF, R, RF>(
    mut call: C,
    refresh: R,
    is_rejected: impl Fn(&E) -> bool,
) -> Result<T, RetryError<E>>
where
    C: FnMut() -> CF,
    CF: Future<Output = Result<T, E>>,
    R: FnOnce() -> RF,
    RF: Future<Output = Result<(), E>>,
{
    match call().await {
        Err(e) if is_rejected(&e) => {
            debug!("Access token rejected, refreshing");
            refresh().await.map_err(RetryError::RefreshFailed)?;
            call().await.map_err(RetryError::Failed)
        }
        result => result.map_err(RetryError::Failed),
    }
}

fn is_unauthorized(e: &ClientError) -> bool {
    matches!(e, ClientError::HttpError { status, .. } if status.as_u16() == 401)
}

async fn refresh(client: &Client) -> Result<(), ClientError> {
    client.refresh_access_token().await.map(|_| ())
}

fn calendar_error(e: RetryError<ClientError>, context: &str) -> ProviderError {
    match e {
        RetryError::RefreshFailed(e) => {
            auth_error(anyhow::Error::new(e).context("Failed to refresh access token"))
        }
        RetryError::Failed(e) if is_unauthorized(&e) => {
            auth_error(anyhow::Error::new(e).context(context.to_string()))
        }
        RetryError::Failed(e) => request_error(anyhow::Error::new(e).context(context.to_string())),
    }
}

#[async_trait]
impl CalendarProvider for GoogleProvider {
    fn consent_url(&self) -> Result<String, ProviderError> {
        google_auth::consent_url(&self.config).map_err(auth_error)
    }

    async fn exchange_code(&self, code: &str, state: &str) -> Result<TokenGrant, ProviderError> {
        google_auth::exchange_code(&self.config, code, state)
            .await
            .map_err(auth_error)
    }

    async fn user_info(&self, access_token: &str) -> Result<UserInfo, ProviderError> {
        google_auth::user_info(&self.http, access_token)
            .await
            .map_err(|e| match e {
                UserInfoError::Unauthorized(msg) => ProviderError::Auth(msg),
                UserInfoError::Other(e) => request_error(e),
            })
    }

    async fn insert_event(
        &self,
        credentials: &Credentials,
        event: &CalendarEvent,
    ) -> Result<(), ProviderError> {
        let client = google_auth::client(
            &self.config,
            &credentials.access_token,
            &credentials.refresh_token,
        );

        let google_event = event.to_google();

        let client = &client;
        let body = &google_event;
        let response = with_refresh(
            move || async move {
                client
                    .events()
                    .insert(CALENDAR_ID, 0, 0, false, SendUpdates::None, false, body)
                    .await
            },
            move || refresh(client),
            is_unauthorized,
        )
        .await
        .map_err(|e| {
            calendar_error(e, &format!("Failed to create event: {}", google_event.summary))
        })?;

        debug!(id = %response.body.id, summary = %google_event.summary, "Created event");

        Ok(())
    }

    async fn list_events(
        &self,
        credentials: &Credentials,
        window: &EventWindow,
    ) -> Result<Vec<serde_json::Value>, ProviderError> {
        let client = google_auth::client(
            &self.config,
            &credentials.access_token,
            &credentials.refresh_token,
        );

        let time_min = window.from.to_rfc3339();
        let time_max = window.to.to_rfc3339();

        let client = &client;
        let (time_min, time_max) = (&time_min, &time_max);
        let response = with_refresh(
            move || async move {
                client
                    .events()
                    .list_all(
                        CALENDAR_ID,
                        "",
                        0,
                        OrderBy::StartTime,
                        &[],
                        "", // search query
                        &[],
                        false,
                        false,
                        true, // expand recurring events
                        time_max,
                        time_min,
                        "",
                        "",
                    )
                    .await
            },
            move || refresh(client),
            is_unauthorized,
        )
        .await
        .map_err(|e| calendar_error(e, "Failed to fetch events"))?;

        response
            .body
            .into_iter()
            .map(|event| {
                serde_json::to_value(event)
                    .map_err(|e| ProviderError::UnexpectedResponse(e.to_string()))
            })
            .collect()
    }
}
