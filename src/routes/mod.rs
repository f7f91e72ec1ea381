pub mod auth;
pub mod calendar;
pub mod home;
pub mod lecturers;
pub mod lookup;
pub mod subjects;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use lecsched_core::{ProviderError, ScheduleError};
use serde::Serialize;

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Handler error, mapped onto a status code by kind.
#[derive(Debug)]
pub enum AppError {
    /// Bad payload or query (400), or an unknown reference such as a period number (422)
    Schedule(ScheduleError),
    /// The external calendar service failed (502)
    Provider(ProviderError),
    /// Anything else (500)
    Internal(anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Schedule(ScheduleError::Validation(_)) => StatusCode::BAD_REQUEST,
            AppError::Schedule(ScheduleError::Lookup(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Schedule(ScheduleError::Data(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Provider(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Schedule(ScheduleError::Validation(msg.into()))
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Schedule(
                ScheduleError::Validation(msg) | ScheduleError::Lookup(msg) | ScheduleError::Data(msg),
            ) => f.write_str(msg),
            AppError::Provider(e) => write!(f, "{}", e),
            AppError::Internal(e) => write!(f, "{:#}", e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(%status, error = %self, "Request failed");
        } else {
            tracing::warn!(%status, error = %self, "Request rejected");
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        AppError::Schedule(err)
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::Provider(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::validation("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::from(ScheduleError::Lookup("unknown period 9".into())).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::from(ProviderError::Request("boom".into())).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::from(anyhow::anyhow!("oops")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
