//! Calendar export endpoints

use axum::{
    Extension, Json, Router,
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    middleware as mw,
    response::{IntoResponse, Response},
    routing::get,
};
use lecsched_core::{CalendarEvent, Credentials, EventWindow, SubjectSchedule};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use crate::middleware::require_tokens;
use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/calendar", get(list_events).post(create_events))
        .route("/api/calendar/", get(list_events).post(create_events))
        .route_layer(mw::from_fn(require_tokens))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// GET /api/calendar?startDate=&endDate= - Events on the primary calendar
async fn list_events(
    State(state): State<AppState>,
    Extension(credentials): Extension<Credentials>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<Vec<Value>>, AppError> {
    let window = EventWindow::parse(query.start_date.as_deref(), query.end_date.as_deref())?;

    info!(from = %window.from, to = %window.to, "Listing calendar events");

    let events = state.provider.list_events(&credentials, &window).await?;
    Ok(Json(events))
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: String,
    pub event: Vec<CalendarEvent>,
}

#[derive(Debug, Serialize)]
pub struct FailedEvent {
    pub index: usize,
    pub summary: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct PartialFailureResponse {
    pub error: String,
    pub created: usize,
    pub failed: Vec<FailedEvent>,
    pub event: Vec<CalendarEvent>,
}

/// POST /api/calendar/ - Expand a subject schedule and insert every event
///
/// Each event is inserted independently. Failures don't stop the remaining
/// inserts and nothing already created is rolled back.
async fn create_events(
    State(state): State<AppState>,
    Extension(credentials): Extension<Credentials>,
    body: Bytes,
) -> Result<Response, AppError> {
    let subject = parse_payload(&body)?;
    let events = state.expander.expand(&subject)?;

    info!(
        subject = %subject.title(),
        events = events.len(),
        "Exporting schedule to calendar"
    );

    let mut failed = Vec::new();
    for (index, event) in events.iter().enumerate() {
        if let Err(e) = state.provider.insert_event(&credentials, event).await {
            error!(index, summary = %event.summary, error = %e, "Failed to create event");
            failed.push(FailedEvent {
                index,
                summary: event.summary.clone(),
                error: e.to_string(),
            });
        }
    }

    if failed.is_empty() {
        let body = CreatedResponse {
            message: "Events created successfully".to_string(),
            event: events,
        };
        return Ok((StatusCode::CREATED, Json(body)).into_response());
    }

    let body = PartialFailureResponse {
        error: format!("Failed to create {} of {} events", failed.len(), events.len()),
        created: events.len() - failed.len(),
        failed,
        event: events,
    };
    Ok((StatusCode::BAD_GATEWAY, Json(body)).into_response())
}

/// Empty bodies, `null` and `{}` all count as no payload.
fn parse_payload(body: &[u8]) -> Result<SubjectSchedule, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::validation("No payload provided"));
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::validation(format!("Invalid JSON payload: {}", e)))?;

    let empty = match &value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    };
    if empty {
        return Err(AppError::validation("No payload provided"));
    }

    serde_json::from_value(value)
        .map_err(|e| AppError::validation(format!("Invalid schedule payload: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lecsched_core::ScheduleError;

    fn message(result: Result<SubjectSchedule, AppError>) -> String {
        match result {
            Err(AppError::Schedule(ScheduleError::Validation(msg))) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_payload_empty() {
        assert_eq!(message(parse_payload(b"")), "No payload provided");
        assert_eq!(message(parse_payload(b"  \n")), "No payload provided");
        assert_eq!(message(parse_payload(b"null")), "No payload provided");
        assert_eq!(message(parse_payload(b"{}")), "No payload provided");
    }

    #[test]
    fn test_parse_payload_malformed() {
        assert!(message(parse_payload(b"{not json")).starts_with("Invalid JSON payload"));
        assert!(message(parse_payload(b"\"AS2009\"")).starts_with("Invalid schedule payload"));
    }

    #[test]
    fn test_parse_payload_ok() {
        let subject = parse_payload(br#"{"maMonHoc": "AS2009", "lichHoc": []}"#).unwrap();
        assert_eq!(subject.subject_code.as_deref(), Some("AS2009"));
    }
}
