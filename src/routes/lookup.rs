//! Schedule and lecturer lookup endpoints

use axum::{
    Json, Router,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use lecsched_core::{SubjectName, SubjectSchedule};
use serde::Deserialize;
use tracing::info;

use crate::middleware::ClientAddr;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api", get(search))
        .route("/api/info", get(lecturer_info))
        .route("/api/info/subject", get(subject_names))
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    /// Subject code
    pub id: Option<String>,
    /// Lecturer name
    pub gv: Option<String>,
}

/// GET /api?id=&gv= - Subjects by code and/or lecturer
async fn search(
    State(state): State<AppState>,
    client: ClientAddr,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<SubjectSchedule>> {
    info!(%client, id = ?query.id, gv = ?query.gv, "Schedule search");

    Json(state.reference.search(query.id.as_deref(), query.gv.as_deref()))
}

#[derive(Debug, Default, Deserialize)]
pub struct LecturerQuery {
    pub gv: Option<String>,
}

/// GET /api/info?gv= - One lecturer, or everyone who teaches a session
async fn lecturer_info(
    State(state): State<AppState>,
    client: ClientAddr,
    Query(query): Query<LecturerQuery>,
) -> Response {
    match query.gv {
        Some(name) => {
            info!(%client, gv = %name, "Lecturer info");
            Json(state.reference.lecturer_info(&name)).into_response()
        }
        None => {
            info!(%client, "Teaching staff");
            Json(state.reference.teaching_staff().to_vec()).into_response()
        }
    }
}

/// GET /api/info/subject - Code and name of every subject
async fn subject_names(State(state): State<AppState>, client: ClientAddr) -> Json<Vec<SubjectName>> {
    info!(%client, "Subject names");

    Json(state.reference.subject_names().to_vec())
}
