//! Lecturer directory endpoint

use axum::{
    Json, Router,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::info;

use crate::middleware::ClientAddr;
use crate::routes::lookup::LecturerQuery;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/lecturers", get(lecturers))
}

/// GET /api/lecturers?gv= - One directory entry, or the full directory
async fn lecturers(
    State(state): State<AppState>,
    client: ClientAddr,
    Query(query): Query<LecturerQuery>,
) -> Response {
    match query.gv {
        Some(name) => {
            info!(%client, gv = %name, "Lecturer lookup");
            Json(state.reference.lecturer_info(&name)).into_response()
        }
        None => {
            info!(%client, "Lecturer directory");
            Json(state.reference.lecturers().to_vec()).into_response()
        }
    }
}
