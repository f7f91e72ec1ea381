//! Subject catalog endpoint

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use tracing::info;

use crate::middleware::ClientAddr;
use crate::routes::ErrorResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/subjects", get(subjects))
}

#[derive(Debug, Default, Deserialize)]
pub struct SubjectQuery {
    #[serde(rename = "maMonHoc")]
    pub code: Option<String>,
}

/// GET /api/subjects?maMonHoc= - One catalog entry, or the whole catalog
async fn subjects(
    State(state): State<AppState>,
    client: ClientAddr,
    Query(query): Query<SubjectQuery>,
) -> Response {
    let Some(code) = query.code else {
        info!(%client, "Subject catalog");
        return Json(state.reference.catalog().to_vec()).into_response();
    };

    info!(%client, id = %code.trim(), "Subject lookup");

    match state.reference.catalog_entry(&code) {
        Some(entry) => Json(entry.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Subject not found".to_string(),
            }),
        )
            .into_response(),
    }
}
