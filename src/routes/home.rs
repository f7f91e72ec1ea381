//! Liveness and identity endpoints

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/about", get(about))
        .route("/health", get(health))
}

async fn home() -> &'static str {
    "Hello, World!"
}

async fn about() -> String {
    format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
