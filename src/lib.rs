//! HTTP server for lecturer and subject schedules.
//!
//! Serves read-only lookups over the timetable and lecturer directory, and
//! exports a subject's weekly schedule to the caller's Google Calendar.

pub mod config;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use crate::config::ServerConfig;
pub use crate::state::AppState;

/// Build the application router with every route and layer attached.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::home::router())
        .merge(routes::lookup::router())
        .merge(routes::subjects::router())
        .merge(routes::lecturers::router())
        .merge(routes::auth::router())
        .merge(routes::calendar::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
