//! Authentication endpoints
//!
//! The server keeps no sessions: the callback hands the tokens back to the
//! caller, who presents them on every guarded request.

use axum::{
    Extension, Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    middleware as mw,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use lecsched_core::Credentials;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

use crate::middleware::require_tokens;
use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    let guarded = Router::new()
        .route("/api/auth/protected", get(protected))
        .route_layer(mw::from_fn(require_tokens));

    Router::new()
        .route("/api/auth", get(index))
        .route("/api/auth/", get(index))
        .route("/api/auth/login", get(login))
        .route("/api/auth/callback", get(callback))
        .route("/api/auth/logout", post(logout))
        .merge(guarded)
}

/// GET /api/auth/ - Landing page
async fn index() -> Html<&'static str> {
    Html("Welcome to the Auth API, <a href='/api/auth/login'>Login</a>")
}

/// GET /api/auth/login - 302 to the provider's consent screen
async fn login(State(state): State<AppState>) -> Result<Response, AppError> {
    let url = state.provider.consent_url()?;
    Ok((StatusCode::FOUND, [(header::LOCATION, url)]).into_response())
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    #[serde(default)]
    pub state: String,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CallbackResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub google_id: String,
    pub email: String,
    pub name: String,
}

/// GET /api/auth/callback?code=&state= - Exchange the code and return tokens plus identity
async fn callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Json<CallbackResponse>, AppError> {
    if let Some(error) = query.error {
        return Err(AppError::validation(format!("Authorization denied: {}", error)));
    }

    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::validation("Missing authorization code"))?;

    let tokens = state.provider.exchange_code(&code, &query.state).await?;
    let user = state.provider.user_info(&tokens.access_token).await?;

    info!(email = %user.email, "Signed in");

    Ok(Json(CallbackResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        google_id: user.id,
        email: user.email,
        name: user.name,
    }))
}

/// POST /api/auth/logout - Nothing to clear server-side
async fn logout() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// GET /api/auth/protected - Reachable only with tokens
async fn protected(Extension(_credentials): Extension<Credentials>) -> Json<Value> {
    Json(json!({ "message": "This is a protected route" }))
}
