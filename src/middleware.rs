//! Request guards and extractors.

use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;

use axum::Json;
use axum::extract::{ConnectInfo, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use lecsched_core::Credentials;

use crate::routes::ErrorResponse;

pub const REFRESH_TOKEN_HEADER: &str = "x-refresh-token";

/// Caller didn't present both tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: "Access token and refresh token are required".to_string(),
        });
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

/// Resolve OAuth tokens from `access_token`/`refresh_token` query parameters,
/// or from `Authorization: Bearer <access>` plus `X-Refresh-Token: <refresh>`.
///
/// The two sources aren't mixed: a pair must come entirely from one of them.
pub fn authorize(parts: &Parts) -> Result<Credentials, AuthRejection> {
    from_query(parts)
        .or_else(|| from_headers(&parts.headers))
        .ok_or(AuthRejection)
}

fn from_query(parts: &Parts) -> Option<Credentials> {
    let Query(params) = Query::<HashMap<String, String>>::try_from_uri(&parts.uri).ok()?;
    credentials(params.get("access_token")?, params.get("refresh_token")?)
}

fn from_headers(headers: &HeaderMap) -> Option<Credentials> {
    let access = headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?;
    let refresh = headers.get(REFRESH_TOKEN_HEADER)?.to_str().ok()?;
    credentials(access, refresh)
}

fn credentials(access: &str, refresh: &str) -> Option<Credentials> {
    let (access, refresh) = (access.trim(), refresh.trim());
    if access.is_empty() || refresh.is_empty() {
        return None;
    }
    Some(Credentials {
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
    })
}

/// Middleware: attach `Credentials` to the request or reject with 401.
pub async fn require_tokens(request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();

    match authorize(&parts) {
        Ok(credentials) => {
            parts.extensions.insert(credentials);
            next.run(Request::from_parts(parts, body)).await
        }
        Err(rejection) => {
            tracing::warn!(path = %parts.uri.path(), "Rejected request without tokens");
            rejection.into_response()
        }
    }
}

/// Best-effort client address for request logs.
///
/// `CF-Connecting-IP`, then the last hop of `X-Forwarded-For`, then the
/// socket peer, else `untrackable`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAddr(pub String);

impl std::fmt::Display for ClientAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl ClientAddr {
    pub fn from_parts(parts: &Parts) -> Self {
        let forwarded = ["cf-connecting-ip", "x-forwarded-for"]
            .iter()
            .find_map(|name| last_token(parts.headers.get(*name)?.to_str().ok()?));

        let addr = forwarded.or_else(|| {
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        });

        ClientAddr(addr.unwrap_or_else(|| "untrackable".to_string()))
    }
}

fn last_token(value: &str) -> Option<String> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .last()
        .map(String::from)
}

impl<S: Send + Sync> FromRequestParts<S> for ClientAddr {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientAddr::from_parts(parts))
    }
}
