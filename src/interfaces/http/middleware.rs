//! Session resolution and permission guards
//!
//! `session_middleware` runs on every `/api/v1` request and attaches a
//! [`CurrentSession`] (anonymous when there is no valid bearer token).
//! The guards read it back and reject with the mapped domain error.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::application::SessionService;
use crate::domain::{Permission, Session};
use crate::infrastructure::JsonUserRepository;
use crate::interfaces::http::common::api_error;

#[derive(Clone)]
pub struct SessionLayerState {
    pub sessions: Arc<SessionService<JsonUserRepository>>,
}

/// The caller's session for this request.
#[derive(Clone, Debug)]
pub struct CurrentSession {
    /// Registry key; `None` for anonymous callers
    pub session_id: Option<String>,
    pub session: Session,
}

impl CurrentSession {
    pub fn anonymous() -> Self {
        Self {
            session_id: None,
            session: Session::anonymous(),
        }
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

pub async fn session_middleware(
    State(state): State<SessionLayerState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let current = bearer_token(request.headers())
        .and_then(|token| state.sessions.resolve(token))
        .map(|resolved| CurrentSession {
            session_id: Some(resolved.session_id),
            session: resolved.session,
        })
        .unwrap_or_else(CurrentSession::anonymous);

    request.extensions_mut().insert(current);
    next.run(request).await
}

fn current_session(request: &Request<Body>) -> Session {
    request
        .extensions()
        .get::<CurrentSession>()
        .map(|c| c.session.clone())
        .unwrap_or_else(Session::anonymous)
}

/// 401 unless logged in.
pub async fn require_login(request: Request<Body>, next: Next) -> Response {
    match current_session(&request).require_login() {
        Ok(()) => next.run(request).await,
        Err(e) => api_error(e).into_response(),
    }
}

/// 401 unless logged in, 403 unless the session effectively holds the
/// permission given as layer state.
pub async fn require_permission(
    State(permission): State<Permission>,
    request: Request<Body>,
    next: Next,
) -> Response {
    match current_session(&request).require(permission) {
        Ok(()) => next.run(request).await,
        Err(e) => api_error(e).into_response(),
    }
}
