//! Role extractors.
//!
//! `AdminUser` and `ClientUser` resolve the matching session cookie
//! against the corresponding table. A missing or stale cookie rejects
//! with 403; no challenge is issued.

use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;

use crate::auth::{ADMIN_COOKIE, CLIENT_COOKIE};
use crate::error::ApiError;
use crate::server::state::AppState;

/// An authenticated admin identity.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub username: String,
}

/// An authenticated client identity.
#[derive(Debug, Clone)]
pub struct ClientUser {
    pub username: String,
}

fn resolve_session(
    parts: &Parts,
    table: &crate::auth::SessionTable,
    cookie_name: &str,
) -> Result<String, ApiError> {
    let jar = CookieJar::from_headers(&parts.headers);
    let token = jar.get(cookie_name).ok_or(ApiError::Forbidden)?.value();
    table.resolve(token).ok_or(ApiError::Forbidden)
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let username = resolve_session(parts, &state.admin_sessions, ADMIN_COOKIE)?;
        Ok(AdminUser { username })
    }
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for ClientUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let username = resolve_session(parts, &state.client_sessions, CLIENT_COOKIE)?;
        Ok(ClientUser { username })
    }
}
