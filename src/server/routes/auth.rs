//! Login, logout, and identity endpoints for both session domains.

use std::sync::Arc;

use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::{verify_login, ADMIN_COOKIE, CLIENT_COOKIE};
use crate::error::ApiError;
use crate::server::extract::{AdminUser, ClientUser};
use crate::server::state::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct WhoAmIResponse {
    pub username: String,
}

fn session_cookie(name: &'static str, token: String) -> Cookie<'static> {
    Cookie::build((name, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

// Removal must carry the same path as the original cookie.
fn expired_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, "")).path("/").build()
}

/// POST /api/login - admin login.
pub async fn admin_login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<serde_json::Value>), ApiError> {
    let path = state.config.admin_accounts_path();
    let username = match verify_login(&path, &req.username, &req.password) {
        Ok(username) => username,
        Err(e) => {
            tracing::warn!(username = %req.username, "Admin login failed");
            return Err(e);
        }
    };

    let token = state.admin_sessions.start(&username);
    tracing::info!(%username, "Admin login");

    Ok((
        jar.add(session_cookie(ADMIN_COOKIE, token)),
        Json(json!({ "message": "Login successful" })),
    ))
}

/// POST /api/client-login - client portal login.
pub async fn client_login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<serde_json::Value>), ApiError> {
    let path = state.config.client_accounts_path();
    let username = match verify_login(&path, &req.username, &req.password) {
        Ok(username) => username,
        Err(e) => {
            tracing::warn!(username = %req.username, "Client login failed");
            return Err(e);
        }
    };

    let token = state.client_sessions.start(&username);
    tracing::info!(%username, "Client login");

    Ok((
        jar.add(session_cookie(CLIENT_COOKIE, token)),
        Json(json!({ "message": "Login successful" })),
    ))
}

/// POST /api/logout - drop the admin session, if any.
pub async fn admin_logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<serde_json::Value>) {
    if let Some(cookie) = jar.get(ADMIN_COOKIE) {
        state.admin_sessions.end(cookie.value());
    }
    (
        jar.remove(expired_cookie(ADMIN_COOKIE)),
        Json(json!({ "message": "Logged out" })),
    )
}

/// POST /api/client-logout - drop the client session, if any.
pub async fn client_logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<serde_json::Value>) {
    if let Some(cookie) = jar.get(CLIENT_COOKIE) {
        state.client_sessions.end(cookie.value());
    }
    (
        jar.remove(expired_cookie(CLIENT_COOKIE)),
        Json(json!({ "message": "Logged out" })),
    )
}

/// GET /api/admin-me - admin identity, or 403.
pub async fn admin_me(admin: AdminUser) -> Json<WhoAmIResponse> {
    Json(WhoAmIResponse {
        username: admin.username,
    })
}

/// GET /api/me - client identity, or 403.
pub async fn client_me(client: ClientUser) -> Json<WhoAmIResponse> {
    Json(WhoAmIResponse {
        username: client.username,
    })
}
