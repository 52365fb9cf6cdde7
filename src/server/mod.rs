//! HTTP server module for the ticket API and SSE endpoint.
//!
//! Wires the session gate, ticket store, and notification hub into one
//! axum router.

pub mod extract;
pub mod routes;
pub mod sse;
pub mod state;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::server::routes::{auth, health, tickets};
use crate::server::state::AppState;

/// Builds the full application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    // Credentialed CORS needs an exact origin; fall back to a permissive
    // layer only if the configured origin doesn't parse.
    let cors = match HeaderValue::from_str(&state.config.allowed_origin) {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]),
        Err(_) => {
            tracing::warn!(
                origin = %state.config.allowed_origin,
                "Invalid allowed origin, CORS will reject cross-origin requests"
            );
            CorsLayer::new()
        }
    };

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Sessions
        .route("/api/login", post(auth::admin_login))
        .route("/api/client-login", post(auth::client_login))
        .route("/api/logout", post(auth::admin_logout))
        .route("/api/client-logout", post(auth::client_logout))
        .route("/api/admin-me", get(auth::admin_me))
        .route("/api/me", get(auth::client_me))
        // Tickets
        .route("/api/tickets", get(tickets::list_tickets).post(tickets::submit_ticket))
        .route("/api/client-tickets", get(tickets::list_client_tickets))
        .route("/api/client-submit", post(tickets::submit_client_ticket))
        .route("/api/tickets/close", post(tickets::close_ticket))
        .route("/api/tickets/update-status", post(tickets::update_ticket_status))
        .route("/api/tickets/delete", post(tickets::delete_ticket))
        // Push events
        .route("/events", get(sse::events_handler))
        .layer(cors)
        .with_state(state)
}

/// Runs the server until ctrl-c.
pub async fn run_server(state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let addr = state.config.bind_addr();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
