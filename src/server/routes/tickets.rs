//! Ticket endpoints: submission, listing, and admin mutations.
//!
//! Every mutation runs authorize → mutate → notify, in that order. The
//! hub is only told about a change after the store has persisted it, so
//! dashboards never see a ticket state that failed to hit disk.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::notify::TicketEvent;
use crate::server::extract::{AdminUser, ClientUser};
use crate::server::state::AppState;
use crate::store::{SubmissionChannel, Ticket, TicketDraft, TicketStatus};

#[derive(Deserialize)]
pub struct TicketIdRequest {
    pub id: u64,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub id: u64,
    #[serde(default)]
    pub status: String,
}

// Validated by hand so an unknown status reports 400, not a body
// deserialization rejection.
fn parse_status(raw: &str) -> Result<TicketStatus, ApiError> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|_| ApiError::Validation(format!("Unknown status '{raw}'")))
}

/// GET /api/tickets - full ticket list, admin only.
pub async fn list_tickets(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Ticket>>, ApiError> {
    let tickets = state.store()?.list()?;
    Ok(Json(tickets))
}

/// GET /api/client-tickets - caller's own tickets.
pub async fn list_client_tickets(
    client: ClientUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Ticket>>, ApiError> {
    let tickets = state.store()?.list_for_client(&client.username)?;
    Ok(Json(tickets))
}

/// POST /api/tickets - anonymous public submission.
pub async fn submit_ticket(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<TicketDraft>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let ticket = state.store()?.create(draft, SubmissionChannel::Public)?;
    state
        .hub
        .publish(&TicketEvent::TicketCreated { ticket: ticket.clone() });

    Ok(Json(json!({
        "message": format!("Ticket #{} submitted!", ticket.id),
        "ticketId": ticket.id,
    })))
}

/// POST /api/client-submit - portal submission, owned by the session user.
pub async fn submit_client_ticket(
    client: ClientUser,
    State(state): State<Arc<AppState>>,
    Json(mut draft): Json<TicketDraft>,
) -> Result<Json<serde_json::Value>, ApiError> {
    draft.client = Some(client.username);

    let ticket = state
        .store()?
        .create(draft, SubmissionChannel::ClientPortal)?;
    state
        .hub
        .publish(&TicketEvent::TicketCreated { ticket: ticket.clone() });

    Ok(Json(json!({
        "message": format!("Ticket #{} submitted!", ticket.id),
        "ticketId": ticket.id,
    })))
}

/// POST /api/tickets/close - admin closes a ticket.
pub async fn close_ticket(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<TicketIdRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let ticket = state.store()?.close(req.id)?;
    state
        .hub
        .publish(&TicketEvent::TicketUpdated { ticket });

    Ok(Json(json!({ "message": format!("Ticket #{} closed.", req.id) })))
}

/// POST /api/tickets/update-status - admin sets any valid status.
pub async fn update_ticket_status(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let status = parse_status(&req.status)?;
    let ticket = state.store()?.update_status(req.id, status)?;
    state
        .hub
        .publish(&TicketEvent::TicketUpdated { ticket });

    Ok(Json(json!({ "message": format!("Ticket #{} updated.", req.id) })))
}

/// POST /api/tickets/delete - admin removes a ticket permanently.
pub async fn delete_ticket(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<TicketIdRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.store()?.delete(req.id)?;
    state.hub.publish(&TicketEvent::TicketDeleted { id: req.id });

    Ok(Json(json!({ "message": format!("Ticket #{} deleted.", req.id) })))
}
