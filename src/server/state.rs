//! Shared application state for the HTTP server.

use std::sync::{Arc, Mutex};

use crate::auth::SessionTable;
use crate::config::Config;
use crate::error::ApiError;
use crate::notify::TicketHub;
use crate::store::TicketStore;

/// Application state shared across all handlers.
///
/// The store sits behind a std `Mutex`: every mutation holds the lock
/// across the in-memory change and the synchronous file write, so no
/// request observes a ticket state that was never persisted. The lock is
/// never held across an await point.
pub struct AppState {
    /// Runtime configuration.
    pub config: Config,

    /// The authoritative ticket collection.
    pub store: Mutex<TicketStore>,

    /// Admin session table (cookie `ticketd_admin`).
    pub admin_sessions: SessionTable,

    /// Client session table (cookie `ticketd_client`).
    pub client_sessions: SessionTable,

    /// Fan-out hub for dashboard push events.
    pub hub: Arc<TicketHub>,
}

impl AppState {
    /// Builds the state from configuration, opening the ticket store.
    pub fn new(config: Config) -> Result<Arc<Self>, crate::store::StoreError> {
        let store = TicketStore::open(config.tickets_path())?;

        Ok(Arc::new(Self {
            config,
            store: Mutex::new(store),
            admin_sessions: SessionTable::new(),
            client_sessions: SessionTable::new(),
            hub: TicketHub::new(),
        }))
    }

    /// Locks the ticket store for one synchronous operation.
    pub fn store(&self) -> Result<std::sync::MutexGuard<'_, TicketStore>, ApiError> {
        self.store
            .lock()
            .map_err(|_| ApiError::Internal("ticket store lock poisoned".into()))
    }
}
