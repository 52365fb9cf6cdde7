//! In-memory cookie sessions.
//!
//! Admin and client logins are independent domains: each gets its own
//! `SessionTable` and its own cookie, so one browser can hold both
//! identities at once.

use std::collections::HashMap;
use std::sync::Mutex;

use rand::RngCore;

/// Cookie name carrying the admin session token.
pub const ADMIN_COOKIE: &str = "ticketd_admin";

/// Cookie name carrying the client session token.
pub const CLIENT_COOKIE: &str = "ticketd_client";

/// One role's token → username map.
#[derive(Debug, Default)]
pub struct SessionTable {
    sessions: Mutex<HashMap<String, String>>,
}

impl SessionTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a session for `username`, returning the new token.
    pub fn start(&self, username: &str) -> String {
        let token = new_token();
        self.sessions
            .lock()
            .expect("session table lock poisoned")
            .insert(token.clone(), username.to_string());
        token
    }

    /// Resolves a token to its username, if the session exists.
    pub fn resolve(&self, token: &str) -> Option<String> {
        self.sessions
            .lock()
            .expect("session table lock poisoned")
            .get(token)
            .cloned()
    }

    /// Drops a session. Safe to call with an unknown token.
    pub fn end(&self, token: &str) {
        self.sessions
            .lock()
            .expect("session table lock poisoned")
            .remove(token);
    }
}

/// Generates a 32-byte random token, hex-encoded.
fn new_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
