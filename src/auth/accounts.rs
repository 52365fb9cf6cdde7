//! Credential files and login verification.
//!
//! Each role has its own JSON array of `{username, password}` records.
//! Files are re-read on every login attempt so account edits take effect
//! without a restart. Passwords are compared as exact strings; hashing
//! and lockout are out of scope for this service.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ApiError;

/// One credential record from an account file.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub username: String,
    pub password: String,
}

/// Reads the account file at `path`.
///
/// A missing or unparsable file is an internal error: without it no
/// login for that role can succeed.
pub fn load_accounts(path: &Path) -> Result<Vec<Account>, ApiError> {
    let raw = fs::read_to_string(path).map_err(|e| {
        tracing::error!(path = ?path, error = %e, "Account file missing or unreadable");
        ApiError::Internal("Account file missing".into())
    })?;

    serde_json::from_str(&raw).map_err(|e| {
        tracing::error!(path = ?path, error = %e, "Account file is not a valid account list");
        ApiError::Internal("Account file is invalid".into())
    })
}

/// Verifies a username/password pair against the account file at `path`.
///
/// Returns the canonical username on success, `InvalidCredentials` when
/// no record matches exactly.
pub fn verify_login(path: &Path, username: &str, password: &str) -> Result<String, ApiError> {
    let accounts = load_accounts(path)?;

    accounts
        .iter()
        .find(|a| a.username == username && a.password == password)
        .map(|a| a.username.clone())
        .ok_or(ApiError::InvalidCredentials)
}
