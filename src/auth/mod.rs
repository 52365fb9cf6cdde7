//! Authentication and session module.
//!
//! Two independent identity domains (admin, client) with separate
//! credential files and separate session tables.

pub mod accounts;
pub mod sessions;

pub use accounts::{load_accounts, verify_login, Account};
pub use sessions::{SessionTable, ADMIN_COOKIE, CLIENT_COOKIE};
