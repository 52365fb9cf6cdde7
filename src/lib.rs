//! ticketd - help-desk ticketing server.
//!
//! Clients submit support tickets; administrators log in to triage,
//! close, and delete them; open dashboards get live updates over SSE.

pub mod auth;
pub mod config;
pub mod error;
pub mod notify;
pub mod server;
pub mod store;

pub use config::Config;
pub use error::ApiError;
