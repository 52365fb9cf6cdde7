//! Ticket storage module.
//!
//! Owns the authoritative ticket collection and its JSON backing file.
//! The file is rewritten on every mutation and reloaded on every read,
//! so external edits to it are always reflected.

pub mod ticket_store;
pub mod types;

pub use ticket_store::{StoreError, TicketStore};
pub use types::{SubmissionChannel, Ticket, TicketDraft, TicketStatus};
