//! Data types for the ticket store.
//!
//! Defines the ticket record, its lifecycle status, and the draft
//! submitted by the public form or the client portal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A support ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique id, strictly increasing across the store's lifetime.
    pub id: u64,

    /// Name of the person reporting the issue.
    pub name: String,

    /// Facility the issue was reported from.
    pub facility: String,

    /// Free-form problem description.
    pub message: String,

    /// Owning client account. `None` for anonymous submissions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,

    /// Current lifecycle status.
    pub status: TicketStatus,

    /// Creation time.
    pub timestamp: DateTime<Utc>,

    /// Time of the last status change, if any.
    #[serde(
        default,
        rename = "updatedAt",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Ticket lifecycle status.
///
/// Status updates are validated against this enum; an unknown status
/// string is rejected at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TicketStatus {
    Open,
    ToBeRead,
    InProgress,
    Completed,
    Closed,
}

/// Which surface a ticket was submitted through.
///
/// Determines the initial status: the public form opens tickets
/// directly, portal submissions land in the triage queue first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionChannel {
    /// Anonymous public form.
    Public,
    /// Authenticated client portal.
    ClientPortal,
}

impl SubmissionChannel {
    /// Initial status for tickets submitted through this channel.
    pub fn initial_status(self) -> TicketStatus {
        match self {
            SubmissionChannel::Public => TicketStatus::Open,
            SubmissionChannel::ClientPortal => TicketStatus::ToBeRead,
        }
    }
}

/// Fields of a not-yet-created ticket, as submitted by a caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketDraft {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub facility: String,

    #[serde(default)]
    pub message: String,

    /// Set by the server from the session for portal submissions.
    #[serde(skip)]
    pub client: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_form() {
        let json = serde_json::to_string(&TicketStatus::ToBeRead).unwrap();
        assert_eq!(json, "\"to-be-read\"");

        let status: TicketStatus = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(status, TicketStatus::InProgress);

        assert!(serde_json::from_str::<TicketStatus>("\"bogus\"").is_err());
    }

    #[test]
    fn test_channel_initial_status() {
        assert_eq!(
            SubmissionChannel::Public.initial_status(),
            TicketStatus::Open
        );
        assert_eq!(
            SubmissionChannel::ClientPortal.initial_status(),
            TicketStatus::ToBeRead
        );
    }

    #[test]
    fn test_ticket_serialization() {
        let ticket = Ticket {
            id: 1,
            name: "Ana".into(),
            facility: "North Wing".into(),
            message: "Printer jam".into(),
            client: None,
            status: TicketStatus::Open,
            timestamp: Utc::now(),
            updated_at: None,
        };

        let json = serde_json::to_string(&ticket).unwrap();
        assert!(json.contains("\"status\":\"open\""));
        // Absent optionals stay off the wire
        assert!(!json.contains("client"));
        assert!(!json.contains("updatedAt"));
    }
}
