//! Flat-file backed ticket store.
//!
//! The backing file is the source of truth: every read reloads it, every
//! mutation rewrites it wholesale before returning. That keeps the store
//! consistent with out-of-process edits to the file, at a cost that is
//! fine for help-desk ticket volumes.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::types::{SubmissionChannel, Ticket, TicketDraft, TicketStatus};
use chrono::Utc;
use thiserror::Error;

/// Errors from store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A required draft field was missing or blank.
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    /// No ticket with this id.
    #[error("no ticket with id {0}")]
    NotFound(u64),

    /// The backing file could not be read or written.
    #[error("ticket file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file exists but does not parse as a ticket array.
    #[error("ticket file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// The authoritative ticket collection.
///
/// Wrap in `Mutex<TicketStore>` for shared access; mutations must hold the
/// lock across the in-memory change and the file write so no other request
/// observes the gap between them.
#[derive(Debug)]
pub struct TicketStore {
    path: PathBuf,
    tickets: Vec<Ticket>,
}

impl TicketStore {
    /// Opens the store at `path`, loading existing tickets.
    ///
    /// A missing file is an empty store; it is created on first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let tickets = Self::load(&path)?;
        tracing::info!(path = ?path, count = tickets.len(), "Ticket store opened");
        Ok(Self { path, tickets })
    }

    fn load(path: &Path) -> Result<Vec<Ticket>, StoreError> {
        match fs::read_to_string(path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Re-reads the backing file so external edits become visible.
    fn reload(&mut self) -> Result<(), StoreError> {
        self.tickets = Self::load(&self.path)?;
        Ok(())
    }

    /// Rewrites the whole backing file from the in-memory collection.
    fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.tickets)?;
        let mut file = fs::File::create(&self.path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Next ticket id: max existing id + 1, or 1 for an empty store.
    fn next_id(&self) -> u64 {
        self.tickets.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    /// Validates a draft, assigns the next id, persists, returns the ticket.
    pub fn create(
        &mut self,
        draft: TicketDraft,
        channel: SubmissionChannel,
    ) -> Result<Ticket, StoreError> {
        if draft.name.trim().is_empty() {
            return Err(StoreError::MissingField("name"));
        }
        if draft.facility.trim().is_empty() {
            return Err(StoreError::MissingField("facility"));
        }
        if draft.message.trim().is_empty() {
            return Err(StoreError::MissingField("message"));
        }
        if channel == SubmissionChannel::ClientPortal
            && draft.client.as_deref().map_or(true, |c| c.trim().is_empty())
        {
            return Err(StoreError::MissingField("client"));
        }

        self.reload()?;

        let ticket = Ticket {
            id: self.next_id(),
            name: draft.name,
            facility: draft.facility,
            message: draft.message,
            client: draft.client,
            status: channel.initial_status(),
            timestamp: Utc::now(),
            updated_at: None,
        };

        self.tickets.push(ticket.clone());
        self.persist()?;

        tracing::info!(id = ticket.id, facility = %ticket.facility, "Ticket created");
        Ok(ticket)
    }

    /// Returns all tickets, freshly reloaded from the backing file.
    pub fn list(&mut self) -> Result<Vec<Ticket>, StoreError> {
        self.reload()?;
        Ok(self.tickets.clone())
    }

    /// Returns only the tickets owned by `client`.
    pub fn list_for_client(&mut self, client: &str) -> Result<Vec<Ticket>, StoreError> {
        self.reload()?;
        Ok(self
            .tickets
            .iter()
            .filter(|t| t.client.as_deref() == Some(client))
            .cloned()
            .collect())
    }

    /// Looks up a single ticket by id.
    pub fn get(&mut self, id: u64) -> Result<Ticket, StoreError> {
        self.reload()?;
        self.tickets
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    /// Sets a ticket's status and persists.
    pub fn update_status(
        &mut self,
        id: u64,
        status: TicketStatus,
    ) -> Result<Ticket, StoreError> {
        self.reload()?;
        let ticket = self
            .tickets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))?;

        ticket.status = status;
        ticket.updated_at = Some(Utc::now());
        let updated = ticket.clone();
        self.persist()?;

        tracing::info!(id, status = ?status, "Ticket status updated");
        Ok(updated)
    }

    /// Marks a ticket closed.
    pub fn close(&mut self, id: u64) -> Result<Ticket, StoreError> {
        self.update_status(id, TicketStatus::Closed)
    }

    /// Removes a ticket permanently and persists.
    pub fn delete(&mut self, id: u64) -> Result<(), StoreError> {
        self.reload()?;
        let index = self
            .tickets
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))?;

        self.tickets.remove(index);
        self.persist()?;

        tracing::info!(id, "Ticket deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn draft(name: &str, facility: &str, message: &str) -> TicketDraft {
        TicketDraft {
            name: name.into(),
            facility: facility.into(),
            message: message.into(),
            client: None,
        }
    }

    fn open_store(dir: &TempDir) -> TicketStore {
        TicketStore::open(dir.path().join("tickets.json")).unwrap()
    }

    #[test]
    fn test_ids_increase_without_gaps() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        for expected in 1..=5 {
            let ticket = store
                .create(draft("A", "F", "M"), SubmissionChannel::Public)
                .unwrap();
            assert_eq!(ticket.id, expected);
        }
    }

    #[test]
    fn test_id_continues_after_delete() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        store.create(draft("A", "F", "M"), SubmissionChannel::Public).unwrap();
        let second = store
            .create(draft("B", "F", "M"), SubmissionChannel::Public)
            .unwrap();
        store.delete(1).unwrap();

        let third = store
            .create(draft("C", "F", "M"), SubmissionChannel::Public)
            .unwrap();
        assert_eq!(second.id, 2);
        assert_eq!(third.id, 3);
    }

    #[test]
    fn test_validation_rejects_blank_fields() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        let err = store
            .create(draft("", "F", "M"), SubmissionChannel::Public)
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingField("name")));

        let err = store
            .create(draft("A", "  ", "M"), SubmissionChannel::Public)
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingField("facility")));

        let err = store
            .create(draft("A", "F", "M"), SubmissionChannel::ClientPortal)
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingField("client")));

        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_list_tracks_external_writes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tickets.json");

        let mut store = TicketStore::open(&path).unwrap();
        store.create(draft("A", "F", "M"), SubmissionChannel::Public).unwrap();

        // A second store instance sharing the file mutates it out-of-process.
        let mut other = TicketStore::open(&path).unwrap();
        other.create(draft("B", "G", "N"), SubmissionChannel::Public).unwrap();

        let tickets = store.list().unwrap();
        assert_eq!(tickets.len(), 2);
        assert_eq!(tickets[1].id, 2);
    }

    #[test]
    fn test_update_status_sets_updated_at() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        let ticket = store
            .create(draft("A", "F", "M"), SubmissionChannel::Public)
            .unwrap();
        assert!(ticket.updated_at.is_none());

        let updated = store
            .update_status(ticket.id, TicketStatus::InProgress)
            .unwrap();
        assert_eq!(updated.status, TicketStatus::InProgress);
        assert!(updated.updated_at.is_some());

        let fetched = store.get(ticket.id).unwrap();
        assert_eq!(fetched.status, TicketStatus::InProgress);
    }

    #[test]
    fn test_close_marks_closed() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        store.create(draft("A", "F", "M"), SubmissionChannel::Public).unwrap();
        store.create(draft("B", "F", "M"), SubmissionChannel::Public).unwrap();
        store.close(1).unwrap();

        let tickets = store.list().unwrap();
        assert_eq!(tickets[0].status, TicketStatus::Closed);
        assert_eq!(tickets[1].status, TicketStatus::Open);
    }

    #[test]
    fn test_delete_missing_id_leaves_store_unchanged() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        store.create(draft("A", "F", "M"), SubmissionChannel::Public).unwrap();

        let err = store.delete(99).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(99)));
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn test_client_filter_only_returns_owned() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        let mut owned = draft("A", "F", "M");
        owned.client = Some("acme".into());
        store.create(owned, SubmissionChannel::ClientPortal).unwrap();

        let mut foreign = draft("B", "F", "M");
        foreign.client = Some("globex".into());
        store.create(foreign, SubmissionChannel::ClientPortal).unwrap();

        store.create(draft("C", "F", "M"), SubmissionChannel::Public).unwrap();

        let tickets = store.list_for_client("acme").unwrap();
        assert_eq!(tickets.len(), 1);
        assert!(tickets.iter().all(|t| t.client.as_deref() == Some("acme")));
    }

    #[test]
    fn test_portal_channel_starts_in_triage() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        let mut portal = draft("A", "F", "M");
        portal.client = Some("acme".into());
        let ticket = store
            .create(portal, SubmissionChannel::ClientPortal)
            .unwrap();
        assert_eq!(ticket.status, TicketStatus::ToBeRead);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tickets.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            TicketStore::open(&path),
            Err(StoreError::Corrupt(_))
        ));
    }
}
