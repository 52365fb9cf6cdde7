//! Ticket event fan-out.
//!
//! `TicketHub` keeps a registry of per-subscriber channels and broadcasts
//! every ticket event to all of them. A subscriber that disconnects is
//! pruned on the next publish, or immediately when its `Subscription` is
//! dropped; neither path disturbs delivery to the others.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::sync::mpsc;

use crate::store::Ticket;

/// A ticket state change, as pushed to dashboards.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TicketEvent {
    /// A new ticket was submitted.
    TicketCreated { ticket: Ticket },
    /// A ticket's status changed.
    TicketUpdated { ticket: Ticket },
    /// A ticket was removed.
    TicketDeleted { id: u64 },
}

/// Broadcast hub over the set of open dashboard connections.
#[derive(Debug, Default)]
pub struct TicketHub {
    inner: Mutex<HubInner>,
}

#[derive(Debug, Default)]
struct HubInner {
    next_id: u64,
    subscribers: HashMap<u64, mpsc::UnboundedSender<TicketEvent>>,
}

/// One subscriber's end of the hub.
///
/// Dropping the subscription deregisters it, so a closed connection
/// cleans up after itself.
pub struct Subscription {
    id: u64,
    hub: Arc<TicketHub>,
    receiver: mpsc::UnboundedReceiver<TicketEvent>,
}

impl Subscription {
    /// Receives the next event, or `None` once the hub is gone.
    pub async fn recv(&mut self) -> Option<TicketEvent> {
        self.receiver.recv().await
    }

    /// Non-blocking receive, for tests and draining.
    pub fn try_recv(&mut self) -> Option<TicketEvent> {
        self.receiver.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.hub.unsubscribe(self.id);
    }
}

impl TicketHub {
    /// Creates a hub with no subscribers.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers a new subscriber and returns its subscription handle.
    pub fn subscribe(self: &Arc<Self>) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = {
            let mut inner = self.inner.lock().expect("hub lock poisoned");
            inner.next_id += 1;
            let id = inner.next_id;
            inner.subscribers.insert(id, tx);
            id
        };

        tracing::info!(subscriber = id, total = self.subscriber_count(), "Dashboard subscribed");
        Subscription {
            id,
            hub: Arc::clone(self),
            receiver: rx,
        }
    }

    /// Removes a subscriber. Idempotent.
    pub fn unsubscribe(&self, id: u64) {
        let removed = {
            let mut inner = self.inner.lock().expect("hub lock poisoned");
            inner.subscribers.remove(&id).is_some()
        };
        if removed {
            tracing::info!(subscriber = id, total = self.subscriber_count(), "Dashboard unsubscribed");
        }
    }

    /// Delivers `event` to every currently registered subscriber.
    ///
    /// A subscriber whose receiver is gone is logged and pruned; the rest
    /// still get the event.
    pub fn publish(&self, event: &TicketEvent) {
        let mut inner = self.inner.lock().expect("hub lock poisoned");
        let before = inner.subscribers.len();

        inner.subscribers.retain(|id, tx| {
            if tx.send(event.clone()).is_ok() {
                true
            } else {
                tracing::debug!(subscriber = id, "Pruning dead subscriber");
                false
            }
        });

        tracing::debug!(
            delivered = inner.subscribers.len(),
            pruned = before - inner.subscribers.len(),
            "Ticket event broadcast"
        );
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().expect("hub lock poisoned").subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TicketStatus;
    use chrono::Utc;

    fn ticket(id: u64) -> Ticket {
        Ticket {
            id,
            name: "A".into(),
            facility: "F".into(),
            message: "M".into(),
            client: None,
            status: TicketStatus::Open,
            timestamp: Utc::now(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_delivers_to_subscribers_registered_before_publish() {
        let hub = TicketHub::new();
        let mut early = hub.subscribe();

        hub.publish(&TicketEvent::TicketCreated { ticket: ticket(1) });

        let mut late = hub.subscribe();

        assert!(matches!(
            early.try_recv(),
            Some(TicketEvent::TicketCreated { .. })
        ));
        assert!(late.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_disconnected_subscriber_does_not_block_others() {
        let hub = TicketHub::new();
        let dropped = hub.subscribe();
        let mut alive = hub.subscribe();

        drop(dropped);
        hub.publish(&TicketEvent::TicketDeleted { id: 7 });

        assert!(matches!(
            alive.try_recv(),
            Some(TicketEvent::TicketDeleted { id: 7 })
        ));
        assert_eq!(hub.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_events_arrive_in_publish_order() {
        let hub = TicketHub::new();
        let mut sub = hub.subscribe();

        for id in 1..=3 {
            hub.publish(&TicketEvent::TicketCreated { ticket: ticket(id) });
        }

        for expected in 1..=3 {
            match sub.recv().await {
                Some(TicketEvent::TicketCreated { ticket }) => assert_eq!(ticket.id, expected),
                other => panic!("unexpected event: {other:?}"),
            }
        }
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let hub = TicketHub::new();
        let sub = hub.subscribe();
        let id = sub.id;

        hub.unsubscribe(id);
        hub.unsubscribe(id);
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[test]
    fn test_event_wire_shape() {
        let event = TicketEvent::TicketUpdated { ticket: ticket(3) };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "ticket-updated");
        assert_eq!(json["ticket"]["id"], 3);

        let event = TicketEvent::TicketDeleted { id: 9 };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "ticket-deleted");
        assert_eq!(json["id"], 9);
    }
}
