//! Live update events
//!
//! Provides the event definitions pushed to connected viewers and the
//! EventBus that fans them out.

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

use crate::models::{Claim, Item};

/// Item and claim change notifications
///
/// Each variant carries the full record as it stands after the change.
/// Serializes as the bare record so SSE `data:` frames match what the
/// read endpoints return.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LostFoundEvent {
    /// A new item was reported
    ItemAdded(Item),
    /// An existing item's status changed (or was re-applied)
    ItemUpdated(Item),
    /// A new claim was filed
    ClaimAdded(Claim),
    /// A claim received a decision
    ClaimUpdated(Claim),
}

impl LostFoundEvent {
    /// Wire name of the event, used as the SSE `event:` field
    pub fn event_type(&self) -> &'static str {
        match self {
            LostFoundEvent::ItemAdded(_) => "itemAdded",
            LostFoundEvent::ItemUpdated(_) => "itemUpdated",
            LostFoundEvent::ClaimAdded(_) => "claimAdded",
            LostFoundEvent::ClaimUpdated(_) => "claimUpdated",
        }
    }

    /// Identifier of the record this event is about
    pub fn record_id(&self) -> &str {
        match self {
            LostFoundEvent::ItemAdded(item) | LostFoundEvent::ItemUpdated(item) => &item.id,
            LostFoundEvent::ClaimAdded(claim) | LostFoundEvent::ClaimUpdated(claim) => &claim.id,
        }
    }
}

// ========================================
// EventBus Implementation
// ========================================

/// Fan-out channel for live updates
///
/// The EventBus uses tokio::broadcast internally, providing:
/// - Non-blocking publish (slow subscribers don't block producers)
/// - Multiple concurrent subscribers
/// - Automatic cleanup when subscribers drop
///
/// Delivery is at-most-once with no replay: a subscriber only sees events
/// published after it subscribed, and a subscriber that falls more than
/// `capacity` events behind skips the oldest ones.
///
/// # Examples
///
/// ```
/// use lostfound_common::events::EventBus;
///
/// let event_bus = EventBus::new(100);
/// let _rx = event_bus.subscribe();
/// assert_eq!(event_bus.subscriber_count(), 1);
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<LostFoundEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of events buffered per subscriber before the
    ///   oldest are dropped for that subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Register a new subscriber
    ///
    /// The subscription lasts as long as the returned receiver; dropping it
    /// unregisters the session.
    pub fn subscribe(&self) -> broadcast::Receiver<LostFoundEvent> {
        self.tx.subscribe()
    }

    /// Publish an event to every current subscriber
    ///
    /// Returns the number of subscribers the event was handed to. Having no
    /// subscribers is not an error; the event is simply dropped.
    pub fn publish(&self, event: LostFoundEvent) -> usize {
        let event_type = event.event_type();
        match self.tx.send(event) {
            Ok(count) => {
                debug!(event = event_type, subscribers = count, "Published event");
                count
            }
            Err(_) => {
                debug!(event = event_type, "No subscribers, event dropped");
                0
            }
        }
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
