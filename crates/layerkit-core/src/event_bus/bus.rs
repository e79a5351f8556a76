//! Event Bus implementation.
//!
//! The bus an editor session owns and hands out by `Arc`. Handlers run on the
//! publishing thread, right after the command that caused the event; async
//! consumers take a broadcast receiver instead.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

use super::events::{EditorEvent, EventCategory};

/// Events buffered per broadcast receiver before it starts lagging.
pub const CHANNEL_CAPACITY: usize = 256;

/// Subscription handle for unsubscribing from events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// Filter to receive only specific events
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EventFilter {
    /// Receive all events.
    #[default]
    All,
    /// Receive events matching any of these categories.
    Categories(Vec<EventCategory>),
    /// Receive events about one page (layer, page and selection changes).
    Page(usize),
}

impl EventFilter {
    /// Check if an event matches this filter
    pub fn matches(&self, event: &EditorEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(&event.category()),
            EventFilter::Page(page) => event.page() == Some(*page),
        }
    }
}

type EventHandler = Arc<dyn Fn(EditorEvent) + Send + Sync>;

struct Subscription {
    id: SubscriptionId,
    filter: EventFilter,
    handler: EventHandler,
}

/// Event bus distributing editor events to subscribers
pub struct EventBus {
    sender: broadcast::Sender<EditorEvent>,
    /// Handlers in subscription order.
    subscriptions: RwLock<Vec<Subscription>>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            sender,
            subscriptions: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Publish an event to every matching handler, in subscription order,
    /// and to every broadcast receiver.
    ///
    /// Returns how many handlers and receivers got the event; zero when
    /// nobody is listening. Handlers may subscribe or unsubscribe while being
    /// called; such changes apply from the next event on.
    pub fn publish(&self, event: EditorEvent) -> usize {
        let matching: Vec<EventHandler> = self
            .subscriptions
            .read()
            .iter()
            .filter(|s| s.filter.matches(&event))
            .map(|s| Arc::clone(&s.handler))
            .collect();

        for handler in &matching {
            handler(event.clone());
        }

        let received = self.sender.send(event).unwrap_or(0);
        matching.len() + received
    }

    /// Subscribe to events with a synchronous handler
    ///
    /// The handler is called inside the command that caused the event, so it
    /// must return quickly.
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(EditorEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscriptions.write().push(Subscription {
            id,
            filter,
            handler: Arc::new(handler),
        });
        tracing::debug!("Subscription {} added", id);
        id
    }

    /// Get a receiver for consuming events in a tokio task.
    pub fn receiver(&self) -> broadcast::Receiver<EditorEvent> {
        self.sender.subscribe()
    }

    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = self.subscriptions.write();
        let before = subscriptions.len();
        subscriptions.retain(|s| s.id != id);
        let removed = subscriptions.len() != before;
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.read().len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .field("receivers", &self.sender.receiver_count())
            .finish()
    }
}
