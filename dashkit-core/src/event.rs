// dashkit-core/src/event.rs
use crossbeam::channel::{Receiver, Sender, unbounded};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A mutation applied to a [`crate::WidgetRegistry`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryChange {
    AreaRegistered { slug: String },
    AreaAssigned { area: String, context: String },
    WidgetRegistered { slug: String },
    WidgetAssigned { widget: String, area: String },
}

impl RegistryChange {
    pub fn topic(&self) -> &'static str {
        match self {
            RegistryChange::AreaRegistered { .. } => "areas.registered",
            RegistryChange::AreaAssigned { .. } => "areas.assigned",
            RegistryChange::WidgetRegistered { .. } => "widgets.registered",
            RegistryChange::WidgetAssigned { .. } => "widgets.assigned",
        }
    }
}

/// Event with topic and the change that produced it
#[derive(Debug, Clone)]
pub struct Event {
    pub topic: String,
    pub change: RegistryChange,
}

impl From<RegistryChange> for Event {
    fn from(change: RegistryChange) -> Self {
        Self {
            topic: change.topic().to_string(),
            change,
        }
    }
}

/// Subscription handle - dropping this unsubscribes
pub struct Subscription {
    id: usize,
    bus: Arc<EventBusInner>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.bus.subscriptions.write().remove(&self.id);
    }
}

struct EventBusInner {
    subscriptions: RwLock<HashMap<usize, (String, Sender<Event>)>>,
    next_id: AtomicUsize,
}

/// Topic-based pub/sub for registry changes
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<EventBusInner>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(EventBusInner {
                subscriptions: RwLock::new(HashMap::new()),
                next_id: AtomicUsize::new(0),
            }),
        }
    }

    /// Publish a change to all matching subscribers
    pub fn publish(&self, change: RegistryChange) {
        let event = Event::from(change);
        let subs = self.inner.subscriptions.read();

        for (pattern, tx) in subs.values() {
            if Self::topic_matches(&event.topic, pattern) {
                // Ignore send errors (subscriber dropped)
                let _ = tx.send(event.clone());
            }
        }
    }

    /// Subscribe to topics with wildcard support
    /// Returns (Subscription, Receiver) - drop Subscription to unsubscribe
    pub fn subscribe(&self, pattern: impl Into<String>) -> (Subscription, Receiver<Event>) {
        let (tx, rx) = unbounded();
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);

        self.inner
            .subscriptions
            .write()
            .insert(id, (pattern.into(), tx));

        let sub = Subscription {
            id,
            bus: self.inner.clone(),
        };

        (sub, rx)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscriptions.read().len()
    }

    /// Check if topic matches pattern (supports * wildcard)
    fn topic_matches(topic: &str, pattern: &str) -> bool {
        if topic == pattern {
            return true;
        }

        let topic_parts: Vec<&str> = topic.split('.').collect();
        let pattern_parts: Vec<&str> = pattern.split('.').collect();

        if pattern_parts.len() > topic_parts.len() {
            return false;
        }

        for (i, pattern_part) in pattern_parts.iter().enumerate() {
            if *pattern_part == "*" {
                // Trailing wildcard matches everything remaining
                if i == pattern_parts.len() - 1 {
                    return true;
                }
                continue;
            }

            if topic_parts[i] != *pattern_part {
                return false;
            }
        }

        pattern_parts.len() == topic_parts.len()
    }
}
