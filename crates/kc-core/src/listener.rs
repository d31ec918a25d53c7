//! Event listeners.
//!
//! Authenticators hand finished events to an [`EventListener`]. The
//! listener decides where they go (audit store, log pipeline, test
//! buffer).

use std::fmt::Debug;

use parking_lot::RwLock;

use crate::event::Event;

/// Receives security events produced during authentication.
pub trait EventListener: Send + Sync + Debug {
    /// Handles a finished event.
    fn on_event(&self, event: Event);
}

/// In-memory event listener, mostly useful in tests.
#[derive(Debug, Default)]
pub struct InMemoryEventListener {
    events: RwLock<Vec<Event>>,
}

impl InMemoryEventListener {
    /// Creates a new in-memory listener.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all received events.
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.events.read().clone()
    }

    /// Returns received events carrying the given error code.
    #[must_use]
    pub fn errors(&self, error: &str) -> Vec<Event> {
        self.events
            .read()
            .iter()
            .filter(|e| e.error.as_deref() == Some(error))
            .cloned()
            .collect()
    }

    /// Clears all received events.
    pub fn clear(&self) {
        self.events.write().clear();
    }
}

impl EventListener for InMemoryEventListener {
    fn on_event(&self, event: Event) {
        self.events.write().push(event);
    }
}

/// Event listener that writes to the tracing framework.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventListener;

impl TracingEventListener {
    /// Creates a new tracing listener.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl EventListener for TracingEventListener {
    fn on_event(&self, event: Event) {
        tracing::info!(
            event_id = %event.id,
            event_type = ?event.event_type,
            outcome = ?event.outcome,
            realm_id = ?event.realm_id,
            user_id = ?event.user_id,
            client_id = ?event.client_id,
            ip_address = ?event.ip_address,
            error = ?event.error,
            "login_event"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{errors, EventType};

    #[test]
    fn in_memory_listener_collects_events() {
        let listener = InMemoryEventListener::new();

        listener.on_event(Event::builder(EventType::Login).build());
        listener.on_event(
            Event::builder(EventType::LoginError)
                .failure(errors::USER_NOT_FOUND)
                .build(),
        );

        assert_eq!(listener.events().len(), 2);
        assert_eq!(listener.errors(errors::USER_NOT_FOUND).len(), 1);
        assert!(listener.errors(errors::USER_DISABLED).is_empty());

        listener.clear();
        assert!(listener.events().is_empty());
    }
}
