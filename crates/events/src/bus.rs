//! Event bus abstraction for user-facing notifications.
//!
//! The session reports saves, deletions, storage write failures and export
//! results through this trait instead of printing or panicking, so the same
//! core drives the CLI, tests, or any other front end.

use std::sync::{Arc, Mutex};

/// Sink for report notifications.
pub trait EventBus: Send + Sync {
    /// Deliver one notification. `topic` is one of the `event_names`
    /// constants and `payload` carries the title, description and
    /// event-specific fields.
    fn emit(&self, topic: &str, payload: serde_json::Value);
}

/// Bus shared between a session and whoever displays its notifications.
pub type EventBusRef = Arc<dyn EventBus>;

/// Keeps every notification a session emits, so tests can assert on
/// what a user would have been shown after a save, delete or export.
#[derive(Default)]
pub struct InMemoryEventBus {
    events: Mutex<Vec<EmittedEvent>>,
}

/// One notification held by [`InMemoryEventBus`].
#[derive(Debug, Clone)]
pub struct EmittedEvent {
    pub topic: String,
    pub payload: serde_json::Value,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications in emission order.
    pub fn events(&self) -> Vec<EmittedEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Notifications on `topic`, e.g. every `report:saved`.
    pub fn events_for(&self, topic: &str) -> Vec<EmittedEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.topic == topic)
            .cloned()
            .collect()
    }

    /// Forget everything emitted so far.
    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().unwrap().is_empty()
    }
}

impl EventBus for InMemoryEventBus {
    fn emit(&self, topic: &str, payload: serde_json::Value) {
        self.events.lock().unwrap().push(EmittedEvent {
            topic: topic.to_string(),
            payload,
        });
    }
}

/// Drops every notification. Backs `ReportSession::detached`.
pub struct NullEventBus;

impl EventBus for NullEventBus {
    fn emit(&self, _topic: &str, _payload: serde_json::Value) {}
}

/// Event bus that writes every event to the log.
///
/// Failure topics log at `warn`, everything else at `info`.
pub struct TracingEventBus;

impl EventBus for TracingEventBus {
    fn emit(&self, topic: &str, payload: serde_json::Value) {
        let title = payload.get("title").and_then(|v| v.as_str()).unwrap_or(topic);
        let description = payload
            .get("description")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        if topic.ends_with("failed") {
            tracing::warn!(topic, "{title}: {description}");
        } else {
            tracing::info!(topic, "{title}: {description}");
        }
    }
}
