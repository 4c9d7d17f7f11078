//! Event channel between the embedded content and the host.
//!
//! - Inbound: raw tagged messages are decoded into [`Event`]s and handed to
//!   every registered listener, in registration order
//! - Outbound: [`Command`](models::Command)s become scripts evaluated in the
//!   page (see [`outbound`]); delivery is not acknowledged

pub mod listeners;
pub mod outbound;

pub use listeners::{EventListener, ListenerId};

use listeners::ListenerRegistry;

use models::Event;

use std::sync::Arc;

use log::{debug, warn};

#[derive(Default)]
pub struct EventChannel {
    listeners: ListenerRegistry,
}

impl EventChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener. Registering the same `Arc` twice returns the first id.
    pub fn register(&self, listener: Arc<dyn EventListener>) -> ListenerId {
        self.listeners.insert(listener)
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unregister(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Decode a raw content message.
    ///
    /// Malformed messages are logged and dropped; they never reach listeners.
    pub fn decode(&self, raw: &str) -> Option<Event> {
        match Event::decode(raw) {
            Ok(event) => {
                debug!("Received {} event from content", event.kind());
                Some(event)
            }
            Err(e) => {
                warn!("Dropping malformed content message: {}", e);
                None
            }
        }
    }

    /// Deliver `event` to every listener registered at the time of the call.
    pub fn dispatch(&self, event: &Event) {
        // Snapshot so listeners may (un)register from inside on_event.
        for listener in self.listeners.snapshot() {
            listener.on_event(event);
        }
    }

    /// Decode and dispatch. Returns the event if it was delivered.
    pub fn receive(&self, raw: &str) -> Option<Event> {
        let event = self.decode(raw)?;
        self.dispatch(&event);
        Some(event)
    }
}
