//! Web domain event sink implementation.

use tokio::sync::mpsc;
use uangkita_core::events::{DomainEvent, DomainEventSink};

use super::queue_worker::event_queue_worker;

/// Domain event sink for the web server runtime.
///
/// Forwards events to a background worker that debounces and logs them.
pub struct WebDomainEventSink {
    tx: mpsc::UnboundedSender<DomainEvent>,
}

impl WebDomainEventSink {
    /// Creates the sink and spawns its worker on the current runtime.
    pub fn start() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(event_queue_worker(rx));
        Self { tx }
    }

    /// Creates a sink over an existing channel without spawning a worker.
    #[cfg(test)]
    pub fn with_sender(tx: mpsc::UnboundedSender<DomainEvent>) -> Self {
        Self { tx }
    }
}

impl DomainEventSink for WebDomainEventSink {
    fn emit(&self, event: DomainEvent) {
        if let Err(e) = self.tx.send(event) {
            tracing::warn!("Failed to emit domain event: {}", e);
        }
    }
}
