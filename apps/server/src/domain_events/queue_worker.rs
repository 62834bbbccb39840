//! Background worker for domain event processing.
//!
//! Receives events from an mpsc channel, debounces them with a 500ms window,
//! and logs a coalesced change set per batch.

use std::time::Duration;

use tokio::sync::mpsc;
use uangkita_core::events::DomainEvent;

use super::planner::plan_batch;

const DEBOUNCE_DURATION: Duration = Duration::from_millis(500);

/// Runs until every sender is dropped, flushing the pending batch on shutdown.
pub async fn event_queue_worker(mut rx: mpsc::UnboundedReceiver<DomainEvent>) {
    tracing::info!("Domain event queue worker started");

    let mut pending_events: Vec<DomainEvent> = Vec::new();

    loop {
        if pending_events.is_empty() {
            match rx.recv().await {
                Some(event) => pending_events.push(event),
                None => break,
            }
            continue;
        }

        tokio::select! {
            event = rx.recv() => match event {
                Some(event) => pending_events.push(event),
                None => {
                    process_event_batch(&pending_events);
                    break;
                }
            },
            _ = tokio::time::sleep(DEBOUNCE_DURATION) => {
                let batch = std::mem::take(&mut pending_events);
                process_event_batch(&batch);
            }
        }
    }

    tracing::info!("Domain event queue worker shutting down");
}

fn process_event_batch(events: &[DomainEvent]) {
    let changes = plan_batch(events);
    if changes.is_empty() {
        return;
    }
    tracing::info!(
        events = events.len(),
        loans = changes.loan_ids.len(),
        transactions = changes.transaction_ids.len(),
        "Data changed"
    );
    tracing::debug!(
        "Changed loans {:?}, transactions {:?}",
        changes.loan_ids,
        changes.transaction_ids
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_worker_exits_when_senders_drop() {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(event_queue_worker(rx));

        tx.send(DomainEvent::loans_changed(vec!["loan-1".into()]))
            .unwrap();
        drop(tx);

        tokio::time::timeout(Duration::from_secs(2), worker)
            .await
            .expect("worker should stop")
            .unwrap();
    }
}
