//! Domain events runtime bridge for the web server.
//!
//! Receives domain events via `DomainEventSink`, debounces them, and logs one
//! coalesced change set per batch.

mod planner;
mod queue_worker;
mod sink;

pub use planner::{plan_batch, ChangeSet};
pub use sink::WebDomainEventSink;
