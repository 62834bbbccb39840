//! Domain events module.
//!
//! Services emit these only after the backing store has confirmed a mutation.
//! Runtime adapters implement the sink to react to them.

mod domain_event;
mod sink;

pub use domain_event::*;
pub use sink::*;
