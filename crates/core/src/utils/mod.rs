pub mod optimistic;
pub mod time_utils;
pub mod ttl_cache;

pub use optimistic::OptimisticState;
pub use ttl_cache::{Clock, ManualClock, SystemClock, TtlCache};
