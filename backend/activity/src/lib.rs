//! Activity tracking for churnguard.
//!
//! Keeps one [`ActivityRecord`] per user per channel per network and answers
//! the two questions the presence filter asks: has this user talked recently,
//! and how long ago did they join.

pub mod elapsed;
pub mod record;
pub mod retention;
pub mod store;

pub use elapsed::format_elapsed;
pub use record::{ActivityRecord, RECENT_ACTIVITY_WINDOW_SECS};
pub use retention::{
    EvictionPolicy, KeepForever, RetentionHorizon, MAX_HORIZON_SECS, MAX_SWEEP_INTERVAL_SECS,
};
pub use store::ActivityStore;
