//! Structured logging for churnguard.
//!
//! Console plus rolling NDJSON file output, one structured record per filter
//! decision, and hostmask redaction for logged identities.

pub mod decision_logger;
pub mod logger;
pub mod redact;

pub use decision_logger::{DecisionLogEntry, DecisionLogger};
pub use logger::init_logger;
pub use redact::{redact_hostmask, redact_identity};
