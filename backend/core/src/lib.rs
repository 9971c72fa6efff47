pub mod error;
pub mod event;
pub mod host;
pub mod identity;
pub mod network;
pub mod verdict;

pub use error::ChurnError;
pub use event::{ChannelEvent, EventKind, TimedEvent};
pub use host::HostView;
pub use identity::{ActivityKey, UserIdentity};
pub use network::{NetworkClassifier, DEFAULT_UNRELIABLE_PATTERN};
pub use verdict::Verdict;
