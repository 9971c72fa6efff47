use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::UserIdentity;

/// A presence or conversation event delivered by the chat client host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChannelEvent {
    /// A normal channel message.
    Message {
        network: String,
        channel: String,
        user: UserIdentity,
        text: String,
    },
    /// A user joined a channel.
    Join {
        network: String,
        channel: String,
        user: UserIdentity,
    },
    /// A user left a channel.
    Part {
        network: String,
        channel: String,
        user: UserIdentity,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    /// A user disconnected from the server. Not channel scoped.
    Quit {
        network: String,
        user: UserIdentity,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    /// A user changed nickname. Not channel scoped.
    NickChange {
        network: String,
        user: UserIdentity,
        new_nick: String,
    },
    /// A channel mode change such as `+o alice`.
    ///
    /// `user` is the affected user when the host could resolve one.
    ModeChange {
        network: String,
        channel: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        user: Option<UserIdentity>,
        mode: String,
    },
}

/// Discriminant of [`ChannelEvent`], used for logging and summaries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Message,
    Join,
    Part,
    Quit,
    NickChange,
    ModeChange,
}

impl ChannelEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Message { .. } => EventKind::Message,
            Self::Join { .. } => EventKind::Join,
            Self::Part { .. } => EventKind::Part,
            Self::Quit { .. } => EventKind::Quit,
            Self::NickChange { .. } => EventKind::NickChange,
            Self::ModeChange { .. } => EventKind::ModeChange,
        }
    }

    pub fn network(&self) -> &str {
        match self {
            Self::Message { network, .. }
            | Self::Join { network, .. }
            | Self::Part { network, .. }
            | Self::Quit { network, .. }
            | Self::NickChange { network, .. }
            | Self::ModeChange { network, .. } => network,
        }
    }

    /// The channel, or `None` for server-scoped events.
    pub fn channel(&self) -> Option<&str> {
        match self {
            Self::Message { channel, .. }
            | Self::Join { channel, .. }
            | Self::Part { channel, .. }
            | Self::ModeChange { channel, .. } => Some(channel),
            Self::Quit { .. } | Self::NickChange { .. } => None,
        }
    }

    /// The acting (or affected) user, if the host supplied one.
    pub fn user(&self) -> Option<&UserIdentity> {
        match self {
            Self::Message { user, .. }
            | Self::Join { user, .. }
            | Self::Part { user, .. }
            | Self::Quit { user, .. }
            | Self::NickChange { user, .. } => Some(user),
            Self::ModeChange { user, .. } => user.as_ref(),
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(String::from))
            .unwrap_or_else(|| format!("{:?}", self));
        write!(f, "{}", s)
    }
}

/// An event stamped with the time it was observed, as stored in replay logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedEvent {
    pub at: DateTime<Utc>,
    pub event: ChannelEvent,
}
