//! User identities and the activity key derived from them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The acting user of a channel event, as reported by the host.
///
/// `ident` and `host` are optional because several networks deliver events
/// before (or after) the server has told the client who the user really is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub nick: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ident: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

impl UserIdentity {
    pub fn new(nick: impl Into<String>, ident: impl Into<String>, host: impl Into<String>) -> Self {
        Self { nick: nick.into(), ident: Some(ident.into()), host: Some(host.into()) }
    }

    /// A user known only by nickname.
    pub fn nick_only(nick: impl Into<String>) -> Self {
        Self { nick: nick.into(), ident: None, host: None }
    }

    /// Ident if present and non-empty.
    pub fn ident(&self) -> Option<&str> {
        self.ident.as_deref().filter(|s| !s.is_empty())
    }

    /// Host if present and non-empty.
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref().filter(|s| !s.is_empty())
    }

    /// True when nick, ident and host are all known.
    pub fn is_complete(&self) -> bool {
        !self.nick.is_empty() && self.ident().is_some() && self.host().is_some()
    }

    /// `nick!ident@host`, with `*` standing in for unknown parts.
    pub fn hostmask(&self) -> String {
        format!(
            "{}!{}@{}",
            self.nick,
            self.ident().unwrap_or("*"),
            self.host().unwrap_or("*")
        )
    }
}

/// "This user in this channel on this network."
///
/// The single key shape used by every rule. Fields are compared verbatim:
/// no case folding or trimming, so `Example.org` and `example.org` hosts are
/// distinct users.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActivityKey {
    pub network: String,
    pub channel: String,
    pub ident: String,
    pub host: String,
}

impl ActivityKey {
    pub fn new(
        network: impl Into<String>,
        channel: impl Into<String>,
        ident: impl Into<String>,
        host: impl Into<String>,
    ) -> Self {
        Self {
            network: network.into(),
            channel: channel.into(),
            ident: ident.into(),
            host: host.into(),
        }
    }

    /// Build the key for `user` in `channel`, or `None` when the identity
    /// lacks an ident or host.
    pub fn for_user(network: &str, channel: &str, user: &UserIdentity) -> Option<Self> {
        if !user.is_complete() {
            return None;
        }
        Some(Self::new(network, channel, user.ident()?, user.host()?))
    }
}

impl fmt::Display for ActivityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}@{}", self.network, self.channel, self.ident, self.host)
    }
}
