//! Per-event suppression rules.
//!
//! Each rule computes the activity key for the event, consults the store and
//! returns a [`Verdict`]. Only joins and messages mutate the store; nothing
//! here removes records.

use chrono::{DateTime, Utc};
use tracing::debug;

use churnguard_activity::ActivityStore;
use churnguard_core::{ActivityKey, ChannelEvent, HostView, NetworkClassifier, UserIdentity, Verdict};

use crate::annotate::AnnotationStyle;
use crate::mode_target::recover_mode_target;

/// The presence filter: activity store plus the rules that read and update it.
#[derive(Debug, Default)]
pub struct EventPolicy {
    store: ActivityStore,
    classifier: NetworkClassifier,
    annotation: AnnotationStyle,
}

impl EventPolicy {
    pub fn new(classifier: NetworkClassifier, annotation: AnnotationStyle) -> Self {
        Self { store: ActivityStore::new(), classifier, annotation }
    }

    pub fn store(&self) -> &ActivityStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ActivityStore {
        &mut self.store
    }

    /// Dispatch `event` to its rule.
    pub fn handle<H: HostView + ?Sized>(&mut self, event: &ChannelEvent, host: &H, now: DateTime<Utc>) -> Verdict {
        match event {
            ChannelEvent::Message { network, channel, user, text } => {
                self.on_message(network, channel, user, text, now)
            }
            ChannelEvent::Join { network, channel, user } => self.on_join(network, channel, user, now),
            ChannelEvent::Part { network, channel, user, .. } => self.on_part(network, channel, user, now),
            ChannelEvent::Quit { network, user, .. } => self.on_quit(network, user, host, now),
            ChannelEvent::NickChange { network, user, .. } => self.on_nick_change(network, user, host, now),
            ChannelEvent::ModeChange { network, channel, user, mode } => {
                self.on_mode_change(network, channel, user.as_ref(), mode, host, now)
            }
        }
    }

    /// Messages are never suppressed. The first message after a join gets the
    /// "logged in ... ago" note appended.
    pub fn on_message(
        &mut self,
        network: &str,
        channel: &str,
        user: &UserIdentity,
        text: &str,
        now: DateTime<Utc>,
    ) -> Verdict {
        let Some(key) = ActivityKey::for_user(network, channel, user) else {
            debug!("[Policy] message from {} ignored: identity incomplete", user.nick);
            return Verdict::pass();
        };

        let record = self.store.get_or_create_on_message(key, now);
        let verdict = if record.announced_join {
            Verdict::pass()
        } else {
            let age = record.time_since_join(now);
            record.announced_join = true;
            debug!("[Policy] {} returned after {} in {}", user.nick, age, channel);
            Verdict::rewrite(self.annotation.annotate(text, &age))
        };
        record.record_message(now);
        verdict
    }

    /// Joins are hidden unless the user was recently active in the channel.
    /// A first-time join is never shown.
    pub fn on_join(&mut self, network: &str, channel: &str, user: &UserIdentity, now: DateTime<Utc>) -> Verdict {
        let Some(key) = ActivityKey::for_user(network, channel, user) else {
            return Verdict::suppress();
        };

        let verdict = if self.store.recently_active(&key, now) {
            Verdict::pass()
        } else {
            Verdict::suppress()
        };
        self.store.get_or_create_on_join(key, now);
        debug!("[Policy] join {} {} -> {}", user.nick, channel, verdict);
        verdict
    }

    /// Parts are shown only for recently active users.
    pub fn on_part(&self, network: &str, channel: &str, user: &UserIdentity, now: DateTime<Utc>) -> Verdict {
        let active = ActivityKey::for_user(network, channel, user)
            .is_some_and(|key| self.store.recently_active(&key, now));
        let verdict = if active { Verdict::pass() } else { Verdict::suppress() };
        debug!("[Policy] part {} {} -> {}", user.nick, channel, verdict);
        verdict
    }

    pub fn on_quit<H: HostView + ?Sized>(
        &self,
        network: &str,
        user: &UserIdentity,
        host: &H,
        now: DateTime<Utc>,
    ) -> Verdict {
        self.on_server_scoped(network, user, host, now)
    }

    pub fn on_nick_change<H: HostView + ?Sized>(
        &self,
        network: &str,
        user: &UserIdentity,
        host: &H,
        now: DateTime<Utc>,
    ) -> Verdict {
        self.on_server_scoped(network, user, host, now)
    }

    /// Quit and nick events carry no channel: check every channel the client
    /// is in and show the event if the user is recently active in any of them.
    fn on_server_scoped<H: HostView + ?Sized>(
        &self,
        network: &str,
        user: &UserIdentity,
        host: &H,
        now: DateTime<Utc>,
    ) -> Verdict {
        if !user.is_complete() {
            return Verdict::suppress();
        }

        let active_in = host.joined_channels(network).into_iter().find(|channel| {
            ActivityKey::for_user(network, channel, user)
                .is_some_and(|key| self.store.recently_active(&key, now))
        });

        match active_in {
            Some(channel) => {
                debug!("[Policy] {} recently active in {}; showing", user.nick, channel);
                Verdict::pass()
            }
            None => Verdict::suppress(),
        }
    }

    /// Mode changes are hidden unless the affected user is recently active.
    ///
    /// When the host could not identify the user, the target is recovered
    /// from the mode text. If that fails the change is shown, except on
    /// identity-unreliable networks where it is hidden anyway.
    pub fn on_mode_change<H: HostView + ?Sized>(
        &self,
        network: &str,
        channel: &str,
        user: Option<&UserIdentity>,
        mode: &str,
        host: &H,
        now: DateTime<Utc>,
    ) -> Verdict {
        let recovered;
        let target = match user.filter(|u| u.is_complete()) {
            Some(user) => user,
            None => {
                let members = host.channel_members(network, channel);
                recovered = recover_mode_target(mode, &members);
                match recovered.as_ref() {
                    Some(user) => user,
                    None if self.classifier.is_identity_unreliable(network) => {
                        debug!("[Policy] mode '{}' on {}: target unknown, unreliable network", mode, channel);
                        return Verdict::suppress();
                    }
                    None => {
                        debug!("[Policy] mode '{}' on {}: target unknown, showing", mode, channel);
                        return Verdict::pass();
                    }
                }
            }
        };

        let active = ActivityKey::for_user(network, channel, target)
            .is_some_and(|key| self.store.recently_active(&key, now));
        if active { Verdict::pass() } else { Verdict::suppress() }
    }
}
