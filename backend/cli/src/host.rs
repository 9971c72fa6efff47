use std::collections::BTreeMap;

use churnguard_core::{ChannelEvent, HostView, UserIdentity};

type Members = Vec<UserIdentity>;

/// Connection state rebuilt from the event stream itself.
///
/// The client is taken to be in every channel it has seen an event for, and
/// channel membership follows the replayed joins, parts, quits and nick
/// changes. Users seen talking are added even without a join, since they were
/// present before the log started.
#[derive(Debug, Default)]
pub struct SimulatedHost {
    networks: BTreeMap<String, BTreeMap<String, Members>>,
}

impl SimulatedHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the simulated state after an event has been decided on.
    pub fn observe(&mut self, event: &ChannelEvent) {
        match event {
            ChannelEvent::Message { network, channel, user, .. }
            | ChannelEvent::Join { network, channel, user } => {
                let members = self.channel_mut(network, channel);
                match members.iter_mut().find(|m| m.nick == user.nick) {
                    Some(existing) if user.is_complete() => *existing = user.clone(),
                    Some(_) => {}
                    None => members.push(user.clone()),
                }
            }
            ChannelEvent::Part { network, channel, user, .. } => {
                self.channel_mut(network, channel).retain(|m| m.nick != user.nick);
            }
            ChannelEvent::Quit { network, user, .. } => {
                for members in self.networks.entry(network.clone()).or_default().values_mut() {
                    members.retain(|m| m.nick != user.nick);
                }
            }
            ChannelEvent::NickChange { network, user, new_nick } => {
                for members in self.networks.entry(network.clone()).or_default().values_mut() {
                    for member in members.iter_mut().filter(|m| m.nick == user.nick) {
                        member.nick = new_nick.clone();
                    }
                }
            }
            ChannelEvent::ModeChange { network, channel, .. } => {
                self.channel_mut(network, channel);
            }
        }
    }

    fn channel_mut(&mut self, network: &str, channel: &str) -> &mut Members {
        self.networks
            .entry(network.to_string())
            .or_default()
            .entry(channel.to_string())
            .or_default()
    }
}

impl HostView for SimulatedHost {
    fn joined_channels(&self, network: &str) -> Vec<String> {
        self.networks
            .get(network)
            .map(|channels| channels.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn channel_members(&self, network: &str, channel: &str) -> Vec<UserIdentity> {
        self.networks
            .get(network)
            .and_then(|channels| channels.get(channel))
            .cloned()
            .unwrap_or_default()
    }
}
