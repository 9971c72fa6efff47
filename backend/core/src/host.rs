use crate::identity::UserIdentity;

/// Read-only view of the client's connection state, supplied by the host.
///
/// Implementations must answer from memory; the decision rules call these
/// while handling a single event and expect no I/O.
pub trait HostView {
    /// Channels the client is currently joined to on `network`.
    fn joined_channels(&self, network: &str) -> Vec<String>;

    /// Current members of `channel` on `network`.
    fn channel_members(&self, network: &str, channel: &str) -> Vec<UserIdentity>;
}

/// A host with no channels and no members.
impl HostView for () {
    fn joined_channels(&self, _network: &str) -> Vec<String> {
        Vec::new()
    }

    fn channel_members(&self, _network: &str, _channel: &str) -> Vec<UserIdentity> {
        Vec::new()
    }
}

impl<T: HostView + ?Sized> HostView for &T {
    fn joined_channels(&self, network: &str) -> Vec<String> {
        (**self).joined_channels(network)
    }

    fn channel_members(&self, network: &str, channel: &str) -> Vec<UserIdentity> {
        (**self).channel_members(network, channel)
    }
}
