//! Best-effort recovery of the user a mode change applies to.
//!
//! Some networks deliver mode changes (typically `-o`/`-v` after a user has
//! already left) without ident or host for the affected user. The target
//! nickname is still present in the mode text, so it can be looked up in the
//! channel's member list.

use once_cell::sync::Lazy;
use regex::Regex;

use churnguard_core::UserIdentity;

/// A sign, one mode letter, whitespace, then the target name.
static MODE_TARGET_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[+-][[:alpha:]]\s+(\w+)").unwrap());

/// Extract the target nickname from a mode description such as `+o alice`.
pub fn parse_mode_target(mode: &str) -> Option<&str> {
    MODE_TARGET_PATTERN
        .captures(mode)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Resolve the mode target against `members`. Only a member with a complete
/// identity counts as recovered.
pub fn recover_mode_target(mode: &str, members: &[UserIdentity]) -> Option<UserIdentity> {
    let nick = parse_mode_target(mode)?;
    members
        .iter()
        .find(|member| member.nick == nick)
        .filter(|member| member.is_complete())
        .cloned()
}
