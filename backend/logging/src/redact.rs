//! Hostmask Redaction
//!
//! Masks ident and host in `nick!ident@host` strings so that decision logs do
//! not retain users' addresses.

use regex::Regex;
use std::sync::LazyLock;

use churnguard_core::UserIdentity;

static HOSTMASK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^\s!@]+)![^\s@]+@[^\s]+").unwrap());

/// Redacts every hostmask in a string, keeping the nickname.
pub fn redact_hostmask(input: &str) -> String {
    HOSTMASK_RE.replace_all(input, "$1!*@[REDACTED]").to_string()
}

/// The identity as it should appear in logs.
pub fn redact_identity(user: &UserIdentity, redact: bool) -> String {
    if redact {
        redact_hostmask(&user.hostmask())
    } else {
        user.hostmask()
    }
}
