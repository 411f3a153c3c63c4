//! Frame composition for relayed messages and system announcements.
//!
//! Pure functions only, so the exact bytes every peer receives can be
//! tested without a transport.

use std::net::SocketAddr;

use super::DisplayName;

/// Prefix that turns a chat line into a name change request
pub const NAME_CHANGE_PREFIX: &str = "my name:";

/// Line terminator appended to relay frames and join announcements
pub const LINE_END: &str = "\r\n";

/// Extract the requested display name from a `my name:` line.
///
/// Returns everything after the prefix, untrimmed and possibly empty.
pub fn parse_name_change(body: &str) -> Option<&str> {
    body.strip_prefix(NAME_CHANGE_PREFIX)
}

/// Frame echoed back to the sender of a message
pub fn self_echo(name: &DisplayName, body: &str) -> String {
    format!("[self {}] sent: {}", name, body)
}

/// Frame delivered to every recipient other than the sender
pub fn relay(name: &DisplayName, body: &str) -> String {
    format!("[client {}] message {}{}", name, body, LINE_END)
}

/// System announcement for a newly established connection
pub fn join_announcement(remote_addr: SocketAddr, joined_at: &str) -> String {
    format!(
        "[system] new user {} joined at {}{}",
        remote_addr, joined_at, LINE_END
    )
}

/// System announcement for a closed connection
pub fn leave_announcement(name: &DisplayName) -> String {
    format!("client {} has left the chat room", name)
}
