//! The console-command allow-list.
//!
//! This client can reach a full server console, so everything it is willing
//! to transmit is pinned down here. A command passes only if it starts with
//! one of these literals (case-insensitive); nothing else ever reaches the
//! network.

/// Literal prefixes of every command this client will transmit.
pub const ALLOWED_COMMANDS: &[&str] =
  &["whitelist reload", "whitelist list", "save-all"];

/// Whether `command` matches the allow-list: an exact match or a
/// literal-prefix match of one of [`ALLOWED_COMMANDS`], ignoring ASCII case.
pub fn is_allowed(command: &str) -> bool {
  ALLOWED_COMMANDS.iter().any(|allowed| {
    command
      .get(..allowed.len())
      .is_some_and(|prefix| prefix.eq_ignore_ascii_case(allowed))
  })
}
