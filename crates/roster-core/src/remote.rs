//! The remote whitelist contract: full-snapshot file replacement plus a
//! restricted command channel.

use std::future::Future;

use crate::binding::WhitelistEntry;

/// Access to the game server's whitelist file and console, as exposed by the
/// hosting panel.
///
/// The component owns no state; it projects whatever it is given. Writes are
/// total overwrites, which makes them idempotent and lets the remote file
/// self-heal from drift on every sync.
pub trait WhitelistRemote: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch and parse the remote whitelist file. An empty or absent file is
  /// an empty list, not an error; unparseable non-empty content is an error
  /// distinct from a transport failure.
  fn read_snapshot(
    &self,
  ) -> impl Future<Output = Result<Vec<WhitelistEntry>, Self::Error>> + Send + '_;

  /// Replace the remote file's full contents with `entries`. Never an
  /// incremental patch.
  fn write_snapshot<'a>(
    &'a self,
    entries: &'a [WhitelistEntry],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Dispatch a console command to the remote process.
  ///
  /// Implementations must validate `command` against their allow-list before
  /// any network I/O and reject everything else locally.
  fn send_command<'a>(
    &'a self,
    command: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
