//! Snapshot synchronisation: project the full binding set onto the remote
//! whitelist file.
//!
//! This is the only sanctioned way to mutate the remote file from the
//! registration workflow. Per-entry edits of the remote file would reintroduce
//! the lost-update race that full-snapshot writes eliminate.

use std::error::Error as StdError;

use thiserror::Error;

use crate::{
  binding::WhitelistEntry, remote::WhitelistRemote, store::BindingStore,
};

/// A sync failure, attributed to the side that failed.
#[derive(Debug, Error)]
pub enum SyncError<S: StdError, R: StdError> {
  #[error("reading bindings: {0}")]
  Store(S),
  #[error("pushing whitelist snapshot: {0}")]
  Remote(R),
}

/// Read every binding, project it to a whitelist entry, and overwrite the
/// remote file with the result.
///
/// Writing the same snapshot twice produces the same remote state, and a
/// snapshot write after out-of-band corruption restores the file to exactly
/// the store's projection.
pub async fn sync_from_store<S, R>(
  store: &S,
  remote: &R,
) -> Result<(), SyncError<S::Error, R::Error>>
where
  S: BindingStore,
  R: WhitelistRemote,
{
  let bindings = store.list_all().await.map_err(SyncError::Store)?;
  let entries: Vec<WhitelistEntry> =
    bindings.iter().map(WhitelistEntry::from).collect();
  remote
    .write_snapshot(&entries)
    .await
    .map_err(SyncError::Remote)
}
