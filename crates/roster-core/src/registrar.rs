//! The reconciliation orchestrator.
//!
//! Sequences validation → authority lookup → conflict check → persistence →
//! remote sync, and defines the partial-failure contract between the last two
//! steps: once the binding is durably written, a failed remote push never
//! unwinds it. The store is the system of record; the remote whitelist file
//! is a projection that self-heals on the next successful sync.

use crate::{
  authority::IdentityAuthority,
  outcome::{PartialReason, Registration, RegistrationOutcome, RejectReason},
  remote::WhitelistRemote,
  store::{BindingStore, UpsertOutcome},
  sync::{self, SyncError},
  validate,
};

/// Console command issued after every successful snapshot write so the game
/// server picks up the new file.
pub const DEFAULT_ACTIVATION_COMMAND: &str = "whitelist reload";

/// Drives a whole registration from candidate string to typed outcome.
///
/// Construction and lifecycle belong to the process entry point; the
/// registrar borrows nothing global.
#[derive(Debug, Clone)]
pub struct Registrar<S, A, R> {
  store:              S,
  authority:          A,
  remote:             R,
  activation_command: String,
}

impl<S, A, R> Registrar<S, A, R>
where
  S: BindingStore,
  A: IdentityAuthority,
  R: WhitelistRemote,
{
  pub fn new(store: S, authority: A, remote: R) -> Self {
    Self {
      store,
      authority,
      remote,
      activation_command: DEFAULT_ACTIVATION_COMMAND.to_string(),
    }
  }

  /// Override the post-sync console command. It still has to pass the
  /// remote's allow-list at dispatch time.
  pub fn with_activation_command(mut self, command: impl Into<String>) -> Self {
    self.activation_command = command.into();
    self
  }

  /// The underlying binding store.
  pub fn store(&self) -> &S {
    &self.store
  }

  /// Register (or re-register) `candidate` as the Minecraft account of
  /// `discord_id`.
  ///
  /// Never returns an opaque error: every failure mode maps to a
  /// [`RegistrationOutcome`] variant the caller can present to the user.
  pub async fn register(
    &self,
    discord_id: &str,
    candidate: &str,
  ) -> RegistrationOutcome {
    let candidate = candidate.trim();
    if !validate::is_valid_username(candidate) {
      return RegistrationOutcome::Rejected(RejectReason::InvalidFormat);
    }

    let identity = match self.authority.lookup(candidate).await {
      Ok(Some(identity)) => identity,
      Ok(None) => {
        return RegistrationOutcome::Rejected(RejectReason::UnknownIdentity);
      }
      Err(e) => {
        return RegistrationOutcome::Rejected(
          RejectReason::AuthorityUnavailable { detail: e.to_string() },
        );
      }
    };

    // Advisory pre-check for a fast rejection. The race-safe guard is the
    // conflict re-check inside `upsert`.
    match self.store.find_by_minecraft_name(&identity.name).await {
      Ok(Some(existing)) if existing.discord_id != discord_id => {
        return RegistrationOutcome::Rejected(RejectReason::NameTaken);
      }
      Ok(_) => {}
      Err(e) => {
        return RegistrationOutcome::Rejected(RejectReason::StorageFailure {
          detail: e.to_string(),
        });
      }
    }

    let (binding, created) = match self
      .store
      .upsert(discord_id, &identity.name, identity.uuid)
      .await
    {
      Ok(UpsertOutcome::Written { binding, created }) => (binding, created),
      Ok(UpsertOutcome::Conflict) => {
        return RegistrationOutcome::Rejected(RejectReason::NameTaken);
      }
      Err(e) => {
        return RegistrationOutcome::Rejected(RejectReason::StorageFailure {
          detail: e.to_string(),
        });
      }
    };

    // The binding is durable from here on. A failed push is reported, not
    // rolled back; the caller retries the sync step alone.
    if let Err(e) = self.resync().await {
      return RegistrationOutcome::PartiallyCompleted(
        PartialReason::SyncFailed { detail: e.to_string() },
      );
    }

    RegistrationOutcome::Completed(Registration {
      is_update:      !created,
      minecraft_name: binding.minecraft_name,
      minecraft_uuid: binding.minecraft_uuid,
    })
  }

  /// Push the full whitelist snapshot and issue the activation command.
  ///
  /// Safe to call any number of times: the snapshot write is a total
  /// overwrite and the activation command is idempotent on the game server.
  pub async fn resync(&self) -> Result<(), SyncError<S::Error, R::Error>> {
    sync::sync_from_store(&self.store, &self.remote).await?;
    self
      .remote
      .send_command(&self.activation_command)
      .await
      .map_err(SyncError::Remote)
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
