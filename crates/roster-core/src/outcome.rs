//! The typed result of a registration attempt.
//!
//! Every expected non-success path is a value here, not an error. The
//! distinction that matters to callers is whether a durable local write
//! happened: `Rejected` means nothing changed, `PartiallyCompleted` means the
//! binding is recorded but the remote whitelist may be stale.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A successful registration, reported back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
  /// `true` when an existing binding for this Discord user was replaced.
  pub is_update:      bool,
  pub minecraft_name: String,
  pub minecraft_uuid: Uuid,
}

/// Why a registration was rejected with no durable change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectReason {
  /// The candidate does not have the shape of a Minecraft username.
  InvalidFormat,
  /// The authority has no account under this name.
  UnknownIdentity,
  /// The authority could not be reached or answered nonsensically.
  AuthorityUnavailable { detail: String },
  /// The name is already bound to a different Discord user.
  NameTaken,
  /// The store reported a failure; no change is visible.
  StorageFailure { detail: String },
}

impl RejectReason {
  /// Whether retrying with the same input can possibly succeed.
  ///
  /// `InvalidFormat`, `UnknownIdentity`, and `NameTaken` need new input;
  /// the other reasons are transient.
  pub fn is_retryable(&self) -> bool {
    matches!(
      self,
      Self::AuthorityUnavailable { .. } | Self::StorageFailure { .. }
    )
  }
}

/// Why a registration stopped after the binding was durably written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum PartialReason {
  /// Remote propagation failed. The binding stands; only the sync step needs
  /// to be retried.
  SyncFailed { detail: String },
}

/// The outcome of [`Registrar::register`](crate::Registrar::register).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", content = "detail", rename_all = "snake_case")]
pub enum RegistrationOutcome {
  /// Binding written and remote whitelist updated and reloaded.
  Completed(Registration),
  /// No durable change happened.
  Rejected(RejectReason),
  /// The binding was written but the remote whitelist may be stale.
  PartiallyCompleted(PartialReason),
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn outcome_json_shape() {
    let outcome = RegistrationOutcome::Completed(Registration {
      is_update:      false,
      minecraft_name: "CoolGuy".into(),
      minecraft_uuid: "12345678-90ab-cdef-1234-567890abcdef".parse().unwrap(),
    });
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["result"], "completed");
    assert_eq!(json["detail"]["minecraft_name"], "CoolGuy");
    assert_eq!(
      json["detail"]["minecraft_uuid"],
      "12345678-90ab-cdef-1234-567890abcdef"
    );
  }

  #[test]
  fn reject_reason_json_shape() {
    let outcome = RegistrationOutcome::Rejected(RejectReason::NameTaken);
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["result"], "rejected");
    assert_eq!(json["detail"]["reason"], "name_taken");
  }

  #[test]
  fn retryability() {
    assert!(!RejectReason::InvalidFormat.is_retryable());
    assert!(!RejectReason::UnknownIdentity.is_retryable());
    assert!(!RejectReason::NameTaken.is_retryable());
    assert!(
      RejectReason::AuthorityUnavailable { detail: "timeout".into() }
        .is_retryable()
    );
    assert!(
      RejectReason::StorageFailure { detail: "disk full".into() }
        .is_retryable()
    );
  }
}
