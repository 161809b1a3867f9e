//! The identity-authority contract: candidate name in, canonical identity
//! out.

use std::future::Future;

use uuid::Uuid;

/// The authority's ground-truth answer for a name: its preferred casing and
/// the account's stable identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalIdentity {
  pub name: String,
  pub uuid: Uuid,
}

/// A read-only lookup against the external identity authority.
///
/// `Ok(None)` means the authority positively knows of no such account.
/// `Err` means the lookup itself failed (network, unexpected status,
/// malformed body) and must never be treated as "not found" — the caller
/// reports it as a transient, retryable condition.
pub trait IdentityAuthority: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Resolve `candidate` to its canonical identity. The candidate is assumed
  /// to be syntactically valid already; only existence is checked here.
  fn lookup<'a>(
    &'a self,
    candidate: &'a str,
  ) -> impl Future<Output = Result<Option<CanonicalIdentity>, Self::Error>>
  + Send
  + 'a;
}
