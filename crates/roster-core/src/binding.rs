//! Binding — the authoritative record linking a Discord identity to a
//! Minecraft identity.
//!
//! Bindings are owned by the [`BindingStore`](crate::store::BindingStore);
//! the remote whitelist file is a projection of them, never the other way
//! around.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One Discord user's claim to one Minecraft account, as confirmed by the
/// identity authority.
///
/// `minecraft_uuid` is never user-supplied; it always comes from the
/// authority's response for the canonical name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
  pub discord_id:     String,
  /// Canonical casing as returned by the authority, not as typed by the user.
  pub minecraft_name: String,
  pub minecraft_uuid: Uuid,
  /// Set on first registration; never changes afterwards.
  pub created_at:     DateTime<Utc>,
  /// Advances on every successful re-registration.
  pub updated_at:     DateTime<Utc>,
}

/// One allowed player as the game server's `whitelist.json` represents it.
///
/// The remote file is a sequence of these. No ordering is guaranteed; the
/// file is always rewritten in full from the current set of bindings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhitelistEntry {
  pub uuid: Uuid,
  pub name: String,
}

impl From<&Binding> for WhitelistEntry {
  fn from(binding: &Binding) -> Self {
    Self {
      uuid: binding.minecraft_uuid,
      name: binding.minecraft_name.clone(),
    }
  }
}
