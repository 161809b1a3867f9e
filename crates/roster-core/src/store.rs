//! The `BindingStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g. `roster-store-sqlite`).
//! Higher layers (`roster-service`, the registrar) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::binding::Binding;

// ─── Upsert outcome ──────────────────────────────────────────────────────────

/// The result of a conflict-checked write. A name conflict is an expected
/// outcome, not an error; errors are reserved for storage faults.
#[derive(Debug, Clone)]
pub enum UpsertOutcome {
  /// The binding was written.
  Written {
    binding: Binding,
    /// `true` for a first registration, `false` when an existing row for the
    /// same Discord user was updated.
    created: bool,
  },
  /// The name is already bound to a different Discord user. Nothing was
  /// written.
  Conflict,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a binding store backend.
///
/// Implementations must make `upsert` atomic: the conflict re-check and the
/// write happen in one transaction, so concurrent registrations claiming the
/// same name resolve to exactly one winner. Any storage error means no
/// change became visible.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait BindingStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Look up the binding for a Discord user. Returns `None` if not found.
  fn find_by_discord_id<'a>(
    &'a self,
    discord_id: &'a str,
  ) -> impl Future<Output = Result<Option<Binding>, Self::Error>> + Send + 'a;

  /// Look up the binding holding a Minecraft name, compared
  /// case-insensitively. Returns `None` if no binding holds it.
  fn find_by_minecraft_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<Binding>, Self::Error>> + Send + 'a;

  /// Insert or update the binding for `discord_id` within a single atomic
  /// unit.
  ///
  /// The name-conflict check runs inside the same transaction as the write;
  /// a conflicting name yields [`UpsertOutcome::Conflict`]. An update keeps
  /// `created_at` and advances `updated_at`.
  fn upsert<'a>(
    &'a self,
    discord_id: &'a str,
    minecraft_name: &'a str,
    minecraft_uuid: Uuid,
  ) -> impl Future<Output = Result<UpsertOutcome, Self::Error>> + Send + 'a;

  /// All bindings, newest registration first. Ties on `created_at` break on
  /// insertion order so the listing is deterministic.
  fn list_all(
    &self,
  ) -> impl Future<Output = Result<Vec<Binding>, Self::Error>> + Send + '_;

  /// Release the underlying storage resources. Called once at process
  /// shutdown by whoever opened the store.
  fn close(self) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
