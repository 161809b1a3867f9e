//! JSON handlers for the roster API.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/register` | Body: `{"discord_id": …, "minecraft_name": …}` |
//! | `POST` | `/sync` | Re-push the whitelist snapshot + activation command |
//! | `GET`  | `/whitelist` | All bindings, newest registration first |
//! | `GET`  | `/healthz` | Liveness |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Deserialize;

use roster_core::{
  authority::IdentityAuthority,
  binding::Binding,
  outcome::{RegistrationOutcome, RejectReason},
  remote::WhitelistRemote,
  store::BindingStore,
};

use crate::{AppState, error::ApiError};

// ─── Register ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub discord_id:     String,
  pub minecraft_name: String,
}

/// The HTTP status each outcome travels under. The body is always the
/// serialised outcome itself.
fn status_for(outcome: &RegistrationOutcome) -> StatusCode {
  match outcome {
    RegistrationOutcome::Completed(_) => StatusCode::OK,
    RegistrationOutcome::PartiallyCompleted(_) => StatusCode::ACCEPTED,
    RegistrationOutcome::Rejected(reason) => match reason {
      RejectReason::InvalidFormat => StatusCode::UNPROCESSABLE_ENTITY,
      RejectReason::UnknownIdentity => StatusCode::NOT_FOUND,
      RejectReason::NameTaken => StatusCode::CONFLICT,
      RejectReason::AuthorityUnavailable { .. } => {
        StatusCode::SERVICE_UNAVAILABLE
      }
      RejectReason::StorageFailure { .. } => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    },
  }
}

/// `POST /register`
pub async fn register<S, A, R>(
  State(state): State<AppState<S, A, R>>,
  Json(body): Json<RegisterBody>,
) -> Response
where
  S: BindingStore + Clone + 'static,
  A: IdentityAuthority + Clone + 'static,
  R: WhitelistRemote + Clone + 'static,
{
  if !state.cooldowns.allow("register", &body.discord_id) {
    return ApiError::Throttled.into_response();
  }

  let outcome = state
    .registrar
    .register(&body.discord_id, &body.minecraft_name)
    .await;

  match &outcome {
    RegistrationOutcome::Completed(reg) => tracing::info!(
      discord_id = %body.discord_id,
      minecraft_name = %reg.minecraft_name,
      is_update = reg.is_update,
      "registration completed"
    ),
    RegistrationOutcome::PartiallyCompleted(reason) => tracing::warn!(
      discord_id = %body.discord_id,
      ?reason,
      "registration recorded but whitelist sync failed"
    ),
    RegistrationOutcome::Rejected(
      reason @ (RejectReason::AuthorityUnavailable { .. }
      | RejectReason::StorageFailure { .. }),
    ) => tracing::error!(discord_id = %body.discord_id, ?reason, "registration failed"),
    RegistrationOutcome::Rejected(reason) => tracing::info!(
      discord_id = %body.discord_id,
      ?reason,
      "registration rejected"
    ),
  }

  (status_for(&outcome), Json(outcome)).into_response()
}

// ─── Sync ─────────────────────────────────────────────────────────────────────

/// `POST /sync` — the retry path for a partially-completed registration.
/// Idempotent: re-derives the full snapshot from the store every time.
pub async fn sync<S, A, R>(
  State(state): State<AppState<S, A, R>>,
) -> Result<StatusCode, ApiError>
where
  S: BindingStore + Clone + 'static,
  A: IdentityAuthority + Clone + 'static,
  R: WhitelistRemote + Clone + 'static,
{
  state.registrar.resync().await.map_err(|e| {
    tracing::error!(error = %e, "whitelist sync failed");
    ApiError::Remote(e.to_string())
  })?;
  tracing::info!("whitelist synced");
  Ok(StatusCode::NO_CONTENT)
}

// ─── Whitelist listing ────────────────────────────────────────────────────────

/// `GET /whitelist`
pub async fn whitelist<S, A, R>(
  State(state): State<AppState<S, A, R>>,
) -> Result<Json<Vec<Binding>>, ApiError>
where
  S: BindingStore + Clone + 'static,
  A: IdentityAuthority + Clone + 'static,
  R: WhitelistRemote + Clone + 'static,
{
  let bindings = state
    .registrar
    .store()
    .list_all()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(bindings))
}

// ─── Health ───────────────────────────────────────────────────────────────────

/// `GET /healthz`
pub async fn healthz() -> StatusCode {
  StatusCode::OK
}
