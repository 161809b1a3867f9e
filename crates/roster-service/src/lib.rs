//! HTTP surface for the roster whitelist service.
//!
//! Exposes an axum [`Router`] over the registration core. The chat-platform
//! integration (Discord bot, admin CLI, anything else) is a client of this
//! API: it hands in the candidate string and presents the typed outcome to
//! the user.

pub mod cooldown;
pub mod error;
pub mod handlers;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use roster_core::{
  Registrar, authority::IdentityAuthority, remote::WhitelistRemote,
  store::BindingStore,
};

use cooldown::CommandCooldowns;
pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Panel connection settings, nested under `[pterodactyl]` in config.toml.
#[derive(Debug, Clone, Deserialize)]
pub struct PterodactylSettings {
  pub api_url:   String,
  pub api_key:   String,
  pub server_id: String,
}

/// Runtime service configuration, deserialised from `config.toml` with a
/// `ROSTER`-prefixed environment overlay.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
  pub host:          String,
  pub port:          u16,
  pub database_path: PathBuf,

  #[serde(default = "default_mojang_api_url")]
  pub mojang_api_url: String,

  /// Console command issued after every snapshot write. Must be on the
  /// pterodactyl client's allow-list; checked at startup.
  #[serde(default = "default_activation_command")]
  pub activation_command: String,

  /// Seconds a caller must wait between registration attempts.
  #[serde(default = "default_register_cooldown_secs")]
  pub register_cooldown_secs: u64,

  pub pterodactyl: PterodactylSettings,
}

fn default_mojang_api_url() -> String {
  roster_mojang::DEFAULT_BASE_URL.to_string()
}

fn default_activation_command() -> String {
  roster_core::registrar::DEFAULT_ACTIVATION_COMMAND.to_string()
}

fn default_register_cooldown_secs() -> u64 {
  3
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S, A, R> {
  pub registrar: Arc<Registrar<S, A, R>>,
  pub cooldowns: Arc<CommandCooldowns>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the service.
pub fn router<S, A, R>(state: AppState<S, A, R>) -> Router
where
  S: BindingStore + Clone + 'static,
  A: IdentityAuthority + Clone + 'static,
  R: WhitelistRemote + Clone + 'static,
{
  Router::new()
    .route("/register", post(handlers::register::<S, A, R>))
    .route("/sync", post(handlers::sync::<S, A, R>))
    .route("/whitelist", get(handlers::whitelist::<S, A, R>))
    .route("/healthz", get(handlers::healthz))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::{
    collections::HashMap,
    sync::{
      Arc, Mutex,
      atomic::{AtomicBool, Ordering},
    },
    time::Duration,
  };

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use serde_json::json;
  use tower::ServiceExt as _;
  use uuid::Uuid;

  use roster_core::{
    authority::CanonicalIdentity,
    binding::WhitelistEntry,
  };
  use roster_store_sqlite::SqliteStore;

  use super::*;

  #[derive(Debug, thiserror::Error)]
  #[error("{0}")]
  struct StubError(&'static str);

  // ── Stub collaborators ────────────────────────────────────────────────────

  #[derive(Clone, Default)]
  struct StubAuthority {
    accounts: HashMap<String, CanonicalIdentity>,
  }

  impl StubAuthority {
    fn with_account(mut self, name: &str, uuid: u128) -> Self {
      self.accounts.insert(
        name.to_ascii_lowercase(),
        CanonicalIdentity { name: name.to_string(), uuid: Uuid::from_u128(uuid) },
      );
      self
    }
  }

  impl IdentityAuthority for StubAuthority {
    type Error = StubError;

    async fn lookup(
      &self,
      candidate: &str,
    ) -> Result<Option<CanonicalIdentity>, StubError> {
      Ok(self.accounts.get(&candidate.to_ascii_lowercase()).cloned())
    }
  }

  #[derive(Clone, Default)]
  struct StubRemote {
    snapshot:   Arc<Mutex<Vec<WhitelistEntry>>>,
    commands:   Arc<Mutex<Vec<String>>>,
    fail_write: Arc<AtomicBool>,
  }

  impl WhitelistRemote for StubRemote {
    type Error = StubError;

    async fn read_snapshot(&self) -> Result<Vec<WhitelistEntry>, StubError> {
      Ok(self.snapshot.lock().unwrap().clone())
    }

    async fn write_snapshot(
      &self,
      entries: &[WhitelistEntry],
    ) -> Result<(), StubError> {
      if self.fail_write.load(Ordering::SeqCst) {
        return Err(StubError("panel unreachable"));
      }
      *self.snapshot.lock().unwrap() = entries.to_vec();
      Ok(())
    }

    async fn send_command(&self, command: &str) -> Result<(), StubError> {
      self.commands.lock().unwrap().push(command.to_string());
      Ok(())
    }
  }

  type TestState = AppState<SqliteStore, StubAuthority, StubRemote>;

  async fn make_state(
    authority: StubAuthority,
    remote: StubRemote,
    cooldown: Duration,
  ) -> TestState {
    let store = SqliteStore::open_in_memory().await.unwrap();
    AppState {
      registrar: Arc::new(Registrar::new(store, authority, remote)),
      cooldowns: Arc::new(CommandCooldowns::new(cooldown)),
    }
  }

  async fn request(
    state: TestState,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(value) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(value.to_string())
      }
      None => Body::empty(),
    };
    router(state)
      .oneshot(builder.body(body).unwrap())
      .await
      .unwrap()
  }

  async fn register(
    state: &TestState,
    discord_id: &str,
    name: &str,
  ) -> axum::response::Response {
    request(
      state.clone(),
      "POST",
      "/register",
      Some(json!({ "discord_id": discord_id, "minecraft_name": name })),
    )
    .await
  }

  async fn json_body(resp: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  // ── Health ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn healthz_is_ok() {
    let state =
      make_state(StubAuthority::default(), StubRemote::default(), Duration::ZERO)
        .await;
    let resp = request(state, "GET", "/healthz", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  // ── Register ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn register_completes_and_pushes_snapshot() {
    let remote = StubRemote::default();
    let state = make_state(
      StubAuthority::default().with_account("CoolGuy", 1),
      remote.clone(),
      Duration::ZERO,
    )
    .await;

    let resp = register(&state, "u1", "coolguy").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert_eq!(body["result"], "completed");
    assert_eq!(body["detail"]["is_update"], false);
    assert_eq!(body["detail"]["minecraft_name"], "CoolGuy");

    assert_eq!(remote.snapshot.lock().unwrap().len(), 1);
    assert_eq!(
      remote.commands.lock().unwrap().as_slice(),
      &["whitelist reload".to_string()]
    );
  }

  #[tokio::test]
  async fn invalid_name_is_unprocessable() {
    let state =
      make_state(StubAuthority::default(), StubRemote::default(), Duration::ZERO)
        .await;
    let resp = register(&state, "u1", "not a name!").await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(resp).await;
    assert_eq!(body["detail"]["reason"], "invalid_format");
  }

  #[tokio::test]
  async fn unknown_name_is_not_found() {
    let state =
      make_state(StubAuthority::default(), StubRemote::default(), Duration::ZERO)
        .await;
    let resp = register(&state, "u1", "Nobody").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn taken_name_is_conflict() {
    let state = make_state(
      StubAuthority::default().with_account("CoolGuy", 1),
      StubRemote::default(),
      Duration::ZERO,
    )
    .await;

    assert_eq!(register(&state, "u1", "CoolGuy").await.status(), StatusCode::OK);

    let resp = register(&state, "u2", "COOLGUY").await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body = json_body(resp).await;
    assert_eq!(body["detail"]["reason"], "name_taken");
  }

  #[tokio::test]
  async fn failed_sync_is_accepted_and_binding_survives() {
    let remote = StubRemote::default();
    remote.fail_write.store(true, Ordering::SeqCst);
    let state = make_state(
      StubAuthority::default().with_account("CoolGuy", 1),
      remote,
      Duration::ZERO,
    )
    .await;

    let resp = register(&state, "u1", "CoolGuy").await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    let body = json_body(resp).await;
    assert_eq!(body["result"], "partially_completed");
    assert_eq!(body["detail"]["reason"], "sync_failed");

    // The durable write stands even though propagation failed.
    let resp = request(state, "GET", "/whitelist", None).await;
    let listed = json_body(resp).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["minecraft_name"], "CoolGuy");
  }

  #[tokio::test]
  async fn repeated_register_within_cooldown_is_throttled() {
    let state = make_state(
      StubAuthority::default().with_account("CoolGuy", 1),
      StubRemote::default(),
      Duration::from_secs(60),
    )
    .await;

    assert_eq!(register(&state, "u1", "CoolGuy").await.status(), StatusCode::OK);
    let resp = register(&state, "u1", "CoolGuy").await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
  }

  // ── Sync ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn sync_heals_a_corrupted_remote_and_is_idempotent() {
    let remote = StubRemote::default();
    let state = make_state(
      StubAuthority::default().with_account("CoolGuy", 1),
      remote.clone(),
      Duration::ZERO,
    )
    .await;

    register(&state, "u1", "CoolGuy").await;
    let expected = remote.snapshot.lock().unwrap().clone();

    // Corrupt the remote file out of band.
    remote.snapshot.lock().unwrap().push(WhitelistEntry {
      uuid: Uuid::from_u128(999),
      name: "Intruder".into(),
    });

    let resp = request(state.clone(), "POST", "/sync", None).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(*remote.snapshot.lock().unwrap(), expected);

    // A second sync with no store mutation writes the identical snapshot.
    let resp = request(state, "POST", "/sync", None).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(*remote.snapshot.lock().unwrap(), expected);
  }

  #[tokio::test]
  async fn failed_sync_endpoint_is_bad_gateway() {
    let remote = StubRemote::default();
    remote.fail_write.store(true, Ordering::SeqCst);
    let state =
      make_state(StubAuthority::default(), remote, Duration::ZERO).await;

    let resp = request(state, "POST", "/sync", None).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
  }

  // ── Whitelist listing ─────────────────────────────────────────────────────

  #[tokio::test]
  async fn whitelist_lists_newest_registration_first() {
    let state = make_state(
      StubAuthority::default()
        .with_account("Alpha", 1)
        .with_account("Bravo", 2),
      StubRemote::default(),
      Duration::ZERO,
    )
    .await;

    register(&state, "u1", "Alpha").await;
    register(&state, "u2", "Bravo").await;

    let resp = request(state, "GET", "/whitelist", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let listed = json_body(resp).await;
    let names: Vec<&str> = listed
      .as_array()
      .unwrap()
      .iter()
      .map(|b| b["minecraft_name"].as_str().unwrap())
      .collect();
    assert_eq!(names, ["Bravo", "Alpha"]);
  }
}
