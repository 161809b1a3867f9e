//! rosterd — the roster whitelist service binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite binding store, wires up the Mojang and Pterodactyl clients, and
//! serves the JSON API over HTTP.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use roster_core::{Registrar, store::BindingStore as _};
use roster_mojang::MojangClient;
use roster_pterodactyl::{PterodactylClient, PterodactylConfig};
use roster_service::{AppState, ServiceConfig, cooldown::CommandCooldowns};
use roster_store_sqlite::SqliteStore;

#[derive(Parser)]
#[command(author, version, about = "roster whitelist service")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(
      config::Environment::with_prefix("ROSTER").separator("__"),
    )
    .build()
    .context("failed to read config file")?;

  let service_cfg: ServiceConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServiceConfig")?;

  // A misconfigured activation command would otherwise surface as a sync
  // failure on every registration. Refuse to start instead.
  if !roster_pterodactyl::command::is_allowed(&service_cfg.activation_command)
  {
    anyhow::bail!(
      "activation command {:?} is not on the allow-list",
      service_cfg.activation_command
    );
  }

  // Expand `~` in the database path.
  let database_path = expand_tilde(&service_cfg.database_path);

  // Open the binding store; the handle is shared for the process lifetime
  // and closed on the way out.
  let store = SqliteStore::open(&database_path)
    .await
    .with_context(|| format!("failed to open store at {database_path:?}"))?;
  let store_handle = store.clone();

  let authority = MojangClient::with_base_url(&service_cfg.mojang_api_url)
    .context("failed to build Mojang client")?;

  let remote = PterodactylClient::new(PterodactylConfig {
    api_url:   service_cfg.pterodactyl.api_url.clone(),
    api_key:   service_cfg.pterodactyl.api_key.clone(),
    server_id: service_cfg.pterodactyl.server_id.clone(),
  })
  .context("failed to build Pterodactyl client")?;

  let registrar = Registrar::new(store, authority, remote)
    .with_activation_command(&service_cfg.activation_command);

  let state = AppState {
    registrar: Arc::new(registrar),
    cooldowns: Arc::new(CommandCooldowns::new(Duration::from_secs(
      service_cfg.register_cooldown_secs,
    ))),
  };

  let app = roster_service::router(state);
  let address = format!("{}:{}", service_cfg.host, service_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  store_handle.close().await.context("failed to close store")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
