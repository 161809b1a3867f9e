//! [`PterodactylClient`] — HTTP client for one server on a Pterodactyl panel.

use std::time::Duration;

use reqwest::{
  Client, StatusCode,
  header::{self, HeaderMap, HeaderValue},
};
use roster_core::{binding::WhitelistEntry, remote::WhitelistRemote};

use crate::{Error, Result, command, snapshot};

/// Path of the access-control file inside the server's container.
const WHITELIST_FILE: &str = "/whitelist.json";

/// Connection settings for one panel server.
#[derive(Debug, Clone)]
pub struct PterodactylConfig {
  /// Panel origin, e.g. `https://panel.example.com`.
  pub api_url:   String,
  /// Client API key of an account with file and console permissions.
  pub api_key:   String,
  /// Short identifier of the target server.
  pub server_id: String,
}

/// Async client for the panel's client API, scoped to a single server.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based. The client
/// owns no whitelist state; it projects whatever it is given.
#[derive(Debug, Clone)]
pub struct PterodactylClient {
  client: Client,
  config: PterodactylConfig,
}

impl PterodactylClient {
  pub fn new(config: PterodactylConfig) -> Result<Self> {
    let mut auth =
      HeaderValue::from_str(&format!("Bearer {}", config.api_key))
        .map_err(|_| {
          Error::Config("api key contains non-header characters".into())
        })?;
    auth.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, auth);
    headers.insert(
      header::ACCEPT,
      HeaderValue::from_static("Application/vnd.pterodactyl.v1+json"),
    );
    headers.insert(
      header::CONTENT_TYPE,
      HeaderValue::from_static("application/json"),
    );

    let client = Client::builder()
      .default_headers(headers)
      .timeout(Duration::from_secs(30))
      .build()?;

    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api/client/servers/{}{path}",
      self.config.api_url.trim_end_matches('/'),
      self.config.server_id,
    )
  }

  fn check_status(status: StatusCode) -> Result<()> {
    if status.is_success() {
      Ok(())
    } else {
      Err(Error::Api(status))
    }
  }

  /// `GET /files/contents?file=/whitelist.json`
  pub async fn read_whitelist(&self) -> Result<Vec<WhitelistEntry>> {
    let resp = self
      .client
      .get(self.url("/files/contents"))
      .query(&[("file", WHITELIST_FILE)])
      .send()
      .await?;
    // A file that does not exist yet is an empty whitelist, not an error.
    if resp.status() == StatusCode::NOT_FOUND {
      return Ok(Vec::new());
    }
    Self::check_status(resp.status())?;

    let content = resp.text().await?;
    snapshot::parse(&content)
  }

  /// `POST /files/write?file=/whitelist.json` — replaces the file in full.
  pub async fn write_whitelist(
    &self,
    entries: &[WhitelistEntry],
  ) -> Result<()> {
    let body = snapshot::serialize(entries)?;
    let resp = self
      .client
      .post(self.url("/files/write"))
      .query(&[("file", WHITELIST_FILE)])
      .body(body)
      .send()
      .await?;
    Self::check_status(resp.status())
  }

  /// `POST /command` — allow-listed commands only. A command that fails
  /// [`command::is_allowed`] is rejected here and never reaches the network.
  pub async fn send_console_command(&self, cmd: &str) -> Result<()> {
    if !command::is_allowed(cmd) {
      return Err(Error::CommandNotAllowed(cmd.to_string()));
    }

    let resp = self
      .client
      .post(self.url("/command"))
      .json(&serde_json::json!({ "command": cmd }))
      .send()
      .await?;
    Self::check_status(resp.status())
  }

  // ── Legacy single-entry primitives ────────────────────────────────────────
  //
  // Retained for direct administrative use only. Do not interleave these
  // with snapshot sync: a read-modify-write here can silently lose a
  // concurrent full-snapshot write.

  /// Append one entry unless its uuid is already present. Returns `false`
  /// (and writes nothing) when the player is already whitelisted.
  pub async fn add_entry(&self, entry: WhitelistEntry) -> Result<bool> {
    let mut entries = self.read_whitelist().await?;
    if entries.iter().any(|e| e.uuid == entry.uuid) {
      return Ok(false);
    }
    entries.push(entry);
    self.write_whitelist(&entries).await?;
    Ok(true)
  }

  /// Whether any remote entry carries `name`, compared case-insensitively.
  pub async fn is_whitelisted(&self, name: &str) -> Result<bool> {
    let entries = self.read_whitelist().await?;
    Ok(entries.iter().any(|e| e.name.eq_ignore_ascii_case(name)))
  }
}

impl WhitelistRemote for PterodactylClient {
  type Error = Error;

  async fn read_snapshot(&self) -> Result<Vec<WhitelistEntry>> {
    self.read_whitelist().await
  }

  async fn write_snapshot(&self, entries: &[WhitelistEntry]) -> Result<()> {
    self.write_whitelist(entries).await
  }

  async fn send_command(&self, cmd: &str) -> Result<()> {
    self.send_console_command(cmd).await
  }
}
