//! Mojang profile lookup — the identity authority for Minecraft accounts.
//!
//! A single read-only endpoint: candidate name in, canonical casing and
//! account uuid out. "Not found" is an answer; every other failure is a
//! transient error the caller reports as retryable.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use roster_core::authority::{CanonicalIdentity, IdentityAuthority};

/// The public Mojang API host.
pub const DEFAULT_BASE_URL: &str = "https://api.mojang.com";

// ─── Error ───────────────────────────────────────────────────────────────────

/// A failed lookup. None of these mean "no such account" — that case is
/// `Ok(None)` on [`MojangClient::lookup`].
#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("unexpected status from authority: {0}")]
  Status(StatusCode),

  #[error("malformed profile body: {0}")]
  Decode(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Client ──────────────────────────────────────────────────────────────────

/// The profile document returned for an existing account. `id` is the uuid
/// in undashed hex form.
#[derive(Debug, Deserialize)]
struct ProfileBody {
  id:   String,
  name: String,
}

/// Async client for the Mojang profile API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct MojangClient {
  client:   Client,
  base_url: String,
}

impl MojangClient {
  pub fn new() -> Result<Self> {
    Self::with_base_url(DEFAULT_BASE_URL)
  }

  /// Point the client at a different host — a mock in tests, a caching proxy
  /// in production.
  pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(10))
      .build()?;
    Ok(Self {
      client,
      base_url: base_url.into().trim_end_matches('/').to_string(),
    })
  }
}

impl IdentityAuthority for MojangClient {
  type Error = Error;

  /// `GET /users/profiles/minecraft/{name}`
  ///
  /// 200 is an account, 404 is positively no account, and anything else is a
  /// transient failure — never conflated with "not found".
  async fn lookup(&self, candidate: &str) -> Result<Option<CanonicalIdentity>> {
    let url =
      format!("{}/users/profiles/minecraft/{candidate}", self.base_url);
    let resp = self.client.get(url).send().await?;

    match resp.status() {
      StatusCode::OK => {}
      StatusCode::NOT_FOUND => return Ok(None),
      status => return Err(Error::Status(status)),
    }

    let body: ProfileBody = resp.json().await?;
    let uuid = Uuid::parse_str(&body.id).map_err(|e| {
      Error::Decode(format!("profile id {:?}: {e}", body.id))
    })?;

    Ok(Some(CanonicalIdentity { name: body.name, uuid }))
  }
}
