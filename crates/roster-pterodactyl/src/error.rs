//! Error type for `roster-pterodactyl`.
//!
//! Callers decide retry-worthiness from the variant: `Transport` is
//! connectivity, `Api` is the panel refusing the request (bad credentials,
//! missing file), `Json` is unparseable file content. `CommandNotAllowed`
//! should never occur with a well-formed caller and is a defect if observed.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("transport error: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("panel rejected request: {0}")]
  Api(StatusCode),

  #[error("whitelist json: {0}")]
  Json(#[from] serde_json::Error),

  #[error("command {0:?} is not allowed")]
  CommandNotAllowed(String),

  #[error("invalid configuration: {0}")]
  Config(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
