//! Pterodactyl panel client for the game server's whitelist file and console.
//!
//! Implements [`WhitelistRemote`](roster_core::remote::WhitelistRemote) on
//! top of the panel's client API: whole-file reads and writes of
//! `whitelist.json`, and console commands restricted to a literal allow-list.

pub mod command;
pub mod error;

mod client;
mod snapshot;

pub use client::{PterodactylClient, PterodactylConfig};
pub use error::{Error, Result};
