//! Per-command, per-caller request gating.
//!
//! A thin utility, independent of the registration core: one map of
//! last-invocation instants, consulted by handlers before they do any work.
//! The caller that owns the state decides which commands are gated.

use std::{
  collections::HashMap,
  sync::Mutex,
  time::{Duration, Instant},
};

/// Tracks when each caller last invoked each command.
pub struct CommandCooldowns {
  ttl:    Duration,
  stamps: Mutex<HashMap<(String, String), Instant>>,
}

impl CommandCooldowns {
  pub fn new(ttl: Duration) -> Self {
    Self { ttl, stamps: Mutex::new(HashMap::new()) }
  }

  /// Whether `caller` may invoke `command` now. A `true` answer records the
  /// invocation; `false` means the previous one is still cooling down.
  pub fn allow(&self, command: &str, caller: &str) -> bool {
    let now = Instant::now();
    let mut stamps = self.stamps.lock().unwrap();

    // Drop expired entries so the map stays bounded by active callers.
    let ttl = self.ttl;
    stamps.retain(|_, stamp| now.duration_since(*stamp) < ttl);

    let key = (command.to_string(), caller.to_string());
    if stamps.contains_key(&key) {
      return false;
    }
    stamps.insert(key, now);
    true
  }
}
