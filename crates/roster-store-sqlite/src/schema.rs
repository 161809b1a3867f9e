//! SQL schema for the roster SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// `minecraft_name` carries `COLLATE NOCASE`, so equality comparisons and the
/// UNIQUE index are case-insensitive. The authoritative conflict check runs
/// inside the upsert transaction; the index is a backstop.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS bindings (
    seq             INTEGER PRIMARY KEY AUTOINCREMENT,  -- insertion order; listing tie-break
    discord_id      TEXT NOT NULL UNIQUE,
    minecraft_name  TEXT NOT NULL UNIQUE COLLATE NOCASE,
    minecraft_uuid  TEXT NOT NULL,   -- hyphenated lowercase
    created_at      TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned, immutable
    updated_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS bindings_created_idx ON bindings(created_at);

PRAGMA user_version = 1;
";
