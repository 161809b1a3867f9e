//! [`SqliteStore`] — the SQLite implementation of [`BindingStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use roster_core::{
  binding::Binding,
  store::{BindingStore, UpsertOutcome},
};

use crate::{
  Error, Result,
  encode::{RawBinding, encode_dt, encode_uuid},
  schema::SCHEMA,
};

fn read_raw(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawBinding> {
  Ok(RawBinding {
    discord_id:     row.get(0)?,
    minecraft_name: row.get(1)?,
    minecraft_uuid: row.get(2)?,
    created_at:     row.get(3)?,
    updated_at:     row.get(4)?,
  })
}

/// Outcome of the upsert transaction, in raw column form. Decoded back into
/// domain types on the async side of the connection boundary.
enum RawUpsert {
  Written { row: RawBinding, created: bool },
  Conflict,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A roster binding store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All access
/// is funnelled through the connection's worker thread, so the upsert
/// transaction below is never interleaved with another writer.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch a single binding by an exact-match key column.
  async fn find_one(
    &self,
    sql: &'static str,
    key: String,
  ) -> Result<Option<Binding>> {
    let raw: Option<RawBinding> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(sql, rusqlite::params![key], read_raw)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawBinding::into_binding).transpose()
  }
}

// ─── BindingStore impl ───────────────────────────────────────────────────────

impl BindingStore for SqliteStore {
  type Error = Error;

  async fn find_by_discord_id(
    &self,
    discord_id: &str,
  ) -> Result<Option<Binding>> {
    self
      .find_one(
        "SELECT discord_id, minecraft_name, minecraft_uuid, created_at, updated_at
         FROM bindings WHERE discord_id = ?1",
        discord_id.to_owned(),
      )
      .await
  }

  async fn find_by_minecraft_name(
    &self,
    name: &str,
  ) -> Result<Option<Binding>> {
    // The column's NOCASE collation makes this equality case-insensitive.
    self
      .find_one(
        "SELECT discord_id, minecraft_name, minecraft_uuid, created_at, updated_at
         FROM bindings WHERE minecraft_name = ?1",
        name.to_owned(),
      )
      .await
  }

  async fn upsert(
    &self,
    discord_id: &str,
    minecraft_name: &str,
    minecraft_uuid: Uuid,
  ) -> Result<UpsertOutcome> {
    let discord_id = discord_id.to_owned();
    let name = minecraft_name.to_owned();
    let uuid_str = encode_uuid(minecraft_uuid);
    let now_str = encode_dt(Utc::now());

    let raw: RawUpsert = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        // Re-check the name inside the transaction. The registrar ran an
        // advisory check already, but only this one closes the race between
        // check and write.
        let holder: Option<String> = tx
          .query_row(
            "SELECT discord_id FROM bindings WHERE minecraft_name = ?1",
            rusqlite::params![name],
            |r| r.get(0),
          )
          .optional()?;
        if holder.as_deref().is_some_and(|h| h != discord_id) {
          return Ok(RawUpsert::Conflict);
        }

        let existing_created_at: Option<String> = tx
          .query_row(
            "SELECT created_at FROM bindings WHERE discord_id = ?1",
            rusqlite::params![discord_id],
            |r| r.get(0),
          )
          .optional()?;

        let (created_at, created) = match existing_created_at {
          Some(created_at) => {
            tx.execute(
              "UPDATE bindings
               SET minecraft_name = ?2, minecraft_uuid = ?3, updated_at = ?4
               WHERE discord_id = ?1",
              rusqlite::params![discord_id, name, uuid_str, now_str],
            )?;
            (created_at, false)
          }
          None => {
            tx.execute(
              "INSERT INTO bindings
                 (discord_id, minecraft_name, minecraft_uuid, created_at, updated_at)
               VALUES (?1, ?2, ?3, ?4, ?4)",
              rusqlite::params![discord_id, name, uuid_str, now_str],
            )?;
            (now_str.clone(), true)
          }
        };

        tx.commit()?;

        Ok(RawUpsert::Written {
          row: RawBinding {
            discord_id,
            minecraft_name: name,
            minecraft_uuid: uuid_str,
            created_at,
            updated_at: now_str,
          },
          created,
        })
      })
      .await?;

    match raw {
      RawUpsert::Written { row, created } => Ok(UpsertOutcome::Written {
        binding: row.into_binding()?,
        created,
      }),
      RawUpsert::Conflict => Ok(UpsertOutcome::Conflict),
    }
  }

  async fn list_all(&self) -> Result<Vec<Binding>> {
    let raws: Vec<RawBinding> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT discord_id, minecraft_name, minecraft_uuid, created_at, updated_at
           FROM bindings
           ORDER BY created_at DESC, seq DESC",
        )?;
        let rows = stmt
          .query_map([], read_raw)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawBinding::into_binding).collect()
  }

  async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }
}
