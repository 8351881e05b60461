// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All statements are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.

use std::path::Path;

use blankfill_core::BlankfillError;
use rusqlite::TransactionBehavior;
use tracing::{debug, warn};

/// Map a tokio-rusqlite call error into the storage error variant.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> BlankfillError {
    BlankfillError::Storage {
        source: Box::new(e),
    }
}

/// Handle to the request database.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path` in WAL mode and apply migrations.
    pub async fn open(path: &str) -> Result<Self, BlankfillError> {
        Self::open_with(path, true).await
    }

    /// Open the database, choosing the journal mode explicitly.
    pub async fn open_with(path: &str, wal_mode: bool) -> Result<Self, BlankfillError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| BlankfillError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| BlankfillError::Storage {
                source: e.to_string().into(),
            })?;

        let journal = if wal_mode { "WAL" } else { "DELETE" };
        conn.call(move |conn| -> Result<Result<(), BlankfillError>, rusqlite::Error> {
            conn.execute_batch(&format!(
                "PRAGMA journal_mode = {journal};
                 PRAGMA synchronous = NORMAL;
                 PRAGMA busy_timeout = 5000;
                 PRAGMA foreign_keys = ON;"
            ))?;
            Ok(crate::migrations::run_migrations(conn))
        })
        .await
        .map_err(map_tr_err)??;

        debug!(path, journal, "database opened");
        Ok(Self { conn })
    }

    /// The underlying async connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Run `op` inside one transaction on the database thread.
    ///
    /// Commits when `op` returns `Ok`, rolls back when it returns `Err`.
    /// The transaction takes the write lock up front so concurrent writers
    /// queue instead of failing on lock upgrade.
    pub async fn transact<T, F>(&self, op: F) -> Result<T, tokio_rusqlite::Error<rusqlite::Error>>
    where
        T: Send + 'static,
        F: FnOnce(&rusqlite::Transaction<'_>) -> Result<T, rusqlite::Error> + Send + 'static,
    {
        self.conn
            .call(move |conn| {
                let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
                match op(&tx) {
                    Ok(value) => {
                        tx.commit()?;
                        Ok(value)
                    }
                    Err(e) => {
                        if let Err(rollback) = tx.rollback() {
                            warn!(error = %rollback, "transaction rollback failed");
                        }
                        Err(e)
                    }
                }
            })
            .await
    }

    /// Checkpoint the WAL and close the connection.
    pub async fn close(self) -> Result<(), BlankfillError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        self.conn
            .close()
            .await
            .map_err(|e| BlankfillError::Storage {
                source: e.to_string().into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_file_and_schema() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested").join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        assert!(db_path.exists());

        let tables: Vec<String> = db
            .connection()
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'requests'",
                )?;
                let rows = stmt.query_map([], |row| row.get(0))?;
                let names = rows.collect::<Result<Vec<String>, _>>();
                names
            })
            .await
            .unwrap();
        assert_eq!(tables, vec!["requests".to_string()]);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn wal_mode_is_enabled() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("wal.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        let mode: String = db
            .connection()
            .call(|conn| conn.query_row("PRAGMA journal_mode", [], |row| row.get(0)))
            .await
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn reopen_does_not_reapply_migrations() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("reopen.db");
        let path = db_path.to_str().unwrap();
        Database::open(path).await.unwrap().close().await.unwrap();
        let db = Database::open(path).await.unwrap();
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn transact_rolls_back_on_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("rollback.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();

        let result = db
            .transact(|tx| {
                tx.execute(
                    "INSERT INTO requests (id, sentence, client) VALUES ('a', 's', 'c')",
                    [],
                )?;
                // Violates the status CHECK constraint.
                tx.execute(
                    "INSERT INTO requests (id, sentence, client, status) VALUES ('b', 's', 'c', 'DONE')",
                    [],
                )?;
                Ok(())
            })
            .await;
        assert!(result.is_err());

        let count: i64 = db
            .connection()
            .call(|conn| conn.query_row("SELECT COUNT(*) FROM requests", [], |row| row.get(0)))
            .await
            .unwrap();
        assert_eq!(count, 0, "first insert must be rolled back");
        db.close().await.unwrap();
    }
}
