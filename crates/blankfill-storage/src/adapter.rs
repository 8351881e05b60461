// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use blankfill_config::model::StorageConfig;
use blankfill_core::{
    AdapterType, BlankfillError, HealthStatus, Page, PageRequest, PluginAdapter, RequestRecord,
    RequestStatus, SearchFilter, StorageAdapter,
};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates to the typed query modules. The
/// database is opened by [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`StorageAdapter::initialize`] is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, BlankfillError> {
        self.db.get().ok_or_else(|| BlankfillError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    async fn checkpoint(&self) -> Result<(), BlankfillError> {
        self.db()?
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, BlankfillError> {
        self.db()?
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), BlankfillError> {
        if self.db.get().is_some() {
            self.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), BlankfillError> {
        let path = &self.config.database_path;
        let db = Database::open_with(path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| BlankfillError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), BlankfillError> {
        self.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    async fn insert(&self, record: &RequestRecord) -> Result<RequestRecord, BlankfillError> {
        let db = self.db().map_err(|e| BlankfillError::UnexpectedStore {
            source: Box::new(e),
        })?;
        queries::requests::insert(db, record).await
    }

    async fn get(&self, id: &str) -> Result<RequestRecord, BlankfillError> {
        queries::requests::get(self.db()?, id).await
    }

    async fn update_status(
        &self,
        id: &str,
        status: RequestStatus,
    ) -> Result<RequestRecord, BlankfillError> {
        queries::requests::update_status(self.db()?, id, status).await
    }

    async fn update_results(
        &self,
        id: &str,
        results: &[String],
    ) -> Result<RequestRecord, BlankfillError> {
        queries::requests::update_results(self.db()?, id, results).await
    }

    async fn search(
        &self,
        filter: &SearchFilter,
        page: PageRequest,
    ) -> Result<Page<RequestRecord>, BlankfillError> {
        queries::search::paginate(self.db()?, filter, page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blankfill_core::NewRequest;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn sqlite_storage_implements_plugin_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert_eq!(storage.name(), "sqlite");
        assert_eq!(storage.version(), semver::Version::new(0, 1, 0));
        assert_eq!(storage.adapter_type(), AdapterType::Storage);
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("double_init.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        storage.initialize().await.unwrap();
        assert!(storage.initialize().await.is_err());
    }

    #[tokio::test]
    async fn health_check_reflects_initialization() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("health.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert!(storage.health_check().await.is_err());
        storage.initialize().await.unwrap();
        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn insert_before_initialize_is_unexpected_store_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("uninit.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));
        let record = RequestRecord::submitted(NewRequest::new("a <blank>", "c"));

        let err = storage.insert(&record).await.unwrap_err();
        assert!(matches!(err, BlankfillError::UnexpectedStore { .. }));
    }

    #[tokio::test]
    async fn full_request_lifecycle_through_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("lifecycle.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));
        storage.initialize().await.unwrap();

        let record = RequestRecord::submitted(NewRequest::new("have a <blank> day", "ioanna"));
        storage.insert(&record).await.unwrap();
        storage
            .update_status(&record.id, RequestStatus::Running)
            .await
            .unwrap();
        storage
            .update_results(&record.id, &["great".to_string()])
            .await
            .unwrap();
        storage
            .update_status(&record.id, RequestStatus::Completed)
            .await
            .unwrap();

        let stored = storage.get(&record.id).await.unwrap();
        assert_eq!(stored.status, RequestStatus::Completed);
        assert_eq!(stored.results, vec!["great".to_string()]);

        let page = storage
            .search(&SearchFilter::default(), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);

        storage.shutdown().await.unwrap();
    }
}
