// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a [`RequestController`] over a temp SQLite
//! database and a [`MockInference`]. The store is wrapped in a
//! [`FailingStorage`] so tests can inject faults into any operation.

use std::sync::Arc;

use blankfill_config::model::StorageConfig;
use blankfill_core::{BlankfillError, NewRequest, RequestRecord, StorageAdapter};
use blankfill_lifecycle::RequestController;
use blankfill_storage::SqliteStorage;

use crate::failing_storage::FailingStorage;
use crate::mock_inference::MockInference;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    inference: MockInference,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            inference: MockInference::new(),
        }
    }

    /// Make every inference call return `results`.
    pub fn with_results<S: Into<String>>(mut self, results: impl IntoIterator<Item = S>) -> Self {
        self.inference = MockInference::with_results(results);
        self
    }

    /// Use a preconfigured inference mock.
    pub fn with_inference(mut self, inference: MockInference) -> Self {
        self.inference = inference;
        self
    }

    /// Build the test harness, creating and migrating a temp database.
    pub async fn build(self) -> Result<TestHarness, BlankfillError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| BlankfillError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");

        let storage = SqliteStorage::new(StorageConfig {
            database_path: db_path.to_string_lossy().into_owned(),
            wal_mode: true,
        });
        storage.initialize().await?;

        let storage = Arc::new(FailingStorage::new(Arc::new(storage)));
        let inference = Arc::new(self.inference);
        let controller = RequestController::new(storage.clone(), inference.clone());
        tracing::debug!(path = %db_path.display(), "test harness ready");

        Ok(TestHarness {
            controller,
            storage,
            inference,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment with mock inference and temp storage.
pub struct TestHarness {
    /// Controller wired to the storage and inference below.
    pub controller: RequestController,
    /// SQLite storage behind a fault injector (temp DB, removed on drop).
    pub storage: Arc<FailingStorage>,
    /// The mock inference adapter.
    pub inference: Arc<MockInference>,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Submit a request through the controller.
    pub async fn submit(&self, sentence: &str, client: &str) -> Result<RequestRecord, BlankfillError> {
        self.controller.submit(NewRequest::new(sentence, client)).await
    }

    /// The storage adapter as a trait object.
    pub fn store(&self) -> Arc<dyn StorageAdapter> {
        self.storage.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failing_storage::StorageOp;
    use blankfill_core::{PageRequest, RequestStatus, SearchFilter};

    #[tokio::test]
    async fn harness_runs_the_full_lifecycle() {
        let harness = TestHarness::builder()
            .with_results(["great", "good"])
            .build()
            .await
            .unwrap();

        let record = harness.submit("have a <blank> day", "ioanna").await.unwrap();
        assert_eq!(record.status, RequestStatus::Completed);
        assert_eq!(record.results, vec!["great", "good"]);
        assert_eq!(harness.inference.calls(), vec!["have a <blank> day"]);
    }

    #[tokio::test]
    async fn failed_insert_surfaces_and_stores_nothing() {
        let harness = TestHarness::builder().build().await.unwrap();
        harness.storage.fail_on(StorageOp::Insert);

        let err = harness.submit("a <blank> day", "acme").await.unwrap_err();
        assert!(matches!(err, BlankfillError::UnexpectedStore { .. }));
        assert!(harness.inference.calls().is_empty());

        harness.storage.recover(StorageOp::Insert);
        let page = harness
            .store()
            .search(&SearchFilter::default(), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn failed_result_write_ends_in_failed() {
        let harness = TestHarness::builder()
            .with_results(["great"])
            .build()
            .await
            .unwrap();
        harness.storage.fail_on(StorageOp::UpdateResults);

        let record = harness.submit("a <blank> day", "acme").await.unwrap();
        assert_eq!(record.status, RequestStatus::Failed);
        assert!(record.results.is_empty());
    }

    #[tokio::test]
    async fn failed_completion_write_ends_in_failed() {
        let harness = TestHarness::builder()
            .with_results(["great"])
            .build()
            .await
            .unwrap();
        harness.storage.fail_status(RequestStatus::Completed);

        let record = harness.submit("have a <blank> day", "ioanna").await.unwrap();
        assert_eq!(record.status, RequestStatus::Failed);
        assert_eq!(record.results, vec!["great"]);
    }

    #[tokio::test]
    async fn failed_final_read_propagates() {
        let harness = TestHarness::builder().build().await.unwrap();
        harness.storage.fail_on(StorageOp::Get);

        let err = harness.submit("a <blank> day", "acme").await.unwrap_err();
        assert!(matches!(err, BlankfillError::Storage { .. }));
    }
}
