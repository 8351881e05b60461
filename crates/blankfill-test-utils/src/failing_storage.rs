// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage wrapper that injects backend failures into chosen operations.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use blankfill_core::error::BoxError;
use blankfill_core::{
    AdapterType, BlankfillError, HealthStatus, Page, PageRequest, PluginAdapter, RequestRecord,
    RequestStatus, SearchFilter, StorageAdapter,
};

/// A storage operation that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageOp {
    Insert,
    Get,
    UpdateStatus,
    UpdateResults,
    Search,
}

/// Delegates to a real store, failing the operations it has been told to.
///
/// Injected failures use the error each operation reports for a backend
/// fault: `UnexpectedStore` for inserts, `CriticalStore` for updates and
/// `Storage` for reads.
pub struct FailingStorage {
    inner: Arc<dyn StorageAdapter>,
    failing: Mutex<HashSet<StorageOp>>,
    failing_statuses: Mutex<HashSet<RequestStatus>>,
}

impl FailingStorage {
    pub fn new(inner: Arc<dyn StorageAdapter>) -> Self {
        Self {
            inner,
            failing: Mutex::new(HashSet::new()),
            failing_statuses: Mutex::new(HashSet::new()),
        }
    }

    /// Make `op` fail from now on.
    pub fn fail_on(&self, op: StorageOp) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.insert(op);
        }
    }

    /// Make status writes to `status` fail, leaving other transitions alone.
    pub fn fail_status(&self, status: RequestStatus) {
        if let Ok(mut failing) = self.failing_statuses.lock() {
            failing.insert(status);
        }
    }

    /// Let `op` reach the real store again.
    pub fn recover(&self, op: StorageOp) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.remove(&op);
        }
    }

    fn check(&self, op: StorageOp) -> Result<(), BlankfillError> {
        let fails = self.failing.lock().map(|f| f.contains(&op)).unwrap_or(false);
        if !fails {
            return Ok(());
        }
        let source: BoxError = format!("injected failure in {op:?}").into();
        Err(match op {
            StorageOp::Insert => BlankfillError::UnexpectedStore { source },
            StorageOp::UpdateStatus | StorageOp::UpdateResults => BlankfillError::CriticalStore {
                message: "update rolled back".into(),
                source,
            },
            StorageOp::Get | StorageOp::Search => BlankfillError::Storage { source },
        })
    }
}

#[async_trait]
impl PluginAdapter for FailingStorage {
    fn name(&self) -> &str {
        "failing-storage"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, BlankfillError> {
        self.inner.health_check().await
    }

    async fn shutdown(&self) -> Result<(), BlankfillError> {
        self.inner.shutdown().await
    }
}

#[async_trait]
impl StorageAdapter for FailingStorage {
    async fn initialize(&self) -> Result<(), BlankfillError> {
        self.inner.initialize().await
    }

    async fn close(&self) -> Result<(), BlankfillError> {
        self.inner.close().await
    }

    async fn insert(&self, record: &RequestRecord) -> Result<RequestRecord, BlankfillError> {
        self.check(StorageOp::Insert)?;
        self.inner.insert(record).await
    }

    async fn get(&self, id: &str) -> Result<RequestRecord, BlankfillError> {
        self.check(StorageOp::Get)?;
        self.inner.get(id).await
    }

    async fn update_status(
        &self,
        id: &str,
        status: RequestStatus,
    ) -> Result<RequestRecord, BlankfillError> {
        self.check(StorageOp::UpdateStatus)?;
        let status_fails = self
            .failing_statuses
            .lock()
            .map(|f| f.contains(&status))
            .unwrap_or(false);
        if status_fails {
            return Err(BlankfillError::CriticalStore {
                message: format!("update to {status} rolled back"),
                source: format!("injected failure writing {status}").into(),
            });
        }
        self.inner.update_status(id, status).await
    }

    async fn update_results(
        &self,
        id: &str,
        results: &[String],
    ) -> Result<RequestRecord, BlankfillError> {
        self.check(StorageOp::UpdateResults)?;
        self.inner.update_results(id, results).await
    }

    async fn search(
        &self,
        filter: &SearchFilter,
        page: PageRequest,
    ) -> Result<Page<RequestRecord>, BlankfillError> {
        self.check(StorageOp::Search)?;
        self.inner.search(filter, page).await
    }
}
