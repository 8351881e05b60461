// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for request persistence backends.

use async_trait::async_trait;

use crate::error::BlankfillError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Page, PageRequest, RequestRecord, RequestStatus, SearchFilter};

/// Adapter for persisting fill-in-the-blank requests.
///
/// Every operation is its own transaction: it commits on success and rolls
/// back on failure. No operation spans more than one mutation, so a sequence
/// of calls is not atomic as a whole.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (connection, migrations).
    async fn initialize(&self) -> Result<(), BlankfillError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), BlankfillError>;

    /// Persist a new request.
    ///
    /// Fails with [`BlankfillError::DuplicateKey`] on an identifier collision
    /// and [`BlankfillError::UnexpectedStore`] on any other backend failure.
    async fn insert(&self, record: &RequestRecord) -> Result<RequestRecord, BlankfillError>;

    /// Fetch a request by identifier, or [`BlankfillError::NotFound`].
    async fn get(&self, id: &str) -> Result<RequestRecord, BlankfillError>;

    /// Move a request to `status` and refresh its `updated` timestamp.
    ///
    /// Rejects non-forward moves with [`BlankfillError::InvalidTransition`].
    /// Backend failures surface as [`BlankfillError::CriticalStore`].
    async fn update_status(
        &self,
        id: &str,
        status: RequestStatus,
    ) -> Result<RequestRecord, BlankfillError>;

    /// Replace the results of a running request and refresh `updated`.
    ///
    /// Rejects writes outside `RUNNING` with [`BlankfillError::ResultsNotWritable`].
    /// Backend failures surface as [`BlankfillError::CriticalStore`].
    async fn update_results(
        &self,
        id: &str,
        results: &[String],
    ) -> Result<RequestRecord, BlankfillError>;

    /// Return one page of requests matching `filter`, oldest first.
    async fn search(
        &self,
        filter: &SearchFilter,
        page: PageRequest,
    ) -> Result<Page<RequestRecord>, BlankfillError>;
}
