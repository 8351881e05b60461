// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The request lifecycle controller.
//!
//! Drives a request through `SUBMITTED -> RUNNING -> COMPLETED | FAILED`.
//! Every step commits on its own, so a crash part-way leaves the request in
//! whatever status was last written.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use blankfill_core::{
    BlankfillError, InferenceAdapter, NewRequest, Page, PageRequest, RequestRecord,
    RequestStatus, SearchFilter, StorageAdapter,
};

/// Orchestrates persistence and inference for fill-in-the-blank requests.
///
/// Holds no request state between calls; every read goes to the store.
#[derive(Clone)]
pub struct RequestController {
    store: Arc<dyn StorageAdapter>,
    inference: Arc<dyn InferenceAdapter>,
}

impl RequestController {
    pub fn new(store: Arc<dyn StorageAdapter>, inference: Arc<dyn InferenceAdapter>) -> Self {
        Self { store, inference }
    }

    /// The storage backend, for health checks and shutdown.
    pub fn store(&self) -> &Arc<dyn StorageAdapter> {
        &self.store
    }

    /// The inference backend, for health checks and shutdown.
    pub fn inference(&self) -> &Arc<dyn InferenceAdapter> {
        &self.inference
    }

    /// Validate and persist a new `SUBMITTED` request without running it.
    pub async fn create(&self, request: NewRequest) -> Result<RequestRecord, BlankfillError> {
        request.validate()?;
        let record = RequestRecord::submitted(request);
        let stored = self.store.insert(&record).await?;
        info!(request_id = %stored.id, client = %stored.client, "request submitted");
        Ok(stored)
    }

    /// Create a request, run inference on it and return its final stored state.
    ///
    /// Only validation and the initial insert can fail the call. Inference
    /// failures end in `FAILED`; storage failures after the insert are logged
    /// and the request is returned as last persisted.
    pub async fn submit(&self, request: NewRequest) -> Result<RequestRecord, BlankfillError> {
        let record = self.create(request).await?;
        self.process(&record).await;
        self.retrieve(&record.id).await
    }

    /// Fetch a request by identifier.
    pub async fn retrieve(&self, id: &str) -> Result<RequestRecord, BlankfillError> {
        self.store.get(id).await
    }

    /// One page of requests matching `filter`, oldest first.
    pub async fn search(
        &self,
        filter: &SearchFilter,
        page: PageRequest,
    ) -> Result<Page<RequestRecord>, BlankfillError> {
        self.store.search(filter, page).await
    }

    pub async fn update_status(
        &self,
        id: &str,
        status: RequestStatus,
    ) -> Result<RequestRecord, BlankfillError> {
        self.store.update_status(id, status).await
    }

    pub async fn update_results(
        &self,
        id: &str,
        results: &[String],
    ) -> Result<RequestRecord, BlankfillError> {
        self.store.update_results(id, results).await
    }

    /// Run a freshly created request to a terminal status, best effort.
    async fn process(&self, record: &RequestRecord) {
        let id = record.id.as_str();

        if let Err(e) = self.update_status(id, RequestStatus::Running).await {
            error!(request_id = %id, error = %e, "critical: failed to mark request running");
            self.fail(id).await;
            return;
        }

        match self.infer(&record.sentence).await {
            Ok(results) => {
                debug!(request_id = %id, ?results, "inference finished");
                if let Err(e) = self.update_results(id, &results).await {
                    error!(request_id = %id, error = %e, "critical: failed to store results");
                    self.fail(id).await;
                    return;
                }
                match self.update_status(id, RequestStatus::Completed).await {
                    Ok(_) => info!(request_id = %id, results = results.len(), "request completed"),
                    Err(e) => {
                        error!(request_id = %id, error = %e, "critical: failed to mark request completed");
                        self.fail(id).await;
                    }
                }
            }
            Err(e) => {
                warn!(request_id = %id, error = %e, "inference failed");
                self.fail(id).await;
            }
        }
    }

    async fn fail(&self, id: &str) {
        match self.update_status(id, RequestStatus::Failed).await {
            Ok(_) => info!(request_id = %id, "request failed"),
            Err(e) => error!(request_id = %id, error = %e, "critical: failed to mark request failed"),
        }
    }

    /// Run inference on the blocking pool. A panic counts as a failure.
    async fn infer(&self, sentence: &str) -> Result<Vec<String>, BlankfillError> {
        let inference = Arc::clone(&self.inference);
        let sentence = sentence.to_owned();
        tokio::task::spawn_blocking(move || inference.predict(&sentence))
            .await
            .map_err(|e| BlankfillError::inference(format!("inference task aborted: {e}")))?
    }
}
