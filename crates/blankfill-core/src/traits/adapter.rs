// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait shared by storage and inference backends.

use async_trait::async_trait;

use crate::error::BlankfillError;
use crate::types::{AdapterType, HealthStatus};

/// The base trait for all Blankfill adapters.
///
/// Provides identity, health reporting, and shutdown for every backend the
/// lifecycle controller is wired to.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Returns the kind of adapter.
    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, BlankfillError>;

    /// Gracefully shuts down the adapter, releasing any held resources.
    async fn shutdown(&self) -> Result<(), BlankfillError>;
}
