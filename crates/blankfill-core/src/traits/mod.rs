// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Both adapters extend the [`PluginAdapter`] base trait. Async methods use
//! `#[async_trait]` so the traits stay object safe.

pub mod adapter;
pub mod inference;
pub mod storage;

pub use adapter::PluginAdapter;
pub use inference::InferenceAdapter;
pub use storage::StorageAdapter;
