// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Blankfill integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic tests without ONNX models.
//!
//! # Components
//!
//! - [`MockInference`] - Inference adapter with scripted outcomes
//! - [`FailingStorage`] - Storage wrapper with fault injection
//! - [`TestHarness`] - Controller over a temp database

pub mod failing_storage;
pub mod harness;
pub mod mock_inference;

pub use failing_storage::{FailingStorage, StorageOp};
pub use harness::TestHarness;
pub use mock_inference::MockInference;
