// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inference adapter trait for the fill-in-the-blank pipeline.

use crate::error::BlankfillError;
use crate::traits::adapter::PluginAdapter;

/// Adapter that proposes completions for a sentence's `<blank>`.
///
/// `predict` is synchronous and may block for as long as the models take.
/// Callers on an async runtime must move it onto a blocking thread.
pub trait InferenceAdapter: PluginAdapter {
    /// Return the accepted completions for `sentence`, in ranking order.
    ///
    /// An empty list is a valid answer, not a failure.
    fn predict(&self, sentence: &str) -> Result<Vec<String>, BlankfillError>;
}
