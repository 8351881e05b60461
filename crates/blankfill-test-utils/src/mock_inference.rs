// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock inference adapter for deterministic testing.
//!
//! `MockInference` implements `InferenceAdapter` with scripted outcomes, so
//! lifecycle and HTTP tests run without ONNX models.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use blankfill_core::{AdapterType, BlankfillError, HealthStatus, InferenceAdapter, PluginAdapter};

/// One scripted `predict` outcome. `Err` carries the failure message.
pub type Outcome = Result<Vec<String>, String>;

/// An inference adapter that returns pre-configured outcomes.
///
/// Outcomes are popped from a FIFO queue. When the queue is empty the
/// fallback outcome is returned, which defaults to an empty result list.
pub struct MockInference {
    queue: Mutex<VecDeque<Outcome>>,
    fallback: Outcome,
    calls: Mutex<Vec<String>>,
}

impl MockInference {
    /// A mock that always returns no completions.
    pub fn new() -> Self {
        Self::with_fallback(Ok(Vec::new()))
    }

    /// A mock that always returns `results`.
    pub fn with_results<S: Into<String>>(results: impl IntoIterator<Item = S>) -> Self {
        Self::with_fallback(Ok(results.into_iter().map(Into::into).collect()))
    }

    /// A mock whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_fallback(Err(message.into()))
    }

    fn with_fallback(fallback: Outcome) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue an outcome for the next unscripted call.
    pub fn push(&self, outcome: Outcome) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.push_back(outcome);
        }
    }

    /// Sentences passed to `predict`, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn next_outcome(&self) -> Outcome {
        self.queue
            .lock()
            .ok()
            .and_then(|mut q| q.pop_front())
            .unwrap_or_else(|| self.fallback.clone())
    }
}

impl Default for MockInference {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockInference {
    fn name(&self) -> &str {
        "mock-inference"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Inference
    }

    async fn health_check(&self) -> Result<HealthStatus, BlankfillError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), BlankfillError> {
        Ok(())
    }
}

impl InferenceAdapter for MockInference {
    fn predict(&self, sentence: &str) -> Result<Vec<String>, BlankfillError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(sentence.to_string());
        }
        self.next_outcome().map_err(BlankfillError::inference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_outcomes_come_before_fallback() {
        let mock = MockInference::with_results(["great"]);
        mock.push(Err("boom".into()));
        mock.push(Ok(vec!["good".into()]));

        assert!(mock.predict("a").is_err());
        assert_eq!(mock.predict("b").unwrap(), vec!["good"]);
        assert_eq!(mock.predict("c").unwrap(), vec!["great"]);
        assert_eq!(mock.calls(), vec!["a", "b", "c"]);
    }

    #[test]
    fn failing_mock_always_fails() {
        let mock = MockInference::failing("model missing");
        let err = mock.predict("a <blank>").unwrap_err();
        assert!(err.to_string().contains("model missing"));
    }
}
