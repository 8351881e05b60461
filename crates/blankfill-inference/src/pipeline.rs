// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The fill-in-the-blank pipeline: preprocess, fill the mask, keep positives.

use async_trait::async_trait;
use tracing::{debug, info};

use blankfill_config::model::InferenceConfig;
use blankfill_core::{AdapterType, BlankfillError, HealthStatus, InferenceAdapter, PluginAdapter};

use crate::fill_mask::OnnxFillMask;
use crate::model_manager::ModelManager;
use crate::preprocess::prepare;
use crate::sentiment::OnnxSentiment;

/// Proposes words for the mask token of a prepared sentence.
pub trait MaskFiller: Send + Sync {
    /// Up to `top_k` candidate tokens, best first.
    fn fill(&self, masked: &str, top_k: usize) -> Result<Vec<String>, BlankfillError>;
}

/// Decides whether a candidate word reads as positive.
pub trait SentimentFilter: Send + Sync {
    fn is_positive(&self, text: &str) -> Result<bool, BlankfillError>;
}

/// Fill-mask followed by a positive-sentiment filter.
pub struct FillInPipeline {
    filler: Box<dyn MaskFiller>,
    sentiment: Box<dyn SentimentFilter>,
    top_k: usize,
}

impl FillInPipeline {
    pub fn new(
        filler: Box<dyn MaskFiller>,
        sentiment: Box<dyn SentimentFilter>,
        top_k: usize,
    ) -> Self {
        Self {
            filler,
            sentiment,
            top_k,
        }
    }

    /// Load both ONNX models named in `config`.
    ///
    /// Missing model files are downloaded first when `auto_download` is set.
    pub async fn from_config(config: &InferenceConfig) -> Result<Self, BlankfillError> {
        let manager = ModelManager::new(&config.model_dir);
        let (fill_files, sentiment_files) = if config.auto_download {
            (
                manager.ensure(&config.fill_mask_model).await?,
                manager.ensure(&config.sentiment_model).await?,
            )
        } else {
            (
                manager.require(&config.fill_mask_model)?,
                manager.require(&config.sentiment_model)?,
            )
        };

        let filler = OnnxFillMask::new(&fill_files)?;
        let sentiment = OnnxSentiment::new(&sentiment_files)?;
        info!(
            fill_mask = %config.fill_mask_model,
            sentiment = %config.sentiment_model,
            top_k = config.top_k,
            "inference pipeline loaded"
        );

        Ok(Self::new(Box::new(filler), Box::new(sentiment), config.top_k))
    }

    /// Run the pipeline on a raw sentence.
    pub fn run(&self, sentence: &str) -> Result<Vec<String>, BlankfillError> {
        let prepared = prepare(sentence);
        debug!(sentence, prepared = %prepared, "preprocessed sentence");

        let suggestions = self.filler.fill(&prepared, self.top_k)?;
        if suggestions.is_empty() {
            return Ok(Vec::new());
        }

        let mut accepted = Vec::with_capacity(suggestions.len());
        for suggestion in suggestions {
            if self.sentiment.is_positive(&suggestion)? {
                accepted.push(suggestion);
            }
        }
        debug!(sentence, ?accepted, "sentiment filter applied");
        Ok(accepted)
    }
}

#[async_trait]
impl PluginAdapter for FillInPipeline {
    fn name(&self) -> &str {
        "onnx-fill-in"
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

impl InferenceAdapter for FillInPipeline {
    fn predict(&self, sentence: &str) -> Result<Vec<String>, BlankfillError> {
        self.run(sentence)
    }
}
