// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Binary sentiment classification with a DistilBERT SST-2 ONNX model.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::TensorRef;
use serde::Deserialize;

use blankfill_core::BlankfillError;

use crate::model_manager::ModelFiles;
use crate::onnx::{encode, load_session, load_tokenizer, softmax};
use crate::pipeline::SentimentFilter;

/// Label the filter keeps.
pub const POSITIVE: &str = "POSITIVE";

/// The winning label and its probability.
#[derive(Debug, Clone, PartialEq)]
pub struct Sentiment {
    pub label: String,
    pub score: f32,
}

/// The part of a HuggingFace `config.json` naming the output classes.
#[derive(Debug, Deserialize)]
struct LabelConfig {
    #[serde(default)]
    id2label: BTreeMap<String, String>,
}

/// Read class labels ordered by class index, defaulting to SST-2 order.
fn read_labels(config_path: &Path) -> Vec<String> {
    let parsed = std::fs::read_to_string(config_path)
        .ok()
        .and_then(|raw| serde_json::from_str::<LabelConfig>(&raw).ok());

    let mut indexed: Vec<(usize, String)> = parsed
        .map(|c| c.id2label)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(idx, label)| idx.parse().ok().map(|i| (i, label)))
        .collect();

    if indexed.is_empty() {
        return vec!["NEGATIVE".to_string(), POSITIVE.to_string()];
    }
    indexed.sort_by_key(|(i, _)| *i);
    indexed.into_iter().map(|(_, label)| label).collect()
}

/// ONNX sequence classifier returning POSITIVE or NEGATIVE.
pub struct OnnxSentiment {
    session: Mutex<Session>,
    tokenizer: tokenizers::Tokenizer,
    labels: Vec<String>,
}

impl OnnxSentiment {
    /// Load the model, tokenizer and label names named by `files`.
    pub fn new(files: &ModelFiles) -> Result<Self, BlankfillError> {
        let tokenizer = load_tokenizer(&files.tokenizer)?;
        let session = load_session(&files.model)?;
        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            labels: read_labels(&files.config),
        })
    }

    /// Classify `text`.
    pub fn classify(&self, text: &str) -> Result<Sentiment, BlankfillError> {
        let encoded = encode(&self.tokenizer, text)?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| BlankfillError::inference(format!("failed to lock ONNX session: {e}")))?;

        let input_ids = TensorRef::from_array_view(&encoded.input_ids).map_err(|e| {
            BlankfillError::inference(format!("failed to create input_ids TensorRef: {e}"))
        })?;
        let attention_mask = TensorRef::from_array_view(&encoded.attention_mask).map_err(|e| {
            BlankfillError::inference(format!("failed to create attention_mask TensorRef: {e}"))
        })?;

        // DistilBERT takes no token_type_ids.
        let outputs = session
            .run(ort::inputs![
                "input_ids" => input_ids,
                "attention_mask" => attention_mask
            ])
            .map_err(|e| BlankfillError::inference(format!("sentiment inference failed: {e}")))?;

        // Logits have shape [1, num_labels].
        let (_, data) = outputs[0].try_extract_tensor::<f32>().map_err(|e| {
            BlankfillError::inference(format!("failed to extract logits tensor: {e}"))
        })?;
        pick_label(&self.labels, data)
    }
}

/// Choose the most probable label from raw logits.
fn pick_label(labels: &[String], logits: &[f32]) -> Result<Sentiment, BlankfillError> {
    let probs = softmax(logits);
    let (index, score) = probs
        .iter()
        .copied()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .ok_or_else(|| BlankfillError::inference("sentiment model returned no logits"))?;
    let label = labels.get(index).cloned().ok_or_else(|| {
        BlankfillError::inference(format!("sentiment class {index} has no label"))
    })?;
    Ok(Sentiment { label, score })
}

impl SentimentFilter for OnnxSentiment {
    fn is_positive(&self, text: &str) -> Result<bool, BlankfillError> {
        Ok(self.classify(text)?.label == POSITIVE)
    }
}
