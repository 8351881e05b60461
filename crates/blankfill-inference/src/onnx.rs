// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared ONNX Runtime and tokenizer plumbing.

use std::path::Path;

use blankfill_core::BlankfillError;
use ndarray::Array2;
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;

/// Build an inference error that keeps the underlying cause.
pub(crate) fn inference_err(
    message: impl Into<String>,
    source: impl std::error::Error + Send + Sync + 'static,
) -> BlankfillError {
    BlankfillError::Inference {
        message: message.into(),
        source: Some(Box::new(source)),
    }
}

/// Load an ONNX model for single-threaded CPU inference.
pub(crate) fn load_session(model_path: &Path) -> Result<Session, BlankfillError> {
    Session::builder()
        .map_err(|e| BlankfillError::inference(format!("failed to create ONNX session builder: {e}")))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| BlankfillError::inference(format!("failed to set optimization level: {e}")))?
        .with_intra_threads(1)
        .map_err(|e| BlankfillError::inference(format!("failed to set thread count: {e}")))?
        .commit_from_file(model_path)
        .map_err(|e| {
            BlankfillError::inference(format!(
                "failed to load ONNX model from {}: {e}",
                model_path.display()
            ))
        })
}

/// Load a HuggingFace `tokenizer.json`.
pub(crate) fn load_tokenizer(path: &Path) -> Result<tokenizers::Tokenizer, BlankfillError> {
    tokenizers::Tokenizer::from_file(path).map_err(|e| {
        BlankfillError::inference(format!(
            "failed to load tokenizer from {}: {e}",
            path.display()
        ))
    })
}

/// A tokenized single-sentence batch, shaped `[1, seq_len]`.
pub(crate) struct Encoded {
    pub ids: Vec<u32>,
    pub input_ids: Array2<i64>,
    pub attention_mask: Array2<i64>,
    pub token_type_ids: Array2<i64>,
}

/// Tokenize `text` with special tokens into model-ready arrays.
pub(crate) fn encode(
    tokenizer: &tokenizers::Tokenizer,
    text: &str,
) -> Result<Encoded, BlankfillError> {
    let encoding = tokenizer
        .encode(text, true)
        .map_err(|e| BlankfillError::inference(format!("tokenization failed: {e}")))?;

    let ids = encoding.get_ids().to_vec();
    let widen = |values: &[u32]| values.iter().map(|&v| i64::from(v)).collect::<Vec<_>>();
    let shape = (1, ids.len());

    let array = |name: &str, values: Vec<i64>| {
        Array2::from_shape_vec(shape, values)
            .map_err(|e| inference_err(format!("failed to create {name} tensor"), e))
    };

    Ok(Encoded {
        input_ids: array("input_ids", widen(&ids))?,
        attention_mask: array("attention_mask", widen(encoding.get_attention_mask()))?,
        token_type_ids: array("token_type_ids", widen(encoding.get_type_ids()))?,
        ids,
    })
}

/// Numerically stable softmax.
pub(crate) fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum > 0.0 {
        exps.into_iter().map(|e| e / sum).collect()
    } else {
        exps
    }
}

/// Indices of the `k` largest values, highest first. Ties keep index order.
pub(crate) fn top_k_indices(values: &[f32], k: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..values.len()).collect();
    indices.sort_by(|&a, &b| values[b].total_cmp(&values[a]).then(a.cmp(&b)));
    indices.truncate(k);
    indices
}
