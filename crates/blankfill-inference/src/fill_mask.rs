// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Masked-word prediction with a BERT-family ONNX model.

use std::sync::Mutex;

use ort::session::Session;
use ort::value::TensorRef;
use tracing::debug;

use blankfill_core::BlankfillError;

use crate::model_manager::ModelFiles;
use crate::onnx::{encode, load_session, load_tokenizer, top_k_indices};
use crate::pipeline::MaskFiller;
use crate::preprocess::MASK_TOKEN;

/// ONNX masked language model.
///
/// Scores the vocabulary at the first `[MASK]` position and returns the
/// highest-ranked tokens as the tokenizer spells them.
pub struct OnnxFillMask {
    /// ONNX Runtime session; `run` needs exclusive access.
    session: Mutex<Session>,
    tokenizer: tokenizers::Tokenizer,
    mask_token_id: u32,
}

impl OnnxFillMask {
    /// Load the model and tokenizer named by `files`.
    pub fn new(files: &ModelFiles) -> Result<Self, BlankfillError> {
        let tokenizer = load_tokenizer(&files.tokenizer)?;
        let mask_token_id = tokenizer.token_to_id(MASK_TOKEN).ok_or_else(|| {
            BlankfillError::inference(format!(
                "tokenizer at {} has no {MASK_TOKEN} token",
                files.tokenizer.display()
            ))
        })?;
        let session = load_session(&files.model)?;

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            mask_token_id,
        })
    }

    /// Vocabulary scores at the first mask position of `masked`.
    fn mask_logits(&self, masked: &str) -> Result<Vec<f32>, BlankfillError> {
        let encoded = encode(&self.tokenizer, masked)?;
        let position = encoded
            .ids
            .iter()
            .position(|&id| id == self.mask_token_id)
            .ok_or_else(|| {
                BlankfillError::inference(format!("sentence has no {MASK_TOKEN} token: {masked}"))
            })?;

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
        let token_type_ids = TensorRef::from_array_view(&encoded.token_type_ids).map_err(|e| {
            BlankfillError::inference(format!("failed to create token_type_ids TensorRef: {e}"))
        })?;

        let outputs = session
            .run(ort::inputs![
                "input_ids" => input_ids,
                "attention_mask" => attention_mask,
                "token_type_ids" => token_type_ids
            ])
            .map_err(|e| BlankfillError::inference(format!("fill-mask inference failed: {e}")))?;

        // Logits have shape [1, seq_len, vocab_size].
        let (shape, data) = outputs[0].try_extract_tensor::<f32>().map_err(|e| {
            BlankfillError::inference(format!("failed to extract logits tensor: {e}"))
        })?;
        Ok(logits_row(&shape[..], data, position)?.to_vec())
    }
}

/// The vocabulary scores for one sequence position of `[.., seq_len, vocab]` logits.
fn logits_row<'a>(
    shape: &[i64],
    data: &'a [f32],
    position: usize,
) -> Result<&'a [f32], BlankfillError> {
    let vocab_size = shape
        .last()
        .and_then(|&dim| usize::try_from(dim).ok())
        .filter(|&dim| dim > 0)
        .ok_or_else(|| {
            BlankfillError::inference(format!("unexpected logits shape {shape:?}"))
        })?;
    position
        .checked_mul(vocab_size)
        .and_then(|start| data.get(start..start.checked_add(vocab_size)?))
        .ok_or_else(|| {
            BlankfillError::inference(format!(
                "logits tensor too small for mask position {position}"
            ))
        })
}

impl MaskFiller for OnnxFillMask {
    fn fill(&self, masked: &str, top_k: usize) -> Result<Vec<String>, BlankfillError> {
        let logits = self.mask_logits(masked)?;
        let tokens: Vec<String> = top_k_indices(&logits, top_k)
            .into_iter()
            .filter_map(|id| u32::try_from(id).ok())
            .filter_map(|id| self.tokenizer.id_to_token(id))
            .collect();
        debug!(sentence = masked, ?tokens, "fill-mask candidates");
        Ok(tokens)
    }
}
