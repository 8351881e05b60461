// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local ONNX inference for Blankfill.
//!
//! A BERT masked language model proposes words for the `<blank>` of a
//! sentence, and a DistilBERT SST-2 classifier keeps only the positive ones.
//! Models are fetched from HuggingFace on first run.

pub mod fill_mask;
pub(crate) mod onnx;
pub mod model_manager;
pub mod pipeline;
pub mod preprocess;
pub mod sentiment;

pub use fill_mask::OnnxFillMask;
pub use model_manager::{ModelFiles, ModelManager};
pub use pipeline::{FillInPipeline, MaskFiller, SentimentFilter};
pub use sentiment::{OnnxSentiment, Sentiment};
