// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sentence preparation for the masked language model.

use std::sync::LazyLock;

use blankfill_core::validation::PLACEHOLDER;
use regex::Regex;

/// Mask token understood by BERT-family tokenizers.
pub const MASK_TOKEN: &str = "[MASK]";

static STRIP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s<>]").unwrap());

/// Drop every character that is not a word character, whitespace, `<` or `>`.
pub fn clean(sentence: &str) -> String {
    STRIP.replace_all(sentence, "").into_owned()
}

/// Replace the `<blank>` placeholder with the model's mask token.
pub fn mask(sentence: &str) -> String {
    sentence.replace(PLACEHOLDER, MASK_TOKEN)
}

/// Clean a sentence and mask its placeholder.
pub fn prepare(sentence: &str) -> String {
    mask(&clean(sentence))
}
