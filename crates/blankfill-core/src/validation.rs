// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Input rules for submitted sentences.
//!
//! Rules are checked in a fixed order and the first failure is reported:
//! 1. The `<blank>` placeholder is present.
//! 2. The sentence has between 1 and 10 words.
//! 3. Every character is ASCII.
//! 4. Only word characters, whitespace and `< > , . ! ?` appear.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::BlankfillError;

/// Placeholder marking the word to fill in.
pub const PLACEHOLDER: &str = "<blank>";

/// Inclusive word-count bounds. The placeholder itself counts as a word.
pub const MIN_WORDS: usize = 1;
pub const MAX_WORDS: usize = 10;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+\b").unwrap());

static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s<>,.!?]").unwrap());

/// Number of words as counted by the validation rules.
pub fn word_count(sentence: &str) -> usize {
    WORD.find_iter(sentence).count()
}

/// Validate a sentence, returning the first rule it breaks.
pub fn validate_sentence(sentence: &str) -> Result<(), BlankfillError> {
    if !sentence.contains(PLACEHOLDER) {
        return Err(BlankfillError::Validation(format!(
            "sentence must contain a '{PLACEHOLDER}' placeholder"
        )));
    }

    let words = word_count(sentence);
    if !(MIN_WORDS..=MAX_WORDS).contains(&words) {
        return Err(BlankfillError::Validation(format!(
            "sentence must be between {MIN_WORDS} and {MAX_WORDS} words, got {words}"
        )));
    }

    if !sentence.is_ascii() {
        return Err(BlankfillError::Validation(
            "sentence must contain only English characters".to_string(),
        ));
    }

    if let Some(m) = DISALLOWED.find(sentence) {
        return Err(BlankfillError::Validation(format!(
            "sentence contains invalid special character '{}'",
            m.as_str()
        )));
    }

    Ok(())
}
