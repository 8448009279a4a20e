// Copyright (c) 2025-2026 the promptmeter contributors
// SPDX-License-Identifier: Apache-2.0

//! Vendor-specific tokenizers for counting tokens in prompt text.
//!
//! This module provides a trait-based abstraction for token counting, with a
//! tiktoken-backed implementation for Claude and a heuristic fallback for
//! vendors without a published Rust tokenizer.
//!
//! # Example
//!
//! ```
//! use promptmeter::estimator::tokenizer::{Tokenizer, TiktokenTokenizer};
//!
//! let tokenizer = TiktokenTokenizer::new().unwrap();
//! let count = tokenizer.count_tokens("Hello, world!");
//! ```

use crate::estimator::pricing::Vendor;
use crate::utils::error::MeterError;
use tiktoken_rs::cl100k_base;

/// Approximate characters per token for the heuristic estimate.
const CHARS_PER_TOKEN: f64 = 4.0;

/// Approximate words per token for the heuristic estimate.
const WORDS_PER_TOKEN: f64 = 0.75;

/// Trait for counting tokens in text.
///
/// Vendors use different tokenization schemes; this trait provides a unified
/// interface so the rest of the estimator never cares which scheme applies.
pub trait Tokenizer: Send + Sync {
    /// Count the number of tokens in the given text.
    ///
    /// Deterministic for a given input. Empty text counts zero tokens.
    fn count_tokens(&self, text: &str) -> usize;
}

/// Tokenizer backed by tiktoken's cl100k_base encoding.
///
/// There is no official Claude tokenizer in Rust; cl100k_base is the closest
/// published approximation and tracks Claude's real counts closely enough for
/// cost estimation.
pub struct TiktokenTokenizer {
    encoding: tiktoken_rs::CoreBPE,
}

impl TiktokenTokenizer {
    /// Create a new tiktoken tokenizer.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded encoding data cannot be loaded.
    pub fn new() -> Result<Self, MeterError> {
        let encoding = cl100k_base().map_err(|e| MeterError::Config(e.to_string()))?;
        Ok(Self { encoding })
    }
}

impl Tokenizer for TiktokenTokenizer {
    fn count_tokens(&self, text: &str) -> usize {
        self.encoding.encode_with_special_tokens(text).len()
    }
}

/// Heuristic tokenizer for vendors without a published tokenizer.
///
/// Averages two classic estimates: one token per ~4 characters and one token
/// per ~0.75 words. Each estimate is floored at 1 for non-empty text, so the
/// average never drops to zero while there is anything to count.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicTokenizer;

impl HeuristicTokenizer {
    pub fn new() -> Self {
        Self
    }
}

impl Tokenizer for HeuristicTokenizer {
    fn count_tokens(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }

        let by_chars = ((text.chars().count() as f64) / CHARS_PER_TOKEN)
            .ceil()
            .max(1.0) as usize;
        let by_words = (((text.split_whitespace().count() as f64) / WORDS_PER_TOKEN) as usize)
            .max(1);

        (by_chars + by_words) / 2
    }
}

/// Select the tokenizer appropriate for a vendor.
///
/// Claude uses the tiktoken approximation; Gemini has no public tokenizer and
/// falls back to the heuristic.
///
/// # Errors
///
/// Returns an error if the tiktoken encoding cannot be loaded.
pub fn tokenizer_for(vendor: Vendor) -> Result<Box<dyn Tokenizer>, MeterError> {
    match vendor {
        Vendor::Claude => Ok(Box::new(TiktokenTokenizer::new()?)),
        Vendor::Gemini => Ok(Box::new(HeuristicTokenizer::new())),
    }
}
