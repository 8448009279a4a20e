//! Static pricing table for supported models.
//!
//! Rates are published USD prices per 1M tokens, split into input and output
//! classes. Bare vendor names ("claude", "gemini") resolve to that vendor's
//! default model. Unknown names are a hard error so a typo never produces a
//! silent $0.00 estimate.

use crate::utils::error::MeterError;
use std::fmt;

/// Vendor whose published tokenizer rules and rates apply to a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vendor {
    /// Anthropic Claude models.
    Claude,
    /// Google Gemini models.
    Gemini,
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Claude => write!(f, "claude"),
            Self::Gemini => write!(f, "gemini"),
        }
    }
}

/// Pricing record for a single model.
///
/// Rates are USD per 1M tokens, matching the convention vendors use on their
/// pricing pages.
#[derive(Debug, Clone, Copy)]
pub struct ModelPricing {
    /// Canonical model name.
    pub name: &'static str,
    /// Vendor the model belongs to.
    pub vendor: Vendor,
    /// USD per 1M input tokens.
    pub input_per_m: f64,
    /// USD per 1M output tokens.
    pub output_per_m: f64,
}

impl ModelPricing {
    /// Claude Sonnet pricing (vendor default for "claude").
    pub const CLAUDE_SONNET: Self = Self {
        name: "claude-sonnet",
        vendor: Vendor::Claude,
        input_per_m: 3.00,
        output_per_m: 15.00,
    };

    /// Claude Opus pricing.
    pub const CLAUDE_OPUS: Self = Self {
        name: "claude-opus",
        vendor: Vendor::Claude,
        input_per_m: 15.00,
        output_per_m: 75.00,
    };

    /// Claude Haiku pricing.
    pub const CLAUDE_HAIKU: Self = Self {
        name: "claude-haiku",
        vendor: Vendor::Claude,
        input_per_m: 0.25,
        output_per_m: 1.25,
    };

    /// Gemini Pro pricing (vendor default for "gemini").
    pub const GEMINI_PRO: Self = Self {
        name: "gemini-pro",
        vendor: Vendor::Gemini,
        input_per_m: 1.25,
        output_per_m: 10.00,
    };

    /// Gemini Flash pricing.
    pub const GEMINI_FLASH: Self = Self {
        name: "gemini-flash",
        vendor: Vendor::Gemini,
        input_per_m: 0.30,
        output_per_m: 2.50,
    };

    /// Look up pricing for a model by name.
    ///
    /// Names are matched case-insensitively. Bare vendor names resolve to the
    /// vendor default model.
    ///
    /// # Errors
    ///
    /// Returns `MeterError::ValidationError` listing the valid model names
    /// when the name is not recognized.
    pub fn from_name(name: &str) -> Result<Self, MeterError> {
        let normalized = name.to_lowercase();
        match normalized.as_str() {
            "claude" | "claude-sonnet" => Ok(Self::CLAUDE_SONNET),
            "claude-opus" => Ok(Self::CLAUDE_OPUS),
            "claude-haiku" => Ok(Self::CLAUDE_HAIKU),
            "gemini" | "gemini-pro" => Ok(Self::GEMINI_PRO),
            "gemini-flash" => Ok(Self::GEMINI_FLASH),
            _ => Err(MeterError::unknown_model(name)),
        }
    }

    /// Return a copy with rates replaced where an override is present.
    ///
    /// Used to apply `[pricing.<model>]` overrides from config files.
    #[must_use]
    pub fn with_rates(mut self, input_per_m: Option<f64>, output_per_m: Option<f64>) -> Self {
        if let Some(rate) = input_per_m {
            self.input_per_m = rate;
        }
        if let Some(rate) = output_per_m {
            self.output_per_m = rate;
        }
        self
    }
}

/// List of all model names accepted by [`ModelPricing::from_name`].
///
/// Vendor aliases ("claude", "gemini") are accepted too but not listed here.
pub fn available_models() -> Vec<&'static str> {
    vec![
        "claude-sonnet",
        "claude-opus",
        "claude-haiku",
        "gemini-pro",
        "gemini-flash",
    ]
}
