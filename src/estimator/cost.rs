//! Cost calculation for token estimates.
//!
//! This module converts token counts into money using the per-model pricing
//! table. All arithmetic happens in USD; display-time conversion to other
//! currencies is a single multiplication by a published rate.
//!
//! # Example
//!
//! ```
//! use promptmeter::estimator::cost::CostCalculator;
//! use promptmeter::estimator::pricing::ModelPricing;
//!
//! let calculator = CostCalculator::new(ModelPricing::CLAUDE_SONNET);
//!
//! // 1M input tokens = $3.00, 500K output tokens = $7.50
//! let cost = calculator.calculate_cost(1_000_000, 500_000);
//! assert!((cost - 10.5).abs() < 0.0001);
//! ```

use crate::estimator::pricing::ModelPricing;
use crate::utils::error::MeterError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default USD to EUR conversion rate, overridable via `[conversion]` config.
pub const DEFAULT_USD_TO_EUR: f64 = 0.92;

/// Currency for displayed and persisted amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Currency {
    Usd,
    Eur,
}

impl Currency {
    /// Currency symbol used when formatting amounts.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Usd => "$",
            Self::Eur => "\u{20ac}",
        }
    }

    /// Lowercase ISO-ish code used in config files and JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Usd => "usd",
            Self::Eur => "eur",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Usd => write!(f, "USD"),
            Self::Eur => write!(f, "EUR"),
        }
    }
}

impl FromStr for Currency {
    type Err = MeterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "usd" => Ok(Self::Usd),
            "eur" => Ok(Self::Eur),
            other => Err(MeterError::invalid_currency(other)),
        }
    }
}

/// Cost estimate for a single request or session.
///
/// Amounts are in the currency of whatever produced the estimate; the
/// calculator always produces USD, and [`CostEstimate::in_currency`] converts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    /// Cost attributed to input tokens.
    pub input_cost: f64,
    /// Cost attributed to output tokens.
    pub output_cost: f64,
    /// Total cost.
    pub total_cost: f64,
    /// Number of input tokens.
    pub input_tokens: usize,
    /// Number of output tokens (estimated).
    pub output_tokens: usize,
}

impl CostEstimate {
    /// Creates a new cost estimate with the given values.
    #[must_use]
    pub fn new(
        input_cost: f64,
        output_cost: f64,
        input_tokens: usize,
        output_tokens: usize,
    ) -> Self {
        Self {
            input_cost,
            output_cost,
            total_cost: input_cost + output_cost,
            input_tokens,
            output_tokens,
        }
    }

    /// Returns the total number of tokens (input + output).
    #[must_use]
    pub fn total_tokens(&self) -> usize {
        self.input_tokens + self.output_tokens
    }

    /// Returns a copy converted from USD into the given currency.
    ///
    /// USD is the identity conversion; EUR multiplies by `usd_to_eur`.
    #[must_use]
    pub fn in_currency(&self, currency: Currency, usd_to_eur: f64) -> Self {
        let rate = match currency {
            Currency::Usd => 1.0,
            Currency::Eur => usd_to_eur,
        };
        Self {
            input_cost: self.input_cost * rate,
            output_cost: self.output_cost * rate,
            total_cost: self.total_cost * rate,
            input_tokens: self.input_tokens,
            output_tokens: self.output_tokens,
        }
    }
}

/// Calculator for costs based on a model's pricing.
///
/// Pricing is USD per 1M tokens:
///
/// - Input cost = (input_tokens / 1M) * input_per_m
/// - Output cost = (output_tokens / 1M) * output_per_m
#[derive(Debug, Clone)]
pub struct CostCalculator {
    pricing: ModelPricing,
}

impl CostCalculator {
    /// Creates a new cost calculator with the given pricing.
    #[must_use]
    pub fn new(pricing: ModelPricing) -> Self {
        Self { pricing }
    }

    /// Returns a reference to the pricing record.
    #[must_use]
    pub fn pricing(&self) -> &ModelPricing {
        &self.pricing
    }

    /// Calculates the total USD cost for input and output token counts.
    #[must_use]
    pub fn calculate_cost(&self, input_tokens: usize, output_tokens: usize) -> f64 {
        self.calculate_input_cost(input_tokens) + self.calculate_output_cost(output_tokens)
    }

    /// Calculates the input cost only.
    #[must_use]
    pub fn calculate_input_cost(&self, input_tokens: usize) -> f64 {
        (input_tokens as f64 / 1_000_000.0) * self.pricing.input_per_m
    }

    /// Calculates the output cost only.
    #[must_use]
    pub fn calculate_output_cost(&self, output_tokens: usize) -> f64 {
        (output_tokens as f64 / 1_000_000.0) * self.pricing.output_per_m
    }

    /// Builds a [`CostEstimate`] for the given token counts.
    #[must_use]
    pub fn estimate_cost(&self, input_tokens: usize, output_tokens: usize) -> CostEstimate {
        CostEstimate::new(
            self.calculate_input_cost(input_tokens),
            self.calculate_output_cost(output_tokens),
            input_tokens,
            output_tokens,
        )
    }
}
