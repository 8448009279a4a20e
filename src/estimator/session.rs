//! Session projection heuristics.
//!
//! A single master prompt rarely stands alone: coding work iterates, and each
//! iteration re-sends a similar prompt and produces a multiple of it in
//! output. This module extrapolates from one prompt to a whole session using
//! two observations:
//!
//! - longer prompts describe bigger projects, which take more iterations and
//!   produce proportionally less output per prompt token;
//! - prompts dense with coding vocabulary ("refactor", "ci/cd", "unit test")
//!   signal extra round-trips, one per keyword hit.

use crate::estimator::cost::{CostCalculator, CostEstimate};
use crate::estimator::pricing::ModelPricing;
use crate::estimator::tokenizer::Tokenizer;
use serde::{Deserialize, Serialize};

/// Keywords that mark a prompt as development work. Each hit adds one
/// estimated iteration on top of the length-based baseline.
pub const CODING_KEYWORDS: &[&str] = &[
    "code",
    "function",
    "script",
    "class",
    "module",
    "package",
    "algorithm",
    "refactor",
    "optimize",
    "debug",
    "compile",
    "build",
    "deploy",
    "test",
    "integration",
    "unit test",
    "syntax",
    "variable",
    "loop",
    "recursion",
    "data structure",
    "api",
    "endpoint",
    "database",
    "sql",
    "json",
    "xml",
    "frontend",
    "backend",
    "ui",
    "ux",
    "framework",
    "library",
    "performance",
    "scalability",
    "architecture",
    "ci/cd",
    "pipeline",
    "exception",
    "error handling",
    "logging",
    "thread",
    "concurrency",
    "threading",
    "async",
    "await",
    "docker",
    "container",
    "microservice",
    "refactoring",
    "optimization",
    "version control",
    "git",
    "merge",
    "branch",
];

/// Prompts below this token count get the short-prompt baseline.
const SHORT_PROMPT_TOKENS: usize = 50;

/// Prompts up to this token count get the medium-prompt baseline.
const MEDIUM_PROMPT_TOKENS: usize = 200;

/// Count distinct coding keywords present in the prompt.
fn keyword_hits(prompt: &str) -> usize {
    let lower = prompt.to_lowercase();
    CODING_KEYWORDS.iter().filter(|kw| lower.contains(*kw)).count()
}

/// Estimate how many iterations a coding session will take for this prompt.
///
/// Baseline comes from the prompt size tier (2 / 5 / 15 iterations), plus one
/// per coding keyword found. Never less than 1.
pub fn deduce_iterations(prompt: &str, prompt_tokens: usize) -> usize {
    let base_iterations = if prompt_tokens < SHORT_PROMPT_TOKENS {
        2
    } else if prompt_tokens <= MEDIUM_PROMPT_TOKENS {
        5
    } else {
        15
    };

    (base_iterations + keyword_hits(prompt)).max(1)
}

/// Estimate output tokens produced per iteration.
///
/// Coding sessions produce much more output than input; short prompts have
/// the highest output multiplier.
pub fn output_tokens_per_iteration(prompt_tokens: usize) -> usize {
    let multiplier = if prompt_tokens < SHORT_PROMPT_TOKENS {
        10
    } else if prompt_tokens <= MEDIUM_PROMPT_TOKENS {
        8
    } else {
        5
    };
    prompt_tokens * multiplier
}

/// Full session projection for one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEstimate {
    /// Canonical model name the projection was priced against.
    pub model: String,
    /// Estimated number of prompt/response iterations.
    pub iterations: usize,
    /// Tokens in the master prompt.
    pub prompt_tokens: usize,
    /// Input tokens across the whole session (prompt re-sent each iteration).
    pub total_input_tokens: usize,
    /// Output tokens produced per iteration.
    pub output_tokens_per_iteration: usize,
    /// Output tokens across the whole session.
    pub total_output_tokens: usize,
    /// Cost for the session totals, in USD until converted.
    pub cost: CostEstimate,
}

/// Project a full-session estimate for a prompt against one model.
///
/// Tokenizes the prompt, deduces iterations and output volume, and prices the
/// session totals.
pub fn estimate_session(
    pricing: &ModelPricing,
    tokenizer: &dyn Tokenizer,
    prompt: &str,
) -> SessionEstimate {
    let prompt_tokens = tokenizer.count_tokens(prompt);
    let iterations = deduce_iterations(prompt, prompt_tokens);
    let per_iteration_output = output_tokens_per_iteration(prompt_tokens);

    // Later iterations re-send a prompt of similar size
    let total_input_tokens = prompt_tokens * iterations;
    let total_output_tokens = per_iteration_output * iterations;

    let cost = CostCalculator::new(*pricing).estimate_cost(total_input_tokens, total_output_tokens);

    tracing::debug!(
        "session projection for {}: {} iterations, {} input tokens, {} output tokens",
        pricing.name,
        iterations,
        total_input_tokens,
        total_output_tokens
    );

    SessionEstimate {
        model: pricing.name.to_string(),
        iterations,
        prompt_tokens,
        total_input_tokens,
        output_tokens_per_iteration: per_iteration_output,
        total_output_tokens,
        cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::tokenizer::HeuristicTokenizer;

    #[test]
    fn test_deduce_iterations_short_prompt_baseline() {
        // No keywords, under 50 tokens: baseline 2
        assert_eq!(deduce_iterations("hello there", 10), 2);
    }

    #[test]
    fn test_deduce_iterations_medium_and_long_baselines() {
        assert_eq!(deduce_iterations("plain text", 100), 5);
        assert_eq!(deduce_iterations("plain text", 201), 15);
    }

    #[test]
    fn test_deduce_iterations_keyword_bonus() {
        // "refactor" and "api" are two keyword hits on the short baseline
        let prompt = "refactor the api";
        assert_eq!(deduce_iterations(prompt, 10), 4);
    }

    #[test]
    fn test_deduce_iterations_case_insensitive_keywords() {
        assert_eq!(deduce_iterations("REFACTOR everything", 10), 3);
    }

    #[test]
    fn test_output_tokens_per_iteration_tiers() {
        assert_eq!(output_tokens_per_iteration(40), 400);
        assert_eq!(output_tokens_per_iteration(200), 1600);
        assert_eq!(output_tokens_per_iteration(300), 1500);
    }

    #[test]
    fn test_estimate_session_totals() {
        let tokenizer = HeuristicTokenizer::new();
        let prompt = "hello there";
        let estimate = estimate_session(&ModelPricing::CLAUDE_SONNET, &tokenizer, prompt);

        assert_eq!(estimate.model, "claude-sonnet");
        assert!(estimate.iterations >= 1);
        assert_eq!(
            estimate.total_input_tokens,
            estimate.prompt_tokens * estimate.iterations
        );
        assert_eq!(
            estimate.total_output_tokens,
            estimate.output_tokens_per_iteration * estimate.iterations
        );
        assert_eq!(estimate.cost.input_tokens, estimate.total_input_tokens);
        assert_eq!(estimate.cost.output_tokens, estimate.total_output_tokens);
    }

    #[test]
    fn test_estimate_session_deterministic() {
        let tokenizer = HeuristicTokenizer::new();
        let prompt = "build a json api with error handling and tests";
        let a = estimate_session(&ModelPricing::GEMINI_PRO, &tokenizer, prompt);
        let b = estimate_session(&ModelPricing::GEMINI_PRO, &tokenizer, prompt);
        assert_eq!(a, b);
    }

    #[test]
    fn test_keyword_heavy_prompt_costs_more() {
        let tokenizer = HeuristicTokenizer::new();
        // Same token count, different keyword density
        let plain = "please write something nice about the weather today thanks";
        let coding = "please refactor the api database module and deploy tests";
        let plain_est = estimate_session(&ModelPricing::CLAUDE_SONNET, &tokenizer, plain);
        let coding_est = estimate_session(&ModelPricing::CLAUDE_SONNET, &tokenizer, coding);
        assert!(coding_est.iterations > plain_est.iterations);
        assert!(coding_est.cost.total_cost > plain_est.cost.total_cost);
    }

    #[test]
    fn test_session_estimate_serializes() {
        let tokenizer = HeuristicTokenizer::new();
        let estimate = estimate_session(&ModelPricing::CLAUDE_SONNET, &tokenizer, "hi there");
        let json = serde_json::to_string(&estimate).expect("serializes");
        let back: SessionEstimate = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(estimate, back);
    }
}
