//! # promptmeter
//!
//! promptmeter estimates token counts and API cost for prompts sent to
//! Claude and Gemini. A single invocation runs a short synchronous pipeline:
//!
//! 1. **Capture** - prompt text from an argument, a file, stdin, or an
//!    interactive editor; model selection from flags, config, or a picker
//! 2. **Tokenize** - count prompt tokens with the vendor-appropriate
//!    tokenizer (tiktoken approximation for Claude, heuristic for Gemini)
//! 3. **Project** - extrapolate the single prompt into a full coding
//!    session (iterations, output volume)
//! 4. **Price** - apply the per-model USD rates, convert currency
//! 5. **Display** - tree-formatted terminal output, or JSON with `--json`
//! 6. **Persist** - record the run in `.promptmeter/last_estimate.json`
//!    for recall via `--last` (unless `--no-save`)
//!
//! Configuration follows hierarchical precedence:
//! 1. User config (~/.config/promptmeter/config.toml)
//! 2. Git root (promptmeter.toml)
//! 3. Current directory (promptmeter.toml)
//! 4. Explicit --config path
//! 5. Environment variables (PROMPTMETER_*)
//! 6. CLI flags (highest precedence)
//!
//! The [`MergedConfig`] struct represents the final resolved configuration
//! after merging all sources.

pub mod cli;
pub mod estimator;
pub mod utils;

use anyhow::{Context, Result};
use cli::config::PricingOverride;
use estimator::cost::Currency;
use estimator::pricing::ModelPricing;
use estimator::session::estimate_session;
use estimator::tokenizer::tokenizer_for;
use std::collections::HashMap;
use std::io::IsTerminal;
use std::path::PathBuf;
use utils::display;
use utils::error::MeterError;
use utils::state::{self, LastEstimate};

/// Final resolved configuration after merging all sources (CLI, env, config
/// files). Single source of truth for the run.
#[derive(Debug, Clone)]
pub struct MergedConfig {
    /// Prompt text from the command line (optional).
    pub prompt: Option<String>,
    /// File to read the prompt from (takes precedence over `prompt`).
    pub prompt_file: Option<PathBuf>,
    /// Model names to estimate for; empty means ask or default.
    pub models: Vec<String>,
    /// Currency for displayed and persisted costs.
    pub currency: Currency,
    /// USD to EUR conversion rate.
    pub usd_to_eur: f64,
    /// Per-model rate overrides from config files.
    pub pricing: HashMap<String, PricingOverride>,
    /// Emit JSON instead of the styled tree.
    pub json: bool,
    /// Skip persisting the estimate.
    pub no_save: bool,
    /// Re-display the last saved estimate instead of computing.
    pub show_last: bool,
    /// Verbosity level (0-2).
    pub verbose: u8,
    /// Quiet mode (compact one-line-per-model output).
    pub quiet: bool,
}

/// Initialize logging based on the verbosity level.
///
/// Call once, before [`run`]. A calculator should be silent by default, so
/// the base level is WARN.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .init();
}

/// Run one estimate invocation with the given configuration.
pub fn run(config: MergedConfig) -> Result<()> {
    tracing::debug!("promptmeter v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::debug!(
        "Configuration: models={:?}, currency={}, json={}, no_save={}",
        config.models,
        config.currency,
        config.json,
        config.no_save
    );

    let state_dir = PathBuf::from(state::STATE_DIR);

    if config.show_last {
        return match state::load_last_estimate(&state_dir)? {
            Some(last) => display::display_last(&last, config.quiet),
            None => Err(MeterError::no_saved_estimate().into()),
        };
    }

    let prompt = resolve_prompt(&config)?;
    if prompt.trim().is_empty() {
        return Err(MeterError::empty_prompt().into());
    }

    let model_names = resolve_models(&config)?;

    let mut results = Vec::with_capacity(model_names.len());
    for name in &model_names {
        let mut pricing = ModelPricing::from_name(name)?;
        if let Some(over) = config
            .pricing
            .get(pricing.name)
            .or_else(|| config.pricing.get(name.as_str()))
        {
            pricing = pricing.with_rates(over.input_per_m, over.output_per_m);
            tracing::debug!("applied pricing override for {}", pricing.name);
        }

        let tokenizer = tokenizer_for(pricing.vendor)?;
        let mut estimate = estimate_session(&pricing, tokenizer.as_ref(), &prompt);
        estimate.cost = estimate.cost.in_currency(config.currency, config.usd_to_eur);
        results.push(estimate);
    }

    if config.json {
        display::display_json(&results, config.currency)?;
    } else {
        display::display_estimates(&results, config.currency, config.quiet)?;
    }

    if !config.no_save {
        let record = LastEstimate::new(config.currency.code(), results);
        state::save_last_estimate(&record, &state_dir)?;
        tracing::debug!("Saved estimate under {}", state_dir.display());
    }

    Ok(())
}

/// Resolve the prompt text from the configured sources.
///
/// Precedence: `--file`, then the positional argument, then an interactive
/// editor on a TTY, then stdin for piped invocations.
fn resolve_prompt(config: &MergedConfig) -> Result<String> {
    if let Some(path) = &config.prompt_file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read prompt file {}", path.display()));
    }

    if let Some(prompt) = &config.prompt {
        return Ok(prompt.clone());
    }

    if std::io::stdin().is_terminal() {
        cli::interactive::read_prompt()
    } else {
        cli::interactive::read_stdin()
    }
}

/// Resolve the model list from the configured sources.
///
/// Piped invocations with no explicit models fall back to the Claude vendor
/// default rather than blocking on a picker.
fn resolve_models(config: &MergedConfig) -> Result<Vec<String>> {
    if !config.models.is_empty() {
        return Ok(config.models.clone());
    }

    if std::io::stdin().is_terminal() {
        cli::interactive::select_models()
    } else {
        Ok(vec!["claude".to_string()])
    }
}
