// Copyright (c) 2025-2026 the promptmeter contributors
// SPDX-License-Identifier: Apache-2.0

//! Estimate display with tree formatting.
//!
//! Renders per-model session projections to the terminal, either as a styled
//! tree or as a compact one-liner per model in quiet mode. JSON output for
//! machine consumption lives here too.
//!
//! # Example
//!
//! ```ignore
//! use promptmeter::utils::display::display_estimates;
//! use promptmeter::estimator::cost::Currency;
//!
//! display_estimates(&results, Currency::Usd, false)?;
//! ```

use crate::estimator::cost::Currency;
use crate::estimator::session::SessionEstimate;
use crate::utils::formatting::{format_money, format_number};
use crate::utils::state::LastEstimate;
use anyhow::Result;
use console::{Term, style};
use std::io::Write;
use std::str::FromStr;

/// Display session estimates for each model.
///
/// Costs in `results` must already be converted into `currency`.
///
/// # Errors
///
/// Returns an error if writing to the terminal fails.
pub fn display_estimates(
    results: &[SessionEstimate],
    currency: Currency,
    quiet: bool,
) -> Result<()> {
    let mut term = Term::stdout();

    if quiet {
        for result in results {
            writeln!(
                term,
                "{}: {} in / {} out -> {}",
                result.model,
                format_number(result.total_input_tokens),
                format_number(result.total_output_tokens),
                format_money(result.cost.total_cost, currency)
            )?;
        }
        return Ok(());
    }

    let models: Vec<&str> = results.iter().map(|r| r.model.as_str()).collect();

    writeln!(term)?;
    writeln!(term, "{}", style("Estimate Summary:").bold())?;
    writeln!(
        term,
        "{} Models: {}",
        style("\u{251c}\u{2500}").dim(),
        models.join(", ")
    )?;
    writeln!(
        term,
        "{} Currency: {}",
        style("\u{2514}\u{2500}").dim(),
        currency
    )?;

    for result in results {
        write_model_tree(&mut term, result, currency)?;
    }

    writeln!(term)?;
    writeln!(
        term,
        "{}: estimates cover the full coding session; iterations and output volume are deduced from prompt length and coding keywords.",
        style("Note").yellow().bold()
    )?;
    writeln!(term)?;

    Ok(())
}

/// Write the tree block for a single model.
fn write_model_tree(term: &mut Term, result: &SessionEstimate, currency: Currency) -> Result<()> {
    writeln!(term)?;
    writeln!(term, "{}:", style(&result.model).bold())?;
    writeln!(
        term,
        "{} Estimated iterations: {}",
        style("\u{251c}\u{2500}").dim(),
        result.iterations
    )?;
    writeln!(
        term,
        "{} Prompt tokens: {}",
        style("\u{251c}\u{2500}").dim(),
        format_number(result.prompt_tokens)
    )?;
    writeln!(
        term,
        "{} Total input tokens: {}",
        style("\u{251c}\u{2500}").dim(),
        format_number(result.total_input_tokens)
    )?;
    writeln!(
        term,
        "{} Output tokens per iteration: {}",
        style("\u{251c}\u{2500}").dim(),
        format_number(result.output_tokens_per_iteration)
    )?;
    writeln!(
        term,
        "{} Total output tokens: {}",
        style("\u{251c}\u{2500}").dim(),
        format_number(result.total_output_tokens)
    )?;
    writeln!(
        term,
        "{} Input cost: {}",
        style("\u{251c}\u{2500}").dim(),
        format_money(result.cost.input_cost, currency)
    )?;
    writeln!(
        term,
        "{} Output cost: {}",
        style("\u{251c}\u{2500}").dim(),
        format_money(result.cost.output_cost, currency)
    )?;
    writeln!(
        term,
        "{} Estimated session cost: {}",
        style("\u{2514}\u{2500}").dim(),
        style(format_money(result.cost.total_cost, currency))
            .green()
            .bold()
    )?;

    Ok(())
}

/// Emit the estimate as a JSON document on stdout.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn display_json(results: &[SessionEstimate], currency: Currency) -> Result<()> {
    let report = serde_json::json!({
        "currency": currency.code(),
        "results": results,
    });
    #[allow(clippy::print_stdout)] // JSON report is the program output here
    {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

/// Re-display a previously saved estimate.
///
/// # Errors
///
/// Returns an error if writing to the terminal fails.
pub fn display_last(last: &LastEstimate, quiet: bool) -> Result<()> {
    let currency = Currency::from_str(&last.currency).unwrap_or(Currency::Usd);

    if !quiet {
        let mut term = Term::stdout();
        writeln!(term)?;
        writeln!(
            term,
            "{} (saved {})",
            style("Last estimate").bold(),
            last.last_run.format("%Y-%m-%d %H:%M UTC")
        )?;
    }

    display_estimates(&last.results, currency, quiet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::cost::CostEstimate;

    fn sample_results() -> Vec<SessionEstimate> {
        vec![
            SessionEstimate {
                model: "claude-sonnet".to_string(),
                iterations: 12,
                prompt_tokens: 1234,
                total_input_tokens: 14808,
                output_tokens_per_iteration: 6170,
                total_output_tokens: 74040,
                cost: CostEstimate::new(0.0444, 1.1106, 14808, 74040),
            },
            SessionEstimate {
                model: "gemini-pro".to_string(),
                iterations: 12,
                prompt_tokens: 1100,
                total_input_tokens: 13200,
                output_tokens_per_iteration: 5500,
                total_output_tokens: 66000,
                cost: CostEstimate::new(0.0165, 0.66, 13200, 66000),
            },
        ]
    }

    #[test]
    fn test_display_estimates_does_not_error() {
        let results = sample_results();
        assert!(display_estimates(&results, Currency::Usd, false).is_ok());
    }

    #[test]
    fn test_display_estimates_quiet_mode() {
        let results = sample_results();
        assert!(display_estimates(&results, Currency::Eur, true).is_ok());
    }

    #[test]
    fn test_display_json_shape() {
        let results = sample_results();
        let report = serde_json::json!({
            "currency": Currency::Usd.code(),
            "results": results,
        });
        assert_eq!(report["currency"], "usd");
        assert_eq!(report["results"].as_array().map(|a| a.len()), Some(2));
        assert_eq!(report["results"][0]["model"], "claude-sonnet");
        assert!(report["results"][0]["cost"]["total_cost"].is_number());
    }

    #[test]
    fn test_display_last_does_not_error() {
        let last = LastEstimate::new("eur", sample_results());
        assert!(display_last(&last, false).is_ok());
        assert!(display_last(&last, true).is_ok());
    }
}
