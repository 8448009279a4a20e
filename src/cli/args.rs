use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::estimator::cost::Currency;

#[derive(Debug, Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum CurrencyArg {
    Usd,
    Eur,
}

impl From<CurrencyArg> for Currency {
    fn from(arg: CurrencyArg) -> Self {
        match arg {
            CurrencyArg::Usd => Currency::Usd,
            CurrencyArg::Eur => Currency::Eur,
        }
    }
}

/// CLI argument parsing with environment variable support.
///
/// Environment variables follow the pattern `PROMPTMETER_*` and are
/// overridden by CLI flags. Example: `PROMPTMETER_MODELS=gemini` is
/// overridden by `--models claude`.
#[derive(Parser, Debug)]
#[command(name = "promptmeter")]
#[command(about = "Estimate token counts and API cost for Claude and Gemini prompts")]
#[command(version)]
pub struct Args {
    /// Prompt text to estimate (reads stdin, or asks interactively on a TTY, when omitted)
    pub prompt: Option<String>,

    /// Model(s) to estimate for, comma-separated
    #[arg(short, long, value_delimiter = ',', env = "PROMPTMETER_MODELS")]
    pub models: Vec<String>,

    /// Read the prompt from a file instead
    #[arg(short, long, env = "PROMPTMETER_FILE")]
    pub file: Option<PathBuf>,

    /// Currency for displayed costs
    #[arg(long, env = "PROMPTMETER_CURRENCY")]
    pub currency: Option<CurrencyArg>,

    /// Emit the estimate as JSON on stdout
    #[arg(long, env = "PROMPTMETER_JSON")]
    pub json: bool,

    /// Skip persisting the estimate to .promptmeter/last_estimate.json
    #[arg(long, env = "PROMPTMETER_NO_SAVE")]
    pub no_save: bool,

    /// Re-display the last saved estimate and exit
    #[arg(long)]
    pub last: bool,

    /// Config file path
    #[arg(short, long, default_value = "promptmeter.toml", env = "PROMPTMETER_CONFIG")]
    pub config: PathBuf,

    /// Increase verbosity (-v, -vv)
    #[arg(short, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short)]
    pub quiet: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
