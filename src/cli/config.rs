//! Configuration management using the `config` crate for hierarchical discovery and merging.
//!
//! ## Configuration Sources (in precedence order, highest to lowest):
//! 1. **CLI flags** - Highest precedence (merged in `merge_config`)
//! 2. **Environment variables** - Middle precedence (via `PROMPTMETER_*` prefix)
//! 3. **Config files** - Lowest precedence
//!
//! ## Config File Discovery (in merge order, later overrides earlier):
//! 1. `~/.config/promptmeter/config.toml` (user config directory - lowest precedence)
//! 2. `promptmeter.toml` in git repository root (walking up from current directory)
//! 3. `./promptmeter.toml` in current directory
//! 4. Explicit `--config` path (if provided and exists - overrides all above)

use crate::MergedConfig;
use crate::cli::args::Args;
use crate::estimator::cost::{Currency, DEFAULT_USD_TO_EUR};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

/// Root configuration structure loaded from config files.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub conversion: ConversionConfig,
    /// Per-model rate overrides, keyed by model name.
    #[serde(default)]
    pub pricing: HashMap<String, PricingOverride>,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GeneralConfig {
    /// Models to estimate for when none are given on the command line.
    #[serde(default)]
    pub models: Vec<String>,
    /// Currency code for displayed costs ("usd" or "eur").
    pub currency: Option<String>,
    /// Never persist estimates.
    #[serde(default)]
    pub no_save: bool,
}

/// Currency conversion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// USD to EUR conversion rate applied when displaying in EUR.
    #[serde(default = "default_usd_to_eur")]
    pub usd_to_eur: f64,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            usd_to_eur: default_usd_to_eur(),
        }
    }
}

fn default_usd_to_eur() -> f64 {
    DEFAULT_USD_TO_EUR
}

/// Rate overrides for a single model, USD per 1M tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingOverride {
    pub input_per_m: Option<f64>,
    pub output_per_m: Option<f64>,
}

fn discover_config_paths(explicit_path: &PathBuf) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // User config (lowest precedence)
    if let Some(user_config) = get_user_config_path() {
        paths.push(user_config);
    }

    // Git root config
    if let Some(git_root) = find_git_root() {
        let git_config = git_root.join("promptmeter.toml");
        if git_config.exists() {
            paths.push(git_config);
        }
    }

    // Current directory config
    let current_dir_config = PathBuf::from("promptmeter.toml");
    if current_dir_config.exists() {
        paths.push(current_dir_config);
    }

    // Explicit --config path (highest precedence)
    if explicit_path != &PathBuf::from("promptmeter.toml") && explicit_path.exists() {
        paths.push(explicit_path.clone());
    }

    paths
}

fn find_git_root() -> Option<PathBuf> {
    git2::Repository::discover(".")
        .ok()
        .and_then(|repo| repo.workdir().map(|p| p.to_path_buf()))
}

fn get_user_config_path() -> Option<PathBuf> {
    dirs::config_dir()
        .map(|config_dir| config_dir.join("promptmeter").join("config.toml"))
        .filter(|path| path.exists())
}

/// Load configuration from discovered config files and environment variables.
pub fn load(args: &Args) -> Result<Config> {
    let mut builder = config::Config::builder();

    for config_path in discover_config_paths(&args.config) {
        builder = builder.add_source(config::File::from(config_path));
    }

    builder = builder.add_source(
        config::Environment::with_prefix("PROMPTMETER")
            .separator("_")
            .try_parsing(true),
    );

    let settings = builder.build().context("Failed to build configuration")?;

    settings
        .try_deserialize()
        .context("Failed to deserialize configuration")
}

/// Merge CLI arguments over file/env configuration into the final config.
///
/// CLI values win wherever the user supplied them; otherwise the file value
/// applies, then the built-in default.
pub fn merge_config(args: &Args, config: Config) -> Result<MergedConfig> {
    let models = if args.models.is_empty() {
        config.general.models.clone()
    } else {
        args.models.clone()
    };

    let currency = match args.currency {
        Some(arg) => Currency::from(arg),
        None => match config.general.currency.as_deref() {
            Some(code) => Currency::from_str(code)?,
            None => Currency::Usd,
        },
    };

    Ok(MergedConfig {
        prompt: args.prompt.clone(),
        prompt_file: args.file.clone(),
        models,
        currency,
        usd_to_eur: config.conversion.usd_to_eur,
        pricing: config.pricing,
        json: args.json,
        no_save: args.no_save || config.general.no_save,
        show_last: args.last,
        verbose: args.verbose,
        quiet: args.quiet,
    })
}
