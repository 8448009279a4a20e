//! Persistence for the most recent estimate.
//!
//! The last run is written to `.promptmeter/last_estimate.json` so it can be
//! recalled with `--last`. Loading degrades gracefully: a missing, corrupted,
//! or invalid file yields `None` with a warning rather than blocking a fresh
//! run, because a stale estimate is never worth failing over.

use crate::estimator::session::SessionEstimate;
use crate::utils::error::MeterError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current state file version for migration support.
pub const CURRENT_STATE_VERSION: &str = "1.0.0";

/// Directory the state file lives in, relative to the working directory.
pub const STATE_DIR: &str = ".promptmeter";

/// State file name within the `.promptmeter/` directory.
const STATE_FILE: &str = "last_estimate.json";

/// Persisted record of the last estimate run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LastEstimate {
    /// Version of the state file format for migrations.
    pub version: String,
    /// Timestamp of the run.
    pub last_run: DateTime<Utc>,
    /// Currency code the costs below are expressed in ("usd" or "eur").
    pub currency: String,
    /// Per-model session projections from the run.
    pub results: Vec<SessionEstimate>,
}

impl LastEstimate {
    /// Build a record for the current moment.
    pub fn new(currency: &str, results: Vec<SessionEstimate>) -> Self {
        Self {
            version: CURRENT_STATE_VERSION.to_string(),
            last_run: Utc::now(),
            currency: currency.to_string(),
            results,
        }
    }

    /// Validate that all fields contain sensible values.
    ///
    /// # Validated Constraints
    /// - at least one result
    /// - every cost >= 0.0
    /// - every iteration count >= 1
    pub fn validate(&self) -> Result<(), MeterError> {
        if self.results.is_empty() {
            return Err(MeterError::State(
                "last estimate contains no results".to_string(),
            ));
        }
        for result in &self.results {
            if result.cost.total_cost < 0.0 {
                return Err(MeterError::State(format!(
                    "cost must be >= 0.0, got {} for {}",
                    result.cost.total_cost, result.model
                )));
            }
            if result.iterations == 0 {
                return Err(MeterError::State(format!(
                    "iterations must be >= 1 for {}",
                    result.model
                )));
            }
        }
        Ok(())
    }
}

/// Save the estimate to `.promptmeter/last_estimate.json`, creating the
/// directory if needed.
///
/// # Errors
/// Returns `MeterError::State` if the file cannot be written or serialized.
pub fn save_last_estimate(estimate: &LastEstimate, state_dir: &Path) -> Result<(), MeterError> {
    std::fs::create_dir_all(state_dir).map_err(|e| {
        MeterError::State(format!("Failed to create {}: {}", state_dir.display(), e))
    })?;

    let path = state_dir.join(STATE_FILE);
    let json = serde_json::to_string_pretty(estimate)
        .map_err(|e| MeterError::State(format!("Failed to serialize estimate: {}", e)))?;

    std::fs::write(&path, json)
        .map_err(|e| MeterError::State(format!("Failed to write {}: {}", path.display(), e)))?;

    Ok(())
}

/// Load the last estimate from `.promptmeter/last_estimate.json`.
///
/// # Returns
/// - `Ok(Some(estimate))` if the file exists and is valid
/// - `Ok(None)` if the file doesn't exist (normal case for a first run), is
///   corrupted, has an incompatible schema, or fails validation — each of the
///   recoverable cases logs a warning instead of erroring
pub fn load_last_estimate(state_dir: &Path) -> Result<Option<LastEstimate>, MeterError> {
    let path = state_dir.join(STATE_FILE);

    if !path.exists() {
        return Ok(None);
    }

    let json = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("Failed to read state file {}: {}", path.display(), e);
            return Ok(None);
        }
    };

    match serde_json::from_str::<serde_json::Value>(&json) {
        Ok(value) => {
            let version = value
                .get("version")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown")
                .to_string();

            match migrate_state(value, &version) {
                Ok(estimate) => {
                    if let Err(e) = estimate.validate() {
                        tracing::warn!("Saved estimate failed validation: {}", e);
                        return Ok(None);
                    }
                    Ok(Some(estimate))
                }
                Err(e) => {
                    tracing::warn!("Failed to migrate state from version '{}': {}", version, e);
                    Ok(None)
                }
            }
        }
        Err(e) => {
            tracing::warn!(
                "State file {} is corrupted (invalid JSON): {}",
                path.display(),
                e
            );
            Ok(None)
        }
    }
}

/// Migrate a saved estimate from an older version to the current version.
///
/// # Errors
/// Returns `MeterError::State` if the migration fails.
pub fn migrate_state(
    old_state: serde_json::Value,
    from_version: &str,
) -> Result<LastEstimate, MeterError> {
    match from_version {
        // Identity migration for current version (1.0.0)
        CURRENT_STATE_VERSION => serde_json::from_value(old_state)
            .map_err(|e| MeterError::State(format!("Failed to parse v1.0.0 state: {}", e))),

        // Unknown version - try to parse as current
        _ => {
            tracing::warn!(
                "Unknown state version '{}', attempting to parse as current version",
                from_version
            );
            serde_json::from_value(old_state).map_err(|e| {
                MeterError::State(format!(
                    "Failed to parse unknown version '{}' state: {}",
                    from_version, e
                ))
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::cost::CostEstimate;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        tempfile::tempdir().expect("Failed to create temp dir")
    }

    fn sample_result() -> SessionEstimate {
        SessionEstimate {
            model: "claude-sonnet".to_string(),
            iterations: 4,
            prompt_tokens: 120,
            total_input_tokens: 480,
            output_tokens_per_iteration: 960,
            total_output_tokens: 3840,
            cost: CostEstimate::new(0.00144, 0.0576, 480, 3840),
        }
    }

    #[test]
    fn test_save_load_round_trip() {
        let temp_dir = create_test_dir();
        let state_dir = temp_dir.path().join(".promptmeter");

        let estimate = LastEstimate::new("usd", vec![sample_result()]);
        save_last_estimate(&estimate, &state_dir).expect("Failed to save");

        assert!(state_dir.join("last_estimate.json").exists());

        let loaded = load_last_estimate(&state_dir)
            .expect("Failed to load")
            .expect("Estimate should exist");
        assert_eq!(estimate, loaded);
    }

    #[test]
    fn test_save_creates_state_dir() {
        let temp_dir = create_test_dir();
        let state_dir = temp_dir.path().join(".promptmeter");
        assert!(!state_dir.exists());

        let estimate = LastEstimate::new("eur", vec![sample_result()]);
        save_last_estimate(&estimate, &state_dir).expect("Failed to save");
        assert!(state_dir.exists());
    }

    #[test]
    fn test_load_missing_state() {
        let temp_dir = create_test_dir();
        let state_dir = temp_dir.path().join(".promptmeter");

        let result = load_last_estimate(&state_dir).expect("Should not error");
        assert!(result.is_none(), "Missing state file should return None");
    }

    #[test]
    fn test_load_corrupted_state() {
        let temp_dir = create_test_dir();
        let state_dir = temp_dir.path().join(".promptmeter");
        std::fs::create_dir_all(&state_dir).expect("Failed to create dir");
        std::fs::write(state_dir.join("last_estimate.json"), "{ invalid json }")
            .expect("Failed to write");

        let result = load_last_estimate(&state_dir).expect("Should not error");
        assert!(
            result.is_none(),
            "Corrupted state file should return None, not error"
        );
    }

    #[test]
    fn test_load_invalid_schema() {
        let temp_dir = create_test_dir();
        let state_dir = temp_dir.path().join(".promptmeter");
        std::fs::create_dir_all(&state_dir).expect("Failed to create dir");
        std::fs::write(
            state_dir.join("last_estimate.json"),
            r#"{"version": "1.0.0", "unexpected_field": true}"#,
        )
        .expect("Failed to write");

        let result = load_last_estimate(&state_dir).expect("Should not error");
        assert!(result.is_none(), "Invalid schema should return None");
    }

    #[test]
    fn test_validate_empty_results() {
        let estimate = LastEstimate::new("usd", vec![]);
        assert!(estimate.validate().is_err());
    }

    #[test]
    fn test_validate_negative_cost() {
        let mut result = sample_result();
        result.cost.total_cost = -1.0;
        let estimate = LastEstimate::new("usd", vec![result]);
        assert!(estimate.validate().is_err());
    }

    #[test]
    fn test_validate_zero_iterations_rejected_on_load() {
        let temp_dir = create_test_dir();
        let state_dir = temp_dir.path().join(".promptmeter");

        let mut result = sample_result();
        result.iterations = 0;
        let estimate = LastEstimate::new("usd", vec![result]);
        save_last_estimate(&estimate, &state_dir).expect("Failed to save");

        let loaded = load_last_estimate(&state_dir).expect("Should not error");
        assert!(loaded.is_none(), "Invalid iterations should return None");
    }

    #[test]
    fn test_migrate_unknown_version_compatible_schema() {
        let mut estimate = LastEstimate::new("usd", vec![sample_result()]);
        estimate.version = "2.0.0".to_string();

        let value = serde_json::to_value(&estimate).expect("Failed to serialize");
        let migrated = migrate_state(value, "2.0.0").expect("Should attempt parse");
        assert_eq!(migrated.results.len(), 1);
    }

    #[test]
    fn test_migrate_incompatible_schema_fails() {
        let value = serde_json::json!({
            "version": "99.0.0",
            "completely_different_field": true
        });

        let result = migrate_state(value, "99.0.0");
        assert!(result.is_err(), "Incompatible schema should fail migration");
    }
}
