use console::style;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeterError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("State error: {0}")]
    State(String),

    #[error("Parse error: {message}")]
    ParseError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {message}\nSuggestion: {suggestion}")]
    ValidationError { message: String, suggestion: String },
}

impl MeterError {
    pub fn unknown_model(name: &str) -> Self {
        MeterError::ValidationError {
            message: format!("Unknown model: '{}'", name),
            suggestion: format!(
                "Valid models are: {} (or the vendor aliases 'claude' and 'gemini')",
                crate::estimator::pricing::available_models().join(", ")
            ),
        }
    }

    pub fn invalid_currency(value: &str) -> Self {
        MeterError::ValidationError {
            message: format!("Invalid currency: '{}'", value),
            suggestion: "Valid currencies are: usd, eur".to_string(),
        }
    }

    pub fn empty_prompt() -> Self {
        MeterError::ValidationError {
            message: "Prompt is empty".to_string(),
            suggestion: "Provide prompt text as an argument, with --file, or on stdin".to_string(),
        }
    }

    pub fn no_model_selected() -> Self {
        MeterError::ValidationError {
            message: "No model selected".to_string(),
            suggestion: "Select at least one model with space, then confirm with enter".to_string(),
        }
    }

    pub fn no_saved_estimate() -> Self {
        MeterError::ValidationError {
            message: "No saved estimate found".to_string(),
            suggestion: "Run an estimate first; --last replays the most recent one".to_string(),
        }
    }
}

/// Render a user-facing error message for the terminal.
///
/// Validation errors split the suggestion onto its own dimmed line; other
/// variants render the Display form. Verbose mode appends the source chain.
pub fn format_error(error: &MeterError, verbose: bool) -> String {
    let mut out = match error {
        MeterError::ValidationError {
            message,
            suggestion,
        } => {
            format!(
                "\u{26a0} {}: {}\n  {}",
                style("Error").red().bold(),
                message,
                style(format!("Suggestion: {}", suggestion)).dim()
            )
        }
        other => format!("\u{26a0} {}: {}", style("Error").red().bold(), other),
    };

    if verbose {
        let mut source = std::error::Error::source(error);
        while let Some(cause) = source {
            out.push_str(&format!("\nCaused by: {}", cause));
            source = cause.source();
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_model_lists_valid_names() {
        let err = MeterError::unknown_model("gpt-4o");
        let msg = err.to_string();
        assert!(msg.contains("gpt-4o"));
        assert!(msg.contains("claude-sonnet"));
        assert!(msg.contains("gemini-pro"));
    }

    #[test]
    fn test_empty_prompt_has_suggestion() {
        let err = MeterError::empty_prompt();
        assert!(err.to_string().contains("stdin"));
    }

    #[test]
    fn test_format_error_validation_splits_suggestion() {
        let err = MeterError::invalid_currency("gbp");
        let rendered = format_error(&err, false);
        assert!(rendered.contains("gbp"));
        assert!(rendered.contains("Suggestion:"));
    }

    #[test]
    fn test_format_error_verbose_includes_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing file");
        let err = MeterError::ParseError {
            message: "Failed to parse saved estimate".to_string(),
            source: Some(Box::new(io_err)),
        };
        let rendered = format_error(&err, true);
        assert!(rendered.contains("Caused by:"));
        assert!(rendered.contains("missing file"));
    }
}
