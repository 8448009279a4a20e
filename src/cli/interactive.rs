// Copyright (c) 2025-2026 the promptmeter contributors
// SPDX-License-Identifier: Apache-2.0

//! Interactive capture of model selection and prompt text.
//!
//! Only used when stdin is a terminal and the information was not already
//! supplied through flags, files, or pipes. Every function here has a
//! non-interactive sibling path in `run`, so headless invocations never
//! block on a prompt.

use crate::estimator::pricing::available_models;
use crate::utils::error::MeterError;
use anyhow::Result;

/// Ask the user which models to estimate for.
///
/// The vendor default Claude model starts checked. Cancelling the dialog or
/// confirming with nothing selected is an error, matching the behavior of an
/// unsupported `--models` value.
///
/// # Errors
///
/// Returns an error if the terminal interaction fails or nothing is selected.
pub fn select_models() -> Result<Vec<String>> {
    let items = available_models();
    let defaults: Vec<bool> = items.iter().map(|m| *m == "claude-sonnet").collect();

    let selection = dialoguer::MultiSelect::new()
        .with_prompt("Which model(s) to estimate for? (space toggles, enter confirms)")
        .items(&items)
        .defaults(&defaults)
        .interact_opt()?;

    let indices = selection.ok_or_else(MeterError::no_model_selected)?;
    if indices.is_empty() {
        return Err(MeterError::no_model_selected().into());
    }

    Ok(indices
        .into_iter()
        .filter_map(|i| items.get(i))
        .map(|m| (*m).to_string())
        .collect())
}

/// Capture the master prompt interactively.
///
/// Prompts are usually multi-line, so the user's `$EDITOR` is tried first;
/// when no editor is configured a single-line input is the fallback.
///
/// # Errors
///
/// Returns an error if the terminal interaction fails.
pub fn read_prompt() -> Result<String> {
    match dialoguer::Editor::new().edit("") {
        Ok(Some(text)) => Ok(text),
        // Editor closed without saving: treat as an empty prompt, rejected upstream
        Ok(None) => Ok(String::new()),
        Err(_) => {
            let text: String = dialoguer::Input::new()
                .with_prompt("Master prompt")
                .allow_empty(true)
                .interact_text()?;
            Ok(text)
        }
    }
}

/// Read the prompt from stdin until EOF (piped invocations).
///
/// # Errors
///
/// Returns an error if reading stdin fails.
pub fn read_stdin() -> Result<String> {
    use std::io::Read;

    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}
