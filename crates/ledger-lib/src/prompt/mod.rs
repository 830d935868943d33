//! Interactive prompts via `dialoguer`.

use std::io::IsTerminal;

use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::errors::{LedgerError, Result};

/// Display a yes/no confirmation prompt.
///
/// `default` sets the pre-selected answer. Returns `None` if the user
/// cancels, or if stdin is not a terminal and nobody can answer.
pub fn confirm(prompt: &str, default: bool) -> Result<Option<bool>> {
    if !std::io::stdin().is_terminal() {
        tracing::debug!(prompt, "stdin is not a terminal, skipping prompt");
        return Ok(None);
    }
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default)
        .interact_opt()
        .map_err(|e| LedgerError::Aborted(format!("confirm prompt failed: {e}")))
}
