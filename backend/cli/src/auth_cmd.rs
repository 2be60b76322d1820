//! CLI Auth Command
//!
//! Stores, shows, and clears the Notion integration token.

use anyhow::Result;

use eqforge_config::{load_config, mask, validate_token, write_config};

use crate::config::Config;
use crate::terminal_output::{note_info, note_success, note_warn};

/// Validate and save `token` to the config file.
pub async fn set(config: &Config, token: &str) -> Result<()> {
    let token = token.trim();
    validate_token(token)?;

    // Edit the file as written; env overrides and defaults must not leak into it.
    let mut stored = load_config(&config.path).await?;
    stored.set_token(token);
    write_config(&stored, &config.path).await?;

    note_success(&format!("Token {} saved to {}", mask(token), config.path.display()));
    Ok(())
}

/// Report where the effective token comes from.
pub async fn status(config: &Config) -> Result<()> {
    let stored = load_config(&config.path).await?;
    match config.inner.token() {
        Some(token) => {
            let source = if stored.token() == Some(token) {
                config.path.display().to_string()
            } else {
                format!("${}", eqforge_config::env::TOKEN_VAR)
            };
            match validate_token(token) {
                Ok(()) => note_success(&format!("Token {} (from {source})", mask(token))),
                Err(e) => note_warn(&format!("Token {} (from {source}) is invalid: {}", mask(token), e.message)),
            }
            if let Some(updated) = stored.updated_at {
                note_info(&format!("Last changed {}", updated.format("%Y-%m-%d %H:%M UTC")));
            }
        }
        None => note_warn("No token configured. Run `eqforge auth set <token>`."),
    }
    Ok(())
}

/// Remove the stored token.
pub async fn clear(config: &Config) -> Result<()> {
    let mut stored = load_config(&config.path).await?;
    if stored.token().is_none() {
        note_info("No stored token to clear.");
        return Ok(());
    }
    stored.clear_token();
    write_config(&stored, &config.path).await?;
    note_success("Stored token removed.");
    Ok(())
}
