//! CLI Config Command
//!
//! Prints the effective configuration with secrets masked.

use anyhow::Result;

use eqforge_config::redact;

use crate::config::Config;
use crate::terminal_output::{note_error, note_info, note_success, note_warn};

pub fn show(config: &Config) -> Result<()> {
    note_info(&format!("Config file: {}", config.path.display()));
    let value = serde_json::to_value(&config.inner)?;
    print!("{}", serde_yaml::to_string(&redact(&value))?);

    let report = &config.report;
    for warning in &report.warnings {
        note_warn(&warning.to_string());
    }
    for error in &report.errors {
        note_error(&error.to_string());
    }
    if report.is_valid() {
        note_success("Configuration is valid.");
    }
    Ok(())
}
