//! `eqforge-config` — configuration and credential storage.
//!
//! Provides:
//! - Typed config schema (Notion connection, logging)
//! - YAML read/write with atomic replace and a backup
//! - Environment overrides (`NOTION_TOKEN`, ...)
//! - Default value application
//! - Validation, including the token format check used before saving
//! - Redaction for safe display

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{apply_env_overrides, apply_env_overrides_with};
pub use io::{config_dir, config_file_path, load_config, write_config};
pub use redact::{mask, redact};
pub use schema::{EqforgeConfig, LoggingConfig, NotionConfig};
pub use validation::{validate, validate_token, ConfigValidationError, ValidationReport};

use anyhow::Result;
use std::path::Path;

/// Load a config file and apply env overrides and defaults.
///
/// This is the main entry point for loading a config at runtime. The
/// validation report is returned rather than logged, since callers usually
/// load config before a subscriber exists; call [`ValidationReport::log`]
/// once logging is up.
pub async fn load_and_prepare(path: &Path) -> Result<(EqforgeConfig, ValidationReport)> {
    let config = load_config(path).await?;
    let config = apply_all_defaults(apply_env_overrides(config));
    let report = validate(&config);
    Ok((config, report))
}
