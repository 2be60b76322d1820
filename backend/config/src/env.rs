//! Environment variable overrides for config values.
//!
//! Recognised variables (empty values are ignored):
//! `NOTION_TOKEN`, `NOTION_API_BASE`, `NOTION_VERSION`, `EQFORGE_LOG`, `EQFORGE_LOG_DIR`.

use std::collections::HashMap;

use crate::schema::{EqforgeConfig, LoggingConfig, NotionConfig};

pub const TOKEN_VAR: &str = "NOTION_TOKEN";
pub const BASE_URL_VAR: &str = "NOTION_API_BASE";
pub const API_VERSION_VAR: &str = "NOTION_VERSION";
pub const LOG_LEVEL_VAR: &str = "EQFORGE_LOG";
pub const LOG_DIR_VAR: &str = "EQFORGE_LOG_DIR";

/// Apply overrides from the process environment.
pub fn apply_env_overrides(config: EqforgeConfig) -> EqforgeConfig {
    apply_env_overrides_with(config, &std::env::vars().collect())
}

/// Apply overrides from a provided map (useful for testing).
pub fn apply_env_overrides_with(
    mut config: EqforgeConfig,
    env: &HashMap<String, String>,
) -> EqforgeConfig {
    let get = |name: &str| {
        env.get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let notion = config.notion.get_or_insert_with(NotionConfig::default);
    if let Some(token) = get(TOKEN_VAR) {
        notion.token = Some(token);
    }
    if let Some(url) = get(BASE_URL_VAR) {
        notion.base_url = Some(url);
    }
    if let Some(version) = get(API_VERSION_VAR) {
        notion.api_version = Some(version);
    }

    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if let Some(level) = get(LOG_LEVEL_VAR) {
        logging.level = Some(level);
    }
    if let Some(dir) = get(LOG_DIR_VAR) {
        logging.dir = Some(dir);
    }

    config
}
