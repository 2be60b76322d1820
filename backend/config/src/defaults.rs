//! Default value application, run after env overrides so explicit settings win.

use crate::schema::{EqforgeConfig, LoggingConfig, NotionConfig};

pub use eqforge_core::DEFAULT_CODE_LANGUAGE;
pub use eqforge_notion::{
    DEFAULT_API_VERSION, DEFAULT_BASE_URL, MAX_PAGE_SIZE as DEFAULT_PAGE_SIZE,
};
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Fill every unset field with its default.
pub fn apply_all_defaults(config: EqforgeConfig) -> EqforgeConfig {
    let config = apply_notion_defaults(config);
    apply_logging_defaults(config)
}

fn apply_notion_defaults(mut config: EqforgeConfig) -> EqforgeConfig {
    let notion = config.notion.get_or_insert_with(NotionConfig::default);
    notion.base_url.get_or_insert_with(|| DEFAULT_BASE_URL.to_string());
    notion.api_version.get_or_insert_with(|| DEFAULT_API_VERSION.to_string());
    notion.page_size.get_or_insert(DEFAULT_PAGE_SIZE);
    notion
        .fallback_code_language
        .get_or_insert_with(|| DEFAULT_CODE_LANGUAGE.to_string());
    config
}

fn apply_logging_defaults(mut config: EqforgeConfig) -> EqforgeConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    logging.level.get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    config
}
