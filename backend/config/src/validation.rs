//! Config validation: field checks with user-friendly error messages.

use crate::schema::EqforgeConfig;
use eqforge_notion::MAX_PAGE_SIZE;
use thiserror::Error;

/// Accepted Notion token prefixes: current internal integrations, then legacy.
pub const TOKEN_PREFIXES: &[&str] = &["ntn_", "secret_"];

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The first error whose path is `section` or lies under it.
    pub fn first_error_in(&self, section: &str) -> Option<&ConfigValidationError> {
        self.errors.iter().find(|e| {
            e.path == section
                || e.path
                    .strip_prefix(section)
                    .is_some_and(|rest| rest.starts_with('.'))
        })
    }

    /// Emit every finding through `tracing`.
    pub fn log(&self) {
        for warning in &self.warnings {
            tracing::debug!(path = %warning.path, message = %warning.message, "Config warning");
        }
        for error in &self.errors {
            tracing::error!(path = %error.path, message = %error.message, "Config error");
        }
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Check the shape of a Notion integration token.
pub fn validate_token(token: &str) -> Result<(), ConfigValidationError> {
    let token = token.trim();
    let invalid = |message: String| ConfigValidationError {
        path: "notion.token".into(),
        message,
    };
    if token.is_empty() {
        return Err(invalid("Token cannot be empty".into()));
    }
    if !TOKEN_PREFIXES.iter().any(|p| token.starts_with(p)) {
        return Err(invalid(format!(
            "Token should start with {}",
            TOKEN_PREFIXES
                .iter()
                .map(|p| format!("\"{p}\""))
                .collect::<Vec<_>>()
                .join(" or ")
        )));
    }
    if token.chars().any(char::is_whitespace) {
        return Err(invalid("Token cannot contain whitespace".into()));
    }
    Ok(())
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &EqforgeConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_notion(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn validate_notion(config: &EqforgeConfig, report: &mut ValidationReport) {
    let Some(notion) = &config.notion else {
        report.warn("notion", "No Notion settings; run `eqforge auth set <token>`");
        return;
    };

    match notion.token.as_deref() {
        None => report.warn("notion.token", "No token configured; conversions will fail"),
        Some(token) => {
            if let Err(e) = validate_token(token) {
                report.error(e.path, e.message);
            }
        }
    }

    if let Some(url) = notion.base_url.as_deref() {
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            report.error("notion.baseUrl", "Base URL must start with http:// or https://");
        } else if url.starts_with("http://") {
            report.warn("notion.baseUrl", "Base URL is not using TLS");
        }
    }

    if let Some(size) = notion.page_size {
        if !(1..=MAX_PAGE_SIZE).contains(&size) {
            report.error(
                "notion.pageSize",
                format!("Page size must be between 1 and {MAX_PAGE_SIZE}"),
            );
        }
    }

    if let Some(lang) = notion.fallback_code_language.as_deref() {
        if lang.trim().is_empty() {
            report.error("notion.fallbackCodeLanguage", "Language cannot be empty");
        }
    }
}

fn validate_logging(config: &EqforgeConfig, report: &mut ValidationReport) {
    let Some(level) = config.logging.as_ref().and_then(|l| l.level.as_deref()) else {
        return;
    };
    // Anything EnvFilter accepts is fine; only flag obvious typos of a bare level.
    let bare = !level.contains(['=', ',']);
    let known = ["trace", "debug", "info", "warn", "error", "off"];
    if bare && !known.contains(&level.to_ascii_lowercase().as_str()) {
        report.warn("logging.level", format!("Unknown log level \"{level}\""));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::apply_all_defaults;
    use crate::schema::NotionConfig;

    #[test]
    fn accepts_known_token_prefixes() {
        assert!(validate_token("ntn_abc123").is_ok());
        assert!(validate_token("secret_abc123").is_ok());
    }

    #[test]
    fn rejects_bad_tokens() {
        assert!(validate_token("").is_err());
        assert!(validate_token("sk-abc").is_err());
        assert!(validate_token("ntn_abc def").is_err());
        let err = validate_token("xoxb-1").unwrap_err();
        assert!(err.message.contains("\"ntn_\""));
    }

    #[test]
    fn default_config_warns_about_missing_token() {
        let report = validate(&apply_all_defaults(EqforgeConfig::default()));
        assert!(report.is_valid());
        assert!(report.warnings.iter().any(|w| w.path == "notion.token"));
    }

    #[test]
    fn flags_out_of_range_page_size_and_bad_url() {
        let config = EqforgeConfig {
            notion: Some(NotionConfig {
                token: Some("ntn_ok".into()),
                base_url: Some("ftp://example".into()),
                page_size: Some(0),
                ..Default::default()
            }),
            ..Default::default()
        };
        let report = validate(&config);
        let paths: Vec<_> = report.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["notion.baseUrl", "notion.pageSize"]);
        assert_eq!(
            report.first_error_in("notion").map(|e| e.path.as_str()),
            Some("notion.baseUrl")
        );
        assert!(report.first_error_in("logging").is_none());
        assert!(report.first_error_in("notion.base").is_none());
    }
}
