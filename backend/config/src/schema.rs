//! eqforge configuration schema, typed for serde YAML/JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EqforgeConfig {
    /// Notion connection and conversion settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notion: Option<NotionConfig>,

    /// Logging configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,

    /// When the stored credentials were last changed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotionConfig {
    /// Internal integration token (`ntn_...` or legacy `secret_...`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Value sent in the `Notion-Version` header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    /// Children requested per page (1..=100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,

    /// Language given to code blocks that have none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_code_language: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Directory for rolling NDJSON logs; console only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

impl EqforgeConfig {
    pub fn token(&self) -> Option<&str> {
        self.notion.as_ref()?.token.as_deref()
    }

    /// Store a new token, stamping `updated_at`.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.notion.get_or_insert_with(Default::default).token = Some(token.into());
        self.updated_at = Some(Utc::now());
    }

    /// Forget the stored token, stamping `updated_at`.
    pub fn clear_token(&mut self) {
        if let Some(notion) = self.notion.as_mut() {
            notion.token = None;
        }
        self.updated_at = Some(Utc::now());
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(crate::defaults::DEFAULT_LOG_LEVEL)
    }

    pub fn log_dir(&self) -> Option<&str> {
        self.logging.as_ref()?.dir.as_deref()
    }
}
