//! Conversion Event Logger
//!
//! One structured audit record per conversion milestone, emitted through
//! `tracing` under the `conversion_events` target so the NDJSON file layer
//! keeps a history of what was changed on which page.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use eqforge_core::{ConversionOutcome, ConvertError};

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversionEvent {
    Started,
    Finished { outcome: ConversionOutcome },
    Failed {
        error_msg: String,
        status: Option<u16>,
        document_modified: bool,
    },
}

impl ConversionEvent {
    pub fn failed(err: &ConvertError) -> Self {
        Self::Failed {
            error_msg: redact_sensitive_data(&err.to_string()),
            status: err.status(),
            document_modified: err.document_modified(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub page_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: ConversionEvent,
}

impl EventLogEntry {
    pub fn new(page_id: &str, event: ConversionEvent) -> Self {
        Self {
            page_id: page_id.to_string(),
            timestamp: Utc::now(),
            event,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
    }
}

pub struct EventLogger;

impl EventLogger {
    /// Record a conversion milestone for `page_id`.
    pub fn log_event(page_id: &str, event: ConversionEvent) {
        let entry = EventLogEntry::new(page_id, event);
        let record = entry.to_json();
        match &entry.event {
            ConversionEvent::Failed {
                document_modified: true,
                ..
            } => error!(target: "conversion_events", event = %record, "Conversion failed after modifying the page"),
            ConversionEvent::Failed { .. } => {
                warn!(target: "conversion_events", event = %record, "Conversion failed")
            }
            ConversionEvent::Finished { outcome } if outcome.is_partial() => {
                warn!(target: "conversion_events", event = %record, "Conversion finished with leftover blocks")
            }
            _ => info!(target: "conversion_events", event = %record, "Conversion event"),
        }
    }
}
