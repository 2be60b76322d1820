//! Telemetry and structured logging for eqforge.
//!
//! Console and rolling-file output, conversion audit events, and redaction
//! of Notion tokens before anything reaches a log line.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{ConversionEvent, EventLogEntry, EventLogger};
pub use logger::init_logger;
pub use redact::redact_sensitive_data;
