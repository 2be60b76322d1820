//! CLI Convert Command
//!
//! Replaces `$...$` / `$$...$$` markers on a page with native equations.

use std::io::{BufRead, Write};

use anyhow::{anyhow, Context, Result};
use tracing::info;

use eqforge_core::{ConversionOutcome, ConvertError};
use eqforge_logging::{ConversionEvent, EventLogger};
use eqforge_notion::page_id_from_url;

use crate::config::Config;
use crate::terminal_output::{note_error, note_info, note_warn, TerminalProgress};

pub async fn run(config: &Config, page: &str, assume_yes: bool) -> Result<()> {
    let page_id = page_id_from_url(page)?;
    let converter = config.converter()?;
    info!(page = %page_id, "Converting page");

    if !assume_yes {
        note_info("Scanning page...");
        let plan = converter.plan(&page_id).await?;
        if !plan.has_work() {
            note_warn(&format!(
                "No equations found in {} blocks; nothing to do.",
                plan.fetched.len()
            ));
            return Ok(());
        }
        let prompt = format!(
            "This deletes {} blocks and uploads {} rebuilt blocks ({} new equations). \
             Nested blocks are flattened and unsupported blocks are dropped. Continue? [y/N] ",
            plan.fetched.len(),
            plan.replacements.len(),
            plan.new_equations
        );
        if !confirm(&prompt)? {
            note_info("Aborted; page left untouched.");
            return Ok(());
        }
    }

    EventLogger::log_event(&page_id, ConversionEvent::Started);
    match converter.convert(&page_id, &TerminalProgress).await {
        Ok(outcome) => {
            report_outcome(&outcome);
            EventLogger::log_event(&page_id, ConversionEvent::Finished { outcome });
            Ok(())
        }
        Err(err) => {
            EventLogger::log_event(&page_id, ConversionEvent::failed(&err));
            if let ConvertError::Upload { deleted, .. } = &err {
                note_error(&format!(
                    "{deleted} original blocks were already deleted and nothing was uploaded. \
                     Restore the page from Notion's page history."
                ));
            } else {
                note_info("The page was not modified; it is safe to retry.");
            }
            // The progress sink has already printed the full error.
            Err(anyhow!(failure_summary(&err)))
        }
    }
}

/// One-line exit message for a failed run.
fn failure_summary(err: &ConvertError) -> String {
    match err.status() {
        Some(status) if err.document_modified() => {
            format!("conversion failed (HTTP {status}); page was modified")
        }
        Some(status) => format!("conversion failed (HTTP {status}); page unchanged"),
        None if err.document_modified() => "conversion failed; page was modified".to_string(),
        None => "conversion failed; page unchanged".to_string(),
    }
}

fn report_outcome(outcome: &ConversionOutcome) {
    if let ConversionOutcome::Converted {
        delete_failures, ..
    } = outcome
    {
        if !delete_failures.is_empty() {
            note_warn(&format!(
                "{} original blocks could not be deleted and remain on the page:",
                delete_failures.len()
            ));
            for failure in delete_failures {
                note_warn(&format!("  {}: {}", failure.block_id, failure.message));
            }
        }
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    std::io::stdout().flush().context("Failed to flush stdout")?;
    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use eqforge_core::StoreError;

    #[test]
    fn failure_summary_does_not_repeat_the_error() {
        let err = ConvertError::Upload {
            deleted: 3,
            source: StoreError::Status {
                status: 400,
                body: "body.children length should be ≤ 100".into(),
            },
        };
        let summary = failure_summary(&err);
        assert_eq!(summary, "conversion failed (HTTP 400); page was modified");
        assert!(!summary.contains("children length"));
    }

    #[test]
    fn failure_summary_for_fetch_errors() {
        let err = ConvertError::Fetch {
            scope: "root".into(),
            source: StoreError::Transport("connection refused".into()),
        };
        assert_eq!(failure_summary(&err), "conversion failed; page unchanged");
    }
}
