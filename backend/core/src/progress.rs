use std::fmt;

use serde::{Deserialize, Serialize};

/// A phase update emitted while a conversion runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Progress {
    /// The whole tree was fetched.
    Fetched { blocks: usize },
    /// Deletion of the original blocks is starting.
    Deleting { blocks: usize },
    /// The rebuilt blocks are being appended.
    Uploading { blocks: usize },
    /// Terminal: nothing to convert, nothing was changed.
    NoEquationsFound,
    /// Terminal: the page was rewritten.
    Converted { blocks: usize },
    /// Terminal: the run stopped on a fatal error.
    Failed { message: String },
}

impl Progress {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::NoEquationsFound | Self::Converted { .. } | Self::Failed { .. }
        )
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetched { blocks } => write!(f, "Found {blocks} blocks. Converting..."),
            Self::Deleting { blocks } => write!(f, "Deleting {blocks} old blocks..."),
            Self::Uploading { blocks } => write!(f, "Uploading {blocks} new blocks..."),
            Self::NoEquationsFound => f.write_str("No equations found!"),
            Self::Converted { blocks } => write!(f, "Done! Converted {blocks} blocks."),
            Self::Failed { message } => write!(f, "Error: {message}"),
        }
    }
}

/// A block that could not be deleted during the replace step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteFailure {
    pub block_id: String,
    pub status: Option<u16>,
    pub message: String,
}

/// Successful result of a conversion request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ConversionOutcome {
    /// No markers were found; the store was not touched.
    NoEquationsFound { fetched: usize },
    /// The page content was replaced.
    Converted {
        /// Number of rebuilt blocks appended to the page.
        count: usize,
        /// Number of original blocks that were deleted.
        deleted: usize,
        /// Original blocks whose deletion failed and were skipped.
        delete_failures: Vec<DeleteFailure>,
    },
}

impl ConversionOutcome {
    pub fn converted_count(&self) -> usize {
        match self {
            Self::NoEquationsFound { .. } => 0,
            Self::Converted { count, .. } => *count,
        }
    }

    /// True when the replace ran but some original blocks survived.
    pub fn is_partial(&self) -> bool {
        matches!(self, Self::Converted { delete_failures, .. } if !delete_failures.is_empty())
    }
}
