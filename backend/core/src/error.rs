use thiserror::Error;

/// Failure reported by a [`crate::BlockStore`] operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The store answered with a non-success HTTP status.
    #[error("store returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response could not be decoded.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl StoreError {
    /// The HTTP status, when the store produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Fatal outcome of a conversion request.
///
/// A per-block delete failure is not listed here: those are collected into
/// the successful outcome instead of aborting the run.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Retrieving a page of children failed. Nothing was mutated.
    #[error("failed to fetch children of {scope}: {source}")]
    Fetch {
        scope: String,
        #[source]
        source: StoreError,
    },

    /// Appending the rebuilt blocks failed after the old ones were deleted.
    #[error("upload failed after {deleted} original blocks were deleted: {source}")]
    Upload {
        deleted: usize,
        #[source]
        source: StoreError,
    },
}

impl ConvertError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Fetch { source, .. } | Self::Upload { source, .. } => source.status(),
        }
    }

    /// True when the document was left partially mutated.
    pub fn document_modified(&self) -> bool {
        match self {
            Self::Fetch { .. } => false,
            Self::Upload { deleted, .. } => *deleted > 0,
        }
    }
}
