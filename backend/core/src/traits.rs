use async_trait::async_trait;

use crate::error::StoreError;
use crate::progress::Progress;
use crate::types::{ChildrenPage, ReconstructedBlock};

/// A remote block-structured document store.
///
/// Transport and authentication belong to the implementation; the
/// conversion pipeline only sees these three operations.
#[async_trait]
pub trait BlockStore: Send + Sync {
    /// Store name used in logs (e.g., "notion", "memory").
    fn name(&self) -> &str;

    /// Fetch one page of the direct children of `block_id`.
    async fn list_children(
        &self,
        block_id: &str,
        cursor: Option<&str>,
    ) -> Result<ChildrenPage, StoreError>;

    /// Delete a single block.
    async fn delete_block(&self, block_id: &str) -> Result<(), StoreError>;

    /// Append `blocks` as direct children of `parent_id` in one call.
    async fn append_children(
        &self,
        parent_id: &str,
        blocks: &[ReconstructedBlock],
    ) -> Result<(), StoreError>;
}

/// Receives human-readable phase updates while a conversion runs.
pub trait ProgressSink: Send + Sync {
    fn report(&self, progress: &Progress);
}

/// Discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _progress: &Progress) {}
}

impl<F> ProgressSink for F
where
    F: Fn(&Progress) + Send + Sync,
{
    fn report(&self, progress: &Progress) {
        self(progress)
    }
}
