//! Replace orchestrator: fetch, rebuild, delete the old blocks, upload the
//! new ones.
//!
//! The replace is not transactional. If the upload fails after deletion the
//! page is left without its original content; callers must surface that.
//! Nothing here guards against concurrent edits to the same page.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use eqforge_core::{
    Block, BlockStore, ConversionOutcome, ConvertError, DeleteFailure, Progress, ProgressSink,
    ReconstructedBlock,
};

use crate::fetcher::fetch_all;
use crate::reconstruct::Reconstructor;

/// The result of fetching and rebuilding a page without touching it.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionPlan {
    /// Every block under the root, in pre-order.
    pub fetched: Vec<Block>,
    /// Rebuilt blocks, in the same order, with dropped blocks removed.
    pub replacements: Vec<ReconstructedBlock>,
    /// Number of equations introduced from marker syntax.
    pub new_equations: usize,
}

impl ConversionPlan {
    /// True when rewriting the page would convert at least one marker.
    pub fn has_work(&self) -> bool {
        self.new_equations > 0
    }
}

/// Drives one conversion request against a [`BlockStore`].
pub struct Converter {
    store: Arc<dyn BlockStore>,
    reconstructor: Reconstructor,
}

impl Converter {
    pub fn new(store: Arc<dyn BlockStore>) -> Self {
        Self {
            store,
            reconstructor: Reconstructor::new(),
        }
    }

    pub fn with_reconstructor(mut self, reconstructor: Reconstructor) -> Self {
        self.reconstructor = reconstructor;
        self
    }

    /// Fetch the whole tree under `root_id` and rebuild every block.
    pub async fn plan(&self, root_id: &str) -> Result<ConversionPlan, ConvertError> {
        let fetched = fetch_all(self.store.as_ref(), root_id).await?;

        let mut replacements = Vec::with_capacity(fetched.len());
        let mut new_equations = 0;
        for block in &fetched {
            match self.reconstructor.reconstruct(block) {
                Some(rebuilt) => {
                    new_equations += rebuilt
                        .equation_count()
                        .saturating_sub(block.equation_count());
                    replacements.push(rebuilt);
                }
                None if !block.kind.is_supported() => {
                    info!(block = %block.id, kind = %block.kind, "Dropping unsupported block");
                }
                None => {}
            }
        }

        Ok(ConversionPlan {
            fetched,
            replacements,
            new_equations,
        })
    }

    /// Convert every marker under `root_id` into a native equation.
    ///
    /// Deletions are best-effort; the upload is a single call and its failure
    /// is fatal.
    pub async fn convert(
        &self,
        root_id: &str,
        progress: &dyn ProgressSink,
    ) -> Result<ConversionOutcome, ConvertError> {
        let span = info_span!(
            "convert",
            run_id = %Uuid::new_v4(),
            root = %root_id,
            store = %self.store.name()
        );
        let result = self.run(root_id, progress).instrument(span).await;
        if let Err(err) = &result {
            progress.report(&Progress::Failed {
                message: err.to_string(),
            });
        }
        result
    }

    async fn run(
        &self,
        root_id: &str,
        progress: &dyn ProgressSink,
    ) -> Result<ConversionOutcome, ConvertError> {
        let plan = self.plan(root_id).await?;
        info!(
            fetched = plan.fetched.len(),
            rebuilt = plan.replacements.len(),
            new_equations = plan.new_equations,
            "Planned conversion"
        );
        progress.report(&Progress::Fetched {
            blocks: plan.fetched.len(),
        });

        if !plan.has_work() {
            progress.report(&Progress::NoEquationsFound);
            return Ok(ConversionOutcome::NoEquationsFound {
                fetched: plan.fetched.len(),
            });
        }

        progress.report(&Progress::Deleting {
            blocks: plan.fetched.len(),
        });
        let (deleted, delete_failures) = self.delete_all(&plan.fetched).await;

        progress.report(&Progress::Uploading {
            blocks: plan.replacements.len(),
        });
        self.store
            .append_children(root_id, &plan.replacements)
            .await
            .map_err(|source| ConvertError::Upload { deleted, source })?;

        let count = plan.replacements.len();
        info!(
            uploaded = count,
            deleted,
            delete_failures = delete_failures.len(),
            "Conversion complete"
        );
        progress.report(&Progress::Converted { blocks: count });

        Ok(ConversionOutcome::Converted {
            count,
            deleted,
            delete_failures,
        })
    }

    async fn delete_all(&self, blocks: &[Block]) -> (usize, Vec<DeleteFailure>) {
        let mut deleted = 0;
        let mut failures = Vec::new();
        for block in blocks {
            match self.store.delete_block(&block.id).await {
                Ok(()) => deleted += 1,
                Err(err) => {
                    warn!(block = %block.id, error = %err, "Failed to delete block; skipping");
                    failures.push(DeleteFailure {
                        block_id: block.id.clone(),
                        status: err.status(),
                        message: err.to_string(),
                    });
                }
            }
        }
        (deleted, failures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::store::{MemoryStore, StoreCall};
    use eqforge_core::{BlockKind, RichText, StoreError};

    fn converter(store: &Arc<MemoryStore>) -> Converter {
        Converter::new(store.clone() as Arc<dyn BlockStore>)
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl ProgressSink for Recorder {
        fn report(&self, progress: &Progress) {
            self.0.lock().unwrap().push(progress.to_string());
        }
    }

    #[tokio::test]
    async fn test_single_paragraph_end_to_end() {
        let store = Arc::new(MemoryStore::new());
        store.insert_children(
            "page",
            vec![Block::new("p1", BlockKind::Paragraph).with_text("area = $$ \\pi r^2 $$")],
        );

        let outcome = converter(&store).convert("page", &eqforge_core::NoProgress).await.unwrap();
        assert_eq!(
            outcome,
            ConversionOutcome::Converted {
                count: 1,
                deleted: 1,
                delete_failures: vec![],
            }
        );

        let expected = ReconstructedBlock::with_rich_text(
            BlockKind::Paragraph,
            vec![RichText::text("area = "), RichText::equation("\\pi r^2")],
        );
        assert_eq!(
            store.calls(),
            vec![
                StoreCall::List { parent: "page".into(), cursor: None },
                StoreCall::Delete { block_id: "p1".into() },
                StoreCall::Append { parent: "page".into(), blocks: vec![expected] },
            ]
        );
    }

    #[tokio::test]
    async fn test_marker_free_page_is_untouched() {
        let store = Arc::new(MemoryStore::new());
        store.insert_children(
            "page",
            vec![
                Block::new("p1", BlockKind::Paragraph).with_text("no math here"),
                Block::new("d1", BlockKind::Divider),
                Block::new("c1", BlockKind::Code).with_text("echo $HOME"),
            ],
        );
        let recorder = Recorder::default();

        let outcome = converter(&store).convert("page", &recorder).await.unwrap();
        assert_eq!(outcome, ConversionOutcome::NoEquationsFound { fetched: 3 });
        assert!(store
            .calls()
            .iter()
            .all(|c| matches!(c, StoreCall::List { .. })));
        assert_eq!(
            *recorder.0.lock().unwrap(),
            vec!["Found 3 blocks. Converting...", "No equations found!"]
        );
    }

    #[tokio::test]
    async fn test_already_converted_page_is_untouched() {
        let store = Arc::new(MemoryStore::new());
        store.insert_children(
            "page",
            vec![Block::new("p1", BlockKind::Paragraph)
                .with_text("area = ")
                .with_equation("\\pi r^2")],
        );

        let outcome = converter(&store).convert("page", &eqforge_core::NoProgress).await.unwrap();
        assert_eq!(outcome, ConversionOutcome::NoEquationsFound { fetched: 1 });
        assert_eq!(store.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_page() {
        let store = Arc::new(MemoryStore::new());
        let outcome = converter(&store).convert("page", &eqforge_core::NoProgress).await.unwrap();
        assert_eq!(outcome, ConversionOutcome::NoEquationsFound { fetched: 0 });
    }

    #[tokio::test]
    async fn test_nested_blocks_are_flattened_into_root() {
        let store = Arc::new(MemoryStore::new());
        store.insert_children(
            "page",
            vec![
                Block::new("h", BlockKind::Heading1).with_text("Intro").with_children(),
                Block::new("t", BlockKind::Unsupported("table".into())).with_text("x"),
            ],
        );
        store.insert_children(
            "h",
            vec![Block::new("li", BlockKind::BulletedListItem).with_text("let $x$")],
        );
        let recorder = Recorder::default();

        let outcome = converter(&store).convert("page", &recorder).await.unwrap();
        assert_eq!(outcome.converted_count(), 2);

        let calls = store.calls();
        let deletes: Vec<_> = calls
            .iter()
            .filter_map(|c| match c {
                StoreCall::Delete { block_id } => Some(block_id.as_str()),
                _ => None,
            })
            .collect();
        // Every fetched block is deleted, in pre-order, before the upload.
        assert_eq!(deletes, vec!["h", "li", "t"]);
        assert!(matches!(calls.last(), Some(StoreCall::Append { .. })));

        let appended = store.appended("page");
        assert_eq!(appended.len(), 2);
        assert_eq!(appended[0].kind, BlockKind::Heading1);
        assert_eq!(appended[1].kind, BlockKind::BulletedListItem);
        assert_eq!(
            *recorder.0.lock().unwrap(),
            vec![
                "Found 3 blocks. Converting...",
                "Deleting 3 old blocks...",
                "Uploading 2 new blocks...",
                "Done! Converted 2 blocks.",
            ]
        );
    }

    #[tokio::test]
    async fn test_delete_failures_are_skipped() {
        let store = Arc::new(MemoryStore::new());
        store.insert_children(
            "page",
            vec![
                Block::new("a", BlockKind::Paragraph).with_text("$a$"),
                Block::new("b", BlockKind::Paragraph).with_text("b"),
            ],
        );
        store.fail_delete("a", StoreError::Status { status: 409, body: "conflict".into() });

        let outcome = converter(&store).convert("page", &eqforge_core::NoProgress).await.unwrap();
        match &outcome {
            ConversionOutcome::Converted { count, deleted, delete_failures } => {
                assert_eq!(*count, 2);
                assert_eq!(*deleted, 1);
                assert_eq!(delete_failures.len(), 1);
                assert_eq!(delete_failures[0].block_id, "a");
                assert_eq!(delete_failures[0].status, Some(409));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(outcome.is_partial());
        assert_eq!(store.appended("page").len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_mutates_nothing() {
        let store = Arc::new(MemoryStore::new());
        store.fail_list("page", StoreError::Status { status: 401, body: "unauthorized".into() });
        let recorder = Recorder::default();

        let err = converter(&store).convert("page", &recorder).await.unwrap_err();
        assert!(matches!(err, ConvertError::Fetch { .. }));
        assert!(!err.document_modified());
        assert_eq!(store.calls().len(), 1);
        let messages = recorder.0.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Error: "));
    }

    #[tokio::test]
    async fn test_upload_failure_after_delete() {
        let store = Arc::new(MemoryStore::new());
        store.insert_children(
            "page",
            vec![Block::new("p", BlockKind::Paragraph).with_text("$x$")],
        );
        store.fail_append(StoreError::Status { status: 400, body: "validation_error".into() });

        let err = converter(&store).convert("page", &eqforge_core::NoProgress).await.unwrap_err();
        match &err {
            ConvertError::Upload { deleted, source } => {
                assert_eq!(*deleted, 1);
                assert_eq!(source.status(), Some(400));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.document_modified());
        assert!(store.remaining_ids().is_empty());
    }

    #[tokio::test]
    async fn test_plan_does_not_mutate() {
        let store = Arc::new(MemoryStore::new());
        store.insert_children(
            "page",
            vec![Block::new("p", BlockKind::Paragraph).with_text("$x$ and $$y$$")],
        );

        let plan = converter(&store).plan("page").await.unwrap();
        assert!(plan.has_work());
        assert_eq!(plan.new_equations, 2);
        assert_eq!(plan.replacements.len(), 1);
        assert_eq!(store.remaining_ids(), vec!["p".to_string()]);
    }
}
