//! Tree fetcher: page through every descendant of a root block and return
//! them flattened in pre-order.

use std::collections::VecDeque;

use tracing::{debug, warn};

use eqforge_core::{Block, BlockStore, ConvertError};

/// One level of the traversal: a parent whose children are being paged.
#[derive(Debug)]
struct Frame {
    parent_id: String,
    cursor: Option<String>,
    /// Children already fetched but not yet emitted.
    pending: VecDeque<Block>,
    /// Set once the store reports no further pages for this parent.
    exhausted: bool,
}

impl Frame {
    fn new(parent_id: String) -> Self {
        Self {
            parent_id,
            cursor: None,
            pending: VecDeque::new(),
            exhausted: false,
        }
    }
}

/// Fetch all descendants of `root_id` in pre-order.
///
/// Each block is emitted before its own children, and a block's subtree is
/// fully walked before its next sibling. Depth is bounded only by memory: the
/// walk keeps an explicit stack instead of recursing. Any failed page aborts
/// the whole traversal.
pub async fn fetch_all<S>(store: &S, root_id: &str) -> Result<Vec<Block>, ConvertError>
where
    S: BlockStore + ?Sized,
{
    let mut blocks = Vec::new();
    let mut stack = vec![Frame::new(root_id.to_string())];
    let mut pages = 0usize;

    while let Some(frame) = stack.last_mut() {
        if let Some(block) = frame.pending.pop_front() {
            let descend = block.has_children.then(|| block.id.clone());
            blocks.push(block);
            if let Some(child_root) = descend {
                stack.push(Frame::new(child_root));
            }
            continue;
        }

        if frame.exhausted {
            stack.pop();
            continue;
        }

        let page = store
            .list_children(&frame.parent_id, frame.cursor.as_deref())
            .await
            .map_err(|source| ConvertError::Fetch {
                scope: frame.parent_id.clone(),
                source,
            })?;
        pages += 1;

        debug!(
            parent = %frame.parent_id,
            fetched = page.blocks.len(),
            has_more = page.has_more,
            "Fetched page of children"
        );

        frame.exhausted = match (page.has_more, page.next_cursor) {
            (true, Some(cursor)) => {
                frame.cursor = Some(cursor);
                false
            }
            (true, None) => {
                warn!(parent = %frame.parent_id, "Store reported more pages without a cursor; stopping");
                true
            }
            (false, _) => true,
        };
        frame.pending = page.blocks.into();
    }

    debug!(root = %root_id, blocks = blocks.len(), pages, "Tree fetch complete");
    Ok(blocks)
}
