//! In-memory [`BlockStore`] with a call journal and scripted failures.
//!
//! Pages are cut at `page_size`; cursors are the decimal offset of the next
//! child, so tests can predict them exactly.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use eqforge_core::{Block, BlockStore, ChildrenPage, ReconstructedBlock, StoreError};

/// One recorded store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    List {
        parent: String,
        cursor: Option<String>,
    },
    Delete {
        block_id: String,
    },
    Append {
        parent: String,
        blocks: Vec<ReconstructedBlock>,
    },
}

#[derive(Debug, Default)]
struct Inner {
    children: HashMap<String, Vec<Block>>,
    appended: HashMap<String, Vec<ReconstructedBlock>>,
    calls: Vec<StoreCall>,
    list_failures: HashMap<String, StoreError>,
    delete_failures: HashMap<String, StoreError>,
    append_failure: Option<StoreError>,
}

#[derive(Debug)]
pub struct MemoryStore {
    page_size: usize,
    inner: Mutex<Inner>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            page_size: 100,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A poisoned journal is still readable; tests want the data.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Set the children of `parent`, replacing any previous ones.
    pub fn insert_children(&self, parent: &str, blocks: Vec<Block>) {
        self.lock().children.insert(parent.to_string(), blocks);
    }

    /// Make every `list_children(parent, ..)` call fail with `error`.
    pub fn fail_list(&self, parent: &str, error: StoreError) {
        self.lock().list_failures.insert(parent.to_string(), error);
    }

    /// Make `delete_block(block_id)` fail with `error`.
    pub fn fail_delete(&self, block_id: &str, error: StoreError) {
        self.lock().delete_failures.insert(block_id.to_string(), error);
    }

    /// Make every `append_children` call fail with `error`.
    pub fn fail_append(&self, error: StoreError) {
        self.lock().append_failure = Some(error);
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    /// Blocks appended under `parent` by successful append calls.
    pub fn appended(&self, parent: &str) -> Vec<ReconstructedBlock> {
        self.lock().appended.get(parent).cloned().unwrap_or_default()
    }

    /// Ids of the blocks still present anywhere in the store.
    pub fn remaining_ids(&self) -> Vec<String> {
        let inner = self.lock();
        let mut ids: Vec<String> = inner
            .children
            .values()
            .flatten()
            .map(|b| b.id.clone())
            .collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl BlockStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn list_children(
        &self,
        block_id: &str,
        cursor: Option<&str>,
    ) -> Result<ChildrenPage, StoreError> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::List {
            parent: block_id.to_string(),
            cursor: cursor.map(str::to_string),
        });
        if let Some(err) = inner.list_failures.get(block_id) {
            return Err(err.clone());
        }

        let start = match cursor {
            Some(c) => c
                .parse::<usize>()
                .map_err(|_| StoreError::Status {
                    status: 400,
                    body: format!("invalid start_cursor: {c}"),
                })?,
            None => 0,
        };
        let children = inner.children.get(block_id).map(Vec::as_slice).unwrap_or(&[]);
        let end = (start + self.page_size).min(children.len());
        let blocks = children.get(start..end).unwrap_or(&[]).to_vec();
        let has_more = end < children.len();

        Ok(ChildrenPage {
            blocks,
            next_cursor: has_more.then(|| end.to_string()),
            has_more,
        })
    }

    async fn delete_block(&self, block_id: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::Delete {
            block_id: block_id.to_string(),
        });
        if let Some(err) = inner.delete_failures.get(block_id) {
            return Err(err.clone());
        }

        let mut found = false;
        for children in inner.children.values_mut() {
            let before = children.len();
            children.retain(|b| b.id != block_id);
            found |= children.len() != before;
        }
        if found {
            Ok(())
        } else {
            Err(StoreError::Status {
                status: 404,
                body: format!("block {block_id} not found"),
            })
        }
    }

    async fn append_children(
        &self,
        parent_id: &str,
        blocks: &[ReconstructedBlock],
    ) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::Append {
            parent: parent_id.to_string(),
            blocks: blocks.to_vec(),
        });
        if let Some(err) = &inner.append_failure {
            return Err(err.clone());
        }
        inner
            .appended
            .entry(parent_id.to_string())
            .or_default()
            .extend_from_slice(blocks);
        Ok(())
    }
}
