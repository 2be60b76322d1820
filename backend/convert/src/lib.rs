//! The equation migration pipeline.
//!
//! Leaf-first: [`tokenizer`] splits plain text on `$`/`$$` markers,
//! [`reconstruct`] rebuilds one block from its tokens, [`fetcher`] walks a
//! block tree, and [`orchestrator`] sequences fetch, rebuild, delete, and
//! upload against a store.

pub mod fetcher;
pub mod orchestrator;
pub mod reconstruct;
pub mod store;
pub mod tokenizer;

pub use fetcher::fetch_all;
pub use orchestrator::{ConversionPlan, Converter};
pub use reconstruct::{reconstruct, Reconstructor};
pub use store::{MemoryStore, StoreCall};
pub use tokenizer::{scan, tokenize, Token};
