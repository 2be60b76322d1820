//! Core types, traits, and error taxonomy for the eqforge equation migrator.
//!
//! Everything here is plain data: the pipeline itself lives in `eqforge-convert`
//! and store implementations live in their own crates.

pub mod error;
pub mod progress;
pub mod traits;
pub mod types;

pub use error::{ConvertError, StoreError};
pub use progress::{ConversionOutcome, DeleteFailure, Progress};
pub use traits::{BlockStore, NoProgress, ProgressSink};
pub use types::{
    Block, BlockKind, ChildrenPage, ReconstructedBlock, RichText, Segment, DEFAULT_CODE_LANGUAGE,
};
