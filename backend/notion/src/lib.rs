//! Notion adapter: a [`eqforge_core::BlockStore`] backed by the Notion REST API.

pub mod client;
pub mod page_id;
pub mod wire;

pub use client::{NotionClient, DEFAULT_API_VERSION, DEFAULT_BASE_URL, MAX_PAGE_SIZE};
pub use page_id::{page_id_from_url, PageIdError};
