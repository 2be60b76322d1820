use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::debug;

use eqforge_core::{BlockStore, ChildrenPage, ReconstructedBlock, StoreError};
use eqforge_logging::redact_sensitive_data;

use crate::wire::{AppendRequest, ListResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";
pub const DEFAULT_API_VERSION: &str = "2022-06-28";
/// Largest page the Notion API will return.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Notion REST API block store.
pub struct NotionClient {
    client: Client,
    token: String,
    base_url: String,
    api_version: String,
    page_size: u32,
}

impl NotionClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            page_size: MAX_PAGE_SIZE,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.token)
            .header("Notion-Version", &self.api_version)
    }

    fn children_url(&self, block_id: &str) -> String {
        format!("{}/blocks/{}/children", self.base_url, block_id)
    }
}

fn transport(err: reqwest::Error) -> StoreError {
    StoreError::Transport(redact_sensitive_data(&err.to_string()))
}

/// Turn a non-success response into [`StoreError::Status`].
async fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Status {
        status: status.as_u16(),
        body: redact_sensitive_data(&body),
    })
}

#[async_trait]
impl BlockStore for NotionClient {
    fn name(&self) -> &str {
        "notion"
    }

    async fn list_children(
        &self,
        block_id: &str,
        cursor: Option<&str>,
    ) -> Result<ChildrenPage, StoreError> {
        let mut query = vec![("page_size", self.page_size.to_string())];
        if let Some(cursor) = cursor {
            query.push(("start_cursor", cursor.to_string()));
        }

        debug!(block = %block_id, cursor = ?cursor, "Listing children");
        let response = self
            .request(reqwest::Method::GET, self.children_url(block_id))
            .query(&query)
            .send()
            .await
            .map_err(transport)?;
        let response = check_status(response).await?;

        let list: ListResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        list.into_page()
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn delete_block(&self, block_id: &str) -> Result<(), StoreError> {
        let url = format!("{}/blocks/{}", self.base_url, block_id.replace('-', ""));
        debug!(block = %block_id, "Deleting block");
        let response = self
            .request(reqwest::Method::DELETE, url)
            .send()
            .await
            .map_err(transport)?;
        check_status(response).await?;
        Ok(())
    }

    async fn append_children(
        &self,
        parent_id: &str,
        blocks: &[ReconstructedBlock],
    ) -> Result<(), StoreError> {
        debug!(parent = %parent_id, count = blocks.len(), "Appending children");
        let response = self
            .request(reqwest::Method::PATCH, self.children_url(parent_id))
            .json(&AppendRequest::new(blocks))
            .send()
            .await
            .map_err(transport)?;
        check_status(response).await?;
        Ok(())
    }
}
