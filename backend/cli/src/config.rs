use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use eqforge_config::{load_and_prepare, validate_token, EqforgeConfig, ValidationReport};
use eqforge_convert::{Converter, Reconstructor};
use eqforge_core::BlockStore;
use eqforge_notion::NotionClient;

/// Effective CLI configuration: the loaded file plus env overrides and defaults.
pub struct Config {
    pub path: PathBuf,
    pub inner: EqforgeConfig,
    pub report: ValidationReport,
}

impl Config {
    /// Load from `path`, or from the default location when `None`.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => eqforge_config::config_file_path(&eqforge_config::config_dir()),
        };
        let (inner, report) = load_and_prepare(&path).await?;
        Ok(Self {
            path,
            inner,
            report,
        })
    }

    pub fn log_level(&self) -> &str {
        self.inner.log_level()
    }

    pub fn log_dir(&self) -> Option<&Path> {
        self.inner.log_dir().map(Path::new)
    }

    /// The Notion store described by this config.
    pub fn notion_store(&self) -> Result<NotionClient> {
        let Some(token) = self.inner.token() else {
            bail!("No Notion token configured. Run `eqforge auth set <token>` or set NOTION_TOKEN.");
        };
        validate_token(token).context("Configured Notion token is invalid")?;
        if let Some(err) = self.report.first_error_in("notion") {
            bail!("{err}. Fix {} or run `eqforge config show`.", self.path.display());
        }

        let notion = self.inner.notion.clone().unwrap_or_default();
        let mut client = NotionClient::new(token);
        if let Some(url) = notion.base_url {
            client = client.with_base_url(url);
        }
        if let Some(version) = notion.api_version {
            client = client.with_api_version(version);
        }
        if let Some(size) = notion.page_size {
            client = client.with_page_size(size);
        }
        Ok(client)
    }

    /// A converter wired to the configured Notion store.
    pub fn converter(&self) -> Result<Converter> {
        let store: Arc<dyn BlockStore> = Arc::new(self.notion_store()?);
        let mut reconstructor = Reconstructor::new();
        if let Some(lang) = self
            .inner
            .notion
            .as_ref()
            .and_then(|n| n.fallback_code_language.clone())
        {
            reconstructor = reconstructor.with_fallback_language(lang);
        }
        Ok(Converter::new(store).with_reconstructor(reconstructor))
    }
}
