//! Page-id extraction from Notion URLs and raw ids.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// A dashed UUID or a bare 32-hex id, not embedded in a longer hex run.
static PAGE_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:^|[^0-9a-f])([0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}|[0-9a-f]{32})(?:$|[^0-9a-f])",
    )
    .unwrap()
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageIdError {
    #[error("no page id found in {0:?}")]
    NotFound(String),
    #[error("{0:?} is not a Notion URL")]
    ForeignHost(String),
}

/// Extract the 32-hex page id (lowercase, no dashes) from `input`.
///
/// `input` may be a bare id, a dashed UUID, or a `notion.so` / `notion.site`
/// URL. Query strings and fragments are ignored, so a `#block` anchor or a
/// `?p=` peek id never wins over the page in the path.
pub fn page_id_from_url(input: &str) -> Result<String, PageIdError> {
    let trimmed = input.trim();
    let path = match trimmed.split_once("://") {
        Some((_, rest)) => {
            let host = rest.split('/').next().unwrap_or_default();
            let host = host.rsplit('@').next().unwrap_or_default().to_ascii_lowercase();
            let host = host.split(':').next().unwrap_or_default();
            if !(host == "notion.so"
                || host.ends_with(".notion.so")
                || host == "notion.site"
                || host.ends_with(".notion.site"))
            {
                return Err(PageIdError::ForeignHost(trimmed.to_string()));
            }
            rest
        }
        None => trimmed,
    };
    let path = path.split(['?', '#']).next().unwrap_or_default();

    PAGE_ID_RE
        .captures_iter(path)
        .filter_map(|c| c.get(1))
        .last()
        .map(|m| m.as_str().replace('-', "").to_ascii_lowercase())
        .ok_or_else(|| PageIdError::NotFound(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "1429989fe8ac4effbc8f57f56486db54";

    #[test]
    fn test_bare_and_dashed_ids() {
        assert_eq!(page_id_from_url(ID).unwrap(), ID);
        assert_eq!(
            page_id_from_url("1429989F-E8AC-4EFF-BC8F-57F56486DB54").unwrap(),
            ID
        );
    }

    #[test]
    fn test_urls_with_slug_and_workspace() {
        for url in [
            "https://www.notion.so/1429989fe8ac4effbc8f57f56486db54",
            "https://www.notion.so/Calculus-Notes-1429989fe8ac4effbc8f57f56486db54",
            "https://www.notion.so/acme/Calculus-Notes-1429989fe8ac4effbc8f57f56486db54?pvs=4",
            "https://acme.notion.site/Notes-1429989fe8ac4effbc8f57f56486db54#abcdefabcdefabcdefabcdefabcdefab",
            "notion.so/1429989fe8ac4effbc8f57f56486db54",
        ] {
            assert_eq!(page_id_from_url(url).unwrap(), ID, "url: {url}");
        }
    }

    #[test]
    fn test_rejects_other_hosts_and_missing_ids() {
        assert!(matches!(
            page_id_from_url("https://example.com/1429989fe8ac4effbc8f57f56486db54"),
            Err(PageIdError::ForeignHost(_))
        ));
        assert!(matches!(
            page_id_from_url("https://www.notion.so/just-a-title"),
            Err(PageIdError::NotFound(_))
        ));
        assert!(matches!(
            page_id_from_url("1429989fe8ac4effbc8f57f56486db5"),
            Err(PageIdError::NotFound(_))
        ));
    }
}
