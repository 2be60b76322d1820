//! Block reconstruction: rebuild one fetched block with equation runs in
//! place of the marker syntax found in its text.

use eqforge_core::{Block, BlockKind, ReconstructedBlock, RichText, DEFAULT_CODE_LANGUAGE};

use crate::tokenizer::tokenize;

/// Rebuilds blocks, filling in a language for code blocks that lack one.
#[derive(Debug, Clone)]
pub struct Reconstructor {
    fallback_language: String,
}

impl Default for Reconstructor {
    fn default() -> Self {
        Self::new()
    }
}

impl Reconstructor {
    pub fn new() -> Self {
        Self {
            fallback_language: DEFAULT_CODE_LANGUAGE.to_string(),
        }
    }

    pub fn with_fallback_language(mut self, language: impl Into<String>) -> Self {
        self.fallback_language = language.into();
        self
    }

    /// Build the replacement for `block`, or `None` if it should be dropped.
    ///
    /// Blocks with no visible text and blocks of unsupported kinds are dropped.
    /// Dividers always come back bare. Code blocks keep their text literally.
    pub fn reconstruct(&self, block: &Block) -> Option<ReconstructedBlock> {
        let flattened = block.flatten_text();
        if flattened.is_empty() {
            return None;
        }

        let segments = tokenize(&flattened);
        let found_equations = segments.iter().any(|s| s.is_equation());

        match &block.kind {
            BlockKind::Unsupported(_) => None,
            BlockKind::Divider => Some(ReconstructedBlock::divider()),
            BlockKind::Code => {
                let language = block
                    .language
                    .clone()
                    .unwrap_or_else(|| self.fallback_language.clone());
                Some(ReconstructedBlock::code(flattened, language))
            }
            kind @ (BlockKind::Paragraph
            | BlockKind::Heading1
            | BlockKind::Heading2
            | BlockKind::Heading3
            | BlockKind::Quote
            | BlockKind::BulletedListItem) => {
                let rich_text = if found_equations {
                    segments.into_iter().map(RichText::from).collect()
                } else {
                    vec![RichText::text(flattened)]
                };
                Some(ReconstructedBlock::with_rich_text(kind.clone(), rich_text))
            }
        }
    }
}

/// Rebuild `block` with the default code-block language.
pub fn reconstruct(block: &Block) -> Option<ReconstructedBlock> {
    Reconstructor::new().reconstruct(block)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_with_display_markers() {
        let block = Block::new("b1", BlockKind::Paragraph).with_text("area = $$ \\pi r^2 $$");
        let rebuilt = reconstruct(&block).unwrap();
        assert_eq!(rebuilt.kind, BlockKind::Paragraph);
        assert_eq!(
            rebuilt.rich_text,
            vec![RichText::text("area = "), RichText::equation("\\pi r^2")]
        );
        assert_eq!(rebuilt.language, None);
    }

    #[test]
    fn test_markers_split_across_runs_are_joined() {
        let block = Block::new("b1", BlockKind::BulletedListItem)
            .with_text("sum $a")
            .with_text("+b$ end");
        let rebuilt = reconstruct(&block).unwrap();
        assert_eq!(
            rebuilt.rich_text,
            vec![
                RichText::text("sum "),
                RichText::equation("a+b"),
                RichText::text(" end"),
            ]
        );
    }

    #[test]
    fn test_native_equations_survive() {
        let block = Block::new("b1", BlockKind::Quote)
            .with_text("given ")
            .with_equation("x^2")
            .with_text(" and $y$");
        let rebuilt = reconstruct(&block).unwrap();
        assert_eq!(
            rebuilt.rich_text,
            vec![
                RichText::text("given "),
                RichText::equation("x^2"),
                RichText::text(" and "),
                RichText::equation("y"),
            ]
        );
        assert_eq!(rebuilt.equation_count(), 2);
    }

    #[test]
    fn test_headings_keep_level() {
        for kind in [BlockKind::Heading1, BlockKind::Heading2, BlockKind::Heading3] {
            let block = Block::new("h", kind.clone()).with_text("On $\\mathbb{R}$");
            let rebuilt = reconstruct(&block).unwrap();
            assert_eq!(rebuilt.kind, kind);
            assert_eq!(rebuilt.equation_count(), 1);
        }
    }

    #[test]
    fn test_plain_text_becomes_single_run() {
        let block = Block::new("b1", BlockKind::Paragraph)
            .with_text("hello ")
            .with_text("world");
        let rebuilt = reconstruct(&block).unwrap();
        assert_eq!(rebuilt.rich_text, vec![RichText::text("hello world")]);
    }

    #[test]
    fn test_divider_is_always_bare() {
        let empty = Block::new("d1", BlockKind::Divider).with_text("---");
        let with_markers = Block::new("d2", BlockKind::Divider).with_text("$$x$$");
        assert_eq!(reconstruct(&empty), Some(ReconstructedBlock::divider()));
        assert_eq!(reconstruct(&with_markers), Some(ReconstructedBlock::divider()));
    }

    #[test]
    fn test_empty_text_is_dropped() {
        assert_eq!(reconstruct(&Block::new("p", BlockKind::Paragraph)), None);
        assert_eq!(reconstruct(&Block::new("d", BlockKind::Divider)), None);
        assert_eq!(
            reconstruct(&Block::new("p", BlockKind::Paragraph).with_text("")),
            None
        );
    }

    #[test]
    fn test_unsupported_kind_is_dropped() {
        let block = Block::new("t", BlockKind::Unsupported("toggle".into())).with_text("$x$");
        assert_eq!(reconstruct(&block), None);
        let plain = Block::new("t", BlockKind::Unsupported("callout".into())).with_text("hi");
        assert_eq!(reconstruct(&plain), None);
    }

    #[test]
    fn test_code_keeps_markers_literally() {
        let block = Block::new("c", BlockKind::Code)
            .with_text("echo $HOME $$ done $$")
            .with_language("shell");
        let rebuilt = reconstruct(&block).unwrap();
        assert_eq!(
            rebuilt,
            ReconstructedBlock::code("echo $HOME $$ done $$", "shell")
        );
    }

    #[test]
    fn test_code_language_fallback() {
        let block = Block::new("c", BlockKind::Code).with_text("x = 1");
        assert_eq!(reconstruct(&block).unwrap().language.as_deref(), Some("python"));

        let rust = Reconstructor::new().with_fallback_language("rust");
        assert_eq!(rust.reconstruct(&block).unwrap().language.as_deref(), Some("rust"));
    }
}
