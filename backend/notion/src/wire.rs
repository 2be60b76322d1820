//! Notion JSON wire shapes and their mapping to the core block model.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use eqforge_core::{Block, BlockKind, ChildrenPage, ReconstructedBlock, RichText};

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// Response of `GET /blocks/{id}/children`.
#[derive(Debug, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub results: Vec<WireBlock>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Debug, Deserialize)]
pub struct WireBlock {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub has_children: bool,
    /// The type-keyed payload (`"paragraph": {...}`) plus any other fields.
    #[serde(flatten)]
    pub rest: HashMap<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
struct WirePayload {
    #[serde(default)]
    rich_text: Vec<WireRichText>,
    #[serde(default)]
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireRichText {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<WireText>,
    #[serde(default)]
    equation: Option<WireEquation>,
    #[serde(default)]
    plain_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireText {
    content: String,
}

#[derive(Debug, Deserialize)]
struct WireEquation {
    expression: String,
}

impl WireRichText {
    fn into_run(self) -> Option<RichText> {
        match (self.kind.as_str(), self.text, self.equation) {
            ("text", Some(text), _) => Some(RichText::text(text.content)),
            ("equation", _, Some(eq)) => Some(RichText::equation(eq.expression)),
            // Mentions and other inline objects keep their visible text.
            _ => self.plain_text.map(RichText::text),
        }
    }
}

impl WireBlock {
    pub fn into_block(mut self) -> Result<Block, serde_json::Error> {
        let kind = BlockKind::from_type_name(&self.kind);
        let payload = match self.rest.remove(&self.kind) {
            Some(Value::Object(map)) => serde_json::from_value::<WirePayload>(Value::Object(map))?,
            _ => WirePayload::default(),
        };

        Ok(Block {
            id: self.id,
            language: payload.language.filter(|_| kind == BlockKind::Code),
            kind,
            rich_text: payload
                .rich_text
                .into_iter()
                .filter_map(WireRichText::into_run)
                .collect(),
            has_children: self.has_children,
        })
    }
}

impl ListResponse {
    pub fn into_page(self) -> Result<ChildrenPage, serde_json::Error> {
        let blocks = self
            .results
            .into_iter()
            .map(WireBlock::into_block)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ChildrenPage {
            blocks,
            next_cursor: self.next_cursor,
            has_more: self.has_more,
        })
    }
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// Body of `PATCH /blocks/{id}/children`.
#[derive(Debug, Serialize)]
pub struct AppendRequest {
    pub children: Vec<Value>,
}

impl AppendRequest {
    pub fn new(blocks: &[ReconstructedBlock]) -> Self {
        Self {
            children: blocks.iter().map(encode_block).collect(),
        }
    }
}

fn encode_run(run: &RichText) -> Value {
    match run {
        RichText::Text { content } => json!({
            "type": "text",
            "text": { "content": content },
        }),
        RichText::Equation { expression } => json!({
            "type": "equation",
            "equation": { "expression": expression },
        }),
    }
}

/// Encode a rebuilt block as a Notion block object.
pub fn encode_block(block: &ReconstructedBlock) -> Value {
    let type_name = block.kind.type_name();
    let rich_text: Vec<Value> = block.rich_text.iter().map(encode_run).collect();
    let payload = match &block.kind {
        BlockKind::Divider => json!({}),
        BlockKind::Code => json!({
            "rich_text": rich_text,
            "language": block.language.as_deref().unwrap_or(eqforge_core::DEFAULT_CODE_LANGUAGE),
        }),
        _ => json!({ "rich_text": rich_text }),
    };

    let mut object = serde_json::Map::new();
    object.insert("object".into(), Value::from("block"));
    object.insert("type".into(), Value::from(type_name));
    object.insert(type_name.to_string(), payload);
    Value::Object(object)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_paragraph_with_mixed_runs() {
        let raw = json!({
            "object": "list",
            "results": [{
                "object": "block",
                "id": "59833787-2cf9-4fdf-8782-e53db20768a5",
                "type": "paragraph",
                "has_children": false,
                "paragraph": {
                    "rich_text": [
                        { "type": "text", "text": { "content": "area = ", "link": null }, "plain_text": "area = " },
                        { "type": "equation", "equation": { "expression": "\\pi r^2" }, "plain_text": "\\pi r^2" },
                        { "type": "mention", "mention": { "type": "user" }, "plain_text": "@Ada" }
                    ],
                    "color": "default"
                }
            }],
            "next_cursor": "abc",
            "has_more": true
        });

        let page = serde_json::from_value::<ListResponse>(raw)
            .unwrap()
            .into_page()
            .unwrap();
        assert!(page.has_more);
        assert_eq!(page.next_cursor.as_deref(), Some("abc"));

        let block = &page.blocks[0];
        assert_eq!(block.kind, BlockKind::Paragraph);
        assert_eq!(
            block.rich_text,
            vec![
                RichText::text("area = "),
                RichText::equation("\\pi r^2"),
                RichText::text("@Ada"),
            ]
        );
        assert_eq!(block.language, None);
    }

    #[test]
    fn test_decode_code_and_unsupported() {
        let raw = json!({
            "results": [
                {
                    "id": "c1",
                    "type": "code",
                    "has_children": false,
                    "code": {
                        "rich_text": [{ "type": "text", "text": { "content": "fn main() {}" } }],
                        "language": "rust"
                    }
                },
                {
                    "id": "t1",
                    "type": "toggle",
                    "has_children": true,
                    "toggle": { "rich_text": [] }
                },
                { "id": "d1", "type": "divider", "divider": {} }
            ],
            "next_cursor": null,
            "has_more": false
        });

        let page = serde_json::from_value::<ListResponse>(raw)
            .unwrap()
            .into_page()
            .unwrap();
        assert_eq!(page.blocks.len(), 3);
        assert_eq!(page.blocks[0].language.as_deref(), Some("rust"));
        assert_eq!(page.blocks[1].kind, BlockKind::Unsupported("toggle".into()));
        assert!(page.blocks[1].has_children);
        assert_eq!(page.blocks[2].kind, BlockKind::Divider);
        assert!(page.blocks[2].rich_text.is_empty());
    }

    #[test]
    fn test_encode_paragraph() {
        let block = ReconstructedBlock::with_rich_text(
            BlockKind::Paragraph,
            vec![RichText::text("area = "), RichText::equation("\\pi r^2")],
        );
        assert_eq!(
            encode_block(&block),
            json!({
                "object": "block",
                "type": "paragraph",
                "paragraph": {
                    "rich_text": [
                        { "type": "text", "text": { "content": "area = " } },
                        { "type": "equation", "equation": { "expression": "\\pi r^2" } }
                    ]
                }
            })
        );
    }

    #[test]
    fn test_encode_divider_and_code() {
        assert_eq!(
            encode_block(&ReconstructedBlock::divider()),
            json!({ "object": "block", "type": "divider", "divider": {} })
        );
        assert_eq!(
            encode_block(&ReconstructedBlock::code("$x$", "python")),
            json!({
                "object": "block",
                "type": "code",
                "code": {
                    "rich_text": [{ "type": "text", "text": { "content": "$x$" } }],
                    "language": "python"
                }
            })
        );
    }

    #[test]
    fn test_encode_heading_uses_type_key() {
        let block = ReconstructedBlock::with_rich_text(
            BlockKind::Heading2,
            vec![RichText::text("Title")],
        );
        let value = encode_block(&block);
        assert_eq!(value["type"], "heading_2");
        assert!(value["heading_2"]["rich_text"].is_array());
    }
}
