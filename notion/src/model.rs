use serde::{Serialize, Serializer};
use serde_json::{Value, json};

/// Inline style flags carried by a rich text run.
///
/// Multiple annotations may be set at once; the default (all `false`) means a
/// plain run and is omitted from the wire shape entirely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub code: bool,
}

impl Annotations {
    pub fn is_plain(&self) -> bool {
        *self == Annotations::default()
    }
}

/// An immutable span of text with an annotation set and an optional link —
/// the atomic inline unit of a Notion page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichText {
    pub content: String,
    pub annotations: Annotations,
    pub link: Option<String>,
}

impl RichText {
    pub fn text(content: impl Into<String>) -> Self {
        RichText {
            content: content.into(),
            annotations: Annotations::default(),
            link: None,
        }
    }

    pub fn link(content: impl Into<String>, url: impl Into<String>) -> Self {
        RichText {
            content: content.into(),
            annotations: Annotations::default(),
            link: Some(url.into()),
        }
    }

    pub fn bold(mut self) -> Self {
        self.annotations.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.annotations.italic = true;
        self
    }

    pub fn strikethrough(mut self) -> Self {
        self.annotations.strikethrough = true;
        self
    }

    pub fn code(mut self) -> Self {
        self.annotations.code = true;
        self
    }

    /// Attach (or replace) the run's link. Single-valued: a later link wins.
    pub fn with_link(mut self, url: impl Into<String>) -> Self {
        self.link = Some(url.into());
        self
    }

    fn to_json(&self) -> Value {
        let mut text = json!({ "content": self.content });
        if let Some(url) = &self.link {
            text["link"] = json!({ "url": url });
        }
        let mut rt = json!({ "type": "text", "text": text });
        if !self.annotations.is_plain() {
            rt["annotations"] = json!({
                "bold": self.annotations.bold,
                "italic": self.annotations.italic,
                "strikethrough": self.annotations.strikethrough,
                "code": self.annotations.code,
            });
        }
        rt
    }
}

/// Heading depth supported by Notion. Markdown levels 4-6 are clamped to H3
/// before a block is ever constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Clamp a markdown heading level (1-6) onto the Notion range.
    pub fn clamped(level: u8) -> Self {
        match level {
            1 => HeadingLevel::H1,
            2 => HeadingLevel::H2,
            _ => HeadingLevel::H3,
        }
    }

    fn type_name(self) -> &'static str {
        match self {
            HeadingLevel::H1 => "heading_1",
            HeadingLevel::H2 => "heading_2",
            HeadingLevel::H3 => "heading_3",
        }
    }
}

/// One row of a table block: a list of cells, each a run sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<Vec<RichText>>,
}

impl TableRow {
    fn to_json(&self) -> Value {
        let cells: Vec<Vec<Value>> = self
            .cells
            .iter()
            .map(|cell| cell.iter().map(RichText::to_json).collect())
            .collect();
        json!({
            "object": "block",
            "type": "table_row",
            "table_row": { "cells": cells },
        })
    }
}

/// A tagged, possibly-nested output unit corresponding to one structural
/// element of a Notion page.
///
/// For block kinds that support nesting, `children` is always present —
/// possibly empty, never absent — because the API requires an explicit empty
/// list rather than a missing field.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading {
        level: HeadingLevel,
        rich_text: Vec<RichText>,
    },
    Paragraph {
        rich_text: Vec<RichText>,
        children: Vec<Block>,
    },
    BulletedListItem {
        rich_text: Vec<RichText>,
        children: Vec<Block>,
    },
    NumberedListItem {
        rich_text: Vec<RichText>,
        children: Vec<Block>,
    },
    ToDo {
        checked: bool,
        rich_text: Vec<RichText>,
    },
    Code {
        language: String,
        rich_text: Vec<RichText>,
    },
    Quote {
        rich_text: Vec<RichText>,
        children: Vec<Block>,
    },
    Table {
        /// Number of header cells; 0 when the table declared no header row.
        width: usize,
        has_header: bool,
        rows: Vec<TableRow>,
    },
    Image {
        url: String,
        caption: Vec<RichText>,
    },
    Divider,
}

impl Block {
    /// Render this block in the Notion API wire shape: a `type` tag plus a
    /// nested object named after the tag (e.g. `heading_1.rich_text`).
    pub fn to_json(&self) -> Value {
        match self {
            Block::Heading { level, rich_text } => {
                let tag = level.type_name();
                json!({
                    "object": "block",
                    "type": tag,
                    tag: { "rich_text": runs_json(rich_text) },
                })
            }
            Block::Paragraph {
                rich_text,
                children,
            } => tagged_container("paragraph", rich_text, children),
            Block::BulletedListItem {
                rich_text,
                children,
            } => tagged_container("bulleted_list_item", rich_text, children),
            Block::NumberedListItem {
                rich_text,
                children,
            } => tagged_container("numbered_list_item", rich_text, children),
            Block::Quote {
                rich_text,
                children,
            } => tagged_container("quote", rich_text, children),
            Block::ToDo { checked, rich_text } => json!({
                "object": "block",
                "type": "to_do",
                "to_do": { "rich_text": runs_json(rich_text), "checked": checked },
            }),
            Block::Code {
                language,
                rich_text,
            } => json!({
                "object": "block",
                "type": "code",
                "code": { "rich_text": runs_json(rich_text), "language": language },
            }),
            Block::Table {
                width,
                has_header,
                rows,
            } => {
                let children: Vec<Value> = rows.iter().map(TableRow::to_json).collect();
                json!({
                    "object": "block",
                    "type": "table",
                    "table": {
                        "table_width": width,
                        "has_column_header": has_header,
                        "children": children,
                    },
                })
            }
            Block::Image { url, caption } => json!({
                "object": "block",
                "type": "image",
                "image": {
                    "type": "external",
                    "external": { "url": url },
                    "caption": runs_json(caption),
                },
            }),
            Block::Divider => json!({
                "object": "block",
                "type": "divider",
                "divider": {},
            }),
        }
    }
}

fn runs_json(runs: &[RichText]) -> Vec<Value> {
    runs.iter().map(RichText::to_json).collect()
}

fn tagged_container(tag: &str, rich_text: &[RichText], children: &[Block]) -> Value {
    let children: Vec<Value> = children.iter().map(Block::to_json).collect();
    json!({
        "object": "block",
        "type": tag,
        tag: { "rich_text": runs_json(rich_text), "children": children },
    })
}

impl Serialize for RichText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl Serialize for TableRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
