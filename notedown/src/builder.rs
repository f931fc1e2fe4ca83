//! Deferred construction of rich text and blocks.
//!
//! Conversion runs in two phases. The dispatch phase walks the node tree and
//! produces builders: plain values that remember which node supplies the
//! text and which decorations wrap it. The materialize phase then renders
//! every builder against the source buffer. Builders hold no text of their
//! own, so materialization is pure and repeatable.

use notion::{Block, HeadingLevel, RichText, TableRow};

use crate::ast::{Node, NodeKind};
use crate::error::ConvertError;
use crate::html;

// ---- Rich Text ----

/// A formatting layer applied to a rich text run by one of its ancestors.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoration {
    Bold,
    Italic,
    Strikethrough,
    Code,
    Link(String),
}

/// A pending rich text run: the node that supplies its content plus the
/// decorations collected while unwinding the extraction recursion.
#[derive(Debug, Clone)]
pub struct RichTextBuilder<'a> {
    node: &'a Node,
    decorations: Vec<Decoration>,
}

impl<'a> RichTextBuilder<'a> {
    /// Accept a node as a rich text source, or explain why it cannot be one.
    pub fn for_node(node: &'a Node) -> Result<Self, ConvertError> {
        match &node.kind {
            NodeKind::Text
            | NodeKind::Heading { .. }
            | NodeKind::FencedCode { .. }
            | NodeKind::CodeBlock
            | NodeKind::ListItem
            | NodeKind::AutoLink { .. }
            | NodeKind::RawHtml
            | NodeKind::HtmlBlock => Ok(RichTextBuilder {
                node,
                decorations: Vec::new(),
            }),
            NodeKind::Image { .. } => Err(ConvertError::MustBeBlockNotRichText {
                kind: node.kind.name(),
                span: node.span.clone(),
            }),
            _ => Err(ConvertError::UnsupportedNodeKind {
                kind: node.kind.name(),
                span: node.span.clone(),
            }),
        }
    }

    pub fn decorate_with(&mut self, decoration: Decoration) {
        self.decorations.push(decoration);
    }

    /// Render the run against the source buffer.
    pub fn materialize(&self, source: &str) -> RichText {
        let mut run = match &self.node.kind {
            NodeKind::AutoLink { label, url } => RichText::link(label, url),
            NodeKind::RawHtml | NodeKind::HtmlBlock => {
                RichText::text(html::sanitize(&self.node.literal_text(source)))
            }
            _ => RichText::text(self.node.literal_text(source)),
        };
        for decoration in &self.decorations {
            run = match decoration {
                Decoration::Bold => run.bold(),
                Decoration::Italic => run.italic(),
                Decoration::Strikethrough => run.strikethrough(),
                Decoration::Code => run.code(),
                Decoration::Link(url) => run.with_link(url),
            };
        }
        run
    }
}

// ---- Blocks ----

/// A pending block. Container variants hold pending children, so an entire
/// page materializes from one tree walk.
#[derive(Debug, Clone)]
pub enum BlockBuilder<'a> {
    Heading {
        level: HeadingLevel,
        rich_text: Vec<RichTextBuilder<'a>>,
    },
    Paragraph {
        rich_text: Vec<RichTextBuilder<'a>>,
        children: Vec<BlockBuilder<'a>>,
    },
    /// A paragraph sourced from an HTML block. Runs that sanitize to nothing
    /// (comments) are dropped at materialization.
    HtmlParagraph {
        rich_text: Vec<RichTextBuilder<'a>>,
    },
    Quote {
        rich_text: Vec<RichTextBuilder<'a>>,
        children: Vec<BlockBuilder<'a>>,
    },
    BulletedListItem {
        rich_text: Vec<RichTextBuilder<'a>>,
        children: Vec<BlockBuilder<'a>>,
    },
    NumberedListItem {
        rich_text: Vec<RichTextBuilder<'a>>,
        children: Vec<BlockBuilder<'a>>,
    },
    ToDo {
        checked: bool,
        rich_text: Vec<RichTextBuilder<'a>>,
    },
    Code {
        language: String,
        rich_text: Vec<RichTextBuilder<'a>>,
    },
    Table {
        has_header: bool,
        header: Vec<Vec<RichTextBuilder<'a>>>,
        rows: Vec<Vec<Vec<RichTextBuilder<'a>>>>,
    },
    Image {
        url: String,
        caption: Vec<RichTextBuilder<'a>>,
    },
    Divider,
}

impl BlockBuilder<'_> {
    /// Render the block (and its pending children) against the source buffer.
    pub fn materialize(&self, source: &str) -> Block {
        match self {
            BlockBuilder::Heading { level, rich_text } => Block::Heading {
                level: *level,
                rich_text: materialize_runs(rich_text, source),
            },
            BlockBuilder::Paragraph { rich_text, children } => Block::Paragraph {
                rich_text: materialize_runs(rich_text, source),
                children: materialize_blocks(children, source),
            },
            BlockBuilder::HtmlParagraph { rich_text } => Block::Paragraph {
                rich_text: materialize_runs(rich_text, source)
                    .into_iter()
                    .filter(|run| !run.content.is_empty())
                    .collect(),
                children: Vec::new(),
            },
            BlockBuilder::Quote { rich_text, children } => Block::Quote {
                rich_text: materialize_runs(rich_text, source),
                children: materialize_blocks(children, source),
            },
            BlockBuilder::BulletedListItem { rich_text, children } => Block::BulletedListItem {
                rich_text: materialize_runs(rich_text, source),
                children: materialize_blocks(children, source),
            },
            BlockBuilder::NumberedListItem { rich_text, children } => Block::NumberedListItem {
                rich_text: materialize_runs(rich_text, source),
                children: materialize_blocks(children, source),
            },
            BlockBuilder::ToDo { checked, rich_text } => Block::ToDo {
                checked: *checked,
                rich_text: materialize_runs(rich_text, source),
            },
            BlockBuilder::Code { language, rich_text } => Block::Code {
                language: language.clone(),
                rich_text: materialize_runs(rich_text, source),
            },
            BlockBuilder::Table { has_header, header, rows } => {
                let mut all_rows = Vec::with_capacity(rows.len() + 1);
                if *has_header {
                    all_rows.push(materialize_row(header, source));
                }
                all_rows.extend(rows.iter().map(|row| materialize_row(row, source)));
                Block::Table {
                    width: header.len(),
                    has_header: *has_header,
                    rows: all_rows,
                }
            }
            BlockBuilder::Image { url, caption } => Block::Image {
                url: url.clone(),
                caption: materialize_runs(caption, source),
            },
            BlockBuilder::Divider => Block::Divider,
        }
    }
}

fn materialize_runs(runs: &[RichTextBuilder<'_>], source: &str) -> Vec<RichText> {
    runs.iter().map(|run| run.materialize(source)).collect()
}

fn materialize_blocks(blocks: &[BlockBuilder<'_>], source: &str) -> Vec<Block> {
    blocks.iter().map(|block| block.materialize(source)).collect()
}

fn materialize_row(cells: &[Vec<RichTextBuilder<'_>>], source: &str) -> TableRow {
    TableRow {
        cells: cells
            .iter()
            .map(|cell| materialize_runs(cell, source))
            .collect(),
    }
}
