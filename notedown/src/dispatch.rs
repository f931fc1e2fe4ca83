//! Block dispatch.
//!
//! Maps one block-convertible node to its pending blocks. Most kinds map to
//! exactly one block; list items holding a task checkbox can fan out into a
//! to-do plus sibling blocks, which is why the return type is a vector.

use notion::HeadingLevel;

use crate::ast::{Node, NodeKind};
use crate::builder::{BlockBuilder, RichTextBuilder};
use crate::classify::{is_block_convertible, starts_with_checkbox};
use crate::error::ConvertError;
use crate::extract::{extract_from, extract_rich_texts};

/// Fallback code block language accepted by the Notion API.
pub const PLAIN_TEXT: &str = "plain text";

/// Convert one node into pending blocks.
pub fn to_blocks<'a>(node: &'a Node) -> Result<Vec<BlockBuilder<'a>>, ConvertError> {
    match &node.kind {
        NodeKind::Heading { level } => Ok(vec![BlockBuilder::Heading {
            level: HeadingLevel::clamped(*level),
            rich_text: extract_rich_texts(node)?,
        }]),

        NodeKind::Paragraph => container(node, |rich_text, children| BlockBuilder::Paragraph {
            rich_text,
            children,
        }),
        NodeKind::Blockquote => container(node, |rich_text, children| BlockBuilder::Quote {
            rich_text,
            children,
        }),
        NodeKind::TextBlock if starts_with_checkbox(node) => Ok(vec![to_do(node)?]),
        NodeKind::TextBlock => container(node, |rich_text, children| BlockBuilder::Paragraph {
            rich_text,
            children,
        }),

        NodeKind::List { marker } => list(node, *marker),

        NodeKind::FencedCode { language } => Ok(vec![BlockBuilder::Code {
            language: normalize_language(language.as_deref()),
            rich_text: extract_rich_texts(node)?,
        }]),
        NodeKind::CodeBlock => Ok(vec![BlockBuilder::Code {
            language: PLAIN_TEXT.to_string(),
            rich_text: extract_rich_texts(node)?,
        }]),

        NodeKind::Table => table(node),

        NodeKind::Image { url, .. } => Ok(vec![BlockBuilder::Image {
            url: url.clone(),
            caption: extract_from(&node.children)?,
        }]),

        NodeKind::HtmlBlock => Ok(vec![BlockBuilder::HtmlParagraph {
            rich_text: vec![RichTextBuilder::for_node(node)?],
        }]),

        NodeKind::ThematicBreak => Ok(vec![BlockBuilder::Divider]),

        other => Err(ConvertError::UnsupportedNodeKind {
            kind: other.name(),
            span: node.span.clone(),
        }),
    }
}

/// Shared rule for paragraph-shaped containers: a leading run of inline
/// children becomes the block's rich text, every child after the first
/// block-convertible one becomes a child block.
fn container<'a>(
    node: &'a Node,
    build: impl FnOnce(Vec<RichTextBuilder<'a>>, Vec<BlockBuilder<'a>>) -> BlockBuilder<'a>,
) -> Result<Vec<BlockBuilder<'a>>, ConvertError> {
    if node.children.is_empty() {
        return Err(ConvertError::EmptyNodeAtBlockLevel {
            kind: node.kind.name(),
            span: node.span.clone(),
        });
    }

    let (rich_text, children) = prefix_and_children(&node.children)?;
    Ok(vec![build(rich_text, children)])
}

/// Walk a child sequence: inline children accumulate into the rich text
/// prefix until the first block-convertible child (or a child whose
/// extraction signals [`ConvertError::MustBeBlockNotRichText`]); everything
/// from there on dispatches into child blocks.
fn prefix_and_children<'a>(
    nodes: &'a [Node],
) -> Result<(Vec<RichTextBuilder<'a>>, Vec<BlockBuilder<'a>>), ConvertError> {
    let mut rich_text = Vec::new();
    let mut children = Vec::new();
    let mut in_prefix = true;
    for child in nodes {
        if in_prefix && !is_block_convertible(child) {
            match extract_from(std::slice::from_ref(child)) {
                Ok(runs) => {
                    rich_text.extend(runs);
                    continue;
                }
                Err(ConvertError::MustBeBlockNotRichText { .. }) => {
                    children.extend(redirect_to_blocks(child)?);
                }
                Err(error) => return Err(error),
            }
        } else {
            children.extend(to_blocks(child)?);
        }
        in_prefix = false;
    }
    Ok((rich_text, children))
}

/// Route a child that refused rich-text extraction into block dispatch.
/// Inline wrappers (a link or emphasis around an image) dispatch their
/// children instead, so the image surfaces as a block.
fn redirect_to_blocks<'a>(child: &'a Node) -> Result<Vec<BlockBuilder<'a>>, ConvertError> {
    match &child.kind {
        NodeKind::Link { .. } | NodeKind::Emphasis { .. } | NodeKind::Strikethrough => {
            let mut blocks = Vec::new();
            for inner in &child.children {
                blocks.extend(redirect_to_blocks(inner)?);
            }
            Ok(blocks)
        }
        _ => to_blocks(child),
    }
}

fn list<'a>(node: &'a Node, marker: char) -> Result<Vec<BlockBuilder<'a>>, ConvertError> {
    let bulleted = matches!(marker, '-' | '+' | '*');
    let mut blocks = Vec::new();
    for item in &node.children {
        blocks.extend(list_item(item, bulleted)?);
    }
    Ok(blocks)
}

/// Convert one list item. A checkbox item produces a to-do; any remaining
/// item content follows it as sibling blocks since to-dos carry no children.
fn list_item<'a>(item: &'a Node, bulleted: bool) -> Result<Vec<BlockBuilder<'a>>, ConvertError> {
    if let Some(first) = item.first_child() {
        if matches!(first.kind, NodeKind::TextBlock) && starts_with_checkbox(first) {
            let mut blocks = vec![to_do(first)?];
            for rest in &item.children[1..] {
                blocks.extend(to_blocks(rest)?);
            }
            return Ok(blocks);
        }
    }

    let (rich_text, children) = if item.children.is_empty() {
        (vec![RichTextBuilder::for_node(item)?], Vec::new())
    } else {
        prefix_and_children(&item.children)?
    };

    let block = if bulleted {
        BlockBuilder::BulletedListItem { rich_text, children }
    } else {
        BlockBuilder::NumberedListItem { rich_text, children }
    };
    Ok(vec![block])
}

fn to_do<'a>(text_block: &'a Node) -> Result<BlockBuilder<'a>, ConvertError> {
    let checked = matches!(
        text_block.first_child().map(|c| &c.kind),
        Some(NodeKind::TaskCheckbox { checked: true })
    );
    Ok(BlockBuilder::ToDo {
        checked,
        rich_text: extract_rich_texts(text_block)?,
    })
}

fn table<'a>(node: &'a Node) -> Result<Vec<BlockBuilder<'a>>, ConvertError> {
    let mut has_header = false;
    let mut header = Vec::new();
    let mut rows = Vec::new();
    for row in &node.children {
        let cells = row
            .children
            .iter()
            .map(extract_rich_texts)
            .collect::<Result<Vec<_>, _>>()?;
        match &row.kind {
            NodeKind::TableHeaderRow => {
                has_header = true;
                header = cells;
            }
            _ => rows.push(cells),
        }
    }
    Ok(vec![BlockBuilder::Table { has_header, header, rows }])
}

fn normalize_language(language: Option<&str>) -> String {
    match language {
        Some(lang) if !lang.trim().is_empty() => lang.trim().to_lowercase(),
        _ => PLAIN_TEXT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ast::Literal;

    #[test]
    fn thematic_break_is_a_divider() {
        let node = Node::new(NodeKind::ThematicBreak, 0..3);
        let blocks = to_blocks(&node).unwrap();
        assert!(matches!(blocks.as_slice(), [BlockBuilder::Divider]));
    }

    #[test]
    fn empty_paragraph_is_rejected() {
        let node = Node::new(NodeKind::Paragraph, 0..0);
        assert_eq!(
            to_blocks(&node).unwrap_err(),
            ConvertError::EmptyNodeAtBlockLevel { kind: "paragraph", span: 0..0 }
        );
    }

    #[test]
    fn structural_kinds_have_no_rule() {
        let node = Node::new(NodeKind::TableRow, 5..9);
        assert_eq!(
            to_blocks(&node).unwrap_err(),
            ConvertError::UnsupportedNodeKind { kind: "table row", span: 5..9 }
        );
    }

    #[test]
    fn headerless_table_has_zero_width() {
        let source = "cell";
        let mut cell = Node::new(NodeKind::TableCell, 0..4);
        cell.children
            .push(Node::with_literal(NodeKind::Text, 0..4, Literal::Span(0..4)));
        let mut row = Node::new(NodeKind::TableRow, 0..4);
        row.children.push(cell.clone());
        row.children.push(cell);
        let mut table = Node::new(NodeKind::Table, 0..4);
        table.children.push(row);

        let blocks = to_blocks(&table).unwrap();
        assert_eq!(
            blocks[0].materialize(source),
            notion::Block::Table {
                width: 0,
                has_header: false,
                rows: vec![notion::TableRow {
                    cells: vec![vec![notion::RichText::text("cell")]; 2],
                }],
            }
        );
    }

    #[test]
    fn language_normalization() {
        assert_eq!(normalize_language(Some(" Go ")), "go");
        assert_eq!(normalize_language(Some("")), PLAIN_TEXT);
        assert_eq!(normalize_language(None), PLAIN_TEXT);
    }
}
