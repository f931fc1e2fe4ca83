//! Rich text extraction.
//!
//! Flattens an inline subtree into a sequence of pending rich text runs.
//! Formatting nodes contribute no text of their own: each child's runs are
//! extracted first and then decorated according to the kind of the node they
//! came through, so nesting composes (`**[x](u)**` yields a bold link run).

use crate::ast::{Node, NodeKind};
use crate::builder::{Decoration, RichTextBuilder};
use crate::error::ConvertError;

/// Flatten one node into rich text runs.
pub fn extract_rich_texts(node: &Node) -> Result<Vec<RichTextBuilder<'_>>, ConvertError> {
    if let NodeKind::Image { .. } = node.kind {
        return Err(ConvertError::MustBeBlockNotRichText {
            kind: node.kind.name(),
            span: node.span.clone(),
        });
    }
    if node.children.is_empty() {
        // Table cells may legitimately be empty; everything else must carry
        // its own literal to produce a run.
        if let NodeKind::TableCell = node.kind {
            return Ok(Vec::new());
        }
        return Ok(vec![RichTextBuilder::for_node(node)?]);
    }
    extract_from(&node.children)
}

/// Flatten a sibling sequence, decorating each child's runs by that child's
/// kind. Task checkboxes are structural and contribute nothing.
pub fn extract_from<'a>(nodes: &'a [Node]) -> Result<Vec<RichTextBuilder<'a>>, ConvertError> {
    let mut runs = Vec::new();
    for child in nodes {
        if let NodeKind::TaskCheckbox { .. } = child.kind {
            continue;
        }
        let mut extracted = extract_rich_texts(child)?;
        match &child.kind {
            NodeKind::Emphasis { level } => {
                let decoration = if *level == 1 { Decoration::Italic } else { Decoration::Bold };
                for run in &mut extracted {
                    run.decorate_with(decoration.clone());
                }
            }
            NodeKind::Strikethrough => {
                for run in &mut extracted {
                    run.decorate_with(Decoration::Strikethrough);
                }
            }
            NodeKind::CodeSpan => {
                for run in &mut extracted {
                    run.decorate_with(Decoration::Code);
                }
            }
            NodeKind::Link { destination } => {
                for run in &mut extracted {
                    run.decorate_with(Decoration::Link(destination.clone()));
                }
            }
            NodeKind::Text
            | NodeKind::AutoLink { .. }
            | NodeKind::RawHtml
            | NodeKind::HtmlBlock
            | NodeKind::Paragraph
            | NodeKind::TextBlock
            | NodeKind::TableCell => {}
            other => {
                tracing::warn!(kind = other.name(), "unexpected kind inside rich text");
            }
        }
        runs.extend(extracted);
    }
    Ok(runs)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ast::Literal;

    fn text(source: &str, range: std::ops::Range<usize>) -> Node {
        let _ = source;
        Node::with_literal(NodeKind::Text, range.clone(), Literal::Span(range))
    }

    fn materialize(runs: &[RichTextBuilder<'_>], source: &str) -> Vec<notion::RichText> {
        runs.iter().map(|r| r.materialize(source)).collect()
    }

    #[test]
    fn nested_formatting_composes() {
        // **_deep_**
        let source = "**_deep_**";
        let mut inner = Node::new(NodeKind::Emphasis { level: 1 }, 2..8);
        inner.children.push(text(source, 3..7));
        let mut outer = Node::new(NodeKind::Emphasis { level: 2 }, 0..10);
        outer.children.push(inner);

        let runs = extract_from(std::slice::from_ref(&outer)).unwrap();
        assert_eq!(
            materialize(&runs, source),
            vec![notion::RichText::text("deep").italic().bold()]
        );
    }

    #[test]
    fn link_wraps_every_inner_run() {
        // [a **b**](https://example.com)
        let source = "[a **b**](https://example.com)";
        let mut bold = Node::new(NodeKind::Emphasis { level: 2 }, 3..8);
        bold.children.push(text(source, 5..6));
        let mut link = Node::new(
            NodeKind::Link { destination: "https://example.com".into() },
            0..30,
        );
        link.children.push(text(source, 1..3));
        link.children.push(bold);

        let runs = extract_from(std::slice::from_ref(&link)).unwrap();
        assert_eq!(
            materialize(&runs, source),
            vec![
                notion::RichText::text("a ").with_link("https://example.com"),
                notion::RichText::text("b").bold().with_link("https://example.com"),
            ]
        );
    }

    #[test]
    fn checkbox_is_skipped_and_label_formatting_survives() {
        // [ ] _Item 2_
        let source = "- [ ] _Item 2_";
        let mut label = Node::new(NodeKind::Emphasis { level: 1 }, 6..14);
        label.children.push(text(source, 7..13));
        let mut block = Node::new(NodeKind::TextBlock, 2..14);
        block.children.push(Node::new(NodeKind::TaskCheckbox { checked: false }, 2..5));
        block.children.push(label);

        let runs = extract_rich_texts(&block).unwrap();
        assert_eq!(
            materialize(&runs, source),
            vec![notion::RichText::text("Item 2").italic()]
        );
    }

    #[test]
    fn image_cannot_flatten() {
        let node = Node::new(
            NodeKind::Image { url: "https://example.com/x.png".into(), title: String::new() },
            0..9,
        );
        assert_eq!(
            extract_rich_texts(&node).unwrap_err(),
            ConvertError::MustBeBlockNotRichText { kind: "image", span: 0..9 }
        );
    }

    #[test]
    fn empty_table_cell_yields_no_runs() {
        let cell = Node::new(NodeKind::TableCell, 0..0);
        assert_eq!(extract_rich_texts(&cell).unwrap().len(), 0);
    }
}
