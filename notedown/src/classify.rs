//! Node classification.
//!
//! Every conversion decision starts here: a node either flattens into rich
//! text, becomes a block of its own, or is structural (document, list items,
//! table rows) and never converted directly. The two predicates are mutually
//! exclusive over the whole kind set; `TextBlock` is the one kind whose side
//! depends on content (a checkbox-first text block is a to-do, a block).

use crate::ast::{Node, NodeKind};

/// Can this node be flattened into a run of rich text?
///
/// No wildcard arm: a new kind must pick a side in both predicates.
pub fn is_inline_convertible(node: &Node) -> bool {
    match &node.kind {
        NodeKind::Text
        | NodeKind::Emphasis { .. }
        | NodeKind::Strikethrough
        | NodeKind::CodeSpan
        | NodeKind::Link { .. }
        | NodeKind::AutoLink { .. }
        | NodeKind::RawHtml
        | NodeKind::Paragraph => true,
        NodeKind::TextBlock => !starts_with_checkbox(node),
        NodeKind::Document
        | NodeKind::Heading { .. }
        | NodeKind::HtmlBlock
        | NodeKind::Image { .. }
        | NodeKind::List { .. }
        | NodeKind::ListItem
        | NodeKind::TaskCheckbox { .. }
        | NodeKind::Table
        | NodeKind::TableHeaderRow
        | NodeKind::TableRow
        | NodeKind::TableCell
        | NodeKind::Blockquote
        | NodeKind::ThematicBreak
        | NodeKind::FencedCode { .. }
        | NodeKind::CodeBlock => false,
    }
}

/// Must this node become a block of its own?
pub fn is_block_convertible(node: &Node) -> bool {
    match &node.kind {
        NodeKind::Heading { .. }
        | NodeKind::List { .. }
        | NodeKind::Blockquote
        | NodeKind::Image { .. }
        | NodeKind::Table
        | NodeKind::FencedCode { .. }
        | NodeKind::CodeBlock
        | NodeKind::HtmlBlock
        | NodeKind::ThematicBreak => true,
        NodeKind::TextBlock => starts_with_checkbox(node),
        NodeKind::Document
        | NodeKind::Paragraph
        | NodeKind::Text
        | NodeKind::Emphasis { .. }
        | NodeKind::Strikethrough
        | NodeKind::CodeSpan
        | NodeKind::Link { .. }
        | NodeKind::AutoLink { .. }
        | NodeKind::RawHtml
        | NodeKind::ListItem
        | NodeKind::TaskCheckbox { .. }
        | NodeKind::TableHeaderRow
        | NodeKind::TableRow
        | NodeKind::TableCell => false,
    }
}

/// A text block whose first child is a task checkbox converts as a to-do.
pub fn starts_with_checkbox(node: &Node) -> bool {
    matches!(
        node.first_child().map(|child| &child.kind),
        Some(NodeKind::TaskCheckbox { .. })
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Literal;

    fn node(kind: NodeKind) -> Node {
        Node::new(kind, 0..0)
    }

    fn all_kinds() -> Vec<NodeKind> {
        vec![
            NodeKind::Document,
            NodeKind::Heading { level: 1 },
            NodeKind::Paragraph,
            NodeKind::TextBlock,
            NodeKind::Text,
            NodeKind::Emphasis { level: 1 },
            NodeKind::Strikethrough,
            NodeKind::CodeSpan,
            NodeKind::Link { destination: "https://example.com".into() },
            NodeKind::AutoLink { label: "x".into(), url: "x".into() },
            NodeKind::RawHtml,
            NodeKind::HtmlBlock,
            NodeKind::Image { url: "x".into(), title: String::new() },
            NodeKind::List { marker: '-' },
            NodeKind::ListItem,
            NodeKind::TaskCheckbox { checked: false },
            NodeKind::Table,
            NodeKind::TableHeaderRow,
            NodeKind::TableRow,
            NodeKind::TableCell,
            NodeKind::Blockquote,
            NodeKind::ThematicBreak,
            NodeKind::FencedCode { language: None },
            NodeKind::CodeBlock,
        ]
    }

    #[test]
    fn predicates_are_mutually_exclusive() {
        for kind in all_kinds() {
            let n = node(kind);
            assert!(
                !(is_inline_convertible(&n) && is_block_convertible(&n)),
                "{} classified both ways",
                n.kind.name()
            );
        }
    }

    #[test]
    fn paragraphs_flatten_into_rich_text() {
        assert!(is_inline_convertible(&node(NodeKind::Paragraph)));
        assert!(!is_block_convertible(&node(NodeKind::Paragraph)));
    }

    #[test]
    fn checkbox_flips_text_block_to_block_side() {
        let mut text_block = node(NodeKind::TextBlock);
        assert!(is_inline_convertible(&text_block));

        text_block.children.push(Node::with_literal(
            NodeKind::TaskCheckbox { checked: true },
            0..0,
            Literal::None,
        ));
        assert!(!is_inline_convertible(&text_block));
        assert!(is_block_convertible(&text_block));
    }

    #[test]
    fn structural_kinds_are_neither() {
        for kind in [
            NodeKind::Document,
            NodeKind::ListItem,
            NodeKind::TaskCheckbox { checked: false },
            NodeKind::TableHeaderRow,
            NodeKind::TableRow,
            NodeKind::TableCell,
        ] {
            let n = node(kind);
            assert!(!is_inline_convertible(&n), "{}", n.kind.name());
            assert!(!is_block_convertible(&n), "{}", n.kind.name());
        }
    }
}
