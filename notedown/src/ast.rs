//! The source AST consumed by the converter.
//!
//! Nodes are built once per conversion by [`crate::parser`] from
//! pulldown-cmark events and are read-only afterwards. Literal text is not
//! stored in the tree: nodes carry byte ranges into the original source and
//! materialize their content lazily through [`Node::literal_text`].

use std::ops::Range;

/// The closed set of node kinds the converter understands, with the
/// kind-specific data each one carries.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Document,
    Heading { level: u8 },
    Paragraph,
    /// Inline content of a tight list item (or a paragraph that holds a task
    /// checkbox), wrapped so list dispatch can treat it as the item's text.
    TextBlock,
    Text,
    /// Level 1 is italic (`*x*`), level 2 and above is bold (`**x**`).
    Emphasis { level: u8 },
    Strikethrough,
    CodeSpan,
    Link { destination: String },
    /// Label and destination are captured jointly while building the tree;
    /// an autolink never goes through the generic decoration path.
    AutoLink { label: String, url: String },
    RawHtml,
    HtmlBlock,
    Image { url: String, title: String },
    /// `marker` is the first marker character peeked from the source bytes:
    /// `-`, `+`, `*` for bulleted lists, a digit for numbered ones.
    List { marker: char },
    ListItem,
    TaskCheckbox { checked: bool },
    Table,
    TableHeaderRow,
    TableRow,
    TableCell,
    Blockquote,
    ThematicBreak,
    FencedCode { language: Option<String> },
    /// Indented (non-fenced) code block.
    CodeBlock,
}

impl NodeKind {
    /// Stable name used in error messages and logs.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Document => "document",
            NodeKind::Heading { .. } => "heading",
            NodeKind::Paragraph => "paragraph",
            NodeKind::TextBlock => "text block",
            NodeKind::Text => "text",
            NodeKind::Emphasis { .. } => "emphasis",
            NodeKind::Strikethrough => "strikethrough",
            NodeKind::CodeSpan => "code span",
            NodeKind::Link { .. } => "link",
            NodeKind::AutoLink { .. } => "autolink",
            NodeKind::RawHtml => "raw html",
            NodeKind::HtmlBlock => "html block",
            NodeKind::Image { .. } => "image",
            NodeKind::List { .. } => "list",
            NodeKind::ListItem => "list item",
            NodeKind::TaskCheckbox { .. } => "task checkbox",
            NodeKind::Table => "table",
            NodeKind::TableHeaderRow => "table header row",
            NodeKind::TableRow => "table row",
            NodeKind::TableCell => "table cell",
            NodeKind::Blockquote => "blockquote",
            NodeKind::ThematicBreak => "thematic break",
            NodeKind::FencedCode { .. } => "fenced code",
            NodeKind::CodeBlock => "code block",
        }
    }
}

/// Where a node's literal bytes live in the source buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// The node has no literal content of its own.
    None,
    /// One contiguous segment.
    Span(Range<usize>),
    /// Block-level line spans, joined in order at materialization.
    Lines(Vec<Range<usize>>),
}

/// A single node of the source tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<Node>,
    /// Full byte range of the node, kept for diagnostics.
    pub span: Range<usize>,
    pub literal: Literal,
}

impl Node {
    pub fn new(kind: NodeKind, span: Range<usize>) -> Self {
        Node {
            kind,
            children: Vec::new(),
            span,
            literal: Literal::None,
        }
    }

    pub fn with_literal(kind: NodeKind, span: Range<usize>, literal: Literal) -> Self {
        Node {
            kind,
            children: Vec::new(),
            span,
            literal,
        }
    }

    pub fn first_child(&self) -> Option<&Node> {
        self.children.first()
    }

    /// Append one line range to a `Literal::Lines` holder.
    pub fn push_line(&mut self, line: Range<usize>) {
        match &mut self.literal {
            Literal::Lines(lines) => lines.push(line),
            other => *other = Literal::Lines(vec![line]),
        }
    }

    /// Materialize the node's literal text against the source buffer.
    ///
    /// Only leaf-eligible kinds (text, headings, code, raw HTML, list items,
    /// autolinks) carry literal content; whole-line literals are trimmed of
    /// surrounding whitespace, inline text is returned verbatim because its
    /// internal and boundary spaces are significant.
    pub fn literal_text(&self, source: &str) -> String {
        match &self.kind {
            NodeKind::Text | NodeKind::RawHtml => self.raw_text(source),
            NodeKind::Heading { .. } => {
                let raw = self.raw_text(source);
                raw.trim().trim_start_matches('#').trim().to_string()
            }
            NodeKind::FencedCode { .. } | NodeKind::CodeBlock | NodeKind::HtmlBlock => {
                self.raw_text(source).trim().to_string()
            }
            NodeKind::ListItem => strip_list_marker(self.raw_text(source).trim()).to_string(),
            NodeKind::AutoLink { label, .. } => label.clone(),
            _ => String::new(),
        }
    }

    fn raw_text(&self, source: &str) -> String {
        match &self.literal {
            Literal::None => String::new(),
            Literal::Span(range) => source[range.clone()].to_string(),
            Literal::Lines(lines) => {
                let mut text = String::new();
                for line in lines {
                    text.push_str(&source[line.clone()]);
                }
                text
            }
        }
    }
}

/// Strip a leading list marker (`- `, `+ `, `* `, `1. `, `2) ` ...) from an
/// item's raw text. Used only for items with no child nodes.
fn strip_list_marker(text: &str) -> &str {
    let rest = text
        .strip_prefix(['-', '+', '*'])
        .or_else(|| {
            let digits = text.chars().take_while(|c| c.is_ascii_digit()).count();
            if digits == 0 {
                return None;
            }
            text[digits..].strip_prefix(['.', ')'])
        })
        .unwrap_or(text);
    rest.trim_start()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_literal_strips_markers_and_whitespace() {
        let source = "#   ";
        let node = Node::with_literal(NodeKind::Heading { level: 1 }, 0..4, Literal::Span(0..4));
        assert_eq!(node.literal_text(source), "");

        let source = "## Heading Foobar\n";
        let node = Node::with_literal(NodeKind::Heading { level: 2 }, 0..18, Literal::Span(0..18));
        assert_eq!(node.literal_text(source), "Heading Foobar");
    }

    #[test]
    fn text_literal_is_not_trimmed() {
        let source = "Hello **foobar**";
        let node = Node::with_literal(NodeKind::Text, 0..6, Literal::Span(0..6));
        assert_eq!(node.literal_text(source), "Hello ");
    }

    #[test]
    fn code_lines_are_joined_then_trimmed() {
        let source = "```go\nfn main() {}\n```\n";
        let mut node = Node::new(NodeKind::FencedCode { language: Some("go".into()) }, 0..23);
        node.push_line(6..19);
        assert_eq!(node.literal_text(source), "fn main() {}");
    }

    #[test]
    fn list_marker_stripping() {
        assert_eq!(strip_list_marker("- item"), "item");
        assert_eq!(strip_list_marker("3. item"), "item");
        assert_eq!(strip_list_marker("12) item"), "item");
        assert_eq!(strip_list_marker("plain"), "plain");
    }
}
