//! Markdown parsing.
//!
//! Adapts the pulldown-cmark event stream into the owned [`Node`] tree the
//! rest of the crate works on. Events arrive with byte offsets; each node
//! keeps those offsets rather than copied text, with a narrowing pass
//! ([`resolve_span`]) so that a node's literal range covers exactly its
//! content (a code span's range from pulldown includes the backticks, an
//! indented code line includes its indentation).

use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, LinkType, Options, Parser, Tag};

use crate::ast::{Literal, Node, NodeKind};

/// Parse a markdown document into a [`NodeKind::Document`] tree.
pub fn parse_document(source: &str) -> Node {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS;
    let mut stack = vec![Node::new(NodeKind::Document, 0..source.len())];

    for (event, range) in Parser::new_ext(source, options).into_offset_iter() {
        match event {
            Event::Start(tag) => stack.push(open_node(source, tag, range)),
            Event::End(_) => close_node(source, &mut stack),
            Event::Text(text) => {
                if let Some(top) = stack.last_mut().filter(|top| holds_raw_lines(&top.kind)) {
                    append_code_lines(top, source, range, &text);
                } else {
                    attach(
                        &mut stack,
                        Node::with_literal(
                            NodeKind::Text,
                            range.clone(),
                            Literal::Span(resolve_span(source, range, &text)),
                        ),
                    );
                }
            }
            Event::Code(code) => {
                let inner = resolve_span(source, range.clone(), &code);
                let mut span_node = Node::new(NodeKind::CodeSpan, range);
                span_node.children.push(Node::with_literal(
                    NodeKind::Text,
                    inner.clone(),
                    Literal::Span(inner),
                ));
                attach(&mut stack, span_node);
            }
            Event::Html(html) => {
                if let Some(top) = stack.last_mut().filter(|top| holds_raw_lines(&top.kind)) {
                    append_code_lines(top, source, range, &html);
                } else {
                    attach(
                        &mut stack,
                        Node::with_literal(
                            NodeKind::RawHtml,
                            range.clone(),
                            Literal::Span(resolve_span(source, range, &html)),
                        ),
                    );
                }
            }
            Event::InlineHtml(html) => attach(
                &mut stack,
                Node::with_literal(
                    NodeKind::RawHtml,
                    range.clone(),
                    Literal::Span(resolve_span(source, range, &html)),
                ),
            ),
            Event::SoftBreak => attach(
                &mut stack,
                Node::with_literal(NodeKind::Text, range.clone(), Literal::Span(newline_in(source, range))),
            ),
            Event::HardBreak => {
                // The event range covers the trailing spaces or backslash as
                // well; only the newline itself is content.
                let span = newline_in(source, range.clone());
                attach(&mut stack, Node::with_literal(NodeKind::Text, range, Literal::Span(span)));
            }
            Event::Rule => attach(&mut stack, Node::new(NodeKind::ThematicBreak, range)),
            Event::TaskListMarker(checked) => {
                attach(&mut stack, Node::new(NodeKind::TaskCheckbox { checked }, range));
            }
            other => {
                tracing::debug!(?other, "skipping unsupported event");
            }
        }
    }

    // The parser balances every Start with an End, so only the document
    // remains. Guarded pop keeps malformed streams from panicking.
    stack.pop().unwrap_or_else(|| Node::new(NodeKind::Document, 0..source.len()))
}

// ---- Tag Mapping ----

fn open_node(source: &str, tag: Tag<'_>, range: Range<usize>) -> Node {
    match tag {
        Tag::Paragraph => Node::new(NodeKind::Paragraph, range),
        Tag::Heading { level, .. } => Node::with_literal(
            NodeKind::Heading { level: level as u8 },
            range.clone(),
            Literal::Span(range),
        ),
        Tag::BlockQuote(_) => Node::new(NodeKind::Blockquote, range),
        Tag::CodeBlock(CodeBlockKind::Fenced(info)) => {
            let language = info.split_whitespace().next().map(str::to_string);
            Node::new(NodeKind::FencedCode { language }, range)
        }
        Tag::CodeBlock(CodeBlockKind::Indented) => Node::new(NodeKind::CodeBlock, range),
        Tag::List(_) => Node::new(
            NodeKind::List { marker: marker_char(source, range.start) },
            range,
        ),
        Tag::Item => Node::with_literal(NodeKind::ListItem, range.clone(), Literal::Span(range)),
        Tag::Table(_) => Node::new(NodeKind::Table, range),
        Tag::TableHead => Node::new(NodeKind::TableHeaderRow, range),
        Tag::TableRow => Node::new(NodeKind::TableRow, range),
        Tag::TableCell => Node::new(NodeKind::TableCell, range),
        Tag::Emphasis => Node::new(NodeKind::Emphasis { level: 1 }, range),
        Tag::Strong => Node::new(NodeKind::Emphasis { level: 2 }, range),
        Tag::Strikethrough => Node::new(NodeKind::Strikethrough, range),
        Tag::Link { link_type: link_type @ (LinkType::Autolink | LinkType::Email), dest_url, .. } => {
            // Email autolinks carry the bare address as their destination;
            // the target needs the scheme, the visible label stays bare.
            let url = if link_type == LinkType::Email && !dest_url.starts_with("mailto:") {
                format!("mailto:{dest_url}")
            } else {
                dest_url.to_string()
            };
            Node::new(NodeKind::AutoLink { label: String::new(), url }, range)
        }
        Tag::Link { dest_url, .. } => Node::new(
            NodeKind::Link { destination: dest_url.to_string() },
            range,
        ),
        Tag::Image { dest_url, title, .. } => Node::new(
            NodeKind::Image { url: dest_url.to_string(), title: title.to_string() },
            range,
        ),
        Tag::HtmlBlock => Node::new(NodeKind::HtmlBlock, range),
        other => {
            tracing::debug!(?other, "treating unsupported tag as a paragraph");
            Node::new(NodeKind::Paragraph, range)
        }
    }
}

fn close_node(source: &str, stack: &mut Vec<Node>) {
    let Some(mut node) = stack.pop() else { return };
    if matches!(node.kind, NodeKind::ListItem) {
        finalize_list_item(&mut node);
    } else if matches!(node.kind, NodeKind::AutoLink { .. }) {
        let label: String = node
            .children
            .iter()
            .map(|child| child.literal_text(source))
            .collect();
        if let NodeKind::AutoLink { label: slot, .. } = &mut node.kind {
            *slot = label;
        }
        node.children.clear();
    }
    attach_to(stack, node);
}

/// Kinds that accumulate their content as raw line spans.
fn holds_raw_lines(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::FencedCode { .. } | NodeKind::CodeBlock | NodeKind::HtmlBlock
    )
}

fn attach(stack: &mut [Node], node: Node) {
    if let Some(top) = stack.last_mut() {
        top.children.push(node);
    }
}

fn attach_to(stack: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(top) => top.children.push(node),
        // Unbalanced end tag; keep the node as a new root rather than drop it.
        None => stack.push(node),
    }
}

/// Wrap a list item's leading inline run into a [`NodeKind::TextBlock`] so
/// dispatch sees tight and loose items in the same shape, and re-kind a
/// checkbox-first paragraph to a text block for the same reason.
fn finalize_list_item(item: &mut Node) {
    let split = item
        .children
        .iter()
        .position(|child| !is_inline_item_kind(&child.kind))
        .unwrap_or(item.children.len());

    if split > 0 {
        let inline: Vec<Node> = item.children.drain(..split).collect();
        let span = match (inline.first(), inline.last()) {
            (Some(first), Some(last)) => first.span.start..last.span.end,
            _ => item.span.clone(),
        };
        let mut text_block = Node::new(NodeKind::TextBlock, span);
        text_block.children = inline;
        item.children.insert(0, text_block);
    }

    for child in &mut item.children {
        if matches!(child.kind, NodeKind::Paragraph)
            && matches!(
                child.first_child().map(|c| &c.kind),
                Some(NodeKind::TaskCheckbox { .. })
            )
        {
            child.kind = NodeKind::TextBlock;
        }
    }
}

fn is_inline_item_kind(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Text
            | NodeKind::Emphasis { .. }
            | NodeKind::Strikethrough
            | NodeKind::CodeSpan
            | NodeKind::Link { .. }
            | NodeKind::AutoLink { .. }
            | NodeKind::RawHtml
            | NodeKind::TaskCheckbox { .. }
    )
}

// ---- Span Resolution ----

/// Narrow an event range to the subrange holding exactly `text`, when the
/// content can be located inside it. Falls back to the full range for text
/// the parser rewrote (entity references, escapes).
fn resolve_span(source: &str, range: Range<usize>, text: &str) -> Range<usize> {
    let slice = &source[range.clone()];
    if slice == text {
        return range;
    }
    match slice.find(text) {
        Some(pos) => range.start + pos..range.start + pos + text.len(),
        None => range,
    }
}

/// Record dedented/defenced code content line by line against the source.
fn append_code_lines(node: &mut Node, source: &str, range: Range<usize>, text: &str) {
    let mut cursor = range.start;
    for line in text.split_inclusive('\n') {
        let window = &source[cursor..range.end];
        let needle = if window.contains(line) { line } else { line.trim_end_matches('\n') };
        match window.find(needle) {
            Some(pos) => {
                let start = cursor + pos;
                node.push_line(start..start + needle.len());
                cursor = start + needle.len();
            }
            None => {
                tracing::debug!(line, "code line not found in source window");
            }
        }
    }
}

/// The newline character covered by a line break event.
fn newline_in(source: &str, range: Range<usize>) -> Range<usize> {
    match source[range.clone()].find('\n') {
        Some(pos) => range.start + pos..range.start + pos + 1,
        None => range,
    }
}

/// First character of a list's source text: the marker for bulleted lists, a
/// digit for numbered ones.
fn marker_char(source: &str, start: usize) -> char {
    source[start..].chars().next().unwrap_or('-')
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn paragraph_text_keeps_exact_span() {
        let source = "Hello world\n";
        let doc = parse_document(source);
        let paragraph = &doc.children[0];
        assert_eq!(paragraph.kind, NodeKind::Paragraph);
        assert_eq!(paragraph.children[0].literal_text(source), "Hello world");
    }

    #[test]
    fn code_span_range_excludes_backticks() {
        let source = "run `cargo` now\n";
        let doc = parse_document(source);
        let code_span = &doc.children[0].children[1];
        assert_eq!(code_span.kind, NodeKind::CodeSpan);
        assert_eq!(code_span.children[0].literal_text(source), "cargo");
    }

    #[test]
    fn list_marker_is_peeked_from_source() {
        let doc = parse_document("+ one\n+ two\n");
        assert_eq!(doc.children[0].kind, NodeKind::List { marker: '+' });

        let doc = parse_document("3. one\n4. two\n");
        assert_eq!(doc.children[0].kind, NodeKind::List { marker: '3' });
    }

    #[test]
    fn tight_item_content_is_wrapped_in_a_text_block() {
        let source = "- alpha\n  - beta\n";
        let doc = parse_document(source);
        let item = &doc.children[0].children[0];
        assert_eq!(item.kind, NodeKind::ListItem);
        assert_eq!(item.children[0].kind, NodeKind::TextBlock);
        assert_eq!(item.children[0].children[0].literal_text(source), "alpha");
        assert!(matches!(item.children[1].kind, NodeKind::List { .. }));
    }

    #[test]
    fn task_item_becomes_checkbox_first_text_block() {
        let source = "- [x] done\n";
        let doc = parse_document(source);
        let block = &doc.children[0].children[0].children[0];
        assert_eq!(block.kind, NodeKind::TextBlock);
        assert_eq!(block.children[0].kind, NodeKind::TaskCheckbox { checked: true });
        assert_eq!(block.children[1].literal_text(source), "done");
    }

    #[test]
    fn autolink_collapses_label_and_url() {
        let source = "<https://example.com>\n";
        let doc = parse_document(source);
        let link = &doc.children[0].children[0];
        assert_eq!(
            link.kind,
            NodeKind::AutoLink {
                label: "https://example.com".into(),
                url: "https://example.com".into(),
            }
        );
        assert!(link.children.is_empty());
    }

    #[test]
    fn email_autolink_gains_the_mailto_scheme() {
        let source = "<someone@example.com>\n";
        let doc = parse_document(source);
        let link = &doc.children[0].children[0];
        assert_eq!(
            link.kind,
            NodeKind::AutoLink {
                label: "someone@example.com".into(),
                url: "mailto:someone@example.com".into(),
            }
        );
    }

    #[test]
    fn indented_code_lines_resolve_past_indentation() {
        let source = "    first\n    second\n";
        let doc = parse_document(source);
        let code = &doc.children[0];
        assert_eq!(code.kind, NodeKind::CodeBlock);
        assert_eq!(code.literal_text(source), "first\nsecond");
    }

    #[test]
    fn table_head_maps_to_header_row() {
        let source = "| a | b |\n|---|---|\n| c | d |\n";
        let doc = parse_document(source);
        let table = &doc.children[0];
        assert_eq!(table.kind, NodeKind::Table);
        assert_eq!(table.children[0].kind, NodeKind::TableHeaderRow);
        assert_eq!(table.children[1].kind, NodeKind::TableRow);
        assert_eq!(table.children[0].children.len(), 2);
    }
}
