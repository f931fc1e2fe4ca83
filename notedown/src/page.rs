//! Page assembly: the one-call surface over parse, dispatch and materialize.

use notion::{Block, HeadingLevel};

use crate::dispatch::to_blocks;
use crate::error::ConvertError;
use crate::parser::parse_document;

/// Title used when the document has no level-one heading.
pub const DEFAULT_TITLE: &str = "Unnamed Document";

/// A converted document: its title plus the blocks that make up its body.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub title: String,
    pub blocks: Vec<Block>,
}

/// Convert a whole markdown document into a [`Page`].
///
/// The first level-one heading becomes the page title and is removed from
/// the body; without one the title falls back to [`DEFAULT_TITLE`].
pub fn parse_page(source: &str) -> Result<Page, ConvertError> {
    let document = parse_document(source);
    let mut blocks = Vec::new();
    for child in &document.children {
        for builder in to_blocks(child)? {
            blocks.push(builder.materialize(source));
        }
    }
    let title = extract_title(&mut blocks);
    tracing::debug!(title, blocks = blocks.len(), "converted document");
    Ok(Page { title, blocks })
}

fn extract_title(blocks: &mut Vec<Block>) -> String {
    let position = blocks.iter().position(|block| {
        matches!(block, Block::Heading { level: HeadingLevel::H1, .. })
    });
    if let Some(index) = position {
        if let Block::Heading { rich_text, .. } = blocks.remove(index) {
            return rich_text.into_iter().map(|run| run.content).collect();
        }
    }
    DEFAULT_TITLE.to_string()
}
