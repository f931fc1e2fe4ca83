//! Markdown-to-Notion document conversion.
//!
//! Parses CommonMark (plus tables, strikethrough and task lists) into an
//! owned node tree, classifies each node as rich text or block material, and
//! materializes Notion blocks against the original source. [`parse_page`] is
//! the entry point; the submodules expose each stage for finer-grained use.

pub mod ast;
pub mod builder;
pub mod classify;
pub mod dispatch;
pub mod error;
pub mod extract;
pub mod html;
pub mod page;
pub mod parser;

pub use error::ConvertError;
pub use page::{DEFAULT_TITLE, Page, parse_page};
