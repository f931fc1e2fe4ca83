//! Typed Notion block model and a minimal async API client.
//!
//! The model mirrors the Notion API's discriminated block schema (a `type`
//! tag plus a nested object named after the tag) while staying a closed Rust
//! enum. [`Client`] only knows how to create a page from a title and a list
//! of blocks; retries and anything fancier belong to the caller.

pub mod client;
pub mod model;

pub use client::{Client, CreatedPage, NotionError};
pub use model::{Annotations, Block, HeadingLevel, RichText, TableRow};
