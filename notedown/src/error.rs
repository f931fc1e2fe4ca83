use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label};

// ---- Conversion Errors ----

/// A node tree that cannot be turned into blocks.
///
/// Every variant carries the stable kind name of the offending node and its
/// byte span in the source, so the CLI can render a labelled diagnostic.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConvertError {
    #[error("unsupported node kind: {kind}")]
    UnsupportedNodeKind {
        kind: &'static str,
        span: Range<usize>,
    },

    #[error("{kind} has no content at block level")]
    EmptyNodeAtBlockLevel {
        kind: &'static str,
        span: Range<usize>,
    },

    #[error("{kind} must be converted as a block, not as rich text")]
    MustBeBlockNotRichText {
        kind: &'static str,
        span: Range<usize>,
    },
}

impl ConvertError {
    pub fn span(&self) -> Range<usize> {
        match self {
            ConvertError::UnsupportedNodeKind { span, .. }
            | ConvertError::EmptyNodeAtBlockLevel { span, .. }
            | ConvertError::MustBeBlockNotRichText { span, .. } => span.clone(),
        }
    }

    pub fn to_diagnostic<FileId: Copy>(&self, file_id: FileId) -> Diagnostic<FileId> {
        let label = match self {
            ConvertError::UnsupportedNodeKind { kind, span } => {
                Label::primary(file_id, span.clone())
                    .with_message(format!("no conversion rule for {kind}"))
            }
            ConvertError::EmptyNodeAtBlockLevel { kind, span } => {
                Label::primary(file_id, span.clone())
                    .with_message(format!("this {kind} is empty"))
            }
            ConvertError::MustBeBlockNotRichText { kind, span } => {
                Label::primary(file_id, span.clone())
                    .with_message(format!("{kind} cannot appear inside rich text"))
            }
        };

        Diagnostic::error()
            .with_message(self.to_string())
            .with_labels(vec![label])
    }
}
