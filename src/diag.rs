//! Recoverable problems encountered while ingesting a mesh.
//!
//! A [Diagnostic] never aborts the pipeline; the offending face is skipped, or the offending
//! attribute is replaced by its default value, and processing continues.

use std::fmt;

/// The vertex attribute stream a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Position,
    Texcoord,
    Normal,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeKind::Position => f.write_str("position"),
            AttributeKind::Texcoord => f.write_str("texcoord"),
            AttributeKind::Normal => f.write_str("normal"),
        }
    }
}

/// A recoverable problem, with enough context to locate it in the source text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Diagnostic {
    #[error("line {line}: face has {count} vertex reference(s), at least 3 are required; face skipped")]
    ShortFace { line: usize, count: usize },
    #[error("line {line}: malformed vertex reference {token:?}; face skipped")]
    InvalidReference { line: usize, token: String },
    #[error("line {line}: {attribute} index {index} out of range (0..{count})")]
    FaceIndexOutOfRange {
        line: usize,
        attribute: AttributeKind,
        index: i64,
        count: usize,
    },
    #[error("triangle {triangle}: {attribute} index {index} out of range (0..{count}); default substituted")]
    MissingAttribute {
        triangle: usize,
        attribute: AttributeKind,
        index: usize,
        count: usize,
    },
}

/// Collects [Diagnostics](Diagnostic), logging each one as it arrives.
#[derive(Debug, Default)]
pub(crate) struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
    #[inline]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, diag: Diagnostic) {
        tracing::warn!("{diag}");
        self.diagnostics.push(diag);
    }

    #[inline]
    pub(crate) fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
