//! Errors surfaced at engine construction time (§7).
//!
//! Hand-rolled rather than `thiserror`-derived, matching how this
//! codebase's other error types implement `Error`/`Display` directly.

use std::fmt;

/// Malformed input in either the affix description or the word list.
/// Construction fails outright; there is no partial-failure mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A malformed line in the affix description.
    Affix {
        /// 1-indexed line number.
        line: usize,
        /// What went wrong.
        detail: String,
    },
    /// A malformed line in the word list.
    Dictionary {
        /// 1-indexed line number.
        line: usize,
        /// What went wrong.
        detail: String,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Affix { line, detail } => {
                write!(f, "affix description, line {line}: {detail}")
            }
            Self::Dictionary { line, detail } => {
                write!(f, "word list, line {line}: {detail}")
            }
        }
    }
}

impl std::error::Error for ParseError {}
