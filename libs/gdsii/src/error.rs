//! Fatal read errors — malformed framing or a structurally missing
//! mandatory record. Per-element problems (bad layer, degenerate
//! geometry) are recoverable and handled as capped diagnostics instead
//! (`spec.md` §7).

use crate::reader::StreamError;

/// Errors that abort a GDS-II read outright.
#[derive(Debug, thiserror::Error)]
pub enum GdsError {
    /// The byte stream itself was malformed.
    #[error(transparent)]
    Stream(#[from] StreamError),
    /// The stream ended before a mandatory record was seen.
    #[error("unexpected end of stream while expecting {0}")]
    UnexpectedEof(&'static str),
    /// A mandatory record appeared where a different one was required.
    #[error("expected {expected}, found a different record")]
    Expected {
        /// What the parser was expecting.
        expected: &'static str,
    },
}
