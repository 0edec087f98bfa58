//! Fatal extraction errors (`spec.md` §4.5 "failure semantics"). A missing
//! start tile fails only the one net being extracted; an inconsistent
//! junction is a bug in the caller's plane data and aborts the whole run.

use geometry::prelude::Point;

/// Errors that can abort net extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The coordinate a net extraction was asked to start from does not
    /// land on any tile of the plane it names.
    #[error("no tile at start point ({}, {})", .0.x, .0.y)]
    NoStartTile(Point),
    /// Two tiles that should share exactly one junction node disagree
    /// about its coordinate or its no-merge classification.
    #[error("inconsistent junction at ({}, {})", .0.x, .0.y)]
    InconsistentJunction(Point),
    /// A device tile was walked with no source/drain adjacency at all,
    /// so its terminals cannot be bound.
    #[error("device tile at ({}, {}) has no source/drain adjacency", .0.x, .0.y)]
    UnboundDevice(Point),
}
