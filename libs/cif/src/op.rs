//! CIF operator opcodes and their parameters (`spec.md` §4.3).

use arcstr::ArcStr;
use tiles::prelude::TileType;

/// A per-type distance used by the `BLOAT-*` family: how far to expand (or,
/// if negative, contract) the edge facing a tile of a given type.
#[derive(Debug, Clone, Copy)]
pub struct BloatRule {
    /// The type on the far side of the edge this rule applies to.
    pub ty: TileType,
    /// The signed distance, in reduced internal units.
    pub distance: i64,
}

/// How a `BLOAT-*` combines distances when more than one rule matches the
/// same edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BloatCombine {
    /// Union of all the bloats (the most generous distance wins).
    Or,
    /// The smallest matching distance.
    Min,
    /// The largest matching distance.
    Max,
    /// Every edge is bloated by exactly 1, ignoring neighbor type.
    All,
}

/// Which rectangle `MAXRECT` should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxRectKind {
    /// The largest rectangle enclosed entirely within the working layer.
    Interior,
    /// The smallest rectangle enclosing the working layer.
    Enclosing,
}

/// One operator in a CIF layer's op list.
#[derive(Debug, Clone)]
pub enum CifOp {
    /// Union the named operand layers onto the working plane.
    Or { operands: Vec<ArcStr> },
    /// Intersect the working plane with the named operand layers.
    And { operands: Vec<ArcStr> },
    /// Subtract the named operand layers from the working plane.
    AndNot { operands: Vec<ArcStr> },
    /// Minkowski-sum with a `d`×`d` square. `snap_to_grid` is `GROW_G`.
    Grow { distance: i64, snap_to_grid: bool },
    /// Minkowski-erode with a `d`×`d` square.
    Shrink { distance: i64 },
    /// Edge-wise expansion/contraction keyed by neighbor type.
    Bloat { combine: BloatCombine, rules: Vec<BloatRule> },
    /// Tile the working area with `size`×`size` cuts on a grid.
    Squares {
        border: i64,
        size: i64,
        sep: i64,
        grid_x: Option<i64>,
        grid_y: Option<i64>,
        snap_to_grid: bool,
    },
    /// Tile the working area with rectangular slots.
    Slots {
        short_border: i64,
        short_size: i64,
        short_sep: i64,
        long_border: i64,
        long_size: i64,
        long_sep: i64,
        offset: i64,
    },
    /// Replace the working plane with its bounding box.
    Bbox {
        /// If true, only applies to the top-level cell, not subcells.
        top_only: bool,
    },
    /// Replace the working plane with a maximal rectangle.
    MaxRect { kind: MaxRectKind },
    /// Restrict to the connected net reachable from a named label.
    Net { label: ArcStr, operand: ArcStr },
}

impl CifOp {
    /// A human-readable opcode name, as it would appear in a tech file or
    /// diagnostic message.
    pub fn name(&self) -> &'static str {
        match self {
            CifOp::Or { .. } => "OR",
            CifOp::And { .. } => "AND",
            CifOp::AndNot { .. } => "AND-NOT",
            CifOp::Grow { snap_to_grid: false, .. } => "GROW",
            CifOp::Grow { snap_to_grid: true, .. } => "GROW_G",
            CifOp::Shrink { .. } => "SHRINK",
            CifOp::Bloat { combine: BloatCombine::Or, .. } => "BLOAT-OR",
            CifOp::Bloat { combine: BloatCombine::Min, .. } => "BLOAT-MIN",
            CifOp::Bloat { combine: BloatCombine::Max, .. } => "BLOAT-MAX",
            CifOp::Bloat { combine: BloatCombine::All, .. } => "BLOAT-ALL",
            CifOp::Squares { snap_to_grid: false, .. } => "SQUARES",
            CifOp::Squares { snap_to_grid: true, .. } => "SQUARES_G",
            CifOp::Slots { .. } => "SLOTS",
            CifOp::Bbox { .. } => "BBOX",
            CifOp::MaxRect { .. } => "MAXRECT",
            CifOp::Net { .. } => "NET",
        }
    }

    /// The worst-case outward edge movement this op can cause, used for
    /// `spec.md` §4.3's radius/halo computation. Shrinks and negative
    /// bloats contribute zero (they never reach outside the original
    /// geometry).
    pub fn grow_radius(&self) -> i64 {
        match self {
            CifOp::Grow { distance, .. } => *distance,
            CifOp::Bloat { rules, .. } => rules.iter().map(|r| r.distance.max(0)).max().unwrap_or(0),
            _ => 0,
        }
    }

    /// The worst-case inward edge movement (shrink radius).
    pub fn shrink_radius(&self) -> i64 {
        match self {
            CifOp::Shrink { distance } => *distance,
            CifOp::Bloat { rules, .. } => rules.iter().map(|r| (-r.distance).max(0)).max().unwrap_or(0),
            _ => 0,
        }
    }
}
