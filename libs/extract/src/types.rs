//! The resistor-graph runtime types of `spec.md` §3 "Extractor runtime":
//! nodes, resistors, transistors, junctions, contact points, and
//! breakpoints.

use arcstr::ArcStr;
use geometry::prelude::{Point, Rect};
use tiles::prelude::TileType;

/// Identifies a [`ResNode`] within one net's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Identifies a [`ResResistor`] within one net's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResistorId(pub u32);

/// Identifies a [`ResTransistor`] within one net's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransistorId(pub u32);

/// A node's place in the pending/done lifecycle (`spec.md` §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    /// Still on the pending queue, waiting for its incident tiles to
    /// finish.
    Pending,
    /// Moved to the done list; simplification has run (or will run) on
    /// it.
    Finished,
    /// Spliced out by a merge; [`ResNode::forward`] names its replacement.
    Forwarded,
}

/// One node of the resistor graph: a breakpoint or junction that survived
/// (or was created during) simplification.
#[derive(Debug, Clone)]
pub struct ResNode {
    /// Representative coordinate (a breakpoint's tile-edge midpoint, or a
    /// merged node's first-seen location).
    pub coord: Point,
    /// Status in the pending/done/forwarded lifecycle.
    pub status: NodeStatus,
    /// Resistors with an endpoint here.
    pub resistors: Vec<ResistorId>,
    /// Transistors with a terminal here.
    pub transistors: Vec<TransistorId>,
    /// Accumulated tile area, used to distribute capacitance and, during
    /// series reduction, to split area proportionally between the two
    /// surviving resistors.
    pub area: i64,
    /// User-visible name (a port or label name), if any.
    pub name: Option<ArcStr>,
    /// Where this node was merged to, if [`Self::status`] is
    /// [`NodeStatus::Forwarded`].
    pub forward: Option<NodeId>,
    /// The tile type this node's net-geometry lives on, for no-merge
    /// lookups during simplification.
    pub ty: TileType,
    /// True for the single node created at the flood's starting
    /// drivepoint (`spec.md` §4.5's "origin node"). The origin is never
    /// eligible for series or single-connection collapse — both rules
    /// exist to fold away interior plumbing, not the point the caller
    /// asked to extract from.
    pub is_origin: bool,
}

impl ResNode {
    /// A fresh, pending node with no incident elements yet.
    pub fn new(coord: Point, ty: TileType) -> Self {
        Self {
            coord,
            status: NodeStatus::Pending,
            resistors: Vec::new(),
            transistors: Vec::new(),
            area: 0,
            name: None,
            forward: None,
            ty,
            is_origin: false,
        }
    }
}

/// A resistor edge between two [`ResNode`]s.
#[derive(Debug, Clone)]
pub struct ResResistor {
    /// The two endpoints. Equal values denote a self-loop, eliminated by
    /// simplification rather than retained.
    pub endpoints: (NodeId, NodeId),
    /// Value in milliohms.
    pub milliohms: i64,
    /// Centerline length, internal units.
    pub length: i64,
    /// Conductor width, internal units.
    pub width: i64,
    /// The tile type this resistor was extracted from.
    pub ty: TileType,
    /// Set once this resistor has been folded into another by
    /// simplification. Dead resistors are never removed from their
    /// endpoints' adjacency lists immediately, to avoid invalidating ids
    /// mid-pass; every traversal skips them instead.
    pub dead: bool,
}

impl ResResistor {
    /// True if `self` connects the same unordered pair of nodes as
    /// `other` — the test `Parallel` reduction looks for.
    pub fn shares_endpoints_with(&self, other: &ResResistor) -> bool {
        let (a, b) = self.endpoints;
        let (c, d) = other.endpoints;
        (a == c && b == d) || (a == d && b == c)
    }
}

/// A device record created the first time a device tile is discovered
/// adjacent to source/drain diffusion during the tile walk.
#[derive(Debug, Clone)]
pub struct ResTransistor {
    /// Gate terminal, bound once the gate tile is walked.
    pub gate: Option<NodeId>,
    /// Source terminal, the first-seen SD adjacency (`spec.md` §4.5
    /// "sourceness distinguishes the first-seen SD adjacency").
    pub source: Option<NodeId>,
    /// Drain terminal, the second-seen SD adjacency.
    pub drain: Option<NodeId>,
    /// Substrate/body terminal, if modeled.
    pub substrate: Option<NodeId>,
    /// Accumulated source/drain perimeter.
    pub perimeter: i64,
    /// Accumulated source/drain area.
    pub area: i64,
    /// Channel length estimate.
    pub length: i64,
    /// Channel width estimate.
    pub width: i64,
    /// Number of tiles folded into this device so far.
    pub tile_count: u32,
    /// One representative tile's rectangle, for emission and diagnostics.
    pub bbox: Rect,
    /// The device's tile type (distinguishes e.g. nfet/pfet).
    pub ty: TileType,
}

impl ResTransistor {
    /// A fresh device record anchored on its first-discovered tile.
    pub fn new(ty: TileType, bbox: Rect) -> Self {
        Self {
            gate: None,
            source: None,
            drain: None,
            substrate: None,
            perimeter: 0,
            area: 0,
            length: 0,
            width: 0,
            tile_count: 0,
            bbox,
            ty,
        }
    }
}

/// A junction discovered at the midpoint of an edge shared by two tiles
/// whose types are mutually connective.
#[derive(Debug, Clone, Copy)]
pub struct ResJunction {
    /// The coordinate the junction sits at (shared edge midpoint).
    pub coord: Point,
    /// The node this junction has been bound to, once created.
    pub node: NodeId,
}

/// A contact tile's per-plane residues, discharged into a single shared
/// node the first time any of its planes' tiles is walked.
#[derive(Debug, Clone)]
pub struct ResContactPoint {
    /// The contact's footprint.
    pub rect: Rect,
    /// The contact type.
    pub ty: TileType,
    /// The node every residue image of this contact shares.
    pub node: NodeId,
}

/// A point on a tile's boundary that must become (or bind to) a
/// [`ResNode`]: a port, a label anchor, a drive-point, or a device-edge
/// adjacency (`spec.md` §4.5 "install breakpoints").
#[derive(Debug, Clone)]
pub struct Breakpoint {
    /// Where the breakpoint sits.
    pub coord: Point,
    /// The node it resolves to, once bound.
    pub node: NodeId,
    /// A port/label name to carry onto the node, if this breakpoint came
    /// from one.
    pub name: Option<ArcStr>,
}
