//! The tile itself: a rectangle, a type, corner-stitch pointers, and the
//! extractor's per-tile scratch space (`spec.md` §3).

use geometry::prelude::*;

use crate::types::TileType;

/// The identity of one tile within a [`Plane`](crate::plane::Plane)'s arena.
/// Stable for the tile's lifetime; reused by later tiles once freed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub(crate) u32);

/// Which of a diagonal tile's two halves a subtype belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagonalSide {
    /// The upper-left / lower-right half, depending on split orientation.
    Left,
    /// The other half.
    Right,
}

/// A non-Manhattan tile's split description: the diagonal runs corner to
/// corner of the tile's bounding rectangle, and each half carries its own
/// subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split {
    /// True if the diagonal runs from the bottom-left corner to the
    /// top-right (as opposed to bottom-right to top-left).
    pub rising: bool,
    /// The type of the [`DiagonalSide::Left`] half.
    pub left_type: TileType,
    /// The type of the [`DiagonalSide::Right`] half.
    pub right_type: TileType,
}

/// The extractor's per-tile scratch record, created lazily when a tile
/// enters a flood and destroyed once extraction of that net finishes.
#[derive(Debug, Clone, Default)]
pub struct TileJunk {
    /// Contacts registered on this tile, by plane.
    pub contacts: Vec<u32>,
    /// Index of the device record this tile belongs to, if it is an SD or
    /// gate tile.
    pub device: Option<u32>,
    /// Junctions discovered incident to this tile.
    pub junctions: Vec<u32>,
    /// Ports (breakpoints with external significance) on this tile.
    pub ports: Vec<u32>,
    /// Break points not yet resolved into resistor-graph nodes.
    pub breakpoints: Vec<u32>,
    /// Which of the tile's four edges are net source edges, as a bitmask
    /// over [`Edge`].
    pub source_edges: u8,
    /// `true` once the tile fully contributed resistors to the graph.
    pub done: bool,
    /// `true` if this tile is a source/drain diffusion residue of a device.
    pub is_sd: bool,
    /// `true` once a device record has been created for this tile.
    pub has_device: bool,
    /// Scratch mark used during the connectivity flood to avoid revisits.
    pub marked: bool,
    /// `true` if this tile has already been merged into a 1-D (degenerate
    /// width) resistor approximation.
    pub is_1d: bool,
}

/// A bit in [`TileJunk::source_edges`].
#[derive(Debug, Clone, Copy)]
#[repr(u8)]
pub enum Edge {
    /// Left (LB/BL side).
    Left = 0b0001,
    /// Right (RT/TR side).
    Right = 0b0010,
    /// Top.
    Top = 0b0100,
    /// Bottom.
    Bottom = 0b1000,
}

/// One rectangle of a [`Plane`](crate::plane::Plane)'s partition.
///
/// Corner-stitch pointers ([`Tile::lb`] etc.) are *not* stored on the tile
/// itself in this implementation — see the [`plane`](crate::plane) module
/// documentation for why — but the field names below mirror the classic
/// four-pointer layout so callers reading this struct recognize the shape
/// a corner-stitched tile has.
#[derive(Debug, Clone)]
pub struct Tile {
    /// This tile's extent.
    pub rect: Rect,
    /// The type painted over the whole rectangle (or, for a split tile,
    /// the ambient background type the diagonal is cut from).
    pub ty: TileType,
    /// Present iff this tile has a non-Manhattan diagonal cut.
    pub split: Option<Split>,
    /// Extractor scratch space, present only while a net flood is active.
    pub junk: Option<Box<TileJunk>>,
}

impl Tile {
    /// A whole, non-split tile of the given rectangle and type.
    pub fn whole(rect: Rect, ty: TileType) -> Self {
        Self {
            rect,
            ty,
            split: None,
            junk: None,
        }
    }

    /// True if this tile is the plane's background (`SPACE`) and unsplit.
    pub fn is_space(&self) -> bool {
        self.split.is_none() && self.ty.is_space()
    }
}
