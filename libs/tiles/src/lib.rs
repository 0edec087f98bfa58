//! The corner-stitched tile-plane database: the shared geometric substrate
//! every other engine in this workspace paints into, searches, and walks.

#![warn(missing_docs)]

pub mod celldef;
pub mod plane;
pub mod tile;
pub mod types;

/// Commonly used names re-exported for convenience.
pub mod prelude {
    pub use crate::celldef::{CellDef, CellUse, Label, Registry};
    pub use crate::plane::{Plane, TileId, PLANE_EXTENT};
    pub use crate::tile::{Edge, Split, Tile, TileJunk};
    pub use crate::types::{
        PlaneId, PlaneMask, TileType, TileTypeMask, MAX_PLANES, MAX_TYPES, SPACE, TECHDEPBASE,
    };
}
