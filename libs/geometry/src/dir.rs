//! Axis-aligned directions and the four edge sides of a rectangle.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// An enumeration of axis-aligned directions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, PartialEq, Eq)]
pub enum Dir {
    /// The horizontal, or x-aligned, direction.
    Horiz,
    /// The vertical, or y-aligned, direction.
    Vert,
}

impl Dir {
    /// Returns the other direction.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(Dir::Vert.other(), Dir::Horiz);
    /// assert_eq!(Dir::Horiz.other(), Dir::Vert);
    /// ```
    pub const fn other(&self) -> Self {
        match *self {
            Self::Horiz => Self::Vert,
            Self::Vert => Self::Horiz,
        }
    }
}

impl Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Horiz => write!(f, "horizontal"),
            Self::Vert => write!(f, "vertical"),
        }
    }
}

impl std::ops::Not for Dir {
    type Output = Self;
    fn not(self) -> Self::Output {
        self.other()
    }
}

/// The four sides of an axis-aligned rectangle, matching the stitch
/// directions a tile carries (`spec.md` §3: LB/BL/RT/TR neighbor walks read
/// off the side a query crosses).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, PartialEq, Eq)]
pub enum Side {
    /// The tile's left edge.
    Left,
    /// The tile's bottom edge.
    Bottom,
    /// The tile's right edge.
    Right,
    /// The tile's top edge.
    Top,
}

impl Side {
    /// All four sides, in a fixed order used wherever a full edge walk is
    /// needed (the resistance extractor's per-tile edge loop, for one).
    pub const ALL: [Side; 4] = [Side::Left, Side::Bottom, Side::Right, Side::Top];

    /// Returns the side directly opposite `self`.
    pub const fn opposite(&self) -> Self {
        match *self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
            Side::Top => Side::Bottom,
        }
    }

    /// The axis this side's normal points along.
    pub const fn dir(&self) -> Dir {
        match *self {
            Side::Left | Side::Right => Dir::Horiz,
            Side::Bottom | Side::Top => Dir::Vert,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dir_not_round_trips() {
        assert_eq!(!!Dir::Horiz, Dir::Horiz);
    }

    #[test]
    fn side_opposite_is_involutive() {
        for side in Side::ALL {
            assert_eq!(side.opposite().opposite(), side);
        }
    }
}
