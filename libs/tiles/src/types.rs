//! Tile-type and plane identities and their bit sets (`spec.md` §3).

use std::fmt;

/// The background type painted where nothing else has been placed.
pub const SPACE: TileType = TileType(0);

/// The first technology-defined type; values below this are reserved
/// (currently only [`SPACE`]).
pub const TECHDEPBASE: TileType = TileType(1);

/// The largest number of distinct [`TileType`]s a technology may define,
/// matching [`TileTypeMask`]'s single-`u64` backing store.
pub const MAX_TYPES: usize = 64;

/// A small integer tag identifying a mask layer, including contact and
/// diagonal-split encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct TileType(pub u8);

impl TileType {
    /// This type's singleton mask.
    pub fn mask(self) -> TileTypeMask {
        TileTypeMask(1u64 << self.0)
    }

    /// True if this is the background type.
    pub fn is_space(self) -> bool {
        self == SPACE
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type#{}", self.0)
    }
}

/// A fixed-capacity bit set of [`TileType`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TileTypeMask(pub u64);

impl TileTypeMask {
    /// The empty mask.
    pub const NONE: TileTypeMask = TileTypeMask(0);
    /// The mask containing every representable type.
    pub const ALL: TileTypeMask = TileTypeMask(u64::MAX);

    /// True if `ty` is a member.
    pub fn contains(&self, ty: TileType) -> bool {
        self.0 & ty.mask().0 != 0
    }

    /// Inserts `ty`, returning the updated mask.
    pub fn with(mut self, ty: TileType) -> Self {
        self.0 |= ty.mask().0;
        self
    }

    /// Removes `ty`, returning the updated mask.
    pub fn without(mut self, ty: TileType) -> Self {
        self.0 &= !ty.mask().0;
        self
    }

    /// Iterates the member types in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = TileType> + '_ {
        (0..MAX_TYPES as u8)
            .map(TileType)
            .filter(move |t| self.contains(*t))
    }

    /// True if this mask and `other` share at least one member.
    pub fn intersects(&self, other: TileTypeMask) -> bool {
        self.0 & other.0 != 0
    }
}

impl std::ops::BitOr for TileTypeMask {
    type Output = TileTypeMask;
    fn bitor(self, rhs: Self) -> Self::Output {
        TileTypeMask(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for TileTypeMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::ops::BitAnd for TileTypeMask {
    type Output = TileTypeMask;
    fn bitand(self, rhs: Self) -> Self::Output {
        TileTypeMask(self.0 & rhs.0)
    }
}

impl FromIterator<TileType> for TileTypeMask {
    fn from_iter<I: IntoIterator<Item = TileType>>(iter: I) -> Self {
        let mut mask = TileTypeMask::NONE;
        for ty in iter {
            mask |= ty.mask();
        }
        mask
    }
}

/// The maximum number of planes a technology may define (`spec.md` §3: "an
/// index into the planar decomposition (≤ 32)").
pub const MAX_PLANES: usize = 32;

/// An index into the planar decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct PlaneId(pub u8);

impl PlaneId {
    /// This plane's singleton mask.
    pub fn mask(self) -> PlaneMask {
        PlaneMask(1u32 << self.0)
    }
}

impl fmt::Display for PlaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "plane#{}", self.0)
    }
}

/// A bit set of [`PlaneId`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PlaneMask(pub u32);

impl PlaneMask {
    /// The empty mask.
    pub const NONE: PlaneMask = PlaneMask(0);

    /// True if `plane` is a member.
    pub fn contains(&self, plane: PlaneId) -> bool {
        self.0 & plane.mask().0 != 0
    }

    /// Inserts `plane`, returning the updated mask.
    pub fn with(mut self, plane: PlaneId) -> Self {
        self.0 |= plane.mask().0;
        self
    }

    /// Iterates the member planes in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = PlaneId> + '_ {
        (0..MAX_PLANES as u8)
            .map(PlaneId)
            .filter(move |p| self.contains(*p))
    }
}

impl std::ops::BitOr for PlaneMask {
    type Output = PlaneMask;
    fn bitor(self, rhs: Self) -> Self::Output {
        PlaneMask(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for PlaneMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_round_trips_membership() {
        let mask = TileTypeMask::NONE.with(TileType(3)).with(TileType(7));
        assert!(mask.contains(TileType(3)));
        assert!(mask.contains(TileType(7)));
        assert!(!mask.contains(TileType(4)));
        assert_eq!(mask.iter().collect::<Vec<_>>(), vec![TileType(3), TileType(7)]);
    }

    #[test]
    fn without_clears_single_bit() {
        let mask = TileTypeMask::ALL.without(TileType(0));
        assert!(!mask.contains(TileType(0)));
        assert!(mask.contains(TileType(1)));
    }
}
