//! Extraction policy: the per-technology knobs `spec.md` §4.5 leaves open —
//! the no-merge mask, and the tile-to-resistance model the section
//! explicitly calls "out of scope here".

use std::collections::HashMap;

use tiles::prelude::{TileType, TileTypeMask};

/// Per-technology extraction parameters and the no-merge hook.
///
/// The no-merge mask blocks series/parallel simplification across a pair
/// of tile types even when the graph shape would otherwise allow it —
/// e.g. keeping every contact cut visible instead of folding it into its
/// neighboring conductor's resistor.
pub trait SimplifyPolicy {
    /// True if a node touching `a`-typed geometry and a node touching
    /// `b`-typed geometry must never be merged by series or parallel
    /// reduction, regardless of what the graph shape would otherwise
    /// allow.
    fn no_merge(&self, a: TileType, b: TileType) -> bool;

    /// Sheet resistance in milliohms per square for `ty`, or `None` if
    /// `ty` does not conduct (no resistor should be generated for it).
    fn sheet_milliohms_per_square(&self, ty: TileType) -> Option<i64>;

    /// True if `ty` is a source/drain diffusion tile type.
    fn is_diffusion(&self, ty: TileType) -> bool;

    /// True if `ty` is a transistor gate/channel tile type.
    fn is_device(&self, ty: TileType) -> bool;

    /// True if `ty` is a contact (a residue image shared across planes,
    /// discharged to one node).
    fn is_contact(&self, ty: TileType) -> bool;
}

/// A table-driven [`SimplifyPolicy`] built from a technology file's
/// resistance and no-merge directives.
#[derive(Debug, Clone, Default)]
pub struct TablePolicy {
    no_merge: HashMap<(TileType, TileType), ()>,
    sheet_milliohms: HashMap<TileType, i64>,
    diffusion: TileTypeMask,
    device: TileTypeMask,
    contact: TileTypeMask,
}

impl TablePolicy {
    /// An empty policy: nothing conducts, nothing is blocked from
    /// merging, until the `set_*`/`mark_*` calls below populate it.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `a`/`b` (in either order) as never mergeable into each
    /// other.
    pub fn set_no_merge(&mut self, a: TileType, b: TileType) {
        self.no_merge.insert((a, b), ());
        self.no_merge.insert((b, a), ());
    }

    /// Sets `ty`'s sheet resistance, in milliohms per square.
    pub fn set_sheet_resistance(&mut self, ty: TileType, milliohms_per_square: i64) {
        self.sheet_milliohms.insert(ty, milliohms_per_square);
    }

    /// Marks `ty` as a source/drain diffusion type.
    pub fn mark_diffusion(&mut self, ty: TileType) {
        self.diffusion = self.diffusion.with(ty);
    }

    /// Marks `ty` as a device (gate/channel) type.
    pub fn mark_device(&mut self, ty: TileType) {
        self.device = self.device.with(ty);
    }

    /// Marks `ty` as a contact type.
    pub fn mark_contact(&mut self, ty: TileType) {
        self.contact = self.contact.with(ty);
    }
}

impl SimplifyPolicy for TablePolicy {
    fn no_merge(&self, a: TileType, b: TileType) -> bool {
        self.no_merge.contains_key(&(a, b))
    }

    fn sheet_milliohms_per_square(&self, ty: TileType) -> Option<i64> {
        self.sheet_milliohms.get(&ty).copied()
    }

    fn is_diffusion(&self, ty: TileType) -> bool {
        self.diffusion.contains(ty)
    }

    fn is_device(&self, ty: TileType) -> bool {
        self.device.contains(ty)
    }

    fn is_contact(&self, ty: TileType) -> bool {
        self.contact.contains(ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_merge_is_symmetric() {
        let mut p = TablePolicy::new();
        p.set_no_merge(TileType(3), TileType(5));
        assert!(p.no_merge(TileType(3), TileType(5)));
        assert!(p.no_merge(TileType(5), TileType(3)));
        assert!(!p.no_merge(TileType(3), TileType(4)));
    }

    #[test]
    fn unset_type_does_not_conduct() {
        let p = TablePolicy::new();
        assert_eq!(p.sheet_milliohms_per_square(TileType(9)), None);
    }
}
