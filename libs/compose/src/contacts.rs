//! Contact types and their residues (`spec.md` §3, §4.2).

use indexmap::IndexMap;
use tiles::prelude::{PlaneId, TileType};

/// The non-contact type a contact presents on one of the planes it
/// bridges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Residue {
    /// The plane this residue lives on.
    pub plane: PlaneId,
    /// The type this contact decomposes to on that plane.
    pub ty: TileType,
}

/// The registry of contact types and their residues, plus the implicit
/// stacked-contact synthesis table (`compose T = A B` directives that
/// named two other contacts).
#[derive(Default)]
pub struct ContactTable {
    residues: IndexMap<TileType, Vec<Residue>>,
    locked: IndexMap<TileType, bool>,
    stacks: IndexMap<(TileType, TileType), TileType>,
}

impl ContactTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `contact` as a contact type whose residues are `residues`.
    pub fn declare_contact(&mut self, contact: TileType, residues: Vec<Residue>) {
        self.residues.insert(contact, residues);
    }

    /// True if `ty` has been declared as a contact type.
    pub fn is_contact(&self, ty: TileType) -> bool {
        self.residues.contains_key(&ty)
    }

    /// The residues of `ty`, or an empty slice if it isn't a contact.
    pub fn residues(&self, ty: TileType) -> &[Residue] {
        self.residues.get(&ty).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The residue type `ty` presents on `plane`, if any.
    pub fn residue_on(&self, ty: TileType, plane: PlaneId) -> Option<TileType> {
        self.residues(ty)
            .iter()
            .find(|r| r.plane == plane)
            .map(|r| r.ty)
    }

    /// Marks `ty` as locked: erasing one of its residues must not dissolve
    /// the contact (`spec.md` §4.2 "Locking").
    pub fn lock(&mut self, ty: TileType) {
        self.locked.insert(ty, true);
    }

    /// True if `ty` is locked.
    pub fn is_locked(&self, ty: TileType) -> bool {
        self.locked.get(&ty).copied().unwrap_or(false)
    }

    /// Registers that stacking `a` on top of `b` (in either order)
    /// synthesizes the already-declared contact `stacked`.
    pub fn declare_stack(&mut self, a: TileType, b: TileType, stacked: TileType) {
        self.stacks.insert(key(a, b), stacked);
        self.stacks.insert(key(b, a), stacked);
    }

    /// The stacked-contact type that results from painting `incoming` onto
    /// existing contact `have`, if one has been declared.
    pub fn stack_of(&self, have: TileType, incoming: TileType) -> Option<TileType> {
        self.stacks.get(&key(have, incoming)).copied()
    }
}

fn key(a: TileType, b: TileType) -> (TileType, TileType) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn residue_lookup_respects_plane() {
        let mut table = ContactTable::new();
        let via = TileType(5);
        table.declare_contact(
            via,
            vec![
                Residue { plane: PlaneId(0), ty: TileType(1) },
                Residue { plane: PlaneId(1), ty: TileType(2) },
            ],
        );
        assert_eq!(table.residue_on(via, PlaneId(0)), Some(TileType(1)));
        assert_eq!(table.residue_on(via, PlaneId(1)), Some(TileType(2)));
        assert_eq!(table.residue_on(via, PlaneId(2)), None);
    }

    #[test]
    fn stack_lookup_is_order_independent() {
        let mut table = ContactTable::new();
        table.declare_stack(TileType(3), TileType(4), TileType(9));
        assert_eq!(table.stack_of(TileType(3), TileType(4)), Some(TileType(9)));
        assert_eq!(table.stack_of(TileType(4), TileType(3)), Some(TileType(9)));
        assert_eq!(table.stack_of(TileType(3), TileType(5)), None);
    }
}
