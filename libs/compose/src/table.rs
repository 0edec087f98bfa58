//! The paint/erase composition tables themselves: `P, E : Have × Arg ×
//! Plane → Result`, total by construction (`spec.md` §3, §4.2).

use std::collections::HashMap;

use tiles::prelude::{PlaneId, TileType, SPACE};

use crate::contacts::ContactTable;

/// One (have, arg, plane) table entry, distinguishing a default rule from
/// one a tech file rule has overridden (so later default initialization
/// never clobbers a user directive).
#[derive(Debug, Clone, Copy)]
struct Entry {
    result: TileType,
    is_default: bool,
}

/// The composition tables for one plane set: paint and erase, each keyed
/// by `(plane, have, arg)`.
#[derive(Default)]
pub struct CompositionTables {
    plane_mask: HashMap<TileType, tiles::prelude::PlaneMask>,
    contacts: ContactTable,
    paint: HashMap<(PlaneId, TileType, TileType), Entry>,
    erase: HashMap<(PlaneId, TileType, TileType), Entry>,
}

impl CompositionTables {
    /// Creates an empty table set (no types registered yet).
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `ty`'s home planes. Must be called before `paint`/`erase`
    /// queries mentioning `ty` are meaningful.
    pub fn declare_type(&mut self, ty: TileType, planes: tiles::prelude::PlaneMask) {
        self.plane_mask.insert(ty, planes);
    }

    /// The planes `ty` occupies.
    pub fn plane_mask_of(&self, ty: TileType) -> tiles::prelude::PlaneMask {
        self.plane_mask.get(&ty).copied().unwrap_or(tiles::prelude::PlaneMask::NONE)
    }

    /// Mutable access to the contact registry, for tech-file rule
    /// application.
    pub fn contacts_mut(&mut self) -> &mut ContactTable {
        &mut self.contacts
    }

    /// Read access to the contact registry.
    pub fn contacts(&self) -> &ContactTable {
        &self.contacts
    }

    fn set(
        table: &mut HashMap<(PlaneId, TileType, TileType), Entry>,
        plane: PlaneId,
        have: TileType,
        arg: TileType,
        result: TileType,
        is_default: bool,
    ) {
        let key = (plane, have, arg);
        let overwrite = match table.get(&key) {
            Some(existing) => is_default && !existing.is_default,
            None => false,
        };
        if !overwrite {
            table.insert(key, Entry { result, is_default });
        }
    }

    /// Overrides a paint-table entry with a user rule (`paint T1 T2 Tres
    /// [plane]`). Never superseded by a later default pass.
    pub fn set_paint_rule(&mut self, plane: PlaneId, have: TileType, arg: TileType, result: TileType) {
        Self::set(&mut self.paint, plane, have, arg, result, false);
    }

    /// Overrides an erase-table entry with a user rule.
    pub fn set_erase_rule(&mut self, plane: PlaneId, have: TileType, arg: TileType, result: TileType) {
        Self::set(&mut self.erase, plane, have, arg, result, false);
    }

    fn set_paint_default(&mut self, plane: PlaneId, have: TileType, arg: TileType, result: TileType) {
        Self::set(&mut self.paint, plane, have, arg, result, true);
    }

    fn set_erase_default(&mut self, plane: PlaneId, have: TileType, arg: TileType, result: TileType) {
        Self::set(&mut self.erase, plane, have, arg, result, true);
    }

    /// Applies the default rules of `spec.md` §4.2 for every registered
    /// type over every plane it (or the argument) occupies. Must run
    /// after all types are declared and all contacts registered, but
    /// before any `set_paint_rule`/`set_erase_rule` calls that should
    /// survive it (those are protected by the default/override flag
    /// regardless of call order, so this may also run first).
    pub fn apply_defaults(&mut self) {
        let types: Vec<TileType> = self.plane_mask.keys().copied().collect();
        let all_planes: Vec<PlaneId> = (0..tiles::prelude::MAX_PLANES as u8).map(PlaneId).collect();

        for &plane in &all_planes {
            for &have in &types {
                for &arg in &types {
                    // Rule 1: outside arg's plane-mask, nothing happens.
                    if !self.plane_mask_of(arg).contains(plane) {
                        self.set_paint_default(plane, have, arg, have);
                        self.set_erase_default(plane, have, arg, have);
                        continue;
                    }
                    // Rule 2: erase self on home plane -> SPACE.
                    if have == arg {
                        self.set_erase_default(plane, have, arg, SPACE);
                    } else {
                        self.set_erase_default(plane, have, arg, have);
                    }
                    // Rule 3: paint arg onto SPACE on arg's home plane -> arg.
                    if have == SPACE {
                        self.set_paint_default(plane, have, arg, arg);
                        continue;
                    }
                    if have == arg {
                        self.set_paint_default(plane, have, arg, arg);
                        continue;
                    }

                    let have_is_contact = self.contacts.is_contact(have);
                    let arg_is_contact = self.contacts.is_contact(arg);

                    if arg_is_contact {
                        // Rule 4: painting contact arg over anything on one
                        // of its residue planes overwrites with the contact.
                        if self.contacts.residue_on(arg, plane).is_some() {
                            if have_is_contact {
                                // Rule: contact onto contact attempts a
                                // stack; falls back to overwrite.
                                let result = self.contacts.stack_of(have, arg).unwrap_or(arg);
                                self.set_paint_default(plane, have, arg, result);
                            } else {
                                self.set_paint_default(plane, have, arg, arg);
                            }
                            continue;
                        }
                    }

                    if have_is_contact {
                        // Rule 5: painting a plain layer that matches one of
                        // `have`'s residues on this plane is a no-op.
                        if self.contacts.residue_on(have, plane) == Some(arg) {
                            self.set_paint_default(plane, have, arg, have);
                            continue;
                        }
                    }

                    // Otherwise default paint simply overwrites.
                    self.set_paint_default(plane, have, arg, arg);
                }
            }
        }
    }

    /// Paints `arg` onto `have` on `plane`, yielding the composed result.
    pub fn paint(&self, plane: PlaneId, have: TileType, arg: TileType) -> TileType {
        self.paint
            .get(&(plane, have, arg))
            .map(|e| e.result)
            .unwrap_or(have)
    }

    /// Erases `arg` from `have` on `plane`, yielding the composed result.
    pub fn erase(&self, plane: PlaneId, have: TileType, arg: TileType) -> TileType {
        if self.contacts.is_contact(have) && self.contacts.is_locked(have) {
            // A locked contact ignores erasure of any single residue;
            // only an exact self-erase dissolves it.
            if have == arg {
                return SPACE;
            }
            return have;
        }
        self.erase
            .get(&(plane, have, arg))
            .map(|e| e.result)
            .unwrap_or(have)
    }

    /// Checks the post-`final` invariant of `spec.md` §3: for every
    /// recorded `(have, plane)` entry, the paint result is `have`,
    /// `SPACE`, a residue of `have` on that plane, or a type whose
    /// plane-mask contains that plane. Returns the offending keys.
    pub fn check_invariant(&self) -> Vec<(PlaneId, TileType, TileType)> {
        let mut violations = Vec::new();
        for (&(plane, have, arg), entry) in &self.paint {
            let result = entry.result;
            let ok = result == have
                || result == SPACE
                || self.contacts.residue_on(have, plane) == Some(result)
                || self.plane_mask_of(result).contains(plane);
            if !ok {
                violations.push((plane, have, arg));
            }
        }
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiles::prelude::PlaneMask;

    #[test]
    fn default_paint_onto_space_is_identity() {
        let mut t = CompositionTables::new();
        let m1 = TileType(1);
        t.declare_type(SPACE, PlaneMask::NONE.with(PlaneId(0)));
        t.declare_type(m1, PlaneMask::NONE.with(PlaneId(0)));
        t.apply_defaults();
        assert_eq!(t.paint(PlaneId(0), SPACE, m1), m1);
    }

    #[test]
    fn default_erase_self_is_space() {
        let mut t = CompositionTables::new();
        let m1 = TileType(1);
        t.declare_type(SPACE, PlaneMask::NONE.with(PlaneId(0)));
        t.declare_type(m1, PlaneMask::NONE.with(PlaneId(0)));
        t.apply_defaults();
        assert_eq!(t.erase(PlaneId(0), m1, m1), SPACE);
    }

    #[test]
    fn user_paint_rule_survives_defaults_applied_after() {
        let mut t = CompositionTables::new();
        let m1 = TileType(1);
        let m2 = TileType(2);
        let m3 = TileType(3);
        let plane = PlaneId(0);
        t.declare_type(SPACE, PlaneMask::NONE.with(plane));
        t.declare_type(m1, PlaneMask::NONE.with(plane));
        t.declare_type(m2, PlaneMask::NONE.with(plane));
        t.declare_type(m3, PlaneMask::NONE.with(plane));
        t.set_paint_rule(plane, m1, m2, m3);
        t.apply_defaults();
        assert_eq!(t.paint(plane, m1, m2), m3);
    }

    #[test]
    fn contact_overwrites_residue_owner() {
        let mut t = CompositionTables::new();
        let metal1 = TileType(1);
        let poly = TileType(2);
        let via = TileType(3);
        let plane = PlaneId(0);
        t.declare_type(SPACE, PlaneMask::NONE.with(plane));
        t.declare_type(metal1, PlaneMask::NONE.with(plane));
        t.declare_type(poly, PlaneMask::NONE.with(PlaneId(1)));
        t.declare_type(
            via,
            PlaneMask::NONE.with(plane).with(PlaneId(1)),
        );
        t.contacts_mut().declare_contact(
            via,
            vec![
                crate::contacts::Residue { plane, ty: metal1 },
                crate::contacts::Residue { plane: PlaneId(1), ty: poly },
            ],
        );
        t.apply_defaults();
        assert_eq!(t.paint(plane, metal1, via), via);
    }
}
