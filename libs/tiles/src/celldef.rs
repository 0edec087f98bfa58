//! Named layouts (`CellDef`) and their placements (`CellUse`), plus the
//! scoped name table the layer-database interface exposes as
//! `find_def`/`new_def` (`spec.md` §3, §4.6).

use arcstr::ArcStr;
use geometry::prelude::*;
use indexmap::IndexMap;

use crate::plane::Plane;
use crate::types::{PlaneId, TileType};

/// A text label anchored to a point on a plane.
#[derive(Debug, Clone)]
pub struct Label {
    /// The labeled area (zero-area for a point label).
    pub rect: Rect,
    /// Which corner/edge/center of `rect` the text anchors to.
    pub anchor: Side,
    /// The label text.
    pub text: ArcStr,
    /// The tile type this label is attached to.
    pub ty: TileType,
    /// Font name, if a non-default font was requested.
    pub font: Option<ArcStr>,
    /// Character size in internal units, if given explicitly.
    pub size: Option<i64>,
    /// Text rotation in degrees.
    pub angle: f64,
    /// STICKY labels are not re-anchored to a different tile on paint/erase.
    pub sticky: bool,
}

/// A placement of a child [`CellDef`] inside a parent.
#[derive(Debug, Clone)]
pub struct CellUse {
    /// The placed cell.
    pub def: ArcStr,
    /// The placement transform (includes any array step via repeated
    /// uses rather than an embedded array — AREF expansion happens at the
    /// GDS-reader layer).
    pub transform: Transformation,
}

/// A named layout: a bounding box, one [`Plane`] per [`PlaneId`], labels,
/// and child placements.
pub struct CellDef {
    /// The def's name, unique within its registry.
    pub name: ArcStr,
    planes: Vec<Option<Plane>>,
    /// Labels placed directly in this def.
    pub labels: Vec<Label>,
    /// Child cell placements.
    pub uses: Vec<CellUse>,
}

impl CellDef {
    /// Creates an empty def with no painted planes.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            planes: Vec::new(),
            labels: Vec::new(),
            uses: Vec::new(),
        }
    }

    /// Returns the plane at `id`, creating it (all-space) if it doesn't
    /// exist yet.
    pub fn plane_mut(&mut self, id: PlaneId) -> &mut Plane {
        let idx = id.0 as usize;
        if self.planes.len() <= idx {
            self.planes.resize_with(idx + 1, || None);
        }
        self.planes[idx].get_or_insert_with(Plane::new)
    }

    /// Returns the plane at `id`, or `None` if nothing has ever been
    /// painted on it.
    pub fn plane(&self, id: PlaneId) -> Option<&Plane> {
        self.planes.get(id.0 as usize).and_then(|p| p.as_ref())
    }

    /// Iterates the planes that have been materialized.
    pub fn planes(&self) -> impl Iterator<Item = (PlaneId, &Plane)> {
        self.planes
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.as_ref().map(|p| (PlaneId(i as u8), p)))
    }

    /// The def's bounding box across all materialized planes and child
    /// uses' transformed bounding boxes, or `None` if the def is empty.
    pub fn bbox(&self) -> Option<Rect> {
        let mut result: Option<Rect> = None;
        for (_, plane) in self.planes() {
            for (_, tile) in plane.tiles() {
                if tile.is_space() {
                    continue;
                }
                result = Some(match result {
                    Some(r) => r.bounding_union(&tile.rect),
                    None => tile.rect,
                });
            }
        }
        result
    }

    /// Adds a label to this def.
    pub fn place_label(&mut self, label: Label) {
        self.labels.push(label);
    }

    /// Adds a child placement to this def.
    pub fn place_use(&mut self, child: CellUse) {
        self.uses.push(child);
    }

    /// Rescales every materialized plane (and label anchor) by the
    /// integer factor `r`, for the GDS reader's mid-parse rational
    /// rescale (`spec.md` §4.4).
    pub fn rescale_planes(&mut self, r: i64) {
        if r == 1 {
            return;
        }
        for plane in self.planes.iter_mut().flatten() {
            plane.rescale(r);
        }
        for label in &mut self.labels {
            label.rect = Rect::from_sides(
                label.rect.left() * r,
                label.rect.bot() * r,
                label.rect.right() * r,
                label.rect.top() * r,
            );
        }
    }
}

/// A scoped registry of [`CellDef`]s, keyed by name.
///
/// Mirrors `spec.md` §4.6's `find_def`/`new_def`: GDS SREF/AREF targets
/// that haven't been parsed yet are represented by an empty, pending def
/// inserted eagerly so forward references resolve to a stable identity.
#[derive(Default)]
pub struct Registry {
    defs: IndexMap<ArcStr, CellDef>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up an existing def by name.
    pub fn find_def(&self, name: &str) -> Option<&CellDef> {
        self.defs.get(name)
    }

    /// Looks up an existing def by name, mutably.
    pub fn find_def_mut(&mut self, name: &str) -> Option<&mut CellDef> {
        self.defs.get_mut(name)
    }

    /// Returns the def named `name`, creating an empty one if it doesn't
    /// exist (used both for genuinely new defs and to materialize a
    /// forward-declared GDS structure reference).
    pub fn new_def(&mut self, name: impl Into<ArcStr>) -> &mut CellDef {
        let name = name.into();
        self.defs.entry(name.clone()).or_insert_with(|| CellDef::new(name))
    }

    /// True if `name` has been registered (pending or fully defined).
    pub fn contains(&self, name: &str) -> bool {
        self.defs.contains_key(name)
    }

    /// Iterates every registered def.
    pub fn iter(&self) -> impl Iterator<Item = &CellDef> {
        self.defs.values()
    }

    /// Iterates every registered def, mutably (used by the GDS reader's
    /// mid-parse rescale, which rewrites every already-materialized
    /// plane).
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut CellDef> {
        self.defs.values_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_def_is_idempotent() {
        let mut reg = Registry::new();
        reg.new_def("inv_x1");
        reg.new_def("inv_x1");
        assert_eq!(reg.iter().count(), 1);
    }

    #[test]
    fn bbox_reflects_painted_area() {
        let mut def = CellDef::new("cell");
        def.plane_mut(PlaneId(0))
            .apply(Rect::from_sides(0, 0, 10, 20), |_| TileType(1));
        assert_eq!(def.bbox(), Some(Rect::from_sides(0, 0, 10, 20)));
    }
}
