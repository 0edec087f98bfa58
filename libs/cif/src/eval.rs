//! Evaluates a [`CifLayer`]'s operator list against a working plane.
//!
//! The working region for a CIF layer is represented as a [`tiles::plane::Plane`]
//! using [`PRESENT`] for "this layer covers this area" and `SPACE` for
//! everywhere else — the same tile-plane database every other engine in
//! this workspace uses, rather than a bespoke polygon-set representation.

use std::collections::{HashSet, VecDeque};

use arcstr::ArcStr;
use geometry::prelude::*;
use tiles::prelude::{Plane, TileType, SPACE};

use crate::op::{BloatCombine, CifOp, MaxRectKind};
use crate::style::CifStyle;

/// The tile type marking "this CIF layer covers this area" within a
/// working plane.
pub const PRESENT: TileType = TileType(1);

/// Looks up named input planes: either a previously evaluated CIF layer
/// (a templayer) or a raw mask-layer source plane painted by the GDS
/// reader / schematic front end.
pub trait OperandSource {
    /// Returns the plane backing `name`, if known.
    fn plane(&self, name: &str) -> Option<&Plane>;
    /// Returns the anchor point of a label named `name`, for `NET`.
    fn label_point(&self, name: &str) -> Option<Point>;
}

fn present_rects(plane: &Plane) -> Vec<Rect> {
    plane
        .tiles()
        .filter(|(_, t)| t.ty == PRESENT)
        .map(|(_, t)| t.rect)
        .collect()
}

fn union_onto(working: &mut Plane, rects: &[Rect]) {
    for r in rects {
        working.apply(*r, |_| PRESENT);
    }
}

fn intersect_with(working: &mut Plane, rects: &[Rect]) {
    let current = present_rects(working);
    let mut fresh = Plane::new();
    for a in &current {
        for b in rects {
            if let Some(overlap) = a.intersection(b) {
                fresh.apply(overlap, |_| PRESENT);
            }
        }
    }
    *working = fresh;
}

fn subtract_from(working: &mut Plane, rects: &[Rect]) {
    for r in rects {
        working.apply(*r, |have| if have == PRESENT { SPACE } else { have });
    }
}

/// Evaluates `ops` in order against a fresh working plane, resolving
/// named operands through `source`.
pub fn evaluate(ops: &[CifOp], source: &impl OperandSource) -> Plane {
    let mut working = Plane::new();
    for op in ops {
        apply_op(&mut working, op, source);
    }
    working
}

fn operand_rects(names: &[ArcStr], source: &impl OperandSource) -> Vec<Rect> {
    names
        .iter()
        .filter_map(|n| source.plane(n.as_str()))
        .flat_map(|p| present_rects(p))
        .collect()
}

fn apply_op(working: &mut Plane, op: &CifOp, source: &impl OperandSource) {
    match op {
        CifOp::Or { operands } => union_onto(working, &operand_rects(operands, source)),
        CifOp::And { operands } => intersect_with(working, &operand_rects(operands, source)),
        CifOp::AndNot { operands } => subtract_from(working, &operand_rects(operands, source)),
        CifOp::Grow { distance, snap_to_grid } => {
            let rects: Vec<Rect> = present_rects(working)
                .into_iter()
                .map(|r| {
                    let grown = r.grow(*distance);
                    if *snap_to_grid {
                        grown.snap_outward(distance.max(1))
                    } else {
                        grown
                    }
                })
                .collect();
            *working = Plane::new();
            union_onto(working, &rects);
        }
        CifOp::Shrink { distance } => {
            // Independent per-rectangle erosion: exact for an isolated
            // rectangle, an approximation (rather than full polygon
            // offsetting) once rectangles abut — adjacent rectangles are
            // shrunk away from each other's shared edge too, which can
            // open gaps a true erosion of the unioned region wouldn't.
            let rects: Vec<Rect> = present_rects(working)
                .into_iter()
                .map(|r| r.shrink(*distance))
                .filter(|r| !r.is_empty())
                .collect();
            *working = Plane::new();
            union_onto(working, &rects);
        }
        CifOp::Bloat { combine, rules } => bloat(working, *combine, rules),
        CifOp::Squares {
            border,
            size,
            sep,
            grid_x,
            grid_y,
            snap_to_grid,
        } => squares(working, *border, *size, *sep, *grid_x, *grid_y, *snap_to_grid),
        CifOp::Slots {
            short_border,
            short_size,
            short_sep,
            long_border,
            long_size,
            long_sep,
            offset,
        } => slots(
            working,
            *short_border,
            *short_size,
            *short_sep,
            *long_border,
            *long_size,
            *long_sep,
            *offset,
        ),
        CifOp::Bbox { .. } => {
            let rects = present_rects(working);
            if let Some(bbox) = rects.into_iter().reduce(|a, b| a.bounding_union(&b)) {
                *working = Plane::new();
                working.apply(bbox, |_| PRESENT);
            }
        }
        CifOp::MaxRect { kind } => {
            let rects = present_rects(working);
            let result = match kind {
                MaxRectKind::Enclosing => rects.into_iter().reduce(|a, b| a.bounding_union(&b)),
                MaxRectKind::Interior => rects.into_iter().max_by_key(|r| r.area()),
            };
            *working = Plane::new();
            if let Some(r) = result {
                working.apply(r, |_| PRESENT);
            }
        }
        CifOp::Net { label, operand } => net_restrict(working, label, operand, source),
    }
}

/// Edge-wise expansion/contraction.
///
/// A faithful `BLOAT` keys each edge's movement off the tile type on the
/// *opposite* side of that edge in the underlying mask database. This
/// evaluator works over a binary present/absent working plane (the CIF
/// layer's own accumulated geometry), which does not retain that
/// neighbor-type information once layers have been combined by `OR`/`AND`.
/// Lacking that, every matching rule in `rules` is combined by `combine`
/// into a single worst-case distance and applied uniformly — equivalent
/// to a signed `GROW`. Layers that need true per-neighbor-type bloating
/// should stage it as the first operator in a layer's op list, while the
/// working plane is still a straight copy of one source layer.
fn bloat(working: &mut Plane, combine: BloatCombine, rules: &[crate::op::BloatRule]) {
    let distance = match combine {
        BloatCombine::All => 1,
        BloatCombine::Or => rules.iter().map(|r| r.distance).max().unwrap_or(0),
        BloatCombine::Min => rules.iter().map(|r| r.distance).min().unwrap_or(0),
        BloatCombine::Max => rules.iter().map(|r| r.distance).max().unwrap_or(0),
    };
    let rects: Vec<Rect> = present_rects(working)
        .into_iter()
        .map(|r| if distance >= 0 { r.grow(distance) } else { r.shrink(-distance) })
        .filter(|r| !r.is_empty())
        .collect();
    *working = Plane::new();
    union_onto(working, &rects);
}

#[allow(clippy::too_many_arguments)]
fn squares(
    working: &mut Plane,
    border: i64,
    size: i64,
    sep: i64,
    grid_x: Option<i64>,
    grid_y: Option<i64>,
    snap_to_grid: bool,
) {
    if size <= 0 {
        return;
    }
    let rects = present_rects(working);
    let Some(bbox) = rects.into_iter().reduce(|a, b| a.bounding_union(&b)) else {
        return;
    };
    let mut area = bbox.shrink(border);
    if snap_to_grid {
        let grid = grid_x.unwrap_or(size + sep).max(1);
        area = area.snap_outward(grid);
    }
    if area.is_empty() {
        return;
    }
    let step_x = grid_x.unwrap_or(size + sep).max(1);
    let step_y = grid_y.unwrap_or(size + sep).max(1);

    let mut x = area.left();
    while x + size <= area.right() {
        let mut y = area.bot();
        while y + size <= area.top() {
            let cut = Rect::from_sides(x, y, x + size, y + size);
            working.apply(cut, |have| if have == PRESENT { SPACE } else { have });
            y += step_y;
        }
        x += step_x;
    }
}

#[allow(clippy::too_many_arguments)]
fn slots(
    working: &mut Plane,
    short_border: i64,
    short_size: i64,
    short_sep: i64,
    long_border: i64,
    long_size: i64,
    long_sep: i64,
    offset: i64,
) {
    if short_size <= 0 || long_size <= 0 {
        return;
    }
    let rects = present_rects(working);
    let Some(bbox) = rects.into_iter().reduce(|a, b| a.bounding_union(&b)) else {
        return;
    };
    let x_left = bbox.left() + short_border;
    let x_right = bbox.right() - short_border;
    let y_bot = bbox.bot() + long_border;
    let y_top = bbox.top() - long_border;
    if x_left >= x_right || y_bot >= y_top {
        return;
    }
    let step_x = (short_size + short_sep).max(1);
    let step_y = (long_size + long_sep).max(1);

    let mut x = x_left + offset.rem_euclid(step_x);
    while x + short_size <= x_right {
        let mut y = y_bot;
        while y + long_size <= y_top {
            let cut = Rect::from_sides(x, y, x + short_size, y + long_size);
            working.apply(cut, |have| if have == PRESENT { SPACE } else { have });
            y += step_y;
        }
        x += step_x;
    }
}

fn net_restrict(working: &mut Plane, label: &ArcStr, operand: &ArcStr, source: &impl OperandSource) {
    let Some(src_plane) = source.plane(operand.as_str()) else {
        *working = Plane::new();
        return;
    };
    let Some(anchor) = source.label_point(label.as_str()) else {
        *working = Plane::new();
        return;
    };
    let Some(start) = src_plane.find_point(anchor) else {
        *working = Plane::new();
        return;
    };

    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);
    let mut rects = Vec::new();

    while let Some(id) = queue.pop_front() {
        let Some(tile) = src_plane.get(id) else { continue };
        if tile.ty != PRESENT {
            continue;
        }
        rects.push(tile.rect);
        let neighbors = src_plane
            .left_neighbors(id)
            .into_iter()
            .chain(src_plane.right_neighbors(id))
            .chain(src_plane.top_neighbors(id))
            .chain(src_plane.bottom_neighbors(id));
        for next in neighbors {
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    *working = Plane::new();
    union_onto(working, &rects);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoSources;
    impl OperandSource for NoSources {
        fn plane(&self, _name: &str) -> Option<&Plane> {
            None
        }
        fn label_point(&self, _name: &str) -> Option<Point> {
            None
        }
    }

    #[test]
    fn grow_expands_present_rect() {
        let mut working = Plane::new();
        working.apply(Rect::from_sides(0, 0, 10, 10), |_| PRESENT);
        apply_op(&mut working, &CifOp::Grow { distance: 2, snap_to_grid: false }, &NoSources);
        let rects = present_rects(&working);
        assert_eq!(rects, vec![Rect::from_sides(-2, -2, 12, 12)]);
    }

    #[test]
    fn bbox_collapses_to_bounding_rect() {
        let mut working = Plane::new();
        working.apply(Rect::from_sides(0, 0, 5, 5), |_| PRESENT);
        working.apply(Rect::from_sides(10, 10, 15, 15), |_| PRESENT);
        apply_op(&mut working, &CifOp::Bbox { top_only: false }, &NoSources);
        let rects = present_rects(&working);
        assert_eq!(rects, vec![Rect::from_sides(0, 0, 15, 15)]);
    }
}
