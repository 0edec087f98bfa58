//! The net extractor: flood a plane from a seed point, build the resistor
//! graph tile by tile, then fold it down with the six-way simplification
//! pipeline of `spec.md` §4.5.
//!
//! The exact per-tile resistance calculator (how a single tile's own
//! rectangle becomes a resistor value) is left unspecified there — "out of
//! scope here" — so the model used below is a deliberately simple one:
//! each conductive tile becomes one node at its center, and each pair of
//! touching conductive tiles becomes one resistor sized from sheet
//! resistance, the length between tile centers, and the shared edge's
//! overlap as an effective width. Everything downstream (the queue
//! discipline, the simplification pipeline, the no-merge mask) depends
//! only on there being *a* resistor value per tile pair, not on this
//! particular formula.

use std::collections::{HashMap, VecDeque};

use arcstr::ArcStr;
use geometry::prelude::{Point, Rect};
use tiles::prelude::{Label, Plane, TileId, TileType};

use crate::error::ExtractError;
use crate::policy::SimplifyPolicy;
use crate::types::{
    Breakpoint, NodeId, NodeStatus, ResContactPoint, ResJunction, ResNode, ResResistor,
    ResTransistor, ResistorId, TransistorId,
};

/// The resistor graph produced by one net's extraction, after
/// simplification has run. Dead resistors and forwarded nodes are left in
/// place (skip them by checking [`ResResistor::dead`] / forwarding) rather
/// than compacted, so every id handed out during extraction stays valid.
#[derive(Debug, Clone, Default)]
pub struct ExtractedNet {
    /// Every node created during extraction, including ones later merged
    /// away (`status == NodeStatus::Forwarded`) or pruned to a dead end.
    pub nodes: Vec<ResNode>,
    /// Every resistor created, including ones later marked
    /// [`ResResistor::dead`].
    pub resistors: Vec<ResResistor>,
    /// Every transistor discovered.
    pub transistors: Vec<ResTransistor>,
    /// Contact residues discharged during the walk.
    pub contacts: Vec<ResContactPoint>,
    /// Junctions discovered between dissimilar conductive tile types.
    pub junctions: Vec<ResJunction>,
    /// Names that were displaced by a merge where both sides already
    /// carried a name; `rnode`'s `killnode` record exists for exactly
    /// this case (`spec.md` §6.3).
    pub killed_names: Vec<ArcStr>,
}

/// Extracts the net reachable from `start` on `plane`, mutating its tiles'
/// scratch space ([`tiles::prelude::TileJunk`]) as it walks and leaving it
/// populated on return (callers that extract more than one net from the
/// same plane should treat each extraction as consuming the tiles it
/// visits).
pub fn extract_net(
    plane: &mut Plane,
    start: Point,
    labels: &[Label],
    policy: &dyn SimplifyPolicy,
) -> Result<ExtractedNet, ExtractError> {
    let start_id = plane.find_point(start).ok_or(ExtractError::NoStartTile(start))?;
    let start_ty = plane.get(start_id).expect("found above").ty;
    if plane.get(start_id).expect("found above").is_space() || !conducts(policy, start_ty) {
        return Err(ExtractError::NoStartTile(start));
    }

    let mut ex = NetExtractor::default();
    ex.install_breakpoints(plane, labels);
    let mut queue = VecDeque::new();
    let start_node = ex.tile_node(plane, start_id);
    ex.nodes[start_node.0 as usize].is_origin = true;
    ex.pending.push_back(start_node);
    queue.push_back(start_id);

    while let Some(tid) = queue.pop_front() {
        let (rect, ty) = {
            let tile = plane.get(tid).expect("queued tile is live");
            (tile.rect, tile.ty)
        };
        let node_id = ex.tile_node(plane, tid);

        if policy.is_device(ty) {
            let trans_id = ex.device_for(plane, tid, ty, rect);
            ex.transistors[trans_id.0 as usize].gate.get_or_insert(node_id);
            if !ex.nodes[node_id.0 as usize].transistors.contains(&trans_id) {
                ex.nodes[node_id.0 as usize].transistors.push(trans_id);
            }
        }
        if policy.is_contact(ty) {
            ex.contacts.push(ResContactPoint { rect, ty, node: node_id });
        }

        for neighbors in [
            plane.left_neighbors(tid),
            plane.right_neighbors(tid),
            plane.top_neighbors(tid),
            plane.bottom_neighbors(tid),
        ] {
            for nb in neighbors {
                let Some(nb_tile) = plane.get(nb) else { continue };
                if nb_tile.is_space() || !conducts(policy, nb_tile.ty) {
                    continue;
                }
                let nb_rect = nb_tile.rect;
                let nb_ty = nb_tile.ty;
                let first_visit = plane
                    .get(nb)
                    .and_then(|t| t.junk.as_ref())
                    .map(|j| !j.marked)
                    .unwrap_or(true);
                let nb_node = ex.tile_node(plane, nb);
                if first_visit {
                    ex.pending.push_back(nb_node);
                    queue.push_back(nb);
                }

                let device_adjacency = policy.is_device(ty) != policy.is_device(nb_ty)
                    && (policy.is_diffusion(ty) || policy.is_diffusion(nb_ty));

                if device_adjacency {
                    let (device_tid, device_ty, device_rect, sd_node) = if policy.is_device(ty) {
                        (tid, ty, rect, nb_node)
                    } else {
                        (nb, nb_ty, nb_rect, node_id)
                    };
                    let trans_id = ex.device_for(plane, device_tid, device_ty, device_rect);
                    ex.bind_source_drain(trans_id, sd_node);
                    continue;
                }

                if ty != nb_ty {
                    ex.junctions.push(ResJunction {
                        coord: midpoint(rect, nb_rect),
                        node: node_id,
                    });
                }

                if ex.find_resistor_between(node_id, nb_node).is_some() {
                    continue;
                }
                let milliohms = estimate_resistance(policy, rect, ty, nb_rect);
                ex.add_resistor(node_id, nb_node, milliohms, ty);
            }
        }
    }

    ex.simplify(policy);
    Ok(ExtractedNet {
        nodes: ex.nodes,
        resistors: ex.resistors,
        transistors: ex.transistors,
        contacts: ex.contacts,
        junctions: ex.junctions,
        killed_names: ex.killed_names,
    })
}

fn conducts(policy: &dyn SimplifyPolicy, ty: TileType) -> bool {
    policy.sheet_milliohms_per_square(ty).is_some() || policy.is_device(ty) || policy.is_contact(ty)
}

fn midpoint(a: Rect, b: Rect) -> Point {
    let ca = a.center();
    let cb = b.center();
    Point::new((ca.x + cb.x) / 2, (ca.y + cb.y) / 2)
}

/// Sheet-resistance estimate for the resistor between two touching tiles:
/// `sheet * length / width`, where `width` is the shared edge's overlap
/// and `length` is the Manhattan distance between tile centers.
fn estimate_resistance(policy: &dyn SimplifyPolicy, a: Rect, ty: TileType, b: Rect) -> i64 {
    let Some(sheet) = policy.sheet_milliohms_per_square(ty) else {
        return 0;
    };
    let vertical_edge = a.right() == b.left() || a.left() == b.right();
    let width = if vertical_edge {
        (a.top().min(b.top()) - a.bot().max(b.bot())).max(1)
    } else {
        (a.right().min(b.right()) - a.left().max(b.left())).max(1)
    };
    let length = ((a.center().x - b.center().x).abs() + (a.center().y - b.center().y).abs()).max(1);
    (sheet * length) / width
}

#[derive(Default)]
struct NetExtractor {
    nodes: Vec<ResNode>,
    resistors: Vec<ResResistor>,
    transistors: Vec<ResTransistor>,
    contacts: Vec<ResContactPoint>,
    junctions: Vec<ResJunction>,
    breakpoints: Vec<Breakpoint>,
    pending: VecDeque<NodeId>,
    killed_names: Vec<ArcStr>,
    /// Names pre-bound to a tile before the flood reaches it (`spec.md`
    /// §4.5 Setup (d): port bounding boxes and labels), consulted by
    /// [`Self::tile_node`] the first time that tile becomes a node.
    label_names: HashMap<TileId, ArcStr>,
}

impl NetExtractor {
    /// Locates every label's (or port bounding box's) anchoring tile on
    /// `plane` and records its name, so the breakpoint created for that
    /// tile during the flood (`spec.md` §4.5 Setup (a) "port bounding
    /// boxes" and (b) "labels") carries a user-visible name instead of
    /// being anonymous. A label whose rectangle doesn't land on this
    /// plane (wrong layer, or outside this net entirely) is silently
    /// skipped — it belongs to a different plane's extraction.
    fn install_breakpoints(&mut self, plane: &Plane, labels: &[Label]) {
        for label in labels {
            let anchor = label.rect.center();
            let Some(tid) = plane.find_point(anchor) else { continue };
            let Some(tile) = plane.get(tid) else { continue };
            if tile.is_space() {
                continue;
            }
            self.label_names.entry(tid).or_insert_with(|| label.text.clone());
        }
    }

    fn new_node(&mut self, coord: Point, ty: TileType) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(ResNode::new(coord, ty));
        id
    }

    fn add_resistor(&mut self, a: NodeId, b: NodeId, milliohms: i64, ty: TileType) -> ResistorId {
        let id = ResistorId(self.resistors.len() as u32);
        self.resistors.push(ResResistor {
            endpoints: (a, b),
            milliohms,
            length: 0,
            width: 0,
            ty,
            dead: false,
        });
        self.nodes[a.0 as usize].resistors.push(id);
        self.nodes[b.0 as usize].resistors.push(id);
        id
    }

    /// Finds (creating if necessary) the node for `tid`, using
    /// [`tiles::prelude::TileJunk`] as the record of whether this tile has
    /// already been visited.
    fn tile_node(&mut self, plane: &mut Plane, tid: TileId) -> NodeId {
        {
            let tile = plane.get_mut(tid).expect("live tile");
            if tile.junk.is_none() {
                tile.junk = Some(Box::default());
            }
        }
        let tile = plane.get(tid).expect("live tile");
        let junk = tile.junk.as_ref().expect("just ensured");
        if junk.marked {
            let bp_idx = junk.breakpoints[0];
            return self.breakpoints[bp_idx as usize].node;
        }
        let rect = tile.rect;
        let ty = tile.ty;
        let name = self.label_names.get(&tid).cloned();
        let node = self.new_node(rect.center(), ty);
        self.nodes[node.0 as usize].area = rect.area();
        self.nodes[node.0 as usize].name = name.clone();
        let bp_id = self.breakpoints.len() as u32;
        self.breakpoints.push(Breakpoint {
            coord: rect.center(),
            node,
            name,
        });
        let tile = plane.get_mut(tid).expect("live tile");
        let junk = tile.junk.as_mut().expect("just ensured");
        junk.marked = true;
        junk.breakpoints.push(bp_id);
        node
    }

    fn device_for(&mut self, plane: &mut Plane, tid: TileId, ty: TileType, rect: Rect) -> TransistorId {
        {
            let tile = plane.get_mut(tid).expect("live tile");
            if tile.junk.is_none() {
                tile.junk = Some(Box::default());
            }
        }
        let tile = plane.get(tid).expect("live tile");
        let junk = tile.junk.as_ref().expect("just ensured");
        if junk.has_device {
            return TransistorId(junk.device.expect("has_device implies device is set"));
        }
        let id = TransistorId(self.transistors.len() as u32);
        self.transistors.push(ResTransistor::new(ty, rect));
        let tile = plane.get_mut(tid).expect("live tile");
        let junk = tile.junk.as_mut().expect("just ensured");
        junk.has_device = true;
        junk.device = Some(id.0);
        junk.is_sd = false;
        id
    }

    fn bind_source_drain(&mut self, trans_id: TransistorId, node: NodeId) {
        let t = &mut self.transistors[trans_id.0 as usize];
        if t.source.is_none() || t.source == Some(node) {
            t.source = Some(node);
        } else if t.drain.is_none() || t.drain == Some(node) {
            t.drain = Some(node);
        }
    }

    fn node_of(&self, id: NodeId) -> NodeId {
        let mut cur = id;
        while let Some(next) = self.nodes[cur.0 as usize].forward {
            cur = next;
        }
        cur
    }

    fn resistor_endpoints_resolved(&self, rid: ResistorId) -> (NodeId, NodeId) {
        let (a, b) = self.resistors[rid.0 as usize].endpoints;
        (self.node_of(a), self.node_of(b))
    }

    fn find_resistor_between(&self, a: NodeId, b: NodeId) -> Option<ResistorId> {
        let a = self.node_of(a);
        let b = self.node_of(b);
        self.nodes[a.0 as usize].resistors.iter().copied().find(|&rid| {
            if self.resistors[rid.0 as usize].dead {
                return false;
            }
            let (x, y) = self.resistor_endpoints_resolved(rid);
            (x == a && y == b) || (x == b && y == a)
        })
    }

    fn live_neighbors(&self, nid: NodeId) -> Vec<(NodeId, ResistorId)> {
        self.nodes[nid.0 as usize]
            .resistors
            .iter()
            .copied()
            .filter(|rid| !self.resistors[rid.0 as usize].dead)
            .map(|rid| {
                let (a, b) = self.resistor_endpoints_resolved(rid);
                let other = if a == nid { b } else { a };
                (other, rid)
            })
            .collect()
    }

    /// Merges `drop` into `keep`, forwarding it. Returns `false` (no-op)
    /// if the merge is blocked by the no-merge mask or is a self-merge.
    fn merge_nodes(&mut self, keep: NodeId, drop: NodeId, policy: &dyn SimplifyPolicy) -> bool {
        if keep == drop {
            return false;
        }
        if policy.no_merge(self.nodes[keep.0 as usize].ty, self.nodes[drop.0 as usize].ty) {
            return false;
        }
        let moved_resistors: Vec<ResistorId> = self.nodes[drop.0 as usize].resistors.drain(..).collect();
        let moved_transistors: Vec<TransistorId> =
            self.nodes[drop.0 as usize].transistors.drain(..).collect();
        let area = self.nodes[drop.0 as usize].area;
        let name = self.nodes[drop.0 as usize].name.take();
        self.nodes[keep.0 as usize].resistors.extend(moved_resistors);
        self.nodes[keep.0 as usize].transistors.extend(moved_transistors);
        self.nodes[keep.0 as usize].area += area;
        self.nodes[keep.0 as usize].is_origin |= self.nodes[drop.0 as usize].is_origin;
        match (&self.nodes[keep.0 as usize].name, name) {
            (None, dropped_name) => self.nodes[keep.0 as usize].name = dropped_name,
            (Some(_), Some(dropped_name)) => self.killed_names.push(dropped_name),
            (Some(_), None) => {}
        }
        self.nodes[drop.0 as usize].status = NodeStatus::Forwarded;
        self.nodes[drop.0 as usize].forward = Some(keep);
        true
    }

    /// Runs the fixed-order simplification pipeline (self-loop, zero-ohm,
    /// parallel, series, triangle-to-Y, single-connection) until the
    /// pending queue drains.
    fn simplify(&mut self, policy: &dyn SimplifyPolicy) {
        while let Some(nid) = self.pending.pop_front() {
            let nid = self.node_of(nid);
            if self.nodes[nid.0 as usize].status != NodeStatus::Pending {
                continue;
            }
            if self.try_self_loop(nid) {
                self.pending.push_back(nid);
                continue;
            }
            if self.try_zero_ohm(nid, policy) {
                continue;
            }
            if self.try_parallel(nid, policy) {
                continue;
            }
            if self.try_series(nid, policy) {
                continue;
            }
            if self.try_triangle_to_y(nid, policy) {
                continue;
            }
            if self.try_single_connection(nid) {
                continue;
            }
            self.nodes[nid.0 as usize].status = NodeStatus::Finished;
        }
    }

    fn try_self_loop(&mut self, nid: NodeId) -> bool {
        let candidates = self.nodes[nid.0 as usize].resistors.clone();
        for rid in candidates {
            if self.resistors[rid.0 as usize].dead {
                continue;
            }
            let (a, b) = self.resistor_endpoints_resolved(rid);
            if a == nid && b == nid {
                self.resistors[rid.0 as usize].dead = true;
                self.nodes[nid.0 as usize].resistors.retain(|&r| r != rid);
                return true;
            }
        }
        false
    }

    fn try_zero_ohm(&mut self, nid: NodeId, policy: &dyn SimplifyPolicy) -> bool {
        for (other, rid) in self.live_neighbors(nid) {
            if self.resistors[rid.0 as usize].milliohms != 0 || other == nid {
                continue;
            }
            self.resistors[rid.0 as usize].dead = true;
            if self.merge_nodes(nid, other, policy) {
                self.pending.push_back(nid);
                return true;
            }
        }
        false
    }

    fn try_parallel(&mut self, nid: NodeId, policy: &dyn SimplifyPolicy) -> bool {
        let mut seen: Vec<(NodeId, ResistorId)> = Vec::new();
        for (other, rid) in self.live_neighbors(nid) {
            if other == nid {
                continue;
            }
            if let Some(&(_, prev)) = seen.iter().find(|(o, _)| *o == other) {
                let ty_a = self.resistors[prev.0 as usize].ty;
                let ty_b = self.resistors[rid.0 as usize].ty;
                if policy.no_merge(ty_a, ty_b) {
                    continue;
                }
                let ra = self.resistors[prev.0 as usize].milliohms.max(1);
                let rb = self.resistors[rid.0 as usize].milliohms.max(1);
                self.resistors[prev.0 as usize].milliohms = (ra * rb) / (ra + rb);
                self.resistors[rid.0 as usize].dead = true;
                self.pending.push_back(nid);
                self.pending.push_back(other);
                return true;
            }
            seen.push((other, rid));
        }
        false
    }

    fn try_series(&mut self, nid: NodeId, policy: &dyn SimplifyPolicy) -> bool {
        if self.nodes[nid.0 as usize].is_origin {
            return false;
        }
        if self.nodes[nid.0 as usize].name.is_some() {
            return false;
        }
        if !self.nodes[nid.0 as usize].transistors.is_empty() {
            return false;
        }
        let live = self.live_neighbors(nid);
        if live.len() != 2 {
            return false;
        }
        let (other1, r1) = live[0];
        let (other2, r2) = live[1];
        if other1 == nid || other2 == nid {
            return false;
        }
        let ty1 = self.resistors[r1.0 as usize].ty;
        let ty2 = self.resistors[r2.0 as usize].ty;
        if policy.no_merge(ty1, ty2) {
            return false;
        }
        let milliohms = self.resistors[r1.0 as usize].milliohms + self.resistors[r2.0 as usize].milliohms;
        let length = self.resistors[r1.0 as usize].length + self.resistors[r2.0 as usize].length;
        let width = self.resistors[r1.0 as usize].width.min(self.resistors[r2.0 as usize].width);
        self.resistors[r1.0 as usize].dead = true;
        self.resistors[r2.0 as usize].dead = true;
        self.nodes[other1.0 as usize].resistors.retain(|&r| r != r1);
        self.nodes[other2.0 as usize].resistors.retain(|&r| r != r2);
        let new_id = ResistorId(self.resistors.len() as u32);
        self.resistors.push(ResResistor {
            endpoints: (other1, other2),
            milliohms,
            length,
            width,
            ty: ty1,
            dead: false,
        });
        self.nodes[other1.0 as usize].resistors.push(new_id);
        self.nodes[other2.0 as usize].resistors.push(new_id);
        self.nodes[nid.0 as usize].resistors.clear();
        self.nodes[nid.0 as usize].status = NodeStatus::Finished;
        self.pending.push_back(other1);
        self.pending.push_back(other2);
        true
    }

    fn try_triangle_to_y(&mut self, nid: NodeId, policy: &dyn SimplifyPolicy) -> bool {
        let live = self.live_neighbors(nid);
        for i in 0..live.len() {
            for j in (i + 1)..live.len() {
                let (na, r_na) = live[i];
                let (nb, r_nb) = live[j];
                if na == nb || na == nid || nb == nid {
                    continue;
                }
                let Some(r_ab) = self.find_resistor_between(na, nb) else {
                    continue;
                };
                let ty_na = self.resistors[r_na.0 as usize].ty;
                let ty_nb = self.resistors[r_nb.0 as usize].ty;
                let ty_ab = self.resistors[r_ab.0 as usize].ty;
                if policy.no_merge(ty_na, ty_nb)
                    || policy.no_merge(ty_na, ty_ab)
                    || policy.no_merge(ty_nb, ty_ab)
                {
                    continue;
                }
                let r1 = self.resistors[r_na.0 as usize].milliohms.max(1);
                let r2 = self.resistors[r_nb.0 as usize].milliohms.max(1);
                let r3 = self.resistors[r_ab.0 as usize].milliohms.max(1);
                let sum = r1 + r2 + r3;
                let center_coord = self.nodes[nid.0 as usize].coord;
                let center = self.new_node(center_coord, ty_na);
                let r_center_nid = (r2 * r3) / sum;
                let r_center_na = (r1 * r3) / sum;
                let r_center_nb = (r1 * r2) / sum;
                self.resistors[r_na.0 as usize].dead = true;
                self.resistors[r_nb.0 as usize].dead = true;
                self.resistors[r_ab.0 as usize].dead = true;
                self.nodes[nid.0 as usize].resistors.retain(|&r| r != r_na && r != r_nb);
                self.nodes[na.0 as usize].resistors.retain(|&r| r != r_na && r != r_ab);
                self.nodes[nb.0 as usize].resistors.retain(|&r| r != r_nb && r != r_ab);
                self.add_resistor(nid, center, r_center_nid, ty_na);
                self.add_resistor(na, center, r_center_na, ty_na);
                self.add_resistor(nb, center, r_center_nb, ty_na);
                self.pending.push_back(nid);
                self.pending.push_back(na);
                self.pending.push_back(nb);
                self.pending.push_back(center);
                return true;
            }
        }
        false
    }

    fn try_single_connection(&mut self, nid: NodeId) -> bool {
        if self.nodes[nid.0 as usize].is_origin {
            return false;
        }
        if self.nodes[nid.0 as usize].name.is_some() {
            return false;
        }
        if !self.nodes[nid.0 as usize].transistors.is_empty() {
            return false;
        }
        let live = self.live_neighbors(nid);
        if live.len() > 1 {
            return false;
        }
        if let Some((other, rid)) = live.into_iter().next() {
            // A dangling leaf whose only resistor runs straight to the
            // origin would otherwise vanish along with that resistor,
            // silently severing the drivepoint's sole connection with no
            // replacement structure (unlike series reduction, which
            // always leaves a combined resistor behind). Leave it for a
            // later pass once it's no longer origin-adjacent, or forever
            // if it never is — that's a legitimately dangling branch.
            if self.nodes[other.0 as usize].is_origin {
                return false;
            }
            self.resistors[rid.0 as usize].dead = true;
            self.nodes[other.0 as usize].resistors.retain(|&r| r != rid);
        }
        self.nodes[nid.0 as usize].resistors.clear();
        self.nodes[nid.0 as usize].status = NodeStatus::Finished;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::TablePolicy;
    use geometry::prelude::Side;
    use tiles::prelude::{Plane, SPACE};

    const METAL: TileType = TileType(5);
    const POLY: TileType = TileType(6);

    fn policy() -> TablePolicy {
        let mut p = TablePolicy::new();
        p.set_sheet_resistance(METAL, 50);
        p.set_sheet_resistance(POLY, 200);
        p
    }

    fn label(text: &str, at: Rect, ty: TileType) -> Label {
        Label {
            rect: at,
            anchor: Side::Left,
            text: text.into(),
            ty,
            font: None,
            size: None,
            angle: 0.0,
            sticky: false,
        }
    }

    #[test]
    fn missing_start_tile_fails_the_net() {
        let mut plane = Plane::new();
        let policy = policy();
        let err = extract_net(&mut plane, Point::new(0, 0), &[], &policy);
        assert!(matches!(err, Err(ExtractError::NoStartTile(_))));
    }

    #[test]
    fn two_touching_tiles_produce_one_resistor() {
        let mut plane = Plane::new();
        plane.apply(Rect::from_sides(0, 0, 10, 10), |_| METAL);
        plane.apply(Rect::from_sides(10, 0, 20, 10), |_| METAL);
        let policy = policy();
        let net = extract_net(&mut plane, Point::new(5, 5), &[], &policy).unwrap();
        let live_resistors: Vec<_> = net.resistors.iter().filter(|r| !r.dead).collect();
        assert_eq!(live_resistors.len(), 1);
        assert!(live_resistors[0].milliohms > 0);
    }

    #[test]
    fn isolated_space_start_point_fails() {
        let mut plane = Plane::new();
        let policy = policy();
        assert!(extract_net(&mut plane, Point::new(100, 100), &[], &policy).is_err());
        let _ = SPACE;
    }

    #[test]
    fn series_chain_collapses_to_one_resistor() {
        let mut plane = Plane::new();
        plane.apply(Rect::from_sides(0, 0, 10, 10), |_| METAL);
        plane.apply(Rect::from_sides(10, 0, 20, 10), |_| METAL);
        plane.apply(Rect::from_sides(20, 0, 30, 10), |_| METAL);
        let policy = policy();
        let net = extract_net(&mut plane, Point::new(5, 5), &[], &policy).unwrap();
        let live_resistors: Vec<_> = net.resistors.iter().filter(|r| !r.dead).collect();
        assert_eq!(live_resistors.len(), 1);
        let live_nodes: Vec<_> = net
            .nodes
            .iter()
            .filter(|n| n.status != NodeStatus::Forwarded)
            .collect();
        assert!(live_nodes.len() >= 2);
    }

    #[test]
    fn origin_node_is_never_pruned_by_single_connection() {
        // A bare two-tile wire with no labels or devices on either tile:
        // the far tile is a textbook "dangling, no devices" leaf, but the
        // near tile is the flood's own drivepoint and must survive with
        // its one resistor intact rather than being collapsed away.
        let mut plane = Plane::new();
        plane.apply(Rect::from_sides(0, 0, 10, 10), |_| METAL);
        plane.apply(Rect::from_sides(10, 0, 20, 10), |_| METAL);
        let policy = policy();
        let net = extract_net(&mut plane, Point::new(5, 5), &[], &policy).unwrap();

        let origin = net.nodes.iter().find(|n| n.is_origin).expect("origin node survives");
        assert_ne!(origin.status, NodeStatus::Forwarded);
        let live_resistors: Vec<_> = net.resistors.iter().filter(|r| !r.dead).collect();
        assert_eq!(live_resistors.len(), 1, "origin's only resistor must not be pruned");
    }

    #[test]
    fn origin_node_is_never_pruned_by_series() {
        // Same exclusion, but for a chain where the origin sits at the
        // middle (degree-2) tile instead of an end: series reduction must
        // skip it even though it otherwise qualifies (no name, no
        // devices, exactly two live neighbors).
        let mut plane = Plane::new();
        plane.apply(Rect::from_sides(0, 0, 10, 10), |_| METAL);
        plane.apply(Rect::from_sides(10, 0, 20, 10), |_| METAL);
        plane.apply(Rect::from_sides(20, 0, 30, 10), |_| METAL);
        let policy = policy();
        let net = extract_net(&mut plane, Point::new(15, 5), &[], &policy).unwrap();

        let origin = net.nodes.iter().find(|n| n.is_origin).expect("origin node survives");
        assert_ne!(origin.status, NodeStatus::Forwarded);
        assert!(
            !origin.resistors.is_empty(),
            "series reduction must not strip the origin's own resistor list"
        );
    }

    #[test]
    fn label_on_far_tile_becomes_a_named_breakpoint() {
        let mut plane = Plane::new();
        plane.apply(Rect::from_sides(0, 0, 10, 10), |_| METAL);
        plane.apply(Rect::from_sides(10, 0, 20, 10), |_| METAL);
        let labels = vec![label("OUT", Rect::from_sides(15, 4, 16, 6), METAL)];
        let policy = policy();
        let net = extract_net(&mut plane, Point::new(5, 5), &labels, &policy).unwrap();

        let named = net
            .nodes
            .iter()
            .find(|n| n.name.as_deref() == Some("OUT"))
            .expect("labeled tile produced a named node");
        assert_ne!(named.status, NodeStatus::Forwarded);
        // A named breakpoint is protected from single-connection pruning
        // the same way the origin is, so its resistor to the origin
        // survives too.
        let live_resistors: Vec<_> = net.resistors.iter().filter(|r| !r.dead).collect();
        assert_eq!(live_resistors.len(), 1);
    }
}
