//! A CIF style: scale/expander/reducer, grid limit, plane order, and the
//! ordered list of layers it generates (`spec.md` §3, §4.3).

use arcstr::ArcStr;
use indexmap::IndexMap;
use num_integer::Integer;
use tiles::prelude::{PlaneId, TileType};

use crate::layer::CifLayer;
use crate::op::CifOp;

/// Lifecycle state of a style, mirroring the tech-file loader's staged
/// activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleStatus {
    /// Declared but not yet populated.
    NotLoaded,
    /// Currently being read from the tech file.
    Pending,
    /// Read but deactivated (another style took over as "current").
    Suspended,
    /// Fully loaded and eligible to run.
    Loaded,
}

/// The GDS layer:datatype pair a mask layer maps to/from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GdsLayer {
    /// GDS LAYER number.
    pub layer: i16,
    /// GDS DATATYPE number.
    pub datatype: i16,
}

/// A CIF output style: scale semantics, per-layer op lists, and plane
/// ordering.
pub struct CifStyle {
    /// The style's name (as selected by `cifoutput style <name>`).
    pub name: ArcStr,
    /// Current activation state.
    pub status: StyleStatus,
    /// Centimicrons (or other declared unit) per internal unit.
    pub scale_num: i64,
    /// Denominator applied to `scale_num`; often 10 for nanometer internal
    /// units.
    pub expander: i64,
    /// The coarsest unit the style is willing to emit; all op distances
    /// must be divisible by this after reduction.
    pub reducer: i64,
    /// The finest geometry multiple this style may output; `SQUARES`
    /// becomes `SQUARES_G` below this limit.
    pub grid_limit: i64,
    /// Per-type label-layer assignment (which CIF layer a label on a type
    /// attaches to).
    pub label_layers: IndexMap<TileType, ArcStr>,
    /// Layers, in declaration order.
    pub layers: Vec<CifLayer>,
    /// Total top-to-bottom plane order.
    pub plane_order: Vec<PlaneId>,
}

impl CifStyle {
    /// Creates an empty, `NotLoaded` style.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            status: StyleStatus::NotLoaded,
            scale_num: 1,
            expander: 1,
            reducer: 1,
            grid_limit: 1,
            label_layers: IndexMap::new(),
            layers: Vec::new(),
            plane_order: Vec::new(),
        }
    }

    /// Looks up a layer by name.
    pub fn layer(&self, name: &str) -> Option<&CifLayer> {
        self.layers.iter().find(|l| l.name.as_str() == name)
    }

    /// Looks up a layer's index by name, used to detect forward (cyclic)
    /// references among templayers: a later layer may reference an
    /// earlier one, never the reverse.
    pub fn layer_index(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.name.as_str() == name)
    }

    /// Validates that every `OR`/`AND`/`AND-NOT`/`NET` operand referencing
    /// another CIF layer points strictly earlier in `self.layers`
    /// (`spec.md` §5: "Cycles are disallowed and detected by
    /// forward-only resolution"). Returns the name of the first offending
    /// reference, if any.
    pub fn check_forward_only(&self) -> Option<ArcStr> {
        for (i, layer) in self.layers.iter().enumerate() {
            for op in &layer.ops {
                let operands: Vec<&ArcStr> = match op {
                    CifOp::Or { operands } | CifOp::And { operands } | CifOp::AndNot { operands } => {
                        operands.iter().collect()
                    }
                    CifOp::Net { operand, .. } => vec![operand],
                    _ => Vec::new(),
                };
                for operand in operands {
                    if let Some(j) = self.layer_index(operand) {
                        if j >= i {
                            return Some(operand.clone());
                        }
                    }
                }
            }
        }
        None
    }

    /// Reduces `(scale_num, expander, reducer)` and every op distance by
    /// their greatest common factor, per `spec.md` §4.3. Doubles the
    /// resulting multiplier first if any distance or `scale_num` is odd
    /// while `expander` is also odd, to keep half-grid contact centering
    /// safe.
    pub fn reduce(&mut self) {
        let mut values: Vec<i64> = vec![self.scale_num];
        for layer in &self.layers {
            for op in &layer.ops {
                values.extend(op_distances(op));
            }
        }
        let needs_half_grid = values.iter().any(|v| v % 2 != 0);
        if needs_half_grid && self.expander % 2 != 0 {
            self.scale_num *= 2;
            self.expander *= 2;
        }

        // `reducer` is deliberately excluded from the GCF below: it's a
        // floor on emitted granularity, not part of the scale/expander/op
        // distance family the GCF is minimizing (`spec.md` §4.3).
        let mut gcf = self.scale_num.unsigned_abs();
        gcf = gcf.gcd(&self.expander.unsigned_abs());
        for layer in &self.layers {
            for op in &layer.ops {
                for d in op_distances(op) {
                    if d != 0 {
                        gcf = gcf.gcd(&d.unsigned_abs());
                    }
                }
            }
        }
        let gcf = gcf.max(1) as i64;
        if gcf != 1 {
            self.scale_num /= gcf;
            self.expander /= gcf;
            for layer in &mut self.layers {
                for op in &mut layer.ops {
                    scale_op_distances(op, gcf);
                }
            }
        }

        if self.reducer != 0 && self.scale_num % self.reducer != 0 {
            tracing::warn!(
                scale = self.scale_num,
                reducer = self.reducer,
                "CIF style scale is not divisible by its reducer after reduction"
            );
        }
    }

    /// Rescales every op distance and parameter by `factor` (the
    /// multiplier `d` from `spec.md` §4.3's rescale contract), then
    /// re-reduces. Called when the host lambda changes.
    pub fn rescale(&mut self, factor: i64) {
        if factor == 1 {
            return;
        }
        self.scale_num *= factor;
        for layer in &mut self.layers {
            for op in &mut layer.ops {
                scale_op_distances_multiply(op, factor);
            }
        }
        self.reduce();
    }

    /// Each layer's worst-case grow/shrink radius, and the style's
    /// interaction halo `2 * max(radius) / scale + 1` (`spec.md` §4.3).
    pub fn interaction_halo(&self) -> i64 {
        let max_radius = self
            .layers
            .iter()
            .flat_map(|l| l.ops.iter())
            .map(|op| op.grow_radius().max(op.shrink_radius()))
            .max()
            .unwrap_or(0);
        let scale = self.scale_num.max(1);
        2 * max_radius / scale + 1
    }
}

fn op_distances(op: &CifOp) -> Vec<i64> {
    match op {
        CifOp::Grow { distance, .. } => vec![*distance],
        CifOp::Shrink { distance } => vec![*distance],
        CifOp::Bloat { rules, .. } => rules.iter().map(|r| r.distance).collect(),
        CifOp::Squares { border, size, sep, .. } => vec![*border, *size, *sep],
        CifOp::Slots {
            short_border,
            short_size,
            short_sep,
            long_border,
            long_size,
            long_sep,
            offset,
        } => vec![
            *short_border,
            *short_size,
            *short_sep,
            *long_border,
            *long_size,
            *long_sep,
            *offset,
        ],
        _ => Vec::new(),
    }
}

fn scale_op_distances(op: &mut CifOp, gcf: i64) {
    scale_op_distances_divide(op, gcf);
}

fn scale_op_distances_divide(op: &mut CifOp, gcf: i64) {
    match op {
        CifOp::Grow { distance, .. } | CifOp::Shrink { distance } => *distance /= gcf,
        CifOp::Bloat { rules, .. } => {
            for r in rules.iter_mut() {
                r.distance /= gcf;
            }
        }
        CifOp::Squares { border, size, sep, .. } => {
            *border /= gcf;
            *size /= gcf;
            *sep /= gcf;
        }
        CifOp::Slots {
            short_border,
            short_size,
            short_sep,
            long_border,
            long_size,
            long_sep,
            offset,
        } => {
            *short_border /= gcf;
            *short_size /= gcf;
            *short_sep /= gcf;
            *long_border /= gcf;
            *long_size /= gcf;
            *long_sep /= gcf;
            *offset /= gcf;
        }
        _ => {}
    }
}

fn scale_op_distances_multiply(op: &mut CifOp, factor: i64) {
    match op {
        CifOp::Grow { distance, .. } | CifOp::Shrink { distance } => *distance *= factor,
        CifOp::Bloat { rules, .. } => {
            for r in rules.iter_mut() {
                r.distance *= factor;
            }
        }
        CifOp::Squares { border, size, sep, .. } => {
            *border *= factor;
            *size *= factor;
            *sep *= factor;
        }
        CifOp::Slots {
            short_border,
            short_size,
            short_sep,
            long_border,
            long_size,
            long_sep,
            offset,
        } => {
            *short_border *= factor;
            *short_size *= factor;
            *short_sep *= factor;
            *long_border *= factor;
            *long_size *= factor;
            *long_sep *= factor;
            *offset *= factor;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::CifLayer;

    fn style_with_distances(scale: i64, expander: i64, distances: Vec<i64>) -> CifStyle {
        let mut style = CifStyle::new("test");
        style.scale_num = scale;
        style.expander = expander;
        style.reducer = 1;
        let mut layer = CifLayer::new("M1", GdsLayer { layer: 49, datatype: 0 });
        for d in distances {
            layer.ops.push(CifOp::Grow { distance: d, snap_to_grid: false });
        }
        style.layers.push(layer);
        style
    }

    #[test]
    fn reduce_divides_by_gcf() {
        let mut style = style_with_distances(100, 10, vec![20, 40]);
        style.reduce();
        assert_eq!(style.scale_num, 10);
        assert_eq!(style.expander, 1);
        let grow_distances: Vec<i64> = style.layers[0]
            .ops
            .iter()
            .map(|op| op.grow_radius())
            .collect();
        assert_eq!(grow_distances, vec![2, 4]);
    }

    #[test]
    fn forward_only_detects_cycle() {
        let mut style = CifStyle::new("test");
        let mut a = CifLayer::new("A", GdsLayer { layer: 1, datatype: 0 });
        a.ops.push(CifOp::Or { operands: vec!["B".into()] });
        let b = CifLayer::new("B", GdsLayer { layer: 2, datatype: 0 });
        style.layers.push(a);
        style.layers.push(b);
        assert_eq!(style.check_forward_only(), Some(ArcStr::from("B")));
    }
}
