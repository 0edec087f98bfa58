//! Drives one CIF style's layers through [`cif::evaluate`] in declaration
//! order, feeding each layer's result back in as an operand source for
//! later layers (so `OR`/`AND`/`NET` can reference an earlier templayer).
//!
//! No such driver lives in `libs/cif` itself — `evaluate` only runs one
//! layer's op list — so this is where the "interrupt checked between CIF
//! layers" contract of `spec.md` §5/§6.4 is implemented, at the one place
//! in the workspace that already loops over a style's layers in order.

use std::collections::HashMap;

use cif::{evaluate, CifStyle, OperandSource};
use diagnostics::InterruptFlag;
use geometry::prelude::Point;
use tiles::prelude::Plane;

/// Named input planes (mask-layer geometry painted by the GDS reader, or
/// any other front end) available to a style's first layers.
pub struct NamedPlanes<'a> {
    planes: &'a HashMap<String, Plane>,
    labels: &'a HashMap<String, Point>,
}

impl<'a> NamedPlanes<'a> {
    /// Wraps borrowed name tables for use as an [`OperandSource`].
    pub fn new(planes: &'a HashMap<String, Plane>, labels: &'a HashMap<String, Point>) -> Self {
        Self { planes, labels }
    }
}

impl OperandSource for NamedPlanes<'_> {
    fn plane(&self, name: &str) -> Option<&Plane> {
        self.planes.get(name)
    }

    fn label_point(&self, name: &str) -> Option<Point> {
        self.labels.get(name).copied()
    }
}

/// Evaluates every layer in `style`, in order, returning each layer's
/// result plane keyed by layer name. `sources`/`labels` seed the initial
/// operand tables; each evaluated layer is added to the plane table before
/// the next layer runs, so forward-only `OR`/`AND`/`NET` references
/// resolve. Stops early (returning only the layers evaluated so far) if
/// `interrupt` is set between layers.
pub fn run_style(
    style: &CifStyle,
    mut planes: HashMap<String, Plane>,
    labels: &HashMap<String, Point>,
    interrupt: Option<&InterruptFlag>,
) -> HashMap<String, Plane> {
    for layer in &style.layers {
        if let Some(flag) = interrupt {
            if flag.is_pending() {
                tracing::warn!(style = %style.name, "interrupt requested; stopping CIF style evaluation");
                break;
            }
        }
        let source = NamedPlanes::new(&planes, labels);
        let result = evaluate(&layer.ops, &source);
        drop(source);
        planes.insert(layer.name.to_string(), result);
    }
    planes
}
