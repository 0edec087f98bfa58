//! A single CIF layer record: name, GDS mapping, 3D parameters, and its
//! ordered operator list (`spec.md` §3).

use arcstr::ArcStr;

use crate::op::CifOp;
use crate::style::GdsLayer;

/// Per-layer flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerFlags {
    /// An intermediate ("templayer") result, never emitted to output.
    pub temp: bool,
}

/// One CIF layer: an ordered recipe of operators plus the metadata needed
/// to read and write it.
#[derive(Debug, Clone)]
pub struct CifLayer {
    /// The layer's name, as referenced by `OR`/`AND`/`NET` operands.
    pub name: ArcStr,
    /// Whether this layer is a non-emitted intermediate.
    pub flags: LayerFlags,
    /// The GDS (layer, datatype) this CIF layer reads from and writes to.
    pub gds: GdsLayer,
    /// Which CIF layer a label on this layer's types attaches to, if
    /// different from this layer itself.
    pub label_layer: Option<ArcStr>,
    /// 3D process height above the substrate, in internal units.
    pub height: i64,
    /// 3D process thickness, in internal units.
    pub thickness: i64,
    /// Minimum legal width for geometry on this layer, in internal units.
    pub min_width: i64,
    /// The ordered operator recipe.
    pub ops: Vec<CifOp>,
}

impl CifLayer {
    /// Creates a layer with no ops yet and zeroed 3D parameters.
    pub fn new(name: impl Into<ArcStr>, gds: GdsLayer) -> Self {
        Self {
            name: name.into(),
            flags: LayerFlags::default(),
            gds,
            label_layer: None,
            height: 0,
            thickness: 0,
            min_width: 0,
            ops: Vec::new(),
        }
    }
}
