//! Mapping between GDS `(layer, datatype)` pairs and internal
//! [`TileType`]s, and between label `(layer, texttype)` pairs and the type
//! a label attaches to (`spec.md` §4.4 "BOUNDARY"/"TEXT").

use std::collections::HashMap;

use tiles::prelude::TileType;

/// A `(layer, datatype)` or `(layer, texttype)` pair, as read off a
/// `LAYER`/`DATATYPE` or `LAYER`/`TEXTTYPE` record pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GdsLayerSpec {
    /// GDS layer number.
    pub layer: i16,
    /// GDS datatype (or texttype) number.
    pub xtype: i16,
}

impl GdsLayerSpec {
    /// Builds a spec from its two numbers.
    pub fn new(layer: i16, xtype: i16) -> Self {
        Self { layer, xtype }
    }
}

/// The style's cross-reference from GDS `(layer, datatype)` to internal
/// [`TileType`], and the companion label cross-reference.
///
/// Built once (from a loaded `cif` style's per-layer GDS mapping, resolved
/// against the tech file's type-name table) and handed to the reader.
/// `spec.md` §4.4: "Map (layer,dt)→internal type via the style's
/// cross-reference; if unknown, log once per pair."
#[derive(Default)]
pub struct LayerDirectory {
    geometry: HashMap<GdsLayerSpec, TileType>,
    labels: HashMap<GdsLayerSpec, TileType>,
}

impl LayerDirectory {
    /// An empty directory (every lookup misses).
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a `(layer, datatype)` -> type mapping used for
    /// `BOUNDARY`/`PATH`/`BOX` elements.
    pub fn add_geometry(&mut self, spec: GdsLayerSpec, ty: TileType) {
        self.geometry.insert(spec, ty);
    }

    /// Registers a `(layer, texttype)` -> type mapping used for `TEXT`
    /// elements, i.e. which mask layer a label attaches to.
    pub fn add_label(&mut self, spec: GdsLayerSpec, ty: TileType) {
        self.labels.insert(spec, ty);
    }

    /// Resolves a geometry layer spec.
    pub fn resolve_geometry(&self, spec: GdsLayerSpec) -> Option<TileType> {
        self.geometry.get(&spec).copied()
    }

    /// Resolves a label layer spec.
    pub fn resolve_label(&self, spec: GdsLayerSpec) -> Option<TileType> {
        self.labels.get(&spec).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unregistered_pair_misses() {
        let dir = LayerDirectory::new();
        assert_eq!(dir.resolve_geometry(GdsLayerSpec::new(1, 0)), None);
    }

    #[test]
    fn registered_pair_resolves() {
        let mut dir = LayerDirectory::new();
        let m1 = TileType(3);
        dir.add_geometry(GdsLayerSpec::new(1, 0), m1);
        assert_eq!(dir.resolve_geometry(GdsLayerSpec::new(1, 0)), Some(m1));
    }
}
