//! The tech-file `cif` section client: builds [`CifStyle`]s from
//! `style`/`scalefactor`/`gridlimit`/`layer`/op directive lines
//! (`spec.md` §4.1, §4.3, §6.2).

use arcstr::ArcStr;
use indexmap::IndexMap;
use techfile::{Args, SectionClient};

use crate::layer::CifLayer;
use crate::op::{BloatCombine, BloatRule, CifOp, MaxRectKind};
use crate::style::{CifStyle, GdsLayer, StyleStatus};

/// Parses the `cif` tech-file section into a set of named [`CifStyle`]s.
pub struct CifClient {
    styles: IndexMap<ArcStr, CifStyle>,
    current: Option<ArcStr>,
    /// The active process variant, if the host declared one. `None` means
    /// every `variant` block is treated as inactive except `variant *`.
    process_variant: Option<ArcStr>,
    /// Whether the directives currently being read should be applied, per
    /// the most recent `variant` line.
    active: bool,
}

impl CifClient {
    /// Creates an empty client with no styles yet, and no process variant
    /// restriction (every `variant *` block applies; named-variant blocks
    /// are skipped until [`Self::with_variant`] is used).
    pub fn new() -> Self {
        Self {
            styles: IndexMap::new(),
            current: None,
            process_variant: None,
            active: true,
        }
    }

    /// Creates a client that only applies directives inside `variant <list>`
    /// blocks naming `variant`, plus unconditionally inside `variant *`
    /// blocks (`spec.md` §6.2).
    pub fn with_variant(variant: impl Into<ArcStr>) -> Self {
        Self {
            styles: IndexMap::new(),
            current: None,
            process_variant: Some(variant.into()),
            active: true,
        }
    }

    /// Consumes the client, returning every style parsed.
    pub fn into_styles(self) -> IndexMap<ArcStr, CifStyle> {
        self.styles
    }

    fn current_style(&mut self) -> Option<&mut CifStyle> {
        let name = self.current.clone()?;
        self.styles.get_mut(&name)
    }

    fn current_layer(&mut self) -> Option<&mut CifLayer> {
        self.current_style()?.layers.last_mut()
    }
}

impl Default for CifClient {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_i64(s: &str) -> Option<i64> {
    s.parse().ok()
}

impl SectionClient for CifClient {
    fn line(&mut self, args: Args<'_>) -> bool {
        match args {
            ["variant", "*"] => {
                self.active = true;
                true
            }
            ["variant", rest @ ..] if !rest.is_empty() => {
                self.active = match &self.process_variant {
                    Some(v) => rest.iter().any(|name| *name == v.as_str()),
                    None => false,
                };
                true
            }
            _ if !self.active => true,
            ["style", name] => {
                let name = ArcStr::from(*name);
                self.styles
                    .entry(name.clone())
                    .or_insert_with(|| CifStyle::new(name.clone()));
                self.current = Some(name);
                true
            }
            ["scalefactor", num, expander] => {
                let (Some(num), Some(expander)) = (parse_i64(num), parse_i64(expander)) else {
                    return false;
                };
                let Some(style) = self.current_style() else { return false };
                style.scale_num = num;
                style.expander = expander;
                style.status = StyleStatus::Pending;
                true
            }
            ["reducer", value] => {
                let Some(value) = parse_i64(value) else { return false };
                let Some(style) = self.current_style() else { return false };
                style.reducer = value;
                true
            }
            ["gridlimit", value] => {
                let Some(value) = parse_i64(value) else { return false };
                let Some(style) = self.current_style() else { return false };
                style.grid_limit = value;
                true
            }
            ["layer" | "calma" | "gds", name, layer, datatype] => {
                let (Some(layer), Some(datatype)) = (parse_i64(layer), parse_i64(datatype)) else {
                    return false;
                };
                let Some(style) = self.current_style() else { return false };
                style.layers.push(CifLayer::new(
                    *name,
                    GdsLayer { layer: layer as i16, datatype: datatype as i16 },
                ));
                true
            }
            ["templayer", name] => {
                let Some(style) = self.current_style() else { return false };
                let mut layer = CifLayer::new(*name, GdsLayer { layer: -1, datatype: -1 });
                layer.flags.temp = true;
                style.layers.push(layer);
                true
            }
            ["or", rest @ ..] if !rest.is_empty() => {
                let Some(layer) = self.current_layer() else { return false };
                layer.ops.push(CifOp::Or { operands: rest.iter().map(|s| ArcStr::from(*s)).collect() });
                true
            }
            ["and", rest @ ..] if !rest.is_empty() => {
                let Some(layer) = self.current_layer() else { return false };
                layer.ops.push(CifOp::And { operands: rest.iter().map(|s| ArcStr::from(*s)).collect() });
                true
            }
            ["and-not", rest @ ..] if !rest.is_empty() => {
                let Some(layer) = self.current_layer() else { return false };
                layer.ops.push(CifOp::AndNot { operands: rest.iter().map(|s| ArcStr::from(*s)).collect() });
                true
            }
            ["grow", d] => {
                let Some(d) = parse_i64(d) else { return false };
                let Some(layer) = self.current_layer() else { return false };
                layer.ops.push(CifOp::Grow { distance: d, snap_to_grid: false });
                true
            }
            ["grow_g", d] => {
                let Some(d) = parse_i64(d) else { return false };
                let Some(layer) = self.current_layer() else { return false };
                layer.ops.push(CifOp::Grow { distance: d, snap_to_grid: true });
                true
            }
            ["shrink", d] => {
                let Some(d) = parse_i64(d) else { return false };
                let Some(layer) = self.current_layer() else { return false };
                layer.ops.push(CifOp::Shrink { distance: d });
                true
            }
            ["bbox"] => {
                let Some(layer) = self.current_layer() else { return false };
                layer.ops.push(CifOp::Bbox { top_only: false });
                true
            }
            ["bbox", "top"] => {
                let Some(layer) = self.current_layer() else { return false };
                layer.ops.push(CifOp::Bbox { top_only: true });
                true
            }
            ["maxrect", "int"] => {
                let Some(layer) = self.current_layer() else { return false };
                layer.ops.push(CifOp::MaxRect { kind: MaxRectKind::Interior });
                true
            }
            ["maxrect", "ext"] => {
                let Some(layer) = self.current_layer() else { return false };
                layer.ops.push(CifOp::MaxRect { kind: MaxRectKind::Enclosing });
                true
            }
            ["squares", border, size, sep] => {
                let (Some(border), Some(size), Some(sep)) =
                    (parse_i64(border), parse_i64(size), parse_i64(sep))
                else {
                    return false;
                };
                let Some(layer) = self.current_layer() else { return false };
                layer.ops.push(CifOp::Squares {
                    border,
                    size,
                    sep,
                    grid_x: None,
                    grid_y: None,
                    snap_to_grid: false,
                });
                true
            }
            ["squares_g", border, size, sep] => {
                let (Some(border), Some(size), Some(sep)) =
                    (parse_i64(border), parse_i64(size), parse_i64(sep))
                else {
                    return false;
                };
                let Some(layer) = self.current_layer() else { return false };
                layer.ops.push(CifOp::Squares {
                    border,
                    size,
                    sep,
                    grid_x: None,
                    grid_y: None,
                    snap_to_grid: true,
                });
                true
            }
            ["slots", short_border, short_size, short_sep, long_border, long_size, long_sep, offset] => {
                let (
                    Some(short_border),
                    Some(short_size),
                    Some(short_sep),
                    Some(long_border),
                    Some(long_size),
                    Some(long_sep),
                    Some(offset),
                ) = (
                    parse_i64(short_border),
                    parse_i64(short_size),
                    parse_i64(short_sep),
                    parse_i64(long_border),
                    parse_i64(long_size),
                    parse_i64(long_sep),
                    parse_i64(offset),
                )
                else {
                    return false;
                };
                let Some(layer) = self.current_layer() else { return false };
                layer.ops.push(CifOp::Slots {
                    short_border,
                    short_size,
                    short_sep,
                    long_border,
                    long_size,
                    long_sep,
                    offset,
                });
                true
            }
            ["net", label, operand] => {
                let Some(layer) = self.current_layer() else { return false };
                layer
                    .ops
                    .push(CifOp::Net { label: ArcStr::from(*label), operand: ArcStr::from(*operand) });
                true
            }
            ["bloat-all"] => {
                let Some(layer) = self.current_layer() else { return false };
                layer.ops.push(CifOp::Bloat { combine: BloatCombine::All, rules: Vec::new() });
                true
            }
            ["bloat-or" | "bloat-min" | "bloat-max", rest @ ..] if rest.len() % 2 == 0 && !rest.is_empty() => {
                let combine = match args[0] {
                    "bloat-or" => BloatCombine::Or,
                    "bloat-min" => BloatCombine::Min,
                    _ => BloatCombine::Max,
                };
                let mut rules = Vec::new();
                for pair in rest.chunks(2) {
                    let [ty, dist] = pair else { return false };
                    let (Some(ty), Some(dist)) = (parse_i64(ty), parse_i64(dist)) else {
                        return false;
                    };
                    rules.push(BloatRule { ty: tiles::prelude::TileType(ty as u8), distance: dist });
                }
                let Some(layer) = self.current_layer() else { return false };
                layer.ops.push(CifOp::Bloat { combine, rules });
                true
            }
            ["end"] => false,
            _ => false,
        }
    }

    fn finish(&mut self) {
        for style in self.styles.values_mut() {
            if let Some(offender) = style.check_forward_only() {
                tracing::warn!(layer = %offender, "cyclic templayer reference in CIF style");
                continue;
            }
            style.reduce();
            style.status = StyleStatus::Loaded;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calma_is_an_alias_for_layer() {
        let mut c = CifClient::new();
        assert!(c.line(&["style", "lambda"]));
        assert!(c.line(&["calma", "M1", "49", "0"]));
        assert!(c.line(&["gds", "M2", "50", "0"]));
        let style = &c.styles["lambda"];
        assert_eq!(style.layer("M1").unwrap().gds, GdsLayer { layer: 49, datatype: 0 });
        assert_eq!(style.layer("M2").unwrap().gds, GdsLayer { layer: 50, datatype: 0 });
    }

    #[test]
    fn squares_g_snaps_to_grid() {
        let mut c = CifClient::new();
        c.line(&["style", "lambda"]);
        c.line(&["layer", "M1", "49", "0"]);
        assert!(c.line(&["squares_g", "1", "4", "1"]));
        let layer = c.current_layer().unwrap();
        assert!(matches!(layer.ops[0], CifOp::Squares { snap_to_grid: true, .. }));
    }

    #[test]
    fn slots_directive_is_parsed() {
        let mut c = CifClient::new();
        c.line(&["style", "lambda"]);
        c.line(&["layer", "M1", "49", "0"]);
        assert!(c.line(&["slots", "1", "2", "1", "1", "8", "1", "0"]));
        let layer = c.current_layer().unwrap();
        assert!(matches!(layer.ops[0], CifOp::Slots { long_size: 8, .. }));
    }

    #[test]
    fn variant_block_is_suspended_unless_matching() {
        let mut c = CifClient::with_variant("alpha");
        c.line(&["style", "lambda"]);
        c.line(&["layer", "M1", "49", "0"]);
        assert!(c.line(&["variant", "beta"]));
        // Suspended: this grow is silently swallowed, not applied.
        assert!(c.line(&["grow", "5"]));
        assert!(c.line(&["variant", "alpha", "beta"]));
        assert!(c.line(&["grow", "3"]));
        assert!(c.line(&["variant", "*"]));
        assert!(c.line(&["grow", "1"]));
        let layer = c.current_layer().unwrap();
        let distances: Vec<i64> = layer.ops.iter().map(|op| op.grow_radius()).collect();
        assert_eq!(distances, vec![3, 1]);
    }
}
