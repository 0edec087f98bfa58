//! Small manual text formats `coretool` reads directly, standing in for
//! the `types`/`planes` tech-file sections this workspace doesn't
//! implement (`libs/compose`'s `NameResolver` doc comment notes a separate
//! section is expected to populate type/plane names; `coretool` is not
//! that section, so it reads a flat mapping file instead).

use std::collections::HashMap;
use std::path::Path;

use gdsii::GdsLayerSpec;
use geometry::prelude::Rect;
use tiles::prelude::{Plane, TileType};

/// Reads a GDS `(layer, datatype) -> internal type` map: one
/// `<layer> <datatype> <type>` triple per line, blank lines and `#`
/// comments ignored.
pub fn read_gds_layer_map(path: &Path) -> anyhow::Result<HashMap<GdsLayerSpec, TileType>> {
    let text = std::fs::read_to_string(path)?;
    let mut map = HashMap::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [layer, datatype, ty] = fields[..] else {
            anyhow::bail!("{}:{}: expected `<layer> <datatype> <type>`", path.display(), lineno + 1);
        };
        map.insert(
            GdsLayerSpec::new(layer.parse()?, datatype.parse()?),
            TileType(ty.parse()?),
        );
    }
    Ok(map)
}

/// Reads a sheet-resistance table: one `<type> <milliohms_per_square>`
/// pair per line.
pub fn read_sheet_resistance_map(path: &Path) -> anyhow::Result<HashMap<TileType, i64>> {
    let text = std::fs::read_to_string(path)?;
    let mut map = HashMap::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [ty, milliohms] = fields[..] else {
            anyhow::bail!("{}:{}: expected `<type> <milliohms_per_square>`", path.display(), lineno + 1);
        };
        map.insert(TileType(ty.parse()?), milliohms.parse()?);
    }
    Ok(map)
}

/// Reads one named operand plane per `<name>.rects` file in `dir`, each
/// line a painted `<llx> <lly> <urx> <ury> <type>` rectangle applied in
/// file order. Stands in for the named mask-layer planes a `layer`
/// directive's GDS cross-reference would otherwise have painted.
pub fn read_named_planes(dir: &Path) -> anyhow::Result<HashMap<String, Plane>> {
    let mut planes = HashMap::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("rects") {
            continue;
        }
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| anyhow::anyhow!("{}: not a valid plane file name", path.display()))?
            .to_string();
        let text = std::fs::read_to_string(&path)?;
        let mut plane = Plane::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            let [llx, lly, urx, ury, ty] = fields[..] else {
                anyhow::bail!(
                    "{}:{}: expected `<llx> <lly> <urx> <ury> <type>`",
                    path.display(),
                    lineno + 1
                );
            };
            let rect = Rect::new(
                geometry::prelude::Point::new(llx.parse()?, lly.parse()?),
                geometry::prelude::Point::new(urx.parse()?, ury.parse()?),
            );
            let ty = TileType(ty.parse()?);
            plane.apply(rect, |_| ty);
        }
        planes.insert(name, plane);
    }
    Ok(planes)
}

/// Parses a `<x>,<y>` coordinate pair as given on the command line.
pub fn parse_point(s: &str) -> anyhow::Result<geometry::prelude::Point> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| anyhow::anyhow!("expected `<x>,<y>`, got `{s}`"))?;
    Ok(geometry::prelude::Point::new(x.trim().parse()?, y.trim().parse()?))
}
