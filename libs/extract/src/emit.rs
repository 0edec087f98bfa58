//! Textual output for a simplified [`ExtractedNet`] (`spec.md` §6.3), plus
//! the alternate FastHenry and line-element emission modes mentioned there
//! as optional.
//!
//! Each mode is a separate [`NetEmitter`] implementation rather than a
//! branch inside one writer, so a caller can add another output format
//! without touching the others.

use std::io::{self, Write};

use arcstr::ArcStr;

use crate::net::ExtractedNet;
use crate::types::NodeStatus;

/// Writes a simplified [`ExtractedNet`] out in some textual format.
pub trait NetEmitter {
    /// Writes `net`'s surviving nodes, resistors, and devices to `out`.
    fn emit<W: Write>(&self, net: &ExtractedNet, out: &mut W) -> io::Result<()>;
}

/// A node's display name: its own name if it has one, else a synthetic
/// `#<index>` identifier (Magic's convention for anonymous nodes).
fn display_name(idx: usize, name: &Option<ArcStr>) -> String {
    match name {
        Some(n) => n.to_string(),
        None => format!("#{idx}"),
    }
}

/// The default extended-ext/Spice-like format of `spec.md` §6.3:
/// `killnode`, `rnode`, `fet` (with gate/source/drain sub-lines), and
/// `resist` records.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNetEmitter;

impl NetEmitter for TextNetEmitter {
    fn emit<W: Write>(&self, net: &ExtractedNet, out: &mut W) -> io::Result<()> {
        for killed in &net.killed_names {
            writeln!(out, "killnode \"{killed}\"")?;
        }

        for (idx, node) in net.nodes.iter().enumerate() {
            if node.status == NodeStatus::Forwarded {
                continue;
            }
            let name = display_name(idx, &node.name);
            writeln!(
                out,
                "rnode \"{name}\" 0 0 {} {} {}",
                node.coord.x, node.coord.y, node.ty.0
            )?;
        }

        for (idx, t) in net.transistors.iter().enumerate() {
            let tname = format!("m{idx}");
            writeln!(
                out,
                "fet {tname} {} {} {} {} {} {} {}",
                t.bbox.left(),
                t.bbox.bot(),
                t.bbox.right(),
                t.bbox.top(),
                t.area,
                t.perimeter,
                t.substrate
                    .map(|n| display_name(n.0 as usize, &net.nodes[n.0 as usize].name))
                    .unwrap_or_else(|| "-".to_string()),
            )?;
            if let Some(gate) = t.gate {
                let name = display_name(gate.0 as usize, &net.nodes[gate.0 as usize].name);
                writeln!(out, "    \"{name}\" {} ", t.length * 2)?;
            }
            if let Some(source) = t.source {
                let name = display_name(source.0 as usize, &net.nodes[source.0 as usize].name);
                writeln!(out, "    \"{name}\" {} ", t.width)?;
            }
            if let Some(drain) = t.drain {
                let name = display_name(drain.0 as usize, &net.nodes[drain.0 as usize].name);
                writeln!(out, "    \"{name}\" {} ", t.width)?;
            }
        }

        for r in &net.resistors {
            if r.dead {
                continue;
            }
            let (a, b) = r.endpoints;
            let a_name = display_name(a.0 as usize, &net.nodes[a.0 as usize].name);
            let b_name = display_name(b.0 as usize, &net.nodes[b.0 as usize].name);
            writeln!(out, "resist \"{a_name}\" \"{b_name}\" {}", r.milliohms)?;
        }

        Ok(())
    }
}

/// FastHenry-compatible geometry: one `.Units um` header, a `Gsub`
/// reference-plane definition, `N` node records, and `E` segment records
/// (`spec.md` §6.3's "optional FastHenry mode").
#[derive(Debug, Clone, Copy)]
pub struct FastHenryNetEmitter {
    /// Z-height (in the declared units) every node and segment is placed
    /// at; FastHenry models a single-layer net as a flat sheet.
    pub z: i64,
}

impl Default for FastHenryNetEmitter {
    fn default() -> Self {
        Self { z: 0 }
    }
}

impl NetEmitter for FastHenryNetEmitter {
    fn emit<W: Write>(&self, net: &ExtractedNet, out: &mut W) -> io::Result<()> {
        writeln!(out, ".Units um")?;
        writeln!(out, "Gsub z={} rho=0", self.z)?;

        for (idx, node) in net.nodes.iter().enumerate() {
            if node.status == NodeStatus::Forwarded {
                continue;
            }
            let name = display_name(idx, &node.name);
            writeln!(
                out,
                "N{name} x={} y={} z={}",
                node.coord.x, node.coord.y, self.z
            )?;
        }

        for (idx, r) in net.resistors.iter().enumerate() {
            if r.dead {
                continue;
            }
            let (a, b) = r.endpoints;
            let a_name = display_name(a.0 as usize, &net.nodes[a.0 as usize].name);
            let b_name = display_name(b.0 as usize, &net.nodes[b.0 as usize].name);
            writeln!(
                out,
                "E{idx} N{a_name} N{b_name} w={} h={}",
                r.width.max(1),
                1
            )?;
        }

        Ok(())
    }
}

/// A centerline-only visualization mode: one `line x1 y1 x2 y2` per
/// surviving resistor, skipping every `killnode`/`fet` record.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineElementNetEmitter;

impl NetEmitter for LineElementNetEmitter {
    fn emit<W: Write>(&self, net: &ExtractedNet, out: &mut W) -> io::Result<()> {
        for r in &net.resistors {
            if r.dead {
                continue;
            }
            let (a, b) = r.endpoints;
            let pa = net.nodes[a.0 as usize].coord;
            let pb = net.nodes[b.0 as usize].coord;
            writeln!(out, "line {} {} {} {}", pa.x, pa.y, pb.x, pb.y)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::extract_net;
    use crate::policy::TablePolicy;
    use geometry::prelude::{Point, Rect};
    use tiles::prelude::{Plane, TileType};

    const METAL: TileType = TileType(5);

    fn sample_net() -> ExtractedNet {
        let mut plane = Plane::new();
        plane.apply(Rect::from_sides(0, 0, 10, 10), |_| METAL);
        plane.apply(Rect::from_sides(10, 0, 20, 10), |_| METAL);
        let mut policy = TablePolicy::new();
        policy.set_sheet_resistance(METAL, 50);
        extract_net(&mut plane, Point::new(5, 5), &policy).unwrap()
    }

    #[test]
    fn text_emitter_writes_one_resist_line() {
        let net = sample_net();
        let mut buf = Vec::new();
        TextNetEmitter.emit(&net, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.matches("resist ").count(), 1);
        assert!(text.contains("rnode "));
    }

    #[test]
    fn fasthenry_emitter_starts_with_units_header() {
        let net = sample_net();
        let mut buf = Vec::new();
        FastHenryNetEmitter::default().emit(&net, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with(".Units um\n"));
        assert!(text.contains("Gsub"));
    }

    #[test]
    fn line_element_emitter_has_no_rnode_records() {
        let net = sample_net();
        let mut buf = Vec::new();
        LineElementNetEmitter.emit(&net, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(!text.contains("rnode"));
        assert!(text.contains("line "));
    }
}
