//! Library- and structure-level parsing: the state machine that turns a
//! GDS-II byte stream into populated [`tiles::CellDef`]s (`spec.md` §4.4).
//!
//! Structure: `HEADER BGNLIB {...} [LIBNAME] [UNITS] {structure}* ENDLIB`,
//! each structure `BGNSTR STRNAME {element}* ENDSTR`. Records this reader
//! doesn't act on are skipped; an unrecognized element drains to its
//! `ENDEL` rather than aborting the read, and a structurally broken
//! top-level record drains to the next `ENDSTR`/`ENDLIB` (`spec.md` §7).

use std::io::Read;

use arcstr::ArcStr;
use compose::CompositionTables;
use diagnostics::{ErrorBudget, InterruptFlag, IssueSet, Message};
use geometry::prelude::*;
use tiles::prelude::{CellUse, Label, Registry, TileType};

use crate::error::GdsError;
use crate::layers::{GdsLayerSpec, LayerDirectory};
use crate::path::{self, PathType};
use crate::polygon;
use crate::reader::GdsReader;
use crate::record::{Payload, RecordKind};
use crate::rescale::{self, Scale};

/// Knobs controlling how the reader maps stream units and handles
/// malformed input (`spec.md` §4.4, §7).
pub struct ReadOptions {
    /// Caps the number of recoverable diagnostics emitted before the
    /// reader goes quiet. Zero disables the cap. Defaults to the 100 of
    /// `spec.md` §7.
    pub error_cap: usize,
    /// Host-supplied multiplier applied on top of the `UNITS` record's
    /// meters-per-database-unit value (`spec.md` E1). `1.0` unless the
    /// caller needs to land on a specific internal grid.
    pub unit_multiplier: f64,
    /// Polled between structures (`spec.md` §5, §6.4). When set, the
    /// reader stops after the last fully-parsed structure and returns a
    /// well-formed, partial [`ImportReport`] rather than an error.
    pub interrupt: Option<InterruptFlag>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            error_cap: 100,
            unit_multiplier: 1.0,
            interrupt: None,
        }
    }
}

/// Summary counters returned after a successful read.
#[derive(Debug, Default, Clone)]
pub struct ImportReport {
    /// Number of structures read.
    pub structures: usize,
    /// Number of elements painted or labeled.
    pub elements: usize,
    /// Number of recoverable diagnostics raised (some may have been
    /// suppressed past the cap).
    pub diagnostics: usize,
    /// Every recoverable diagnostic raised during the read, up to the
    /// error cap (`spec.md` §2's `diagnostics::IssueSet` contract) —
    /// unknown layer/datatype pairs, unsupported path types, discarded
    /// empty labels, and the like.
    pub issues: IssueSet<Message>,
}

/// Reads a complete GDS-II stream into `registry`, painting geometry
/// through `tables` and resolving `(layer, datatype)` pairs via `layers`.
pub fn read_library<R: Read>(
    data: R,
    registry: &mut Registry,
    layers: &LayerDirectory,
    tables: &CompositionTables,
    opts: &ReadOptions,
) -> Result<ImportReport, GdsError> {
    let mut ctx = Ctx {
        reader: GdsReader::new(data),
        registry,
        layers,
        tables,
        scale: Scale::identity(),
        budget: ErrorBudget::new(opts.error_cap),
        report: ImportReport::default(),
    };
    ctx.parse_library(opts)?;
    Ok(ctx.report)
}

struct Ctx<'a, R> {
    reader: GdsReader<R>,
    registry: &'a mut Registry,
    layers: &'a LayerDirectory,
    tables: &'a CompositionTables,
    scale: Scale,
    budget: ErrorBudget,
    report: ImportReport,
}

impl<'a, R: Read> Ctx<'a, R> {
    fn warn(&mut self, msg: impl std::fmt::Display) {
        self.report.diagnostics += 1;
        if self.budget.spend() {
            tracing::warn!(%msg, "gds import");
            self.report.issues.add(Message::warning(msg.to_string()));
        }
    }

    fn parse_library(&mut self, opts: &ReadOptions) -> Result<(), GdsError> {
        self.expect(RecordKind::Header)?;
        self.expect(RecordKind::BgnLib)?;

        loop {
            let Some((header, _)) = self.reader.peek()? else {
                return Err(GdsError::UnexpectedEof("UNITS or BGNSTR"));
            };
            match header.kind {
                RecordKind::Units => {
                    let (_, payload) = self.reader.next()?.expect("peeked");
                    if let Payload::F64(vals) = payload {
                        if vals.len() >= 2 {
                            self.scale = Scale::from_units(vals[1], opts.unit_multiplier);
                        }
                    }
                    break;
                }
                RecordKind::BgnStr => break,
                _ => {
                    self.reader.next()?;
                }
            }
        }

        loop {
            if let Some(flag) = &opts.interrupt {
                if flag.is_pending() {
                    self.warn("interrupt requested; returning partial library");
                    break;
                }
            }
            let Some((header, _)) = self.reader.peek()? else {
                return Err(GdsError::UnexpectedEof("ENDLIB"));
            };
            match header.kind {
                RecordKind::EndLib => {
                    self.reader.next()?;
                    break;
                }
                RecordKind::BgnStr => self.parse_structure()?,
                _ => self.skip_unknown_top_level()?,
            }
        }
        Ok(())
    }

    fn skip_unknown_top_level(&mut self) -> Result<(), GdsError> {
        self.warn("unrecognized top-level record; skipping to next structure boundary");
        loop {
            match self.reader.peek()? {
                None => return Ok(()),
                Some((h, _)) if h.kind == RecordKind::EndLib => return Ok(()),
                Some((h, _)) if h.kind == RecordKind::EndStr => {
                    self.reader.next()?;
                    return Ok(());
                }
                _ => {
                    self.reader.next()?;
                }
            }
        }
    }

    fn parse_structure(&mut self) -> Result<(), GdsError> {
        self.expect(RecordKind::BgnStr)?;
        let name = self.expect_str(RecordKind::StrName, "STRNAME")?;
        self.registry.new_def(name.clone());
        self.report.structures += 1;

        loop {
            let Some((header, _)) = self.reader.peek()? else {
                return Err(GdsError::UnexpectedEof("ENDSTR"));
            };
            match header.kind {
                RecordKind::EndStr => {
                    self.reader.next()?;
                    break;
                }
                RecordKind::Boundary => self.parse_boundary(&name)?,
                RecordKind::Box_ => self.parse_box(&name)?,
                RecordKind::Path => self.parse_path(&name)?,
                RecordKind::Text => self.parse_text(&name)?,
                RecordKind::Sref => self.parse_sref(&name)?,
                RecordKind::Aref => self.parse_aref(&name)?,
                _ => {
                    self.warn("unsupported element record; skipping to ENDEL");
                    self.reader.next()?;
                    self.skip_to(RecordKind::EndEl)?;
                }
            }
        }
        Ok(())
    }

    fn skip_to(&mut self, target: RecordKind) -> Result<(), GdsError> {
        loop {
            match self.reader.next()? {
                None => return Ok(()),
                Some((h, _)) if h.kind == target => return Ok(()),
                Some(_) => continue,
            }
        }
    }

    fn expect(&mut self, kind: RecordKind) -> Result<(), GdsError> {
        match self.reader.next()? {
            Some((h, _)) if h.kind == kind => Ok(()),
            Some(_) => Err(GdsError::Expected { expected: kind_name(kind) }),
            None => Err(GdsError::UnexpectedEof(kind_name(kind))),
        }
    }

    fn expect_str(&mut self, kind: RecordKind, name: &'static str) -> Result<ArcStr, GdsError> {
        match self.reader.next()? {
            Some((h, Payload::Str(s))) if h.kind == kind => Ok(s),
            Some(_) => Err(GdsError::Expected { expected: name }),
            None => Err(GdsError::UnexpectedEof(name)),
        }
    }

    fn rescale_coord(&mut self, x: i64) -> i64 {
        rescale::reconcile(&mut self.scale, x, self.registry);
        self.scale.apply_checked(x).0
    }

    fn decode_xy(&mut self, payload: &Payload) -> Vec<Point> {
        let Payload::I32(raw) = payload else { return Vec::new() };
        raw.chunks_exact(2)
            .map(|pair| {
                let x = self.rescale_coord(pair[0] as i64);
                let y = self.rescale_coord(pair[1] as i64);
                Point::new(x, y)
            })
            .collect()
    }

    fn paint_rects(&mut self, struct_name: &ArcStr, ty: TileType, rects: &[Rect]) {
        let planes: Vec<_> = self.tables.plane_mask_of(ty).iter().collect();
        if planes.is_empty() {
            self.warn(format!("type {ty} has no home plane; geometry discarded"));
            return;
        }
        let tables = self.tables;
        let Some(def) = self.registry.find_def_mut(struct_name) else { return };
        for plane in planes {
            let p = def.plane_mut(plane);
            for &rect in rects {
                p.apply(rect, |have| tables.paint(plane, have, ty));
            }
        }
    }

    fn parse_boundary(&mut self, struct_name: &ArcStr) -> Result<(), GdsError> {
        self.reader.next()?;
        let mut layer = None;
        let mut dtype = None;
        let mut pts = Vec::new();
        loop {
            let Some((header, payload)) = self.reader.next()? else {
                return Err(GdsError::UnexpectedEof("ENDEL"));
            };
            match header.kind {
                RecordKind::Layer => layer = first_i16(&payload),
                RecordKind::DataType => dtype = first_i16(&payload),
                RecordKind::Xy => pts = self.decode_xy(&payload),
                RecordKind::EndEl => break,
                _ => {}
            }
        }
        self.report.elements += 1;
        let (Some(layer), Some(dtype)) = (layer, dtype) else {
            self.warn("BOUNDARY missing LAYER/DATATYPE; discarded");
            return Ok(());
        };
        let Some(ty) = self.layers.resolve_geometry(GdsLayerSpec::new(layer, dtype)) else {
            self.warn(format!("unmapped layer/datatype ({layer},{dtype}); geometry discarded"));
            return Ok(());
        };
        if pts.len() < 4 {
            self.warn("degenerate BOUNDARY with fewer than 3 distinct vertices; discarded");
            return Ok(());
        }
        if !polygon::is_manhattan(&pts) {
            self.warn("non-Manhattan BOUNDARY approximated by trapezoidal decomposition");
        }
        let rects = polygon::decompose(&pts);
        self.paint_rects(struct_name, ty, &rects);
        Ok(())
    }

    fn parse_box(&mut self, struct_name: &ArcStr) -> Result<(), GdsError> {
        self.reader.next()?;
        let mut layer = None;
        let mut dtype = None;
        let mut pts = Vec::new();
        loop {
            let Some((header, payload)) = self.reader.next()? else {
                return Err(GdsError::UnexpectedEof("ENDEL"));
            };
            match header.kind {
                RecordKind::Layer => layer = first_i16(&payload),
                RecordKind::BoxType => dtype = first_i16(&payload),
                RecordKind::Xy => pts = self.decode_xy(&payload),
                RecordKind::EndEl => break,
                _ => {}
            }
        }
        self.report.elements += 1;
        let (Some(layer), Some(dtype)) = (layer, dtype) else {
            self.warn("BOX missing LAYER/BOXTYPE; discarded");
            return Ok(());
        };
        let Some(ty) = self.layers.resolve_geometry(GdsLayerSpec::new(layer, dtype)) else {
            self.warn(format!("unmapped layer/boxtype ({layer},{dtype}); geometry discarded"));
            return Ok(());
        };
        if pts.len() < 4 {
            self.warn("degenerate BOX; discarded");
            return Ok(());
        }
        let xs: Vec<i64> = pts.iter().map(|p| p.x).collect();
        let ys: Vec<i64> = pts.iter().map(|p| p.y).collect();
        let rect = Rect::from_sides(
            xs.iter().copied().min().unwrap(),
            ys.iter().copied().min().unwrap(),
            xs.iter().copied().max().unwrap(),
            ys.iter().copied().max().unwrap(),
        );
        self.paint_rects(struct_name, ty, &[rect]);
        Ok(())
    }

    fn parse_path(&mut self, struct_name: &ArcStr) -> Result<(), GdsError> {
        self.reader.next()?;
        let mut layer = None;
        let mut dtype = None;
        let mut width = 0i64;
        let mut path_type = PathType::SquareFlush;
        let mut begin_extn = None;
        let mut end_extn = None;
        let mut centerline = Vec::new();
        loop {
            let Some((header, payload)) = self.reader.next()? else {
                return Err(GdsError::UnexpectedEof("ENDEL"));
            };
            match header.kind {
                RecordKind::Layer => layer = first_i16(&payload),
                RecordKind::DataType => dtype = first_i16(&payload),
                RecordKind::PathType => {
                    if let Some(code) = first_i16(&payload) {
                        path_type = PathType::from_code(code);
                    }
                }
                RecordKind::Width => {
                    if let Payload::I32(v) = &payload {
                        if let Some(&w) = v.first() {
                            width = self.rescale_coord(w as i64).abs();
                        }
                    }
                }
                RecordKind::BgnExtn => {
                    if let Payload::I32(v) = &payload {
                        begin_extn = v.first().map(|&w| self.rescale_coord(w as i64));
                    }
                }
                RecordKind::EndExtn => {
                    if let Payload::I32(v) = &payload {
                        end_extn = v.first().map(|&w| self.rescale_coord(w as i64));
                    }
                }
                RecordKind::Xy => centerline = self.decode_xy(&payload),
                RecordKind::EndEl => break,
                _ => {}
            }
        }
        self.report.elements += 1;
        let (Some(layer), Some(dtype)) = (layer, dtype) else {
            self.warn("PATH missing LAYER/DATATYPE; discarded");
            return Ok(());
        };
        let Some(ty) = self.layers.resolve_geometry(GdsLayerSpec::new(layer, dtype)) else {
            self.warn(format!("unmapped layer/datatype ({layer},{dtype}); geometry discarded"));
            return Ok(());
        };
        if path_type == PathType::Round {
            self.warn("ROUND path caps unsupported; treated as flush");
        }
        let half = width / 2;
        let begin_extn = begin_extn.unwrap_or_else(|| path_type.default_extension(half));
        let end_extn = end_extn.unwrap_or_else(|| path_type.default_extension(half));
        let rects = path::build_rects(&centerline, width, begin_extn, end_extn);
        if rects.is_empty() && width != 0 {
            self.warn("PATH produced no rectangles (fewer than two centerline points)");
        }
        self.paint_rects(struct_name, ty, &rects);
        Ok(())
    }

    fn parse_text(&mut self, struct_name: &ArcStr) -> Result<(), GdsError> {
        self.reader.next()?;
        let mut layer = None;
        let mut ttype = None;
        let mut mag = 1.0f64;
        let mut angle = 0.0f64;
        let mut anchor = Side::Left;
        let mut pt = None;
        let mut text = None;
        loop {
            let Some((header, payload)) = self.reader.next()? else {
                return Err(GdsError::UnexpectedEof("ENDEL"));
            };
            match header.kind {
                RecordKind::Layer => layer = first_i16(&payload),
                RecordKind::TextType => ttype = first_i16(&payload),
                RecordKind::Presentation => {
                    if let Payload::Bits(_, b1) = payload {
                        anchor = match b1 & 0x03 {
                            0 => Side::Left,
                            2 => Side::Right,
                            _ => Side::Left,
                        };
                    }
                }
                RecordKind::Mag => {
                    if let Payload::F64(v) = &payload {
                        mag = v.first().copied().unwrap_or(1.0);
                    }
                }
                RecordKind::Angle => {
                    if let Payload::F64(v) = &payload {
                        angle = v.first().copied().unwrap_or(0.0);
                    }
                }
                RecordKind::Xy => {
                    let pts = self.decode_xy(&payload);
                    pt = pts.first().copied();
                }
                RecordKind::String_ => {
                    if let Payload::Str(s) = payload {
                        text = Some(s);
                    }
                }
                RecordKind::EndEl => break,
                _ => {}
            }
        }
        self.report.elements += 1;
        let (Some(layer), Some(ttype), Some(pt), Some(text)) = (layer, ttype, pt, text) else {
            self.warn("TEXT missing a required field; discarded");
            return Ok(());
        };
        if text.is_empty() {
            self.warn("TEXT with empty string; discarded");
            return Ok(());
        }
        let Some(ty) = self.layers.resolve_label(GdsLayerSpec::new(layer, ttype)) else {
            self.warn(format!("unmapped label layer/texttype ({layer},{ttype}); label discarded"));
            return Ok(());
        };
        // `spec.md` §4.4: "Size maps to 800 * multiplier / scaleFactor
        // database units per unit MAG," approximating the scale factor by
        // the reader's running rational scale numerator.
        let size = ((800.0 * mag) / self.scale.num.max(1) as f64).round() as i64;
        let Some(def) = self.registry.find_def_mut(struct_name) else { return Ok(()) };
        def.place_label(Label {
            rect: Rect::from_point(pt),
            anchor,
            text,
            ty,
            font: None,
            size: Some(size),
            angle,
            sticky: false,
        });
        Ok(())
    }

    /// Consumes any `STRANS`/`MAG`/`ANGLE` records at the front of an
    /// `SREF`/`AREF` body, leaving the next (non-transform) record in the
    /// lookahead slot for the caller.
    fn read_strans_mag_angle(&mut self) -> Result<(bool, f64, f64), GdsError> {
        let mut mirror = false;
        let mut mag = 1.0;
        let mut angle = 0.0;
        loop {
            let Some((header, _)) = self.reader.peek()? else {
                return Ok((mirror, mag, angle));
            };
            match header.kind {
                RecordKind::Strans => {
                    let (_, payload) = self.reader.next()?.expect("peeked");
                    if let Payload::Bits(b0, _) = payload {
                        mirror = b0 & 0x80 != 0;
                    }
                }
                RecordKind::Mag => {
                    let (_, payload) = self.reader.next()?.expect("peeked");
                    if let Payload::F64(v) = payload {
                        mag = v.first().copied().unwrap_or(1.0);
                    }
                }
                RecordKind::Angle => {
                    let (_, payload) = self.reader.next()?.expect("peeked");
                    if let Payload::F64(v) = payload {
                        angle = v.first().copied().unwrap_or(0.0);
                    }
                }
                _ => return Ok((mirror, mag, angle)),
            }
        }
    }

    fn parse_sref(&mut self, struct_name: &ArcStr) -> Result<(), GdsError> {
        self.reader.next()?;
        let (mirror, _mag, angle) = self.read_strans_mag_angle()?;
        let mut child = None;
        let mut pt = None;
        loop {
            let Some((header, payload)) = self.reader.next()? else {
                return Err(GdsError::UnexpectedEof("ENDEL"));
            };
            match header.kind {
                RecordKind::SName => {
                    if let Payload::Str(s) = payload {
                        child = Some(s);
                    }
                }
                RecordKind::Xy => {
                    let pts = self.decode_xy(&payload);
                    pt = pts.first().copied();
                }
                RecordKind::EndEl => break,
                _ => {}
            }
        }
        self.report.elements += 1;
        let (Some(child), Some(pt)) = (child, pt) else {
            self.warn("SREF missing SNAME/XY; discarded");
            return Ok(());
        };
        self.registry.new_def(child.clone());
        let transform = Transformation::from_strans(mirror, angle).then_translate(pt);
        let Some(def) = self.registry.find_def_mut(struct_name) else { return Ok(()) };
        def.place_use(CellUse { def: child, transform });
        Ok(())
    }

    fn parse_aref(&mut self, struct_name: &ArcStr) -> Result<(), GdsError> {
        self.reader.next()?;
        let (mirror, _mag, angle) = self.read_strans_mag_angle()?;
        let mut child = None;
        let mut colrow = None;
        let mut pts = Vec::new();
        loop {
            let Some((header, payload)) = self.reader.next()? else {
                return Err(GdsError::UnexpectedEof("ENDEL"));
            };
            match header.kind {
                RecordKind::SName => {
                    if let Payload::Str(s) = payload {
                        child = Some(s);
                    }
                }
                RecordKind::ColRow => {
                    if let Payload::I16(v) = &payload {
                        if v.len() >= 2 {
                            colrow = Some((v[0].max(1) as i64, v[1].max(1) as i64));
                        }
                    }
                }
                RecordKind::Xy => pts = self.decode_xy(&payload),
                RecordKind::EndEl => break,
                _ => {}
            }
        }
        self.report.elements += 1;
        let (Some(child), Some((ncols, nrows))) = (child, colrow) else {
            self.warn("AREF missing SNAME/COLROW; discarded");
            return Ok(());
        };
        if pts.len() < 3 {
            self.warn("AREF missing its three reference points; discarded");
            return Ok(());
        }
        self.registry.new_def(child.clone());
        let origin = pts[0];
        let col_vec = Point::new((pts[1].x - origin.x) / ncols, (pts[1].y - origin.y) / ncols);
        let row_vec = Point::new((pts[2].x - origin.x) / nrows, (pts[2].y - origin.y) / nrows);
        let base = Transformation::from_strans(mirror, angle);
        let Some(def) = self.registry.find_def_mut(struct_name) else { return Ok(()) };
        for row in 0..nrows {
            for col in 0..ncols {
                let at = Point::new(
                    origin.x + col_vec.x * col + row_vec.x * row,
                    origin.y + col_vec.y * col + row_vec.y * row,
                );
                def.place_use(CellUse {
                    def: child.clone(),
                    transform: base.then_translate(at),
                });
            }
        }
        Ok(())
    }
}

fn first_i16(payload: &Payload) -> Option<i16> {
    match payload {
        Payload::I16(v) => v.first().copied(),
        _ => None,
    }
}

fn kind_name(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Header => "HEADER",
        RecordKind::BgnLib => "BGNLIB",
        RecordKind::StrName => "STRNAME",
        RecordKind::BgnStr => "BGNSTR",
        _ => "a GDS record",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::encode_real8;
    use std::io::Cursor;

    fn rec(rtype: u8, dtype: u8, payload: &[u8]) -> Vec<u8> {
        let len = (4 + payload.len()) as u16;
        let mut out = Vec::new();
        out.extend_from_slice(&len.to_be_bytes());
        out.push(rtype);
        out.push(dtype);
        out.extend_from_slice(payload);
        out
    }

    fn i16s(vals: &[i16]) -> Vec<u8> {
        vals.iter().flat_map(|v| v.to_be_bytes()).collect()
    }

    fn i32s(vals: &[i32]) -> Vec<u8> {
        vals.iter().flat_map(|v| v.to_be_bytes()).collect()
    }

    fn r8s(vals: &[f64]) -> Vec<u8> {
        vals.iter().flat_map(|v| encode_real8(*v).to_be_bytes()).collect()
    }

    fn ascii(s: &str) -> Vec<u8> {
        let mut b = s.as_bytes().to_vec();
        if b.len() % 2 == 1 {
            b.push(0);
        }
        b
    }

    /// Builds a minimal one-structure, one-rectangle library: a unit-scale
    /// UNITS record and a single BOUNDARY on layer (1,0).
    fn minimal_library() -> Vec<u8> {
        let mut out = Vec::new();
        out.extend(rec(0x00, 0x02, &i16s(&[0x0600])));
        out.extend(rec(0x01, 0x02, &i16s(&[0; 12])));
        out.extend(rec(0x02, 0x06, &ascii("LIB")));
        out.extend(rec(0x03, 0x05, &r8s(&[1.0, 1e-8])));
        out.extend(rec(0x05, 0x02, &i16s(&[0; 12])));
        out.extend(rec(0x06, 0x06, &ascii("TOP")));
        out.extend(rec(0x08, 0x00, &[]));
        out.extend(rec(0x0d, 0x02, &i16s(&[1])));
        out.extend(rec(0x0e, 0x02, &i16s(&[0])));
        out.extend(rec(
            0x10,
            0x03,
            &i32s(&[0, 0, 100, 0, 100, 100, 0, 100, 0, 0]),
        ));
        out.extend(rec(0x11, 0x00, &[]));
        out.extend(rec(0x07, 0x00, &[]));
        out.extend(rec(0x04, 0x00, &[]));
        out
    }

    #[test]
    fn reads_one_structure_with_one_rectangle() {
        let mut registry = Registry::new();
        let mut layers = LayerDirectory::new();
        layers.add_geometry(GdsLayerSpec::new(1, 0), TileType(2));
        let mut tables = CompositionTables::new();
        tables.declare_type(TileType(2), tiles::prelude::PlaneMask::NONE.with(tiles::prelude::PlaneId(0)));
        tables.apply_defaults();

        let report = read_library(
            Cursor::new(minimal_library()),
            &mut registry,
            &layers,
            &tables,
            &ReadOptions::default(),
        )
        .unwrap();

        assert_eq!(report.structures, 1);
        assert_eq!(report.elements, 1);
        let def = registry.find_def("TOP").unwrap();
        assert_eq!(def.bbox(), Some(Rect::from_sides(0, 0, 100, 100)));
    }

    #[test]
    fn unmapped_layer_is_discarded_without_error() {
        let mut registry = Registry::new();
        let layers = LayerDirectory::new();
        let tables = CompositionTables::new();
        let report = read_library(
            Cursor::new(minimal_library()),
            &mut registry,
            &layers,
            &tables,
            &ReadOptions::default(),
        )
        .unwrap();
        assert_eq!(report.structures, 1);
        assert_eq!(report.diagnostics, 1);
        assert!(report.issues.has_warning());
        assert_eq!(report.issues.len(), 1);
        let def = registry.find_def("TOP").unwrap();
        assert_eq!(def.bbox(), None);
    }
}
