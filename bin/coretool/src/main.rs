//! `coretool`: a thin batch CLI wiring the technology-file loader, CIF
//! operator engine, GDS-II reader, and resistance extractor together.
//!
//! This binary owns no engine logic of its own — it parses arguments,
//! installs a `tracing` subscriber, and drives the library crates'
//! public APIs in the order `spec.md` §2's data-flow diagram describes:
//! the loader configures the composition/CIF tables, the GDS reader
//! paints a cell's planes through them, and the extractor reads those
//! planes back out. Interactive command dispatch and a TUI are
//! deliberately not here (`spec.md` §1 lists them as out of scope).

mod cifrun;
mod layermap;

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use arcstr::ArcStr;
use cif::CifStyle;
use clap::{Parser, Subcommand};
use compose::{ComposeClient, CompositionTables, NameResolver};
use diagnostics::InterruptFlag;
use extract::prelude::{extract_net, FastHenryNetEmitter, LineElementNetEmitter, NetEmitter, TablePolicy, TextNetEmitter};
use gdsii::{read_library, ImportReport, LayerDirectory, ReadOptions};
use indexmap::IndexMap;
use techfile::{Args, SectionClient, SectionMask, TechLoader};
use tiles::prelude::Registry;

#[derive(Parser)]
#[command(
    name = "coretool",
    version,
    about,
    long_about = "Batch driver for the technology-file, CIF, GDS-II, and resistance-extraction engines"
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Suppress all but warning-and-above log output.
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Loads a technology file's `cif` and `compose` sections and reports
    /// what was registered.
    Tech {
        /// Path to the `.tech` file.
        path: PathBuf,
    },
    /// Imports a GDS-II stream into a fresh registry using a manual
    /// `(layer, datatype) -> type` map, and reports what was read.
    Gds {
        /// Path to the GDS-II stream file.
        gds: PathBuf,
        /// Path to the layer-map file (`<layer> <datatype> <type>` per line).
        #[arg(long)]
        layer_map: PathBuf,
        /// Caps recoverable diagnostics before the reader goes quiet.
        #[arg(long, default_value_t = 100)]
        error_cap: usize,
    },
    /// Imports a GDS-II stream, then extracts the net reachable from a
    /// point on one structure's plane and prints the simplified resistor
    /// graph.
    Extract {
        /// Path to the GDS-II stream file.
        gds: PathBuf,
        /// Path to the layer-map file (`<layer> <datatype> <type>` per line).
        #[arg(long)]
        layer_map: PathBuf,
        /// Path to the sheet-resistance table (`<type> <milliohms>` per line).
        #[arg(long)]
        sheet_resistance: PathBuf,
        /// The structure to extract from.
        #[arg(long)]
        structure: String,
        /// Which plane (index) to flood-walk.
        #[arg(long, default_value_t = 0)]
        plane: u8,
        /// Seed point, as `<x>,<y>`.
        #[arg(long)]
        start: String,
        /// Output format.
        #[arg(long, value_enum, default_value_t = EmitFormat::Text)]
        format: EmitFormat,
    },
    /// Runs one CIF style's layers over a directory of named operand
    /// planes and reports each output layer's tile count.
    Cif {
        /// Path to the `.tech` file declaring the style.
        path: PathBuf,
        /// The style to run (as named by `cifoutput style <name>`).
        style: String,
        /// Directory of `<name>.rects` files seeding the initial operand
        /// planes.
        #[arg(long)]
        planes: PathBuf,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum EmitFormat {
    Text,
    Fasthenry,
    Line,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let filter = if args.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();

    match args.command {
        Command::Tech { path } => run_tech(&path),
        Command::Gds { gds, layer_map, error_cap } => run_gds(&gds, &layer_map, error_cap).map(|_| ()),
        Command::Extract {
            gds,
            layer_map,
            sheet_resistance,
            structure,
            plane,
            start,
            format,
        } => run_extract(&gds, &layer_map, &sheet_resistance, &structure, plane, &start, format),
        Command::Cif { path, style, planes } => run_cif(&path, &style, &planes),
    }
}

/// Registers the `cif` and `compose` tech-file sections and loads `path`,
/// returning every style parsed.
fn load_cif_styles(path: &PathBuf) -> anyhow::Result<IndexMap<ArcStr, CifStyle>> {
    let tables = Rc::new(RefCell::new(CompositionTables::new()));
    let names = Rc::new(RefCell::new(NameResolver {
        types: Default::default(),
        planes: Default::default(),
    }));
    let mut loader = TechLoader::new();
    loader.add_client(
        "compose",
        Box::new(ComposeClient::new(tables.clone(), names)),
        SectionMask::NONE,
        true,
    )?;
    let cif_client = Rc::new(RefCell::new(cif::CifClient::new()));
    struct CifProxy(Rc<RefCell<cif::CifClient>>);
    impl SectionClient for CifProxy {
        fn line(&mut self, args: Args<'_>) -> bool {
            self.0.borrow_mut().line(args)
        }
        fn finish(&mut self) {
            self.0.borrow_mut().finish();
        }
    }
    loader.add_client("cif", Box::new(CifProxy(cif_client.clone())), SectionMask::NONE, true)?;

    loader.load(Some(path), SectionMask::NONE)?;
    drop(loader);

    let cif_client = Rc::try_unwrap(cif_client)
        .unwrap_or_else(|_| panic!("cif client still shared after loader is dropped"))
        .into_inner();
    Ok(cif_client.into_styles())
}

/// Loads `path`'s styles and reports how many were found, and each one's
/// layer count and scale.
fn run_tech(path: &PathBuf) -> anyhow::Result<()> {
    let styles = load_cif_styles(path)?;
    println!("loaded {} CIF style(s)", styles.len());
    for (name, style) in &styles {
        println!("  {name}: {} layer(s), scale {}/{}", style.layers.len(), style.scale_num, style.expander);
    }
    Ok(())
}

/// Runs `style`'s layers (from `path`) over the operand planes seeded from
/// `planes_dir`, printing each resulting layer's tile count.
fn run_cif(path: &PathBuf, style: &str, planes_dir: &PathBuf) -> anyhow::Result<()> {
    let styles = load_cif_styles(path)?;
    let style = styles
        .get(style)
        .ok_or_else(|| anyhow::anyhow!("no style named `{style}` in {}", path.display()))?;

    let planes = layermap::read_named_planes(planes_dir)?;
    let labels = HashMap::new();
    let result = cifrun::run_style(style, planes, &labels, None);

    println!("ran style `{}`: {} output layer(s)", style.name, style.layers.len());
    for layer in &style.layers {
        if let Some(plane) = result.get(layer.name.as_str()) {
            let tiles = plane.tiles().count();
            println!("  {}: {tiles} tile(s)", layer.name);
        }
    }
    Ok(())
}

/// Imports `gds` into a fresh [`Registry`], painting through a fresh
/// (empty) composition table, and returns the populated registry plus
/// import report for commands that need the geometry afterward.
fn run_gds(gds: &PathBuf, layer_map: &PathBuf, error_cap: usize) -> anyhow::Result<(Registry, ImportReport)> {
    let map = layermap::read_gds_layer_map(layer_map)?;
    let mut directory = LayerDirectory::new();
    for (spec, ty) in &map {
        directory.add_geometry(*spec, *ty);
    }

    let tables = CompositionTables::new();
    let mut registry = Registry::new();
    let file = std::fs::File::open(gds)?;
    let opts = gds_options(error_cap);
    let report = read_library(file, &mut registry, &directory, &tables, &opts)?;

    println!(
        "imported {} structure(s), {} element(s), {} diagnostic(s)",
        report.structures, report.elements, report.diagnostics
    );
    for def in registry.iter() {
        let bbox = def.bbox();
        println!("  {}: bbox {bbox:?}", def.name);
    }
    Ok((registry, report))
}

fn run_extract(
    gds: &PathBuf,
    layer_map: &PathBuf,
    sheet_resistance: &PathBuf,
    structure: &str,
    plane_idx: u8,
    start: &str,
    format: EmitFormat,
) -> anyhow::Result<()> {
    let (mut registry, _report) = run_gds(gds, layer_map, 100)?;
    let sheet = layermap::read_sheet_resistance_map(sheet_resistance)?;
    let start = layermap::parse_point(start)?;

    let mut policy = TablePolicy::new();
    for (ty, milliohms) in &sheet {
        policy.set_sheet_resistance(*ty, *milliohms);
    }

    let def = registry
        .find_def_mut(structure)
        .ok_or_else(|| anyhow::anyhow!("no structure named `{structure}`"))?;
    let labels = def.labels.clone();
    let plane = def.plane_mut(tiles::prelude::PlaneId(plane_idx));

    let net = extract_net(plane, start, &labels, &policy)?;
    println!(
        "extracted net: {} node(s), {} resistor(s) ({} dead), {} transistor(s)",
        net.nodes.len(),
        net.resistors.len(),
        net.resistors.iter().filter(|r| r.dead).count(),
        net.transistors.len(),
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        EmitFormat::Text => TextNetEmitter.emit(&net, &mut out)?,
        EmitFormat::Fasthenry => FastHenryNetEmitter::default().emit(&net, &mut out)?,
        EmitFormat::Line => LineElementNetEmitter.emit(&net, &mut out)?,
    }
    Ok(())
}

/// Applies a caller-supplied cap to `opts`'s GDS import reader, returning
/// the same options with a fresh, never-triggered interrupt handle.
/// `coretool` has no signal handler of its own to wire one up to
/// (out of scope per `spec.md` §1); hosts embedding these crates are
/// expected to hold onto an [`InterruptFlag`] and call
/// `request_interrupt` from their own handler.
fn gds_options(error_cap: usize) -> ReadOptions {
    ReadOptions { error_cap, interrupt: Some(InterruptFlag::new()), ..Default::default() }
}
