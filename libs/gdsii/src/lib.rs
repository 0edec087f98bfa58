//! GDS-II stream reader: decodes a binary GDS-II library into the
//! workspace's tile-plane [`tiles::CellDef`]s, applying the layer
//! cross-reference and composition tables exactly as a techfile-driven
//! paint from any other source would (`spec.md` §2 "E. GDS-II Reader",
//! §4.4).
//!
//! This crate only reads. Writing GDS is out of scope (`spec.md` §4.4
//! Non-goals).

#![warn(missing_docs)]

pub mod error;
pub mod layers;
pub mod parser;
pub mod path;
pub mod polygon;
pub mod record;
pub mod rescale;
pub mod reader;

pub use error::GdsError;
pub use layers::{GdsLayerSpec, LayerDirectory};
pub use parser::{read_library, ImportReport, ReadOptions};
