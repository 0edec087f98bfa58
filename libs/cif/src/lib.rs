//! The CIF operator engine: a layered geometric algebra over named CIF
//! layers and user tile types (`spec.md` §4.3).

#![warn(missing_docs)]

pub mod client;
pub mod eval;
pub mod layer;
pub mod op;
pub mod style;

pub use client::CifClient;
pub use eval::{evaluate, OperandSource, PRESENT};
pub use layer::{CifLayer, LayerFlags};
pub use op::{BloatCombine, BloatRule, CifOp, MaxRectKind};
pub use style::{CifStyle, GdsLayer, StyleStatus};
