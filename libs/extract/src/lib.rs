//! The tile-driven resistance extractor: flood a conductor net from a seed
//! point, build a resistor graph at its junctions, contacts, devices, and
//! breakpoints, simplify it, and emit the result (`spec.md` §3, §4.5,
//! §6.3).

#![warn(missing_docs)]

pub mod emit;
pub mod error;
pub mod net;
pub mod policy;
pub mod types;

/// Commonly used names re-exported for convenience.
pub mod prelude {
    pub use crate::emit::{FastHenryNetEmitter, LineElementNetEmitter, NetEmitter, TextNetEmitter};
    pub use crate::error::ExtractError;
    pub use crate::net::{extract_net, ExtractedNet};
    pub use crate::policy::{SimplifyPolicy, TablePolicy};
    pub use crate::types::{
        Breakpoint, NodeId, NodeStatus, ResContactPoint, ResJunction, ResNode, ResResistor,
        ResTransistor, ResistorId, TransistorId,
    };
}
