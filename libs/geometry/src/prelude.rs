//! Common re-exports.

pub use crate::bbox::Bbox;
pub use crate::dir::{Dir, Side};
pub use crate::point::Point;
pub use crate::rect::Rect;
pub use crate::transform::{ManhattanOrientation, Transformation};
