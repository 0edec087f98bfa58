//! The bounding-box trait implemented by every shape that can contribute to
//! a cell's or plane's overall extent.

use crate::rect::Rect;

/// A type that has (or can compute) an axis-aligned bounding box.
pub trait Bbox {
    /// Returns the bounding box, or `None` if this value is empty (e.g. an
    /// empty collection of shapes).
    fn bbox(&self) -> Option<Rect>;
}

impl Bbox for Rect {
    fn bbox(&self) -> Option<Rect> {
        Some(*self)
    }
}

impl<T: Bbox> Bbox for [T] {
    fn bbox(&self) -> Option<Rect> {
        self.iter().fold(None, |acc, item| match (acc, item.bbox()) {
            (None, b) => b,
            (a, None) => a,
            (Some(a), Some(b)) => Some(a.bounding_union(&b)),
        })
    }
}

impl<T: Bbox> Bbox for Vec<T> {
    fn bbox(&self) -> Option<Rect> {
        self.as_slice().bbox()
    }
}
