//! Axis-aligned rectangles.

use serde::{Deserialize, Serialize};

use crate::dir::{Dir, Side};
use crate::point::Point;
use crate::transform::Transformation;

/// An axis-aligned rectangle, specified by lower-left and upper-right
/// corners.
///
/// This is the shape every tile in the tile-plane database takes: tiles are
/// always rectangular, never arbitrary polygons.
#[derive(
    Debug, Default, Copy, Clone, Hash, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord,
)]
pub struct Rect {
    p0: Point,
    p1: Point,
}

impl Rect {
    /// Creates a rectangle from two corner points, normalizing so that `p0`
    /// is the lower-left corner and `p1` is the upper-right corner.
    pub fn new(p0: Point, p1: Point) -> Self {
        Self {
            p0: Point::new(p0.x.min(p1.x), p0.y.min(p1.y)),
            p1: Point::new(p0.x.max(p1.x), p0.y.max(p1.y)),
        }
    }

    /// Creates a rectangle from all four sides.
    pub fn from_sides(left: i64, bot: i64, right: i64, top: i64) -> Self {
        Self::new(Point::new(left, bot), Point::new(right, top))
    }

    /// Creates a zero-area rectangle containing only `p`.
    pub fn from_point(p: Point) -> Self {
        Self { p0: p, p1: p }
    }

    /// The lower-left corner.
    pub const fn ll(&self) -> Point {
        self.p0
    }

    /// The upper-right corner.
    pub const fn ur(&self) -> Point {
        self.p1
    }

    /// The left edge's x-coordinate.
    pub const fn left(&self) -> i64 {
        self.p0.x
    }
    /// The right edge's x-coordinate.
    pub const fn right(&self) -> i64 {
        self.p1.x
    }
    /// The bottom edge's y-coordinate.
    pub const fn bot(&self) -> i64 {
        self.p0.y
    }
    /// The top edge's y-coordinate.
    pub const fn top(&self) -> i64 {
        self.p1.y
    }

    /// The coordinate of `side`.
    pub const fn side(&self, side: Side) -> i64 {
        match side {
            Side::Left => self.p0.x,
            Side::Right => self.p1.x,
            Side::Bottom => self.p0.y,
            Side::Top => self.p1.y,
        }
    }

    /// Width along `dir` (x-extent for [`Dir::Horiz`], y-extent for
    /// [`Dir::Vert`]).
    pub fn span(&self, dir: Dir) -> i64 {
        match dir {
            Dir::Horiz => self.width(),
            Dir::Vert => self.height(),
        }
    }

    /// The rectangle's width (`right - left`).
    pub const fn width(&self) -> i64 {
        self.p1.x - self.p0.x
    }

    /// The rectangle's height (`top - bot`).
    pub const fn height(&self) -> i64 {
        self.p1.y - self.p0.y
    }

    /// The rectangle's area.
    pub const fn area(&self) -> i64 {
        self.width() * self.height()
    }

    /// The rectangle's perimeter.
    pub const fn perimeter(&self) -> i64 {
        2 * (self.width() + self.height())
    }

    /// True if the rectangle has zero area.
    pub const fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// The rectangle's center, rounded down on ties.
    pub const fn center(&self) -> Point {
        Point::new(
            (self.p0.x + self.p1.x).div_euclid(2),
            (self.p0.y + self.p1.y).div_euclid(2),
        )
    }

    /// True if `p` lies within (inclusive of the boundary of) this
    /// rectangle.
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.p0.x && p.x <= self.p1.x && p.y >= self.p0.y && p.y <= self.p1.y
    }

    /// True if `other` is entirely contained within (inclusive of the
    /// boundary of) this rectangle.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        self.contains_point(other.p0) && self.contains_point(other.p1)
    }

    /// True if this rectangle and `other` overlap with nonzero area.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.bot() < other.top()
            && other.bot() < self.top()
    }

    /// True if this rectangle and `other` touch or overlap (including
    /// sharing only an edge or corner) — the relation tile-plane neighbor
    /// search uses.
    pub fn touches(&self, other: &Rect) -> bool {
        self.left() <= other.right()
            && other.left() <= self.right()
            && self.bot() <= other.top()
            && other.bot() <= self.top()
    }

    /// The intersection of this rectangle and `other`, or `None` if they
    /// don't overlap.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.left().max(other.left());
        let bot = self.bot().max(other.bot());
        let right = self.right().min(other.right());
        let top = self.top().min(other.top());
        if left < right && bot < top {
            Some(Rect::from_sides(left, bot, right, top))
        } else {
            None
        }
    }

    /// The smallest rectangle containing both `self` and `other`.
    pub fn bounding_union(&self, other: &Rect) -> Rect {
        Rect::from_sides(
            self.left().min(other.left()),
            self.bot().min(other.bot()),
            self.right().max(other.right()),
            self.top().max(other.top()),
        )
    }

    /// Grows (Minkowski-sums with a `d`-by-`d` square) this rectangle by `d`
    /// on every side. Used by the CIF `GROW`/`BLOAT-ALL` operators.
    pub fn grow(&self, d: i64) -> Rect {
        Rect::from_sides(self.left() - d, self.bot() - d, self.right() + d, self.top() + d)
    }

    /// Grows this rectangle independently on each side, clamping to zero
    /// area (never negative). Used by `BLOAT-OR`/`BLOAT-MIN`/`BLOAT-MAX`.
    pub fn grow_sides(&self, left: i64, bot: i64, right: i64, top: i64) -> Rect {
        let l = self.left() - left;
        let b = self.bot() - bot;
        let r = self.right() + right;
        let t = self.top() + top;
        Rect::from_sides(l.min(r), b.min(t), l.max(r), b.max(t))
    }

    /// Shrinks (Minkowski-erodes) this rectangle by `d` on every side; may
    /// produce a degenerate (zero- or negative-area, clamped to a point)
    /// rectangle.
    pub fn shrink(&self, d: i64) -> Rect {
        let cx = self.center().x;
        let cy = self.center().y;
        let l = (self.left() + d).min(cx);
        let b = (self.bot() + d).min(cy);
        let r = (self.right() - d).max(l);
        let t = (self.top() - d).max(b);
        Rect::from_sides(l, b, r, t)
    }

    /// Translates this rectangle by `p`.
    pub fn translate(&self, p: Point) -> Rect {
        Rect::new(self.p0 + p, self.p1 + p)
    }

    /// Applies `trans` to both corners, re-normalizing (a reflection or
    /// rotation can swap which corner is lower-left).
    pub fn transform(&self, trans: Transformation) -> Rect {
        Rect::new(trans.apply(self.p0), trans.apply(self.p1))
    }

    /// Snaps each side of the rectangle outward to the nearest multiple of
    /// `grid`, used by `SQUARES_G`/`GROW_G` and the CIF grid-limit rules.
    pub fn snap_outward(&self, grid: i64) -> Rect {
        if grid <= 1 {
            return *self;
        }
        Rect::from_sides(
            floor_to_grid(self.left(), grid),
            floor_to_grid(self.bot(), grid),
            ceil_to_grid(self.right(), grid),
            ceil_to_grid(self.top(), grid),
        )
    }
}

fn floor_to_grid(c: i64, grid: i64) -> i64 {
    c.div_euclid(grid) * grid
}

fn ceil_to_grid(c: i64, grid: i64) -> i64 {
    -floor_to_grid(-c, grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_corners() {
        let r = Rect::new(Point::new(10, 10), Point::new(0, 0));
        assert_eq!(r.ll(), Point::zero());
        assert_eq!(r.ur(), Point::new(10, 10));
    }

    #[test]
    fn touches_includes_shared_edge() {
        let a = Rect::from_sides(0, 0, 10, 10);
        let b = Rect::from_sides(10, 0, 20, 10);
        assert!(a.touches(&b));
        assert!(!a.intersects(&b));
    }

    #[test]
    fn grow_then_shrink_is_idempotent_on_area() {
        let r = Rect::from_sides(0, 0, 40, 40);
        let grown = r.grow(5).shrink(5);
        assert_eq!(grown, r);
    }

    #[test]
    fn snap_outward_extends_to_grid() {
        let r = Rect::from_sides(1, 1, 9, 9);
        assert_eq!(r.snap_outward(5), Rect::from_sides(0, 0, 10, 10));
    }

    #[test]
    fn snap_outward_negative_coords() {
        let r = Rect::from_sides(-9, -9, -1, -1);
        assert_eq!(r.snap_outward(5), Rect::from_sides(-10, -10, 0, 0));
    }
}
