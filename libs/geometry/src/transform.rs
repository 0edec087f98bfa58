//! Transformations: translation, rotation, and reflection of integer
//! geometry.
//!
//! GDS-II's `STRANS` record allows an arbitrary-angle `ANGLE`, but every
//! downstream consumer here (the tile database) is Manhattan-only, so
//! [`Transformation::apply`] rounds to the nearest integer coordinate after
//! applying the (possibly non-Manhattan) matrix. In practice almost all
//! layout uses 0/90/180/270-degree placements.

use serde::{Deserialize, Serialize};

use crate::point::Point;
use crate::wrap_angle;

/// A transformation representing translation, rotation, and reflection.
///
/// Does not support scaling: all transformation matrices are unitary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transformation {
    a: [[f64; 2]; 2],
    b: [f64; 2],
}

impl Default for Transformation {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transformation {
    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            a: [[1., 0.], [0., 1.]],
            b: [0., 0.],
        }
    }

    /// A pure translation by `(x, y)`.
    pub fn translate(x: f64, y: f64) -> Self {
        Self {
            a: [[1., 0.], [0., 1.]],
            b: [x, y],
        }
    }

    /// A counter-clockwise rotation by `angle` degrees about the origin.
    pub fn rotate(angle: f64) -> Self {
        let sin = angle.to_radians().sin();
        let cos = angle.to_radians().cos();
        Self {
            a: [[cos, -sin], [sin, cos]],
            b: [0., 0.],
        }
    }

    /// A reflection about the x-axis (mirrors y).
    ///
    /// `STRANS` bit 15 ("reflect about the X axis") is applied before
    /// rotation, matching the cascade order used by [`Self::from_strans`].
    pub fn reflect_vert() -> Self {
        Self {
            a: [[1., 0.], [0., -1.]],
            b: [0., 0.],
        }
    }

    /// Builds the transform a GDS `STRANS` + `MAG` + `ANGLE` sequence
    /// describes, per `spec.md` §4.4: mirror-about-X is applied first, then
    /// rotation by `angle` degrees. `MAG` is not modeled here (the reader
    /// applies magnification to sizes, not placement, per the spec's note
    /// that only `MAG`/`ANGLE` of `STRANS` are honored for text and that
    /// instance placement itself is not scaled).
    pub fn from_strans(mirror: bool, angle: f64) -> Self {
        let rot = Self::rotate(angle);
        if mirror {
            Self::cascade(rot, Self::reflect_vert())
        } else {
            rot
        }
    }

    /// Composes `parent` and `child`, with `child` applied first.
    pub fn cascade(parent: Transformation, child: Transformation) -> Transformation {
        let mut b = matvec(&parent.a, &child.b);
        b[0] += parent.b[0];
        b[1] += parent.b[1];
        let a = matmul(&parent.a, &child.a);
        Self { a, b }
    }

    /// Translates this transform so that its output is additionally offset
    /// by `p`.
    pub fn then_translate(self, p: Point) -> Self {
        Self::cascade(Self::translate(p.x as f64, p.y as f64), self)
    }

    /// Applies this transformation to `p`, rounding to the nearest integer
    /// coordinate.
    pub fn apply(&self, p: Point) -> Point {
        let x = p.x as f64;
        let y = p.y as f64;
        let rx = self.a[0][0] * x + self.a[0][1] * y + self.b[0];
        let ry = self.a[1][0] * x + self.a[1][1] * y + self.b[1];
        Point::new(rx.round() as i64, ry.round() as i64)
    }

    /// The translation component of this transform, rounded to the nearest
    /// integer point.
    pub fn offset_point(&self) -> Point {
        Point::new(self.b[0].round() as i64, self.b[1].round() as i64)
    }

    /// Returns the inverse of this transformation.
    pub fn inv(&self) -> Self {
        let det = self.a[0][0] * self.a[1][1] - self.a[0][1] * self.a[1][0];
        let inv_a = [
            [self.a[1][1] / det, -self.a[0][1] / det],
            [-self.a[1][0] / det, self.a[0][0] / det],
        ];
        let b = [-self.b[0], -self.b[1]];
        let b = matvec(&inv_a, &b);
        Self { a: inv_a, b }
    }

    /// Whether this transform includes a reflection (determinant < 0).
    pub fn is_reflection(&self) -> bool {
        let det = self.a[0][0] * self.a[1][1] - self.a[0][1] * self.a[1][0];
        det < 0.0
    }

    /// The counter-clockwise rotation angle, in degrees, wrapped to `[0,
    /// 360)`.
    pub fn angle(&self) -> f64 {
        let sin = self.a[1][0];
        let cos = self.a[0][0];
        let angle = cos.acos().to_degrees();
        if sin >= 0.0 {
            wrap_angle(angle)
        } else {
            wrap_angle(-angle)
        }
    }
}

fn matmul(a: &[[f64; 2]; 2], b: &[[f64; 2]; 2]) -> [[f64; 2]; 2] {
    let mut out = [[0.0; 2]; 2];
    for i in 0..2 {
        for j in 0..2 {
            out[i][j] = a[i][0] * b[0][j] + a[i][1] * b[1][j];
        }
    }
    out
}

fn matvec(a: &[[f64; 2]; 2], v: &[f64; 2]) -> [f64; 2] {
    [
        a[0][0] * v[0] + a[0][1] * v[1],
        a[1][0] * v[0] + a[1][1] * v[1],
    ]
}

/// A serializable, Manhattan-only orientation: reflection and a multiple of
/// 90 degrees. CIF styles and cell placements that are known to be
/// axis-aligned use this rather than [`Transformation`]'s free-form matrix.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ManhattanOrientation {
    /// Reflect about the x-axis before rotating.
    pub reflect_vert: bool,
    /// Rotation in quarter turns, counter-clockwise: 0, 1, 2, or 3.
    pub quarter_turns: u8,
}

impl ManhattanOrientation {
    /// The identity orientation.
    pub const IDENTITY: Self = Self {
        reflect_vert: false,
        quarter_turns: 0,
    };

    /// Builds the orientation nearest to the (possibly non-Manhattan)
    /// `STRANS` mirror/angle pair, snapping `angle` to the nearest multiple
    /// of 90 degrees.
    pub fn from_strans_snapped(mirror: bool, angle: f64) -> Self {
        let turns = ((wrap_angle(angle) / 90.0).round() as i64).rem_euclid(4) as u8;
        Self {
            reflect_vert: mirror,
            quarter_turns: turns,
        }
    }

    /// Converts to a free-form [`Transformation`].
    pub fn to_transformation(self) -> Transformation {
        let rot = Transformation::rotate(90.0 * self.quarter_turns as f64);
        if self.reflect_vert {
            Transformation::cascade(rot, Transformation::reflect_vert())
        } else {
            rot
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_noop() {
        let p = Point::new(3, 4);
        assert_eq!(Transformation::identity().apply(p), p);
    }

    #[test]
    fn rotate_90_swaps_axes() {
        let t = Transformation::rotate(90.0);
        assert_eq!(t.apply(Point::new(1, 0)), Point::new(0, 1));
    }

    #[test]
    fn mirror_then_rotate_matches_strans_order() {
        let t = Transformation::from_strans(true, 0.0);
        // mirror first: (1, 2) -> (1, -2), then rotate 0 -> unchanged
        assert_eq!(t.apply(Point::new(1, 2)), Point::new(1, -2));
    }

    #[test]
    fn inverse_round_trips() {
        let t = Transformation::cascade(Transformation::rotate(90.0), Transformation::translate(5.0, -3.0));
        let p = Point::new(11, -4);
        let back = t.inv().apply(t.apply(p));
        assert_eq!(back, p);
    }

    #[test]
    fn manhattan_orientation_snaps_near_angles() {
        let o = ManhattanOrientation::from_strans_snapped(false, 91.0);
        assert_eq!(o.quarter_turns, 1);
    }
}
