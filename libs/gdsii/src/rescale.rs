//! Rational rescale on read: the mid-parse scale adjustment that lets the
//! reader tolerate arbitrary-resolution input without precision loss
//! (`spec.md` §4.4, §9 "Dynamic scaling mid-parse").

use num_integer::Integer;
use tiles::prelude::Registry;

/// Above this, a rescale that would shrink precision further is rejected;
/// the reader instead rounds the offending coordinate and warns
/// (`spec.md` §4.4, §7).
pub const RESCALE_LIMIT: i64 = 1_000_000;

/// The reader's running rational scale: internal units per user (stream)
/// unit, reduced on the fly.
#[derive(Debug, Clone, Copy)]
pub struct Scale {
    /// Numerator.
    pub num: i64,
    /// Denominator.
    pub den: i64,
}

impl Scale {
    /// The identity scale, `1/1`.
    pub fn identity() -> Self {
        Self { num: 1, den: 1 }
    }

    /// Builds the initial scale from a GDS `UNITS` record: `m` is meters
    /// per database unit, `mult` is a caller-supplied multiplier
    /// (`spec.md` E1: "set `scale_num = round(m*1e8*mult)`, `scale_den=1`
    /// if >= 1, else swap and invert").
    pub fn from_units(meters_per_db_unit: f64, mult: f64) -> Self {
        let raw = (meters_per_db_unit * 1e8 * mult).round() as i64;
        if raw >= 1 {
            Self { num: raw.max(1), den: 1 }
        } else {
            // raw < 1: fall back to a denominator form. The reciprocal of
            // `m*1e8*mult` rounded to the nearest integer gives `scale_den`
            // with `scale_num = 1`, matching `spec.md`'s worked example
            // (1nm db-unit, mult=1 -> scale_num=1, scale_den=10).
            let recip = (1.0 / (meters_per_db_unit * 1e8 * mult)).round() as i64;
            Self { num: 1, den: recip.max(1) }
        }
    }

    fn reduce(&mut self) {
        if self.num == 0 {
            self.den = 1;
            return;
        }
        let g = self.num.unsigned_abs().gcd(&self.den.unsigned_abs()).max(1) as i64;
        self.num /= g;
        self.den /= g;
    }

    /// Scales `x` by `num/den`, returning `(scaled, exact)`. `exact` is
    /// false when `x*num` wasn't evenly divisible by `den` — the caller
    /// decides whether to grow the global scale or accept the rounding.
    pub fn apply_checked(&self, x: i64) -> (i64, bool) {
        let product = x * self.num;
        if product % self.den == 0 {
            (product / self.den, true)
        } else {
            (product / self.den, false)
        }
    }
}

/// Attempts to absorb a non-exact coordinate by growing the global scale,
/// per `spec.md` §4.4: "the reader computes `r = scale_den /
/// gcd(scale_den, |x*scale_num|)` and, if `scale_num*r` remains below
/// `RescaleLimit`, multiplies the global scale_num by r and rescales every
/// previously loaded plane ... by (r,1)". Returns the multiplier `r`
/// applied (1 if no rescale was needed or possible).
pub fn reconcile(scale: &mut Scale, x: i64, defs: &mut Registry) -> i64 {
    let (_, exact) = scale.apply_checked(x);
    if exact {
        return 1;
    }
    let product = (x * scale.num).unsigned_abs();
    let g = scale.den.unsigned_abs().gcd(&product).max(1);
    let r = (scale.den.unsigned_abs() / g) as i64;
    if r <= 1 || scale.num.saturating_mul(r) >= RESCALE_LIMIT {
        tracing::warn!(
            x,
            scale_num = scale.num,
            scale_den = scale.den,
            "sub-integer coordinate beyond rescale limit; rounding toward sign"
        );
        return 1;
    }
    scale.num *= r;
    scale.reduce();
    rescale_all_planes(defs, r);
    r
}

/// Multiplies every tile's rectangle on every plane of every already
/// materialized cell def by `(r, 1)`. A global rewrite, accepted as a
/// rare-event cost per `spec.md` §9.
fn rescale_all_planes(defs: &mut Registry, r: i64) {
    // The `Registry`/`CellDef`/`Plane` API in this workspace builds planes
    // by repainting rectangles rather than exposing raw tile mutation, so
    // the rescale is performed by recoloring every existing tile's
    // rectangle by `(r,1)` in place in a fresh plane and swapping it in.
    for def in defs.iter_mut() {
        def.rescale_planes(r);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units_example_e1_matches_spec() {
        // UNITS(1e-3, 1e-9): db-unit is 1nm. 1e-9 * 1e8 * 1 = 0.1 < 1, so
        // swap: scale_num=1, scale_den=10.
        let s = Scale::from_units(1e-9, 1.0);
        assert_eq!((s.num, s.den), (1, 10));
    }

    #[test]
    fn apply_checked_flags_inexact_division() {
        let s = Scale { num: 1, den: 3 };
        let (_, exact) = s.apply_checked(7);
        assert!(!exact);
        let (v, exact) = s.apply_checked(9);
        assert_eq!(v, 3);
        assert!(exact);
    }
}
