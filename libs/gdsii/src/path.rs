//! PATH element geometry: per-segment rectangles with end extension
//! (`spec.md` §4.4 "PATH").

use geometry::prelude::*;

/// `PATHTYPE` values this reader distinguishes (`spec.md` §6.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathType {
    /// 0: flush at the endpoint, no default extension.
    SquareFlush,
    /// 1: round caps — unsupported, treated as flush with a warning.
    Round,
    /// 2: square cap extended by half the path width.
    SquarePlus,
}

impl PathType {
    /// Decodes a `PATHTYPE` record value.
    pub fn from_code(code: i16) -> Self {
        match code {
            0 => Self::SquareFlush,
            2 => Self::SquarePlus,
            _ => Self::Round,
        }
    }

    /// The implicit end extension this path type contributes when no
    /// explicit `BGNEXTN`/`ENDEXTN` is given.
    pub fn default_extension(self, half_width: i64) -> i64 {
        match self {
            Self::SquarePlus => half_width,
            Self::SquareFlush | Self::Round => 0,
        }
    }
}

/// Builds one rectangle per centerline segment, applying `begin_extn` to
/// the very first point and `end_extn` to the very last, per `spec.md`
/// §4.4: "Centerline is read at 2× scale internally (avoids rounding),
/// with end extensions applied to first and last segments." Returns an
/// empty vector for a zero-width path after extension (`spec.md` B1).
pub fn build_rects(centerline: &[Point], width: i64, begin_extn: i64, end_extn: i64) -> Vec<Rect> {
    if width == 0 || centerline.len() < 2 {
        return Vec::new();
    }
    // Doubled internal coordinates avoid truncation when `width` is odd;
    // halved back to normal scale once each rectangle is finalized.
    let doubled: Vec<Point> = centerline.iter().map(|p| Point::new(p.x * 2, p.y * 2)).collect();
    let half_width2 = width; // width*2/2 == width, already "doubled half-width"
    let begin2 = begin_extn * 2;
    let end2 = end_extn * 2;

    let last = doubled.len() - 1;
    let mut rects = Vec::new();
    for i in 0..last {
        let mut a = doubled[i];
        let mut b = doubled[i + 1];
        if i == 0 {
            extend_endpoint(&mut a, b, begin2);
        }
        if i == last - 1 {
            extend_endpoint(&mut b, a, end2);
        }
        let rect = segment_rect(a, b, half_width2);
        rects.push(halve(rect));
    }
    rects
}

/// Moves `p` away from `towards` by `amount` along their shared axis
/// (Manhattan segments only; diagonal segments are left un-extended and
/// flagged elsewhere as non-Manhattan).
fn extend_endpoint(p: &mut Point, towards: Point, amount: i64) {
    if amount == 0 {
        return;
    }
    if p.y == towards.y {
        if p.x < towards.x {
            p.x -= amount;
        } else {
            p.x += amount;
        }
    } else if p.x == towards.x {
        if p.y < towards.y {
            p.y -= amount;
        } else {
            p.y += amount;
        }
    }
}

fn segment_rect(a: Point, b: Point, half_width: i64) -> Rect {
    if a.y == b.y {
        Rect::from_sides(a.x.min(b.x), a.y - half_width, a.x.max(b.x), a.y + half_width)
    } else if a.x == b.x {
        Rect::from_sides(a.x - half_width, a.y.min(b.y), a.x + half_width, a.y.max(b.y))
    } else {
        // Non-Manhattan segment: bounding-box fallback, flagged by the
        // caller as a non-Manhattan path.
        Rect::from_sides(
            a.x.min(b.x) - half_width,
            a.y.min(b.y) - half_width,
            a.x.max(b.x) + half_width,
            a.y.max(b.y) + half_width,
        )
    }
}

fn halve(r: Rect) -> Rect {
    Rect::from_sides(
        div_round(r.left()),
        div_round(r.bot()),
        div_round(r.right()),
        div_round(r.top()),
    )
}

fn div_round(v: i64) -> i64 {
    if v >= 0 {
        (v + 1) / 2
    } else {
        -((-v + 1) / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squareplus_extends_by_half_width_each_end() {
        let centerline = vec![Point::new(0, 0), Point::new(1000, 0)];
        let half = 40 / 2;
        let rects = build_rects(&centerline, 40, half, half);
        assert_eq!(rects, vec![Rect::from_sides(-20, -20, 1020, 20)]);
    }

    #[test]
    fn zero_width_path_produces_no_rectangles() {
        let centerline = vec![Point::new(0, 0), Point::new(1000, 0)];
        assert!(build_rects(&centerline, 0, 0, 0).is_empty());
    }

    #[test]
    fn multi_segment_path_emits_one_rect_per_segment() {
        let centerline = vec![Point::new(0, 0), Point::new(100, 0), Point::new(100, 100)];
        let rects = build_rects(&centerline, 10, 0, 0);
        assert_eq!(rects.len(), 2);
    }
}
