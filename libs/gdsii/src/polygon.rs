//! Polygon rectangle decomposition: the fast axis-aligned path, and the
//! scanline trapezoidal fallback for non-Manhattan input (`spec.md` §4.4
//! "BOUNDARY", §7 "Non-Manhattan polygon ... Convert to rectangles via
//! trapezoidal decomposition (lossy at half-grid; log)").

use geometry::prelude::*;

/// True if every edge of the (closed, first==last) polygon `pts` is
/// axis-aligned.
pub fn is_manhattan(pts: &[Point]) -> bool {
    pts.windows(2).all(|w| w[0].x == w[1].x || w[0].y == w[1].y)
}

/// `spec.md` B3: a five-point polygon whose first and last points
/// coincide and which is axis-aligned is treated identically to a BOX.
pub fn is_simple_rect(pts: &[Point]) -> Option<Rect> {
    if pts.len() != 5 || pts.first() != pts.last() {
        return None;
    }
    if !is_manhattan(pts) {
        return None;
    }
    let xs: Vec<i64> = pts.iter().map(|p| p.x).collect();
    let ys: Vec<i64> = pts.iter().map(|p| p.y).collect();
    let (min_x, max_x) = (xs.iter().copied().min()?, xs.iter().copied().max()?);
    let (min_y, max_y) = (ys.iter().copied().min()?, ys.iter().copied().max()?);
    Some(Rect::from_sides(min_x, min_y, max_x, max_y))
}

/// Decomposes a (possibly rectilinear, possibly non-Manhattan) closed
/// polygon into a set of rectangles whose union approximates its area.
///
/// Rectilinear polygons decompose exactly (up to overlapping coverage of
/// the underlying tile-plane paint, which a union of the returned
/// rectangles reproduces faithfully). A polygon with diagonal edges is
/// sliced into scanline bands at every distinct vertex `y`; within each
/// band, each edge crossing it contributes a single representative
/// `x`-intercept (its value at the band's vertical midpoint) rather than
/// following the diagonal exactly, which is the "lossy at half-grid"
/// approximation `spec.md` §7 calls for.
pub fn decompose(pts: &[Point]) -> Vec<Rect> {
    if let Some(r) = is_simple_rect(pts) {
        return vec![r];
    }
    let verts: Vec<Point> = if pts.first() == pts.last() && pts.len() > 1 {
        pts[..pts.len() - 1].to_vec()
    } else {
        pts.to_vec()
    };
    if verts.len() < 3 {
        return Vec::new();
    }

    let mut ys: Vec<i64> = verts.iter().map(|p| p.y).collect();
    ys.sort_unstable();
    ys.dedup();

    let n = verts.len();
    let edges: Vec<(Point, Point)> = (0..n).map(|i| (verts[i], verts[(i + 1) % n])).collect();

    let mut rects = Vec::new();
    for band in ys.windows(2) {
        let (y_lo, y_hi) = (band[0], band[1]);
        if y_lo == y_hi {
            continue;
        }
        let mid_num = y_lo + y_hi; // "midpoint * 2", kept as integer math
        let mut xs: Vec<i64> = Vec::new();
        for &(a, b) in &edges {
            let (lo_y, hi_y) = (a.y.min(b.y), a.y.max(b.y));
            if lo_y > y_lo || hi_y < y_hi {
                continue;
            }
            if a.y == b.y {
                continue; // horizontal edges don't bound a vertical band
            }
            // x at the doubled midpoint y, via linear interpolation,
            // rounding toward the nearest integer (half-grid lossy step).
            let dy = b.y - a.y;
            let dx = b.x - a.x;
            let x_mid2 = a.x * 2 * dy + dx * (mid_num - 2 * a.y);
            let x = (x_mid2 as f64 / (2.0 * dy as f64)).round() as i64;
            xs.push(x);
        }
        xs.sort_unstable();
        for pair in xs.chunks_exact(2) {
            let (x0, x1) = (pair[0], pair[1]);
            if x0 != x1 {
                rects.push(Rect::from_sides(x0, y_lo, x1, y_hi));
            }
        }
    }
    rects
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_point_rect_matches_box_semantics() {
        let pts = vec![
            Point::new(0, 0),
            Point::new(100, 0),
            Point::new(100, 200),
            Point::new(0, 200),
            Point::new(0, 0),
        ];
        assert_eq!(is_simple_rect(&pts), Some(Rect::from_sides(0, 0, 100, 200)));
        assert_eq!(decompose(&pts), vec![Rect::from_sides(0, 0, 100, 200)]);
    }

    #[test]
    fn rectilinear_l_shape_decomposes_without_loss() {
        // An L-shape: a 20x10 block plus a 10x20 block sharing one edge.
        let pts = vec![
            Point::new(0, 0),
            Point::new(20, 0),
            Point::new(20, 10),
            Point::new(10, 10),
            Point::new(10, 30),
            Point::new(0, 30),
            Point::new(0, 0),
        ];
        let rects = decompose(&pts);
        let area: i64 = rects.iter().map(|r| r.area()).sum();
        assert_eq!(area, 20 * 10 + 10 * 20);
    }

    #[test]
    fn diagonal_triangle_is_non_manhattan() {
        let pts = vec![Point::new(0, 0), Point::new(100, 0), Point::new(50, 100), Point::new(0, 0)];
        assert!(!is_manhattan(&pts));
        let rects = decompose(&pts);
        assert!(!rects.is_empty());
    }
}
