// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D contour predicates used to validate face boundaries.
//!
//! A contour is an implicitly closed list of points (the last point connects
//! back to the first).

use nalgebra::Point2;

/// Epsilon for floating point comparisons in 2D operations
const EPSILON_2D: f64 = 1e-9;

/// Minimum area threshold - polygons smaller than this are considered degenerate
const MIN_AREA_THRESHOLD: f64 = 1e-10;

/// Check if a contour is valid (has area, not degenerate)
pub fn is_valid_contour(contour: &[Point2<f64>]) -> bool {
    if contour.len() < 3 {
        return false;
    }

    signed_area(contour).abs() > MIN_AREA_THRESHOLD
}

/// Compute the signed area of a 2D contour
/// Positive = counter-clockwise, Negative = clockwise
pub fn signed_area(contour: &[Point2<f64>]) -> f64 {
    if contour.len() < 3 {
        return 0.0;
    }

    let n = contour.len();
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += contour[i].x * contour[j].y - contour[j].x * contour[i].y;
    }

    area * 0.5
}

/// Returns `true` for counter-clockwise winding.
#[inline]
pub fn is_ccw(contour: &[Point2<f64>]) -> bool {
    signed_area(contour) > 0.0
}

/// Ensure contour has counter-clockwise winding (positive area)
pub fn ensure_ccw(contour: &[Point2<f64>]) -> Vec<Point2<f64>> {
    if signed_area(contour) < 0.0 {
        contour.iter().rev().cloned().collect()
    } else {
        contour.to_vec()
    }
}

/// Ensure contour has clockwise winding (for holes)
pub fn ensure_cw(contour: &[Point2<f64>]) -> Vec<Point2<f64>> {
    if signed_area(contour) > 0.0 {
        contour.iter().rev().cloned().collect()
    } else {
        contour.to_vec()
    }
}

/// Check if a point is inside a contour using ray casting
pub fn point_in_contour(point: &Point2<f64>, contour: &[Point2<f64>]) -> bool {
    if contour.len() < 3 {
        return false;
    }

    let mut inside = false;
    let n = contour.len();

    let mut j = n - 1;
    for i in 0..n {
        let pi = &contour[i];
        let pj = &contour[j];

        if ((pi.y > point.y) != (pj.y > point.y))
            && (point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x)
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Check if contour `inner` lies completely inside contour `outer`.
///
/// Every vertex of `inner` must be inside `outer` and no edges may cross.
pub fn contour_inside_contour(inner: &[Point2<f64>], outer: &[Point2<f64>]) -> bool {
    inner.iter().all(|p| point_in_contour(p, outer)) && !contours_cross(inner, outer)
}

/// Returns `true` if any edge of `a` properly intersects any edge of `b`.
pub fn contours_cross(a: &[Point2<f64>], b: &[Point2<f64>]) -> bool {
    let (Some((a_min, a_max)), Some((b_min, b_max))) = (contour_bounds(a), contour_bounds(b)) else {
        return false;
    };
    if !bounds_overlap(&a_min, &a_max, &b_min, &b_max) {
        return false;
    }

    let na = a.len();
    let nb = b.len();
    for i in 0..na {
        let (p1, p2) = (&a[i], &a[(i + 1) % na]);
        for j in 0..nb {
            let (q1, q2) = (&b[j], &b[(j + 1) % nb]);
            if segments_intersect(p1, p2, q1, q2) {
                return true;
            }
        }
    }
    false
}

/// Returns `true` if the contours overlap: an edge crossing, or one contour
/// nested in the other.
pub fn contours_overlap(a: &[Point2<f64>], b: &[Point2<f64>]) -> bool {
    if contours_cross(a, b) {
        return true;
    }
    a.first().is_some_and(|p| point_in_contour(p, b))
        || b.first().is_some_and(|p| point_in_contour(p, a))
}

/// Proper or collinear-overlapping intersection test for segments `p1p2`
/// and `q1q2`. Segments that only touch at an end point do not intersect.
pub fn segments_intersect(
    p1: &Point2<f64>,
    p2: &Point2<f64>,
    q1: &Point2<f64>,
    q2: &Point2<f64>,
) -> bool {
    let d1 = orient(q1, q2, p1);
    let d2 = orient(q1, q2, p2);
    let d3 = orient(p1, p2, q1);
    let d4 = orient(p1, p2, q2);

    if ((d1 > EPSILON_2D && d2 < -EPSILON_2D) || (d1 < -EPSILON_2D && d2 > EPSILON_2D))
        && ((d3 > EPSILON_2D && d4 < -EPSILON_2D) || (d3 < -EPSILON_2D && d4 > EPSILON_2D))
    {
        return true;
    }

    // Collinear overlap of positive length
    if d1.abs() <= EPSILON_2D && d2.abs() <= EPSILON_2D {
        let dir = p2 - p1;
        let len_sq = dir.norm_squared();
        if len_sq <= EPSILON_2D {
            return false;
        }
        let t1 = (q1 - p1).dot(&dir) / len_sq;
        let t2 = (q2 - p1).dot(&dir) / len_sq;
        let (lo, hi) = if t1 < t2 { (t1, t2) } else { (t2, t1) };
        return hi.min(1.0) - lo.max(0.0) > EPSILON_2D;
    }

    false
}

#[inline]
fn orient(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Compute bounding box of a contour
pub fn contour_bounds(contour: &[Point2<f64>]) -> Option<(Point2<f64>, Point2<f64>)> {
    let first = contour.first()?;
    let mut min = *first;
    let mut max = *first;

    for p in contour.iter().skip(1) {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }

    Some((min, max))
}

/// Check if two bounding boxes overlap
pub fn bounds_overlap(
    a_min: &Point2<f64>,
    a_max: &Point2<f64>,
    b_min: &Point2<f64>,
    b_max: &Point2<f64>,
) -> bool {
    a_min.x <= b_max.x && a_max.x >= b_min.x && a_min.y <= b_max.y && a_max.y >= b_min.y
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(min: f64, max: f64) -> Vec<Point2<f64>> {
        vec![
            Point2::new(min, min),
            Point2::new(max, min),
            Point2::new(max, max),
            Point2::new(min, max),
        ]
    }

    #[test]
    fn signed_area_follows_winding() {
        let ccw = square(0.0, 1.0);
        assert!((signed_area(&ccw) - 1.0).abs() < EPSILON_2D);

        let cw = ensure_cw(&ccw);
        assert!((signed_area(&cw) + 1.0).abs() < EPSILON_2D);
        assert!(is_ccw(&ensure_ccw(&cw)));
    }

    #[test]
    fn degenerate_contours() {
        assert!(is_valid_contour(&square(0.0, 1.0)));
        let collinear = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
        ];
        assert!(!is_valid_contour(&collinear));
        assert!(!is_valid_contour(&collinear[..2]));
    }

    #[test]
    fn point_inside() {
        let contour = square(0.0, 10.0);
        assert!(point_in_contour(&Point2::new(5.0, 5.0), &contour));
        assert!(!point_in_contour(&Point2::new(15.0, 5.0), &contour));
        assert!(!point_in_contour(&Point2::new(-1.0, 5.0), &contour));
    }

    #[test]
    fn nested_and_crossing() {
        let outer = square(0.0, 10.0);
        let inner = square(2.0, 4.0);
        let straddling = square(8.0, 12.0);

        assert!(contour_inside_contour(&inner, &outer));
        assert!(!contour_inside_contour(&straddling, &outer));
        assert!(contours_cross(&straddling, &outer));
        assert!(!contours_cross(&inner, &outer));
        assert!(contours_overlap(&inner, &outer));
        assert!(!contours_overlap(&inner, &square(5.0, 6.0)));
    }

    #[test]
    fn touching_segments_do_not_intersect() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        let c = Point2::new(1.0, 1.0);
        assert!(!segments_intersect(&a, &b, &b, &c));
        assert!(segments_intersect(
            &a,
            &c,
            &Point2::new(0.0, 1.0),
            &Point2::new(1.0, 0.0)
        ));
    }

    #[test]
    fn collinear_overlap_intersects() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(2.0, 0.0);
        assert!(segments_intersect(
            &a,
            &b,
            &Point2::new(1.0, 0.0),
            &Point2::new(3.0, 0.0)
        ));
        assert!(!segments_intersect(
            &a,
            &b,
            &Point2::new(2.0, 0.0),
            &Point2::new(3.0, 0.0)
        ));
    }

    #[test]
    fn bounds() {
        let (min, max) = contour_bounds(&square(-1.0, 3.0)).unwrap();
        assert_eq!(min, Point2::new(-1.0, -1.0));
        assert_eq!(max, Point2::new(3.0, 3.0));
        assert!(contour_bounds(&[]).is_none());
    }
}
