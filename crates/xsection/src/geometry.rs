//! Core geometry types for xsection.
//!
//! ## Rust Lesson #3: Structs & Derives
//!
//! The `#[derive(...)]` macro auto-generates common functionality:
//! - `Debug` = lets you print with `{:?}`
//! - `Clone` / `Copy` = duplicate the value (Copy only for small stack values)
//! - `PartialEq` = compare with `==`
//! - `Serialize` / `Deserialize` = serde glue so consumers can dump geometry
//!
//! Every operation here returns a NEW value. Nothing mutates a point or
//! polygon in place, which is what lets a solved section be shared freely.

use serde::{Deserialize, Serialize};

/// A 2D point in meters. `x` runs across the section, `y` is elevation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A closed polygon with an outer ring and optional holes.
///
/// The ring is stored open (the last vertex is NOT a repeat of the first);
/// closure is implied. Outer rings produced by the assembler wind
/// counter-clockwise in a y-up frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    /// Outer boundary vertices (counter-clockwise)
    pub outer: Vec<Point>,
    /// Interior holes (clockwise winding)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub holes: Vec<Vec<Point>>,
}

// ============================================================================
// IMPLEMENTATIONS (methods)
// ============================================================================

impl Point {
    /// Create a new point.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// A new point shifted by `(dx, dy)`.
    #[inline]
    pub fn offset(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    /// Distance to another point.
    ///
    /// `other: Point` takes the point by value, but Point is `Copy`, so the
    /// caller keeps theirs.
    #[inline]
    pub fn distance(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// True when both points are within `tolerance` of each other.
    ///
    /// NaN coordinates never compare close.
    #[inline]
    pub fn is_close(&self, other: Point, tolerance: f64) -> bool {
        self.distance(other) <= tolerance
    }
}

impl Polygon {
    /// Create a simple polygon with no holes.
    pub fn new(outer: Vec<Point>) -> Self {
        Self { outer, holes: Vec::new() }
    }

    /// Create a polygon with holes.
    pub fn with_holes(outer: Vec<Point>, holes: Vec<Vec<Point>>) -> Self {
        Self { outer, holes }
    }

    /// Build a ring from a vertex walk, dropping consecutive duplicates.
    ///
    /// Component generators close their outline against a datum; when the
    /// surface touches the datum two vertices coincide and a quadrilateral
    /// collapses to a triangle. Dropping the repeat keeps every edge
    /// non-degenerate.
    pub fn from_ring(points: impl IntoIterator<Item = Point>) -> Self {
        let mut outer: Vec<Point> = Vec::new();
        for p in points {
            if outer.last() != Some(&p) {
                outer.push(p);
            }
        }
        while outer.len() > 1 && outer.first() == outer.last() {
            outer.pop();
        }
        Self::new(outer)
    }

    /// Get the bounding box as (min_x, min_y, max_x, max_y).
    ///
    /// ## Rust Lesson #6: Option<T>
    ///
    /// There is no `null`: an empty ring has no bounding box, so we say so
    /// with `None` and the caller must handle it.
    pub fn bounding_box(&self) -> Option<(f64, f64, f64, f64)> {
        if self.outer.is_empty() {
            return None;
        }

        let min_x = self.outer.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let min_y = self.outer.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_x = self.outer.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let max_y = self.outer.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

        Some((min_x, min_y, max_x, max_y))
    }

    /// Bounding box, or all zeros for an empty ring.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.bounding_box().unwrap_or((0.0, 0.0, 0.0, 0.0))
    }

    /// Calculate signed area using the shoelace formula.
    ///
    /// Positive for counter-clockwise winding, negative for clockwise.
    #[inline]
    pub fn signed_area(&self) -> f64 {
        signed_area_of_points(&self.outer)
    }

    /// Unsigned area of the outer ring minus its holes.
    pub fn area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(|h| signed_area_of_points(h).abs()).sum();
        self.signed_area().abs() - holes
    }

    /// Check if the outer boundary has clockwise winding.
    #[inline]
    pub fn is_clockwise(&self) -> bool {
        self.signed_area() < 0.0
    }

    /// A copy shifted by `(dx, dy)`.
    pub fn translate(&self, dx: f64, dy: f64) -> Polygon {
        let shift = |ring: &Vec<Point>| -> Vec<Point> {
            ring.iter().map(|p| p.offset(dx, dy)).collect()
        };
        Polygon {
            outer: shift(&self.outer),
            holes: self.holes.iter().map(shift).collect(),
        }
    }

    /// Reflect about the vertical line `x = axis`.
    ///
    /// A reflection flips orientation, so each ring is also reversed to keep
    /// the outer ring counter-clockwise.
    pub fn mirror_x(&self, axis: f64) -> Polygon {
        let flip = |ring: &Vec<Point>| -> Vec<Point> {
            ring.iter()
                .rev()
                .map(|p| Point::new(2.0 * axis - p.x, p.y))
                .collect()
        };
        Polygon {
            outer: flip(&self.outer),
            holes: self.holes.iter().map(flip).collect(),
        }
    }
}

/// Calculate signed area of a point sequence using the shoelace formula.
///
/// Returns:
/// - Positive value for counter-clockwise winding
/// - Negative value for clockwise winding
pub fn signed_area_of_points(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].x * points[j].y;
        area -= points[j].x * points[i].y;
    }
    area / 2.0
}

/// Union of several bounding boxes, `None` when there are none.
pub fn union_bounds(
    boxes: impl IntoIterator<Item = (f64, f64, f64, f64)>,
) -> Option<(f64, f64, f64, f64)> {
    boxes.into_iter().reduce(|a, b| {
        (a.0.min(b.0), a.1.min(b.1), a.2.max(b.2), a.3.max(b.3))
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ])
    }

    #[test]
    fn point_distance() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(3.0, 4.0);
        assert_eq!(p1.distance(p2), 5.0); // 3-4-5 triangle
    }

    #[test]
    fn offset_returns_new_point() {
        let p = Point::new(1.0, 2.0);
        let q = p.offset(3.0, 4.0);
        assert_eq!(q, Point::new(4.0, 6.0));
        assert_eq!(p, Point::new(1.0, 2.0));
    }

    #[test]
    fn nan_is_never_close() {
        let p = Point::new(f64::NAN, 0.0);
        assert!(!p.is_close(Point::new(0.0, 0.0), 1.0));
    }

    #[test]
    fn polygon_bounds() {
        let poly = Polygon::new(vec![
            Point::new(1.0, 2.0),
            Point::new(4.0, 2.0),
            Point::new(4.0, 5.0),
        ]);
        assert_eq!(poly.bounds(), (1.0, 2.0, 4.0, 5.0));
    }

    #[test]
    fn empty_polygon_bounds_are_zero() {
        let poly = Polygon::new(vec![]);
        assert_eq!(poly.bounding_box(), None);
        assert_eq!(poly.bounds(), (0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn signed_area_ccw_positive() {
        let poly = square();
        let area = poly.signed_area();
        assert!((area - 100.0).abs() < 1e-10, "10x10 square should have area 100, got {}", area);
        assert!(!poly.is_clockwise());
    }

    #[test]
    fn area_subtracts_holes() {
        let hole = vec![
            Point::new(2.0, 2.0),
            Point::new(2.0, 4.0),
            Point::new(4.0, 4.0),
            Point::new(4.0, 2.0),
        ];
        let poly = Polygon::with_holes(square().outer, vec![hole]);
        assert!((poly.area() - 96.0).abs() < 1e-10);
    }

    #[test]
    fn from_ring_collapses_duplicates() {
        let poly = Polygon::from_ring([
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(3.0, 3.0),
            Point::new(0.0, 0.0),
        ]);
        assert_eq!(poly.outer.len(), 3);
        assert!((poly.area() - 4.5).abs() < 1e-10);
    }

    #[test]
    fn translate_leaves_original_untouched() {
        let poly = square();
        let moved = poly.translate(5.0, -1.0);
        assert_eq!(moved.bounds(), (5.0, -1.0, 15.0, 9.0));
        assert_eq!(poly.bounds(), (0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn mirror_keeps_winding() {
        let poly = square();
        let mirrored = poly.mirror_x(0.0);
        assert_eq!(mirrored.bounds(), (-10.0, 0.0, 0.0, 10.0));
        assert!(!mirrored.is_clockwise(), "mirrored ring should stay counter-clockwise");
        assert!((mirrored.area() - poly.area()).abs() < 1e-10);
    }

    #[test]
    fn union_of_boxes() {
        let b = union_bounds([(0.0, 0.0, 1.0, 1.0), (-2.0, 0.5, 0.5, 3.0)]);
        assert_eq!(b, Some((-2.0, 0.0, 1.0, 3.0)));
        assert_eq!(union_bounds(std::iter::empty()), None);
    }
}
