//! 2-D geometry helpers
//!
//! Axis-aligned rectangles plus the polygon, triangle and segment primitives
//! shared by the subdivision builder, the spatial grid and parcel splitting.
//! Polygons are plain point slices, closed implicitly (last point connects
//! back to the first).

use glam::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tolerance used for orientation and convexity tests
pub const GEOMETRY_EPSILON: f32 = 1e-5;

/// Axis-aligned bounding rectangle
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Lower-left corner
    pub min: Vec2,
    /// Upper-right corner
    pub max: Vec2,
}

impl Rect {
    /// Create a rectangle from two corners (order does not matter)
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Rectangle anchored at the origin with the given size
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(Vec2::ZERO, Vec2::new(width, height))
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Length of the diagonal
    #[inline]
    pub fn diagonal(&self) -> f32 {
        self.size().length()
    }

    /// Inclusive containment test
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Corners in counter-clockwise order starting at `min`
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }

    /// Whether the rectangle has a positive, finite area
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.width() > 0.0 && self.height() > 0.0
    }

    /// Bounding box of a point set, `None` if the set is empty
    pub fn enclosing(points: &[Vec2]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points
            .iter()
            .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p)));
        Some(Self { min, max })
    }
}

/// Signed area of a polygon (shoelace formula)
///
/// Positive for counter-clockwise winding, negative for clockwise. Returns 0.0
/// for fewer than three points.
pub fn signed_area(polygon: &[Vec2]) -> f32 {
    let n = polygon.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        twice += a.perp_dot(b);
    }
    twice * 0.5
}

/// Unsigned polygon area
#[inline]
pub fn polygon_area(polygon: &[Vec2]) -> f32 {
    signed_area(polygon).abs()
}

/// Area-weighted centroid of a polygon
///
/// Falls back to the vertex average for degenerate (near zero-area) input.
pub fn polygon_centroid(polygon: &[Vec2]) -> Vec2 {
    if polygon.is_empty() {
        return Vec2::ZERO;
    }
    let area = signed_area(polygon);
    if area.abs() < GEOMETRY_EPSILON {
        return vertex_average(polygon);
    }

    let n = polygon.len();
    let mut acc = Vec2::ZERO;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        acc += (a + b) * a.perp_dot(b);
    }
    acc / (6.0 * area)
}

/// Plain average of the polygon's points
pub fn vertex_average(points: &[Vec2]) -> Vec2 {
    if points.is_empty() {
        return Vec2::ZERO;
    }
    points.iter().copied().sum::<Vec2>() / points.len() as f32
}

/// Whether a polygon is convex
///
/// Collinear corners are accepted; the winding may be either direction but
/// must be consistent.
pub fn is_convex(polygon: &[Vec2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut sign = 0.0f32;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        let c = polygon[(i + 2) % n];
        let cross = (b - a).perp_dot(c - b);
        if cross.abs() <= GEOMETRY_EPSILON {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    sign != 0.0
}

/// Point-in-triangle test, boundary inclusive
pub fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let d1 = (b - a).perp_dot(p - a);
    let d2 = (c - b).perp_dot(p - b);
    let d3 = (a - c).perp_dot(p - c);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Intersection point of segments `p1-p2` and `p3-p4`
///
/// Returns `None` for parallel segments or when the crossing lies outside
/// either segment.
pub fn segment_intersection(p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2) -> Option<Vec2> {
    let s1 = p2 - p1;
    let s2 = p4 - p3;

    let denom = s1.perp_dot(s2);
    if denom.abs() < 1e-9 {
        return None;
    }

    let d = p3 - p1;
    let t = d.perp_dot(s2) / denom;
    let u = d.perp_dot(s1) / denom;

    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(p1 + s1 * t)
    } else {
        None
    }
}

/// Does triangle `abc` overlap `rect`?
///
/// True when a triangle corner lies in the rectangle, a rectangle corner lies
/// in the triangle, or any triangle edge crosses a rectangle edge.
pub fn triangle_overlaps_rect(a: Vec2, b: Vec2, c: Vec2, rect: &Rect) -> bool {
    if rect.contains(a) || rect.contains(b) || rect.contains(c) {
        return true;
    }
    let corners = rect.corners();
    if corners.iter().any(|&k| point_in_triangle(k, a, b, c)) {
        return true;
    }
    let tri = [a, b, c];
    (0..3).any(|i| {
        let (p, q) = (tri[i], tri[(i + 1) % 3]);
        (0..4).any(|j| segment_intersection(p, q, corners[j], corners[(j + 1) % 4]).is_some())
    })
}

/// Parameter and point of the perpendicular projection of `p` onto the
/// line through `a` and `b`
///
/// `t == 0` is `a`, `t == 1` is `b`; values outside `[0, 1]` fall beyond the
/// segment.
pub fn project_onto_line(p: Vec2, a: Vec2, b: Vec2) -> (f32, Vec2) {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return (0.0, a);
    }
    let t = (p - a).dot(ab) / len_sq;
    (t, a + ab * t)
}

/// Distance from `p` to the segment `a-b`
pub fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let (t, _) = project_onto_line(p, a, b);
    let closest = a + (b - a) * t.clamp(0.0, 1.0);
    p.distance(closest)
}

/// Sort points counter-clockwise by angle around `center`
pub fn sort_by_angle(points: &mut [Vec2], center: Vec2) {
    points.sort_by(|a, b| {
        let angle_a = (a.y - center.y).atan2(a.x - center.x);
        let angle_b = (b.y - center.y).atan2(b.x - center.x);
        angle_a.total_cmp(&angle_b)
    });
}
