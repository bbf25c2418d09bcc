//! Voronoi cell construction from Delaunay triangulation
//!
//! Each cell starts as the bounding rectangle and is clipped by the
//! perpendicular bisector to every Delaunay neighbour of its site. The result
//! is the exact bounded Voronoi region, counter-clockwise, computed in f64.

use glam::DVec2;

use crate::geometry::Rect;

use super::delaunay::DelaunayResult;

/// A clipped Voronoi cell before vertices are shared between cells
#[derive(Debug, Clone)]
pub struct RawCell {
    /// Index of the generating site in the input site list
    pub site: usize,
    /// Generating site position
    pub center: DVec2,
    /// Boundary polygon, counter-clockwise
    pub polygon: Vec<DVec2>,
}

/// Build bounded Voronoi cells for every triangulated site
///
/// Sites whose region is empty inside `bounds` (possible for sites lying
/// outside the rectangle) produce no cell. Consecutive points closer than
/// `weld_distance` are merged.
pub fn generate_cells(delaunay: &DelaunayResult, bounds: &Rect, weld_distance: f64) -> Vec<RawCell> {
    let frame: Vec<DVec2> = bounds.corners().iter().map(|c| c.as_dvec2()).collect();
    let min_area = weld_distance * weld_distance;

    let mut cells = Vec::with_capacity(delaunay.positions.len());
    for (vertex, &center) in delaunay.positions.iter().enumerate() {
        let mut polygon = frame.clone();
        for &other in &delaunay.neighbors[vertex] {
            let q = delaunay.positions[other];
            polygon = clip_half_plane(&polygon, (center + q) * 0.5, q - center);
            if polygon.is_empty() {
                break;
            }
        }

        let polygon = remove_near_duplicates(polygon, weld_distance);
        if polygon.len() < 3 || signed_area(&polygon) <= min_area {
            log::debug!(
                "site {} has no region inside the bounds, skipped",
                delaunay.sites[vertex]
            );
            continue;
        }

        cells.push(RawCell {
            site: delaunay.sites[vertex],
            center,
            polygon,
        });
    }

    cells
}

/// Keep the part of `polygon` where `(p - origin) · normal <= 0`
///
/// Sutherland-Hodgman against a single half-plane; winding is preserved.
pub fn clip_half_plane(polygon: &[DVec2], origin: DVec2, normal: DVec2) -> Vec<DVec2> {
    let n = polygon.len();
    let mut out = Vec::with_capacity(n + 1);
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        let da = (a - origin).dot(normal);
        let db = (b - origin).dot(normal);

        if da <= 0.0 {
            out.push(a);
        }
        if (da < 0.0 && db > 0.0) || (da > 0.0 && db < 0.0) {
            let t = da / (da - db);
            out.push(a + (b - a) * t);
        }
    }
    out
}

fn remove_near_duplicates(polygon: Vec<DVec2>, distance: f64) -> Vec<DVec2> {
    let mut out: Vec<DVec2> = Vec::with_capacity(polygon.len());
    for p in polygon {
        if out.last().map_or(true, |last| last.distance(p) > distance) {
            out.push(p);
        }
    }
    while out.len() > 1 && out[0].distance(out[out.len() - 1]) <= distance {
        out.pop();
    }
    out
}

fn signed_area(polygon: &[DVec2]) -> f64 {
    let n = polygon.len();
    (0..n)
        .map(|i| polygon[i].perp_dot(polygon[(i + 1) % n]))
        .sum::<f64>()
        * 0.5
}
