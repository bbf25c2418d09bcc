//! Parcel subdivision
//!
//! A district outline is pulled in from the streets, densified, then split
//! recursively with perpendicular cuts until only quadrilaterals remain.
//! Splitting is a pure function: every cut returns two fresh polygons and
//! leaves its input untouched.

use std::collections::VecDeque;

use glam::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::DistrictTuning;
use crate::geometry::{
    distance_to_segment, is_convex, polygon_area, polygon_centroid, project_onto_line, sort_by_angle,
    vertex_average,
};
use crate::graph::Graph;

/// Smallest area used in balance ratios; keeps degenerate halves finite
const AREA_EPSILON: f32 = 1e-6;

/// Cut points this close to an edge end (as a fraction of the edge) snap to
/// that corner instead of inserting a new point
const CUT_END_MARGIN: f32 = 0.01;

/// Upper bound on points inserted into a single outline edge
const MAX_EDGE_SUBDIVISIONS: usize = 64;

/// Sine of the flattest corner turn a parcel may have
const MIN_CORNER_SINE: f32 = 0.05;

/// A building-sized plot
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Parcel {
    /// Corners, counter-clockwise
    pub corners: [Vec2; 4],

    pub centroid: Vec2,

    pub area: f32,

    /// Unit vector from the centroid toward the street-facing edge
    pub facing: Vec2,

    /// Index of the street-facing edge; edge `i` joins `corners[i]` and
    /// `corners[(i + 1) % 4]`
    pub front: usize,
}

impl Parcel {
    /// Build a parcel from a quad, `None` unless it is convex with positive area
    ///
    /// A quad with a near-straight corner is really a triangle and is refused
    /// as well.
    ///
    /// `streets` is the district outline the parcel was cut from; the quad edge
    /// closest to it becomes the front.
    pub fn from_quad(quad: &[Vec2], streets: &[Vec2]) -> Option<Self> {
        let corners: [Vec2; 4] = quad.try_into().ok()?;
        let area = polygon_area(&corners);
        if area <= AREA_EPSILON || !is_convex(&corners) || has_flat_corner(&corners) {
            return None;
        }
        let centroid = polygon_centroid(&corners);

        let mut front = 0;
        let mut closest = f32::INFINITY;
        for i in 0..4 {
            let mid = (corners[i] + corners[(i + 1) % 4]) * 0.5;
            let d = distance_to_outline(mid, streets);
            if d < closest {
                closest = d;
                front = i;
            }
        }

        let mid = (corners[front] + corners[(front + 1) % 4]) * 0.5;
        let facing = (mid - centroid).try_normalize().unwrap_or(Vec2::X);

        Some(Self {
            corners,
            centroid,
            area,
            facing,
            front,
        })
    }

    /// Length of edge `i` counted from the front (0 front, 1 right, 2 back,
    /// 3 left)
    pub fn side_length(&self, i: usize) -> f32 {
        let a = self.corners[(self.front + i) % 4];
        let b = self.corners[(self.front + i + 1) % 4];
        a.distance(b)
    }

    /// Facing angle in radians
    #[inline]
    pub fn angle(&self) -> f32 {
        self.facing.y.atan2(self.facing.x)
    }
}

fn has_flat_corner(corners: &[Vec2; 4]) -> bool {
    (0..4).any(|i| {
        let incoming = corners[i] - corners[(i + 3) % 4];
        let outgoing = corners[(i + 1) % 4] - corners[i];
        incoming.perp_dot(outgoing).abs() <= MIN_CORNER_SINE * incoming.length() * outgoing.length()
    })
}

fn distance_to_outline(p: Vec2, outline: &[Vec2]) -> f32 {
    let n = outline.len();
    (0..n)
        .map(|i| distance_to_segment(p, outline[i], outline[(i + 1) % n]))
        .fold(f32::INFINITY, f32::min)
}

/// Outline of a district with the street margin removed
///
/// The cell's corners are sorted by angle around their average, then scaled
/// toward the polygon centroid so the closest side moves in by `margin`.
/// Both points lie inside the convex cell even when its site does not.
/// Scaling keeps the polygon convex.
pub fn district_outline(graph: &Graph, cell: usize, margin: f32) -> Vec<Vec2> {
    let mut outline = graph.cell_polygon(cell);
    if outline.len() < 3 {
        return outline;
    }
    let average = vertex_average(&outline);
    sort_by_angle(&mut outline, average);
    let center = polygon_centroid(&outline);

    let inradius = distance_to_outline(center, &outline);
    if !inradius.is_finite() || inradius <= 0.0 {
        return outline;
    }
    let scale = ((inradius - margin) / inradius).max(0.25);
    for p in &mut outline {
        *p = center + (*p - center) * scale;
    }
    outline
}

/// Insert evenly spaced points so no edge is longer than `max_edge`
///
/// Each long edge is halved repeatedly, i.e. cut into a power-of-two number
/// of equal pieces.
pub fn densify(polygon: &[Vec2], max_edge: f32) -> Vec<Vec2> {
    let n = polygon.len();
    let mut out = Vec::with_capacity(n * 2);
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        out.push(a);

        let length = a.distance(b);
        let mut pieces = 1usize;
        while length / pieces as f32 > max_edge && pieces < MAX_EDGE_SUBDIVISIONS {
            pieces *= 2;
        }
        for k in 1..pieces {
            out.push(a.lerp(b, k as f32 / pieces as f32));
        }
    }
    out
}

/// Cut `polygon` from corner `j` to `point` on edge `i`
///
/// Returns `(head, tail)`: `head` runs from the cut point through corners
/// `i + 1 ..= j`, `tail` from corner `j` around to corner `i` and back to the
/// cut point. Both keep the input winding. Indices must be in range.
pub(crate) fn cut(polygon: &[Vec2], i: usize, j: usize, point: Vec2) -> (Vec<Vec2>, Vec<Vec2>) {
    let n = polygon.len();
    let mut head = vec![point];
    head.extend(chain(polygon, (i + 1) % n, j));
    let mut tail = chain(polygon, j, i);
    tail.push(point);
    (head, tail)
}

/// Cut `polygon` along the diagonal between corners `from` and `to`
pub(crate) fn cut_between(polygon: &[Vec2], from: usize, to: usize) -> (Vec<Vec2>, Vec<Vec2>) {
    (chain(polygon, from, to), chain(polygon, to, from))
}

/// Corners `from ..= to`, walking forward and wrapping around
///
/// Empty when either index is out of range.
fn chain(polygon: &[Vec2], from: usize, to: usize) -> Vec<Vec2> {
    let n = polygon.len();
    if from >= n || to >= n {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(n);
    let mut k = from;
    loop {
        out.push(polygon[k]);
        if k == to {
            break;
        }
        k = (k + 1) % n;
    }
    out
}

/// Find the most balanced perpendicular cut
///
/// Edges are tried longest first. For each edge every other corner is
/// projected onto it, and the projection that halves the area most evenly
/// wins; a projection landing on an edge end cuts along the diagonal to that
/// corner. The first edge whose best cut leaves both halves larger than
/// `min_area` is used.
pub fn split_balanced(polygon: &[Vec2], min_area: f32) -> Option<(Vec<Vec2>, Vec<Vec2>)> {
    let n = polygon.len();
    let edge_length = |i: usize| polygon[i].distance(polygon[(i + 1) % n]);

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| edge_length(b).total_cmp(&edge_length(a)).then(a.cmp(&b)));

    for i in order {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];

        let mut best: Option<(f32, Vec<Vec2>, Vec<Vec2>, f32, f32)> = None;
        for j in 0..n {
            if j == i || j == (i + 1) % n {
                continue;
            }
            let (t, point) = project_onto_line(polygon[j], a, b);
            let (head, tail) = if !(-CUT_END_MARGIN..=1.0 + CUT_END_MARGIN).contains(&t) {
                continue;
            } else if t <= CUT_END_MARGIN {
                cut_between(polygon, i, j)
            } else if t >= 1.0 - CUT_END_MARGIN {
                cut_between(polygon, (i + 1) % n, j)
            } else {
                cut(polygon, i, j, point)
            };
            let head_area = polygon_area(&head).max(AREA_EPSILON);
            let tail_area = polygon_area(&tail).max(AREA_EPSILON);
            let balance = head_area.min(tail_area) / head_area.max(tail_area);

            if best.as_ref().map_or(true, |(score, ..)| balance > *score) {
                best = Some((balance, head, tail, head_area, tail_area));
            }
        }

        if let Some((_, head, tail, head_area, tail_area)) = best {
            if head_area > min_area && tail_area > min_area {
                return Some((head, tail));
            }
        }
    }

    None
}

/// Split one district into parcels
///
/// Quads become parcels when convex; triangles, concave quads and polygons
/// with no acceptable cut are dropped.
pub fn subdivide_district(graph: &Graph, cell: usize, tuning: &DistrictTuning) -> Vec<Parcel> {
    let outline = district_outline(graph, cell, tuning.street_margin);
    if outline.len() < 3 {
        return Vec::new();
    }

    let mut queue = VecDeque::from([densify(&outline, tuning.max_parcel_edge)]);
    let mut parcels = Vec::new();
    let mut dropped = 0usize;

    while let Some(polygon) = queue.pop_front() {
        match polygon.len() {
            0..=3 => dropped += 1,
            4 => match Parcel::from_quad(&polygon, &outline) {
                Some(parcel) => parcels.push(parcel),
                None => dropped += 1,
            },
            _ => match split_balanced(&polygon, tuning.min_split_area) {
                Some((head, tail)) => {
                    queue.push_back(head);
                    queue.push_back(tail);
                }
                None => dropped += 1,
            },
        }
    }

    log::debug!(
        "district {}: {} parcels, {} pieces dropped",
        cell,
        parcels.len(),
        dropped
    );
    parcels
}
