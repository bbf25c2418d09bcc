//! Spatial indexing for fast position-to-cell lookups
//!
//! A uniform N×N grid over the bounds. Each bucket lists the cells whose
//! polygon overlaps it, so a point query only scans a handful of candidates.

use glam::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::{triangle_overlaps_rect, Rect};
use crate::graph::{Cell, Vertex};

/// Uniform bucket grid mapping regions of the bounds to overlapping cells
///
/// # Performance
///
/// - Construction: each cell tests only the buckets under its bounding box
/// - Query: O(1) bucket lookup plus a linear scan of that bucket
/// - Memory: `resolution²` bucket lists
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    bounds: Rect,
    resolution: usize,
    buckets: Vec<Vec<usize>>,
}

impl SpatialGrid {
    /// A grid with no registered cells
    pub fn empty(bounds: &Rect, resolution: usize) -> Self {
        let resolution = resolution.max(1);
        Self {
            bounds: *bounds,
            resolution,
            buckets: vec![Vec::new(); resolution * resolution],
        }
    }

    /// Register every cell in the buckets its polygon overlaps
    ///
    /// A cell overlaps a bucket when its center or one of its vertices lies
    /// in the bucket, or when any center-to-edge triangle of the cell
    /// intersects the bucket rectangle.
    pub fn build(bounds: &Rect, resolution: usize, cells: &[Cell], vertices: &[Vertex]) -> Self {
        let mut grid = Self::empty(bounds, resolution);

        for cell in cells {
            let corners: Vec<Vec2> = cell.vertices.iter().map(|&v| vertices[v].position).collect();
            let Some(bbox) = Rect::enclosing(&corners) else {
                continue;
            };

            let (x0, y0) = grid.bucket_coords(bbox.min);
            let (x1, y1) = grid.bucket_coords(bbox.max);
            for by in y0..=y1 {
                for bx in x0..=x1 {
                    let rect = grid.bucket_rect(bx, by);
                    if overlaps(cell.center, &corners, &rect) {
                        grid.buckets[by * grid.resolution + bx].push(cell.index);
                    }
                }
            }
        }

        grid
    }

    #[inline]
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Cells registered in bucket `(x, y)`
    pub fn bucket(&self, x: usize, y: usize) -> &[usize] {
        if x >= self.resolution || y >= self.resolution {
            return &[];
        }
        &self.buckets[y * self.resolution + x]
    }

    /// Bucket coordinates holding `point`, clamped to the grid
    pub fn bucket_coords(&self, point: Vec2) -> (usize, usize) {
        let n = self.resolution as f32;
        let rel = (point - self.bounds.min) / self.bounds.size() * n;
        let clamp = |v: f32| (v.floor().max(0.0) as usize).min(self.resolution - 1);
        (clamp(rel.x), clamp(rel.y))
    }

    /// Rectangle covered by bucket `(x, y)`
    pub fn bucket_rect(&self, x: usize, y: usize) -> Rect {
        let step = self.bounds.size() / self.resolution as f32;
        let min = self.bounds.min + step * Vec2::new(x as f32, y as f32);
        Rect::new(min, min + step)
    }

    /// Find the cell containing `point`
    ///
    /// Returns the registered cell whose center is nearest to `point` within
    /// the point's bucket; `None` outside the bounds or for an empty bucket.
    pub fn cell_at(&self, point: Vec2, cells: &[Cell]) -> Option<usize> {
        if !self.bounds.contains(point) {
            return None;
        }
        let (x, y) = self.bucket_coords(point);
        self.bucket(x, y)
            .iter()
            .map(|&c| (c, cells[c].center.distance_squared(point)))
            .fold(None, |best: Option<(usize, f32)>, (c, d)| match best {
                Some((_, bd)) if bd <= d => best,
                _ => Some((c, d)),
            })
            .map(|(c, _)| c)
    }
}

fn overlaps(center: Vec2, corners: &[Vec2], rect: &Rect) -> bool {
    if rect.contains(center) || corners.iter().any(|&p| rect.contains(p)) {
        return true;
    }
    let n = corners.len();
    (0..n).any(|i| triangle_overlaps_rect(center, corners[i], corners[(i + 1) % n], rect))
}
