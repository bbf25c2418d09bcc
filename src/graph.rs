//! Planar subdivision graph
//!
//! Cells, vertices and edges live in flat, append-only arrays. Every cross
//! reference is an index into one of those arrays, so the graph can be
//! cloned, serialized and rebuilt without any pointer identity.

use std::collections::VecDeque;

use glam::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::{self, Rect};
use crate::spatial::SpatialGrid;

/// One region of the subdivision (a settlement district)
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Position of this cell in [`Graph::cells`]
    pub index: usize,

    /// Index of the generating site in the site list the final diagram was
    /// built from (the relaxed list when Lloyd passes ran)
    pub site: usize,

    /// Generating site position
    ///
    /// This is the Voronoi seed, not the polygon centroid; see
    /// [`Graph::cell_centroid`].
    pub center: Vec2,

    /// Boundary vertices, counter-clockwise
    pub vertices: Vec<usize>,

    /// Boundary edges; `edges[i]` joins `vertices[i]` and `vertices[i + 1]`
    pub edges: Vec<usize>,

    /// Adjacent cells, one per shared interior edge
    pub neighbors: Vec<usize>,

    /// Whether any boundary edge lies on the bounding rectangle
    pub border: bool,
}

/// A corner shared by two or more cells
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    /// Position of this vertex in [`Graph::vertices`]
    pub index: usize,

    pub position: Vec2,

    /// Vertices joined to this one by an edge
    pub neighbors: Vec<usize>,

    /// Cells this vertex is a corner of
    pub cells: Vec<usize>,

    /// Whether this vertex touches the bounding rectangle
    pub border: bool,
}

/// A boundary segment between two cells
///
/// Border edges (on the bounding rectangle) reference the single adjacent
/// cell twice.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Position of this edge in [`Graph::edges`]
    pub index: usize,

    pub vertices: [usize; 2],

    pub cells: [usize; 2],
}

impl Edge {
    /// Whether this edge lies on the outer boundary
    #[inline]
    pub fn is_border(&self) -> bool {
        self.cells[0] == self.cells[1]
    }

    /// The cell on the other side of `cell`, or `None` if `cell` is not
    /// adjacent to this edge
    pub fn other_cell(&self, cell: usize) -> Option<usize> {
        if self.cells[0] == cell {
            Some(self.cells[1])
        } else if self.cells[1] == cell {
            Some(self.cells[0])
        } else {
            None
        }
    }

    /// Whether this edge separates exactly `a` and `b`
    #[inline]
    pub fn separates(&self, a: usize, b: usize) -> bool {
        (self.cells[0] == a && self.cells[1] == b) || (self.cells[0] == b && self.cells[1] == a)
    }
}

/// A fully linked planar subdivision
///
/// Produced by [`PlanarSubdivision::generate`](crate::PlanarSubdivision::generate);
/// immutable afterwards.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct Graph {
    pub(crate) bounds: Rect,
    pub(crate) cells: Vec<Cell>,
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) grid: SpatialGrid,
}

impl Graph {
    /// Rectangle the subdivision covers
    #[inline]
    pub fn bounds(&self) -> &Rect {
        &self.bounds
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Get a cell by index, `None` if out of bounds
    #[inline]
    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    #[inline]
    pub fn vertex(&self, index: usize) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    #[inline]
    pub fn edge(&self, index: usize) -> Option<&Edge> {
        self.edges.get(index)
    }

    /// Neighbor indices of a cell; empty for an invalid index
    pub fn neighbors(&self, cell: usize) -> &[usize] {
        self.cells
            .get(cell)
            .map(|c| c.neighbors.as_slice())
            .unwrap_or(&[])
    }

    /// Boundary polygon of a cell, counter-clockwise
    pub fn cell_polygon(&self, cell: usize) -> Vec<Vec2> {
        self.cells
            .get(cell)
            .map(|c| c.vertices.iter().map(|&v| self.vertices[v].position).collect())
            .unwrap_or_default()
    }

    /// Area of a cell's polygon
    pub fn cell_area(&self, cell: usize) -> f32 {
        geometry::polygon_area(&self.cell_polygon(cell))
    }

    /// Area-weighted centroid of a cell's polygon
    pub fn cell_centroid(&self, cell: usize) -> Vec2 {
        geometry::polygon_centroid(&self.cell_polygon(cell))
    }

    /// The interior edge separating two cells, if they are adjacent
    pub fn shared_edge(&self, a: usize, b: usize) -> Option<usize> {
        let cell = self.cells.get(a)?;
        cell.edges
            .iter()
            .copied()
            .find(|&e| a != b && self.edges[e].separates(a, b))
    }

    /// Cell whose center is closest to the middle of the bounds
    ///
    /// Ties resolve to the lowest index. `None` only for an empty graph.
    pub fn core_cell(&self) -> Option<usize> {
        let mid = self.bounds.center();
        self.cells
            .iter()
            .map(|c| (c.index, c.center.distance_squared(mid)))
            .fold(None, |best: Option<(usize, f32)>, (i, d)| match best {
                Some((_, bd)) if bd <= d => best,
                _ => Some((i, d)),
            })
            .map(|(i, _)| i)
    }

    /// Cells within a given hop count from a center cell (BFS)
    ///
    /// Returns indices in visiting order, starting with `center`; empty if
    /// `center` is invalid.
    pub fn cells_within_hops(&self, center: usize, hops: u32) -> Vec<usize> {
        if center >= self.cells.len() {
            return vec![];
        }

        let mut depth = vec![u32::MAX; self.cells.len()];
        let mut order = vec![center];
        let mut queue = VecDeque::from([center]);
        depth[center] = 0;

        while let Some(cell) = queue.pop_front() {
            if depth[cell] == hops {
                continue;
            }
            for &n in &self.cells[cell].neighbors {
                if depth[n] == u32::MAX {
                    depth[n] = depth[cell] + 1;
                    order.push(n);
                    queue.push_back(n);
                }
            }
        }

        order
    }

    /// Find the cell containing a point
    ///
    /// Looks up the grid bucket holding `point` and returns the registered
    /// cell with the nearest center. `None` if `point` lies outside the bounds
    /// or the bucket is empty.
    pub fn cell_at(&self, point: Vec2) -> Option<usize> {
        self.grid.cell_at(point, &self.cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::PlanarSubdivision;

    fn grid_sites() -> Vec<Vec2> {
        let mut sites = Vec::new();
        for y in 0..4 {
            for x in 0..4 {
                let jitter = ((x * 7 + y * 3) % 5) as f32 * 0.7;
                sites.push(Vec2::new(12.5 + x as f32 * 25.0 + jitter, 12.5 + y as f32 * 25.0 - jitter));
            }
        }
        sites
    }

    fn sample_graph() -> Graph {
        PlanarSubdivision::generate(&grid_sites(), Rect::from_size(100.0, 100.0), 0).unwrap()
    }

    #[test]
    fn test_edge_helpers() {
        let edge = Edge {
            index: 0,
            vertices: [0, 1],
            cells: [3, 5],
        };
        assert!(!edge.is_border());
        assert_eq!(edge.other_cell(3), Some(5));
        assert_eq!(edge.other_cell(9), None);
        assert!(edge.separates(5, 3));

        let border = Edge {
            index: 1,
            vertices: [1, 2],
            cells: [4, 4],
        };
        assert!(border.is_border());
        assert_eq!(border.other_cell(4), Some(4));
    }

    #[test]
    fn test_shared_edge_matches_neighbors() {
        let graph = sample_graph();
        for cell in graph.cells() {
            for &n in &cell.neighbors {
                let edge = graph.shared_edge(cell.index, n).expect("neighbors share an edge");
                assert!(graph.edges()[edge].separates(cell.index, n));
            }
        }
    }

    #[test]
    fn test_core_cell() {
        let graph = sample_graph();
        let core = graph.core_cell().unwrap();
        let mid = graph.bounds().center();
        let best = graph.cells()[core].center.distance(mid);
        assert!(graph.cells().iter().all(|c| c.center.distance(mid) >= best));
    }

    #[test]
    fn test_cells_within_hops() {
        let graph = sample_graph();

        let r0 = graph.cells_within_hops(0, 0);
        assert_eq!(r0, vec![0]);

        let r1 = graph.cells_within_hops(0, 1);
        assert_eq!(r1.len(), 1 + graph.neighbors(0).len());

        let r2 = graph.cells_within_hops(0, 2);
        assert!(r2.len() > r1.len());

        assert!(graph.cells_within_hops(999, 3).is_empty());
        assert!(graph.neighbors(999).is_empty());
    }

    #[test]
    fn test_cell_areas_cover_bounds() {
        let graph = sample_graph();
        let total: f32 = (0..graph.cell_count()).map(|c| graph.cell_area(c)).sum();
        assert!((total - 10_000.0).abs() < 1.0, "total area {}", total);
    }
}
