//! Planar subdivision construction
//!
//! Sites → Delaunay triangulation → bounded Voronoi cells → (optional Lloyd
//! passes) → welded, fully linked [`Graph`] with its point-lookup grid.

mod delaunay;
mod lloyd;
mod sites;
mod voronoi;

pub use delaunay::{compute_delaunay, DelaunayResult};
pub use lloyd::{lloyd_relaxation, lloyd_relaxation_with_options, LloydOptions};
pub use sites::{generate_sites, tile_rng};
pub use voronoi::{clip_half_plane, generate_cells, RawCell};

use std::collections::HashMap;
use std::time::Instant;

use glam::{DVec2, Vec2};

use crate::config::GRID_RESOLUTION;
use crate::error::{Result, SettlementError};
use crate::geometry::Rect;
use crate::graph::{Cell, Edge, Graph, Vertex};
use crate::spatial::SpatialGrid;

/// Distance under which two computed corners are treated as one vertex
pub(crate) fn weld_distance(bounds: &Rect) -> f64 {
    bounds.diagonal() as f64 * 1e-6
}

/// Builder for the cell/vertex/edge graph of a Voronoi diagram
pub struct PlanarSubdivision;

impl PlanarSubdivision {
    /// Build the subdivision of `bounds` induced by `sites`
    ///
    /// `relaxations` Lloyd passes run before the final diagram is built; after
    /// relaxation, [`Cell::site`] refers to the relaxed site list.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if `bounds` has no area
    /// - `DegenerateSites` if fewer than 3 distinct, non-collinear sites exist
    ///
    /// # Example
    ///
    /// ```rust
    /// use voronoi_settlement::*;
    ///
    /// let sites = vec![
    ///     Vec2::new(20.0, 20.0),
    ///     Vec2::new(80.0, 25.0),
    ///     Vec2::new(50.0, 80.0),
    ///     Vec2::new(50.0, 45.0),
    /// ];
    /// let graph = PlanarSubdivision::generate(&sites, Rect::from_size(100.0, 100.0), 0).unwrap();
    /// assert_eq!(graph.cell_count(), 4);
    /// assert_eq!(graph.cell_at(Vec2::new(50.0, 45.0)), Some(3));
    /// ```
    pub fn generate(sites: &[Vec2], bounds: Rect, relaxations: u8) -> Result<Graph> {
        if !bounds.is_valid() {
            return Err(SettlementError::InvalidConfig(format!(
                "bounds must have positive finite extent (got {:?})",
                bounds
            )));
        }
        if sites.is_empty() {
            return Err(SettlementError::DegenerateSites("no sites".into()));
        }

        let start = Instant::now();
        let sites = if relaxations > 0 {
            lloyd_relaxation(sites.to_vec(), &bounds, relaxations as usize)?
        } else {
            sites.to_vec()
        };

        let weld = weld_distance(&bounds);
        let delaunay = compute_delaunay(&sites)?;
        let raw_cells = generate_cells(&delaunay, &bounds, weld);
        if raw_cells.len() < 3 {
            return Err(SettlementError::DegenerateSites(format!(
                "only {} cells inside the bounds",
                raw_cells.len()
            )));
        }

        let mut graph = link_cells(&raw_cells, bounds, weld);
        graph.grid = SpatialGrid::build(&bounds, GRID_RESOLUTION, &graph.cells, &graph.vertices);

        log::debug!(
            "subdivision built: {} cells, {} vertices, {} edges in {:?}",
            graph.cells.len(),
            graph.vertices.len(),
            graph.edges.len(),
            start.elapsed()
        );
        Ok(graph)
    }
}

/// Quantised position lookup used to share corners between cells
struct VertexWelder {
    cell_size: f64,
    buckets: HashMap<(i64, i64), Vec<usize>>,
    positions: Vec<DVec2>,
}

impl VertexWelder {
    fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            buckets: HashMap::new(),
            positions: Vec::new(),
        }
    }

    fn key(&self, p: DVec2) -> (i64, i64) {
        (
            (p.x / self.cell_size).floor() as i64,
            (p.y / self.cell_size).floor() as i64,
        )
    }

    /// Index of the existing vertex within `cell_size` of `p`, or a new one
    fn weld(&mut self, p: DVec2) -> usize {
        let (kx, ky) = self.key(p);
        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(bucket) = self.buckets.get(&(kx + dx, ky + dy)) {
                    if let Some(&found) = bucket
                        .iter()
                        .find(|&&i| self.positions[i].distance(p) <= self.cell_size)
                    {
                        return found;
                    }
                }
            }
        }
        let index = self.positions.len();
        self.positions.push(p);
        self.buckets.entry((kx, ky)).or_default().push(index);
        index
    }
}

/// Turn independent cell polygons into the shared cell/vertex/edge graph
fn link_cells(raw_cells: &[RawCell], bounds: Rect, weld: f64) -> Graph {
    let mut welder = VertexWelder::new(weld);

    // Phase 1: weld corners and drop cells that collapse
    let mut rings: Vec<(&RawCell, Vec<usize>)> = Vec::with_capacity(raw_cells.len());
    for raw in raw_cells {
        let mut ring: Vec<usize> = Vec::with_capacity(raw.polygon.len());
        for &p in &raw.polygon {
            let v = welder.weld(p);
            if ring.last() != Some(&v) {
                ring.push(v);
            }
        }
        while ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        if ring.len() < 3 {
            log::debug!("cell of site {} collapsed after welding, skipped", raw.site);
            continue;
        }
        rings.push((raw, ring));
    }

    // Phase 2: compact vertex indices in order of first use
    let mut remap = vec![usize::MAX; welder.positions.len()];
    let mut vertices: Vec<Vertex> = Vec::new();
    for (_, ring) in &mut rings {
        for v in ring.iter_mut() {
            if remap[*v] == usize::MAX {
                remap[*v] = vertices.len();
                vertices.push(Vertex {
                    index: vertices.len(),
                    position: welder.positions[*v].as_vec2(),
                    neighbors: Vec::new(),
                    cells: Vec::new(),
                    border: false,
                });
            }
            *v = remap[*v];
        }
    }

    // Phase 3: cells and edges
    let mut cells: Vec<Cell> = Vec::with_capacity(rings.len());
    let mut edges: Vec<Edge> = Vec::new();
    let mut edge_lookup: HashMap<(usize, usize), usize> = HashMap::new();

    for (raw, ring) in rings {
        let index = cells.len();
        let mut cell = Cell {
            index,
            site: raw.site,
            center: raw.center.as_vec2(),
            vertices: ring.clone(),
            edges: Vec::with_capacity(ring.len()),
            neighbors: Vec::new(),
            border: false,
        };

        for i in 0..ring.len() {
            let a = ring[i];
            let b = ring[(i + 1) % ring.len()];
            let key = (a.min(b), a.max(b));

            let edge = match edge_lookup.get(&key) {
                Some(&e) => {
                    let other = edges[e].cells[0];
                    edges[e].cells[1] = index;
                    if !cell.neighbors.contains(&other) {
                        cell.neighbors.push(other);
                    }
                    if !cells[other].neighbors.contains(&index) {
                        cells[other].neighbors.push(index);
                    }
                    e
                }
                None => {
                    let e = edges.len();
                    edges.push(Edge {
                        index: e,
                        vertices: [a, b],
                        cells: [index, index],
                    });
                    edge_lookup.insert(key, e);
                    e
                }
            };
            cell.edges.push(edge);
            vertices[a].cells.push(index);
        }

        cells.push(cell);
    }

    for edge in &edges {
        let [a, b] = edge.vertices;
        if !vertices[a].neighbors.contains(&b) {
            vertices[a].neighbors.push(b);
        }
        if !vertices[b].neighbors.contains(&a) {
            vertices[b].neighbors.push(a);
        }
        if edge.is_border() {
            vertices[a].border = true;
            vertices[b].border = true;
            cells[edge.cells[0]].border = true;
        }
    }

    Graph {
        bounds,
        cells,
        vertices,
        edges,
        grid: SpatialGrid::empty(&bounds, GRID_RESOLUTION),
    }
}
