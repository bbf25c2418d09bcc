//! District generation
//!
//! Annotates a finished [`Graph`] with the settlement structure: distance
//! ranks from the core, the perimeter wall, its gateways, the highway network
//! and the parcels inside every walled district.

pub mod gateway;
pub mod highway;
pub mod parcel;
pub mod rank;
pub mod wall;

pub use highway::{HighwayKind, HighwaySegment};
pub use parcel::Parcel;

use std::time::Instant;

use glam::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::DistrictTuning;
use crate::geometry::polygon_area;
use crate::graph::Graph;

/// Settlement data attached to one cell
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct District {
    /// Hop distance from the core cell; `None` if unreachable
    pub rank: Option<u32>,

    /// Polygon area of the cell
    pub area: f32,

    /// Area-weighted centroid (differs from the generating site)
    pub centroid: Vec2,

    /// Building plots, only filled for cells inside the wall radius
    pub parcels: Vec<Parcel>,
}

/// Settlement data attached to one vertex
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VertexState {
    /// Hop distance from the nearest corner of the core cell
    pub rank: Option<u32>,

    /// Hop distance from the bounding rectangle
    pub border_rank: Option<u32>,

    /// Whether a highway passes through this vertex
    pub on_street: bool,
}

/// Settlement data attached to one edge
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeState {
    pub is_wall: bool,

    /// A wall edge left open as a passage
    pub is_gateway: bool,

    /// Footprint spanned by the edge and its cell centers
    pub area: f32,
}

/// One run of the perimeter wall, between two adjacent cell centers
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallSegment {
    /// Start and end cell, in counter-clockwise wall order
    pub cells: [usize; 2],

    /// Edge shared by the two cells
    pub edge: usize,

    /// Center-to-center segment
    pub line: [Vec2; 2],

    pub has_gate: bool,
}

impl WallSegment {
    #[inline]
    pub fn length(&self) -> f32 {
        self.line[0].distance(self.line[1])
    }

    #[inline]
    pub fn midpoint(&self) -> Vec2 {
        (self.line[0] + self.line[1]) * 0.5
    }

    /// Direction of the run in radians
    pub fn angle(&self) -> f32 {
        let d = self.line[1] - self.line[0];
        d.y.atan2(d.x)
    }
}

/// Everything the district generator adds on top of the subdivision
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictLayout {
    /// Cell closest to the middle of the bounds
    pub core_cell: usize,

    /// Indexed like [`Graph::cells`]
    pub districts: Vec<District>,

    /// Indexed like [`Graph::vertices`]
    pub vertices: Vec<VertexState>,

    /// Indexed like [`Graph::edges`]
    pub edges: Vec<EdgeState>,

    /// Closed counter-clockwise wall; empty when no ring cycle exists
    pub wall: Vec<WallSegment>,

    /// Gateway edges in selection order
    pub gateways: Vec<usize>,

    pub highways: Vec<HighwaySegment>,
}

/// Run every district stage over `graph`
///
/// Returns `None` only for a graph without cells.
pub fn generate_districts(
    graph: &Graph,
    wall_radius: u32,
    tuning: &DistrictTuning,
) -> Option<DistrictLayout> {
    let start = Instant::now();
    let core_cell = graph.core_cell()?;

    let cell_ranks = rank::cell_ranks(graph, core_cell);
    let core_ranks = rank::vertex_ranks(graph, &graph.cells()[core_cell].vertices);
    let border_ranks = rank::vertex_ranks(graph, &rank::border_vertices(graph));

    let mut edges: Vec<EdgeState> = graph
        .edges()
        .iter()
        .map(|e| EdgeState {
            area: panel_area(graph, e.index),
            ..EdgeState::default()
        })
        .collect();

    let cycle = wall::find_wall_cycle(graph, &cell_ranks, wall_radius, tuning.cycle_search_budget);
    let mut wall = cycle
        .map(|cycle| wall::build_wall_segments(graph, &cycle))
        .unwrap_or_default();
    for segment in &wall {
        edges[segment.edge].is_wall = true;
    }

    let wall_edges: Vec<usize> = wall.iter().map(|s| s.edge).collect();
    let areas: Vec<f32> = edges.iter().map(|e| e.area).collect();
    let gateways =
        gateway::select_gateways(graph, &wall_edges, &areas, tuning.min_gateway_distance);
    for &g in &gateways {
        edges[g].is_gateway = true;
    }
    for segment in &mut wall {
        segment.has_gate = edges[segment.edge].is_gateway;
    }

    let (highways, on_street) =
        highway::route_highways(graph, &gateways, &core_ranks, &border_ranks);

    let vertices: Vec<VertexState> = (0..graph.vertices().len())
        .map(|v| VertexState {
            rank: core_ranks[v],
            border_rank: border_ranks[v],
            on_street: on_street[v],
        })
        .collect();

    let districts: Vec<District> = graph
        .cells()
        .iter()
        .map(|cell| {
            let rank = cell_ranks[cell.index];
            let parcels = if rank.is_some_and(|r| r <= wall_radius) {
                parcel::subdivide_district(graph, cell.index, tuning)
            } else {
                Vec::new()
            };
            District {
                rank,
                area: graph.cell_area(cell.index),
                centroid: graph.cell_centroid(cell.index),
                parcels,
            }
        })
        .collect();

    log::debug!("districts generated in {:?}", start.elapsed());

    Some(DistrictLayout {
        core_cell,
        districts,
        vertices,
        edges,
        wall,
        gateways,
        highways,
    })
}

/// Area of the kite spanned by an edge and the centers of its cells
///
/// Border edges reference one cell, giving a single triangle.
fn panel_area(graph: &Graph, edge: usize) -> f32 {
    let e = &graph.edges()[edge];
    let a = graph.vertices()[e.vertices[0]].position;
    let b = graph.vertices()[e.vertices[1]].position;
    let first = polygon_area(&[a, b, graph.cells()[e.cells[0]].center]);
    if e.is_border() {
        first
    } else {
        first + polygon_area(&[a, b, graph.cells()[e.cells[1]].center])
    }
}
