//! Gateway selection
//!
//! Wall edges are ranked widest-first (distance between the two cell centers
//! they separate) and taken greedily. Each accepted gateway reserves every
//! cell within `min_distance` hops of its two cells, which spreads openings
//! around the perimeter.

use crate::graph::Graph;

/// Pick gateway edges from `wall_edges`
///
/// `edge_areas` (indexed by edge) breaks ties between equally wide
/// candidates, larger first; remaining ties go to the lower edge index.
/// Returns the chosen edges in selection order.
pub fn select_gateways(
    graph: &Graph,
    wall_edges: &[usize],
    edge_areas: &[f32],
    min_distance: u32,
) -> Vec<usize> {
    let cells = graph.cells();
    let width = |e: usize| {
        let [a, b] = graph.edges()[e].cells;
        cells[a].center.distance(cells[b].center)
    };

    let mut candidates: Vec<(usize, f32)> = wall_edges.iter().map(|&e| (e, width(e))).collect();
    candidates.sort_by(|a, b| {
        b.1.total_cmp(&a.1)
            .then(edge_areas[b.0].total_cmp(&edge_areas[a.0]))
            .then(a.0.cmp(&b.0))
    });

    let mut reserved = vec![false; cells.len()];
    let mut gateways = Vec::new();

    for (edge, _) in candidates {
        let [a, b] = graph.edges()[edge].cells;
        if reserved[a] || reserved[b] {
            continue;
        }
        gateways.push(edge);
        for origin in [a, b] {
            for cell in graph.cells_within_hops(origin, min_distance) {
                reserved[cell] = true;
            }
        }
    }

    gateways
}

/// Hop distance between two cells, `None` if disconnected
#[cfg(test)]
pub(crate) fn hop_distance(graph: &Graph, from: usize, to: usize) -> Option<u32> {
    let ranks = super::rank::cell_ranks(graph, from);
    ranks.get(to).copied().flatten()
}
