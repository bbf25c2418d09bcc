//! Graph-distance fields
//!
//! Cell ranks are a plain BFS from the core cell. Vertex ranks come from a
//! multi-source relaxation: every seed starts at 0 and a vertex is queued
//! again whenever a shorter path to it turns up.

use std::collections::VecDeque;

use crate::graph::Graph;

/// Hop distance of every cell from `core`; `None` for unreachable cells
pub fn cell_ranks(graph: &Graph, core: usize) -> Vec<Option<u32>> {
    let cells = graph.cells();
    let mut ranks = vec![None; cells.len()];
    if core >= cells.len() {
        return ranks;
    }

    let mut queue = VecDeque::from([core]);
    ranks[core] = Some(0);

    while let Some(cell) = queue.pop_front() {
        let next = ranks[cell].map_or(0, |r| r + 1);
        for &n in &cells[cell].neighbors {
            if ranks[n].is_none() {
                ranks[n] = Some(next);
                queue.push_back(n);
            }
        }
    }

    ranks
}

/// Hop distance of every vertex from the nearest seed vertex
///
/// Seeds all start at rank 0. A neighbour's rank is lowered (and the
/// neighbour re-queued) whenever a shorter path is found, so the order of
/// seeds does not matter.
pub fn vertex_ranks(graph: &Graph, seeds: &[usize]) -> Vec<Option<u32>> {
    let vertices = graph.vertices();
    let mut ranks: Vec<Option<u32>> = vec![None; vertices.len()];
    let mut queue = VecDeque::new();

    for &seed in seeds {
        if seed < vertices.len() && ranks[seed] != Some(0) {
            ranks[seed] = Some(0);
            queue.push_back(seed);
        }
    }

    while let Some(v) = queue.pop_front() {
        let Some(rank) = ranks[v] else { continue };
        for &n in &vertices[v].neighbors {
            if ranks[n].map_or(true, |existing| rank + 1 < existing) {
                ranks[n] = Some(rank + 1);
                queue.push_back(n);
            }
        }
    }

    ranks
}

/// Vertices on the bounding rectangle, the seeds of the border distance field
pub fn border_vertices(graph: &Graph) -> Vec<usize> {
    graph
        .vertices()
        .iter()
        .filter(|v| v.border)
        .map(|v| v.index)
        .collect()
}
