//! Perimeter wall search
//!
//! The wall follows the longest simple cycle through the ring of cells whose
//! rank equals the wall radius. The search is an exhaustive DFS over that
//! ring with an explicit path stack; the stack depth is bounded by the ring
//! size.

use glam::Vec2;

use crate::geometry::signed_area;
use crate::graph::Graph;

use super::WallSegment;

/// Longest simple cycle through the cells with `rank == wall_radius`
///
/// The search starts from the lowest-index ring cell. Among cycles of equal
/// length the first one found wins. Returns `None` when the ring is empty or
/// contains no cycle of at least three cells. When `budget` DFS steps are
/// exhausted the best cycle found so far is returned.
pub fn find_wall_cycle(
    graph: &Graph,
    ranks: &[Option<u32>],
    wall_radius: u32,
    budget: usize,
) -> Option<Vec<usize>> {
    let in_ring: Vec<bool> = ranks.iter().map(|r| *r == Some(wall_radius)).collect();
    longest_cycle(&in_ring, |cell| graph.neighbors(cell), budget)
}

/// DFS behind [`find_wall_cycle`], over any adjacency lookup
fn longest_cycle<'a, F>(in_ring: &[bool], neighbors: F, budget: usize) -> Option<Vec<usize>>
where
    F: Fn(usize) -> &'a [usize],
{
    let ring_size = in_ring.iter().filter(|&&r| r).count();
    let start = in_ring.iter().position(|&r| r)?;

    let mut path = vec![start];
    let mut cursors = vec![0usize];
    let mut on_path = vec![false; in_ring.len()];
    on_path[start] = true;

    let mut best: Option<Vec<usize>> = None;
    let mut steps = 0usize;

    while let (Some(&node), Some(cursor)) = (path.last(), cursors.last_mut()) {
        steps += 1;
        if steps > budget {
            log::warn!(
                "wall cycle search stopped after {} steps; keeping cycle of {} cells",
                budget,
                best.as_ref().map_or(0, Vec::len)
            );
            break;
        }

        let around = neighbors(node);
        if *cursor >= around.len() {
            on_path[node] = false;
            path.pop();
            cursors.pop();
            continue;
        }

        let next = around[*cursor];
        *cursor += 1;

        if !in_ring.get(next).copied().unwrap_or(false) {
            continue;
        }
        if next == start {
            if path.len() >= 3 && best.as_ref().map_or(true, |b| path.len() > b.len()) {
                best = Some(path.clone());
                if path.len() == ring_size {
                    break;
                }
            }
            continue;
        }
        if on_path[next] {
            continue;
        }

        on_path[next] = true;
        path.push(next);
        cursors.push(0);
    }

    log::debug!(
        "wall search: ring of {} cells, {} steps, cycle length {}",
        ring_size,
        steps,
        best.as_ref().map_or(0, Vec::len)
    );
    best
}

/// Turn a cell cycle into wall segments with counter-clockwise winding
///
/// Consecutive cells must be adjacent. If the polygon through the cell
/// centers winds clockwise, the list is reversed and each segment's two cells
/// swapped, so segment `i` always ends where segment `i + 1` starts.
pub fn build_wall_segments(graph: &Graph, cycle: &[usize]) -> Vec<WallSegment> {
    let n = cycle.len();
    let mut segments: Vec<WallSegment> = Vec::with_capacity(n);

    for i in 0..n {
        let a = cycle[i];
        let b = cycle[(i + 1) % n];
        let Some(edge) = graph.shared_edge(a, b) else {
            log::debug!("wall cells {} and {} are not adjacent", a, b);
            return Vec::new();
        };
        segments.push(WallSegment {
            cells: [a, b],
            edge,
            line: [graph.cells()[a].center, graph.cells()[b].center],
            has_gate: false,
        });
    }

    let outline: Vec<Vec2> = segments.iter().map(|s| s.line[0]).collect();
    if signed_area(&outline) < 0.0 {
        segments.reverse();
        for segment in &mut segments {
            segment.cells.swap(0, 1);
            segment.line.swap(0, 1);
        }
    }

    segments
}
