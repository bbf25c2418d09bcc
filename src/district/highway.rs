//! Highway routing
//!
//! Inbound highways descend the core-distance field from each gateway to the
//! core. Outbound highways descend the border-distance field from the
//! gateway's outer end, preferring steps that keep heading the way the
//! gateway points.

use std::collections::HashSet;

use glam::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::Graph;

/// Which part of the network a highway segment belongs to
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighwayKind {
    /// Runs along the gateway edge itself
    Gateway,
    /// Leads from a gateway toward the core
    Inbound,
    /// Leads from a gateway out to the map edge
    Outbound,
}

/// A highway piece between two adjacent vertices
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighwaySegment {
    pub from: usize,
    pub to: usize,
    pub kind: HighwayKind,
}

impl HighwaySegment {
    /// Endpoint positions
    pub fn line(&self, graph: &Graph) -> [Vec2; 2] {
        [
            graph.vertices()[self.from].position,
            graph.vertices()[self.to].position,
        ]
    }
}

/// Route highways for every gateway
///
/// `core_ranks` and `border_ranks` are vertex distance fields from the core
/// cell and from the bounding rectangle. Returns the segments (each vertex
/// pair at most once) and the per-vertex street flags.
pub fn route_highways(
    graph: &Graph,
    gateways: &[usize],
    core_ranks: &[Option<u32>],
    border_ranks: &[Option<u32>],
) -> (Vec<HighwaySegment>, Vec<bool>) {
    let mut router = Router {
        graph,
        segments: Vec::new(),
        seen: HashSet::new(),
        on_street: vec![false; graph.vertices().len()],
    };

    for &gateway in gateways {
        let [a, b] = graph.edges()[gateway].vertices;
        router.emit(a, b, HighwayKind::Gateway);

        let rank = |v: usize| core_ranks[v].unwrap_or(u32::MAX);
        let (inner, outer) = if rank(b) < rank(a) { (b, a) } else { (a, b) };

        router.descend_inbound(inner, core_ranks);

        let heading = (graph.vertices()[outer].position - graph.vertices()[inner].position)
            .normalize_or_zero();
        router.descend_outbound(outer, heading, border_ranks);
    }

    (router.segments, router.on_street)
}

struct Router<'a> {
    graph: &'a Graph,
    segments: Vec<HighwaySegment>,
    seen: HashSet<(usize, usize)>,
    on_street: Vec<bool>,
}

impl Router<'_> {
    fn emit(&mut self, from: usize, to: usize, kind: HighwayKind) {
        self.on_street[from] = true;
        self.on_street[to] = true;
        if self.seen.insert((from.min(to), from.max(to))) {
            self.segments.push(HighwaySegment { from, to, kind });
        }
    }

    /// Step to the lowest-ranked neighbour while ranks strictly decrease
    fn descend_inbound(&mut self, start: usize, ranks: &[Option<u32>]) {
        let vertices = self.graph.vertices();
        let mut current = start;

        while let Some(rank) = ranks[current] {
            let next = vertices[current]
                .neighbors
                .iter()
                .copied()
                .filter_map(|n| ranks[n].filter(|&r| r < rank).map(|r| (n, r)))
                .fold(None, |best: Option<(usize, u32)>, (n, r)| match best {
                    Some((_, br)) if br <= r => best,
                    _ => Some((n, r)),
                });
            let Some((next, _)) = next else { break };
            self.emit(current, next, HighwayKind::Inbound);
            current = next;
        }
    }

    /// Step toward the map edge, keeping as straight as the field allows
    fn descend_outbound(&mut self, start: usize, heading: Vec2, ranks: &[Option<u32>]) {
        let vertices = self.graph.vertices();
        let mut current = start;

        while let Some(rank) = ranks[current] {
            let here = vertices[current].position;
            let next = vertices[current]
                .neighbors
                .iter()
                .copied()
                .filter(|&n| ranks[n].is_some_and(|r| r < rank))
                .map(|n| (n, (vertices[n].position - here).normalize_or_zero().dot(heading)))
                .fold(None, |best: Option<(usize, f32)>, (n, score)| match best {
                    Some((_, bs)) if bs >= score => best,
                    _ => Some((n, score)),
                });
            let Some((next, _)) = next else { break };
            self.emit(current, next, HighwayKind::Outbound);
            current = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::district::rank::{border_vertices, vertex_ranks};
    use crate::generation::{generate_sites, PlanarSubdivision};
    use crate::geometry::Rect;

    fn setup() -> (Graph, Vec<Option<u32>>, Vec<Option<u32>>) {
        let bounds = Rect::from_size(300.0, 300.0);
        let sites = generate_sites(100, &bounds, 8, 0);
        let graph = PlanarSubdivision::generate(&sites, bounds, 2).unwrap();
        let core = graph.core_cell().unwrap();
        let core_ranks = vertex_ranks(&graph, &graph.cells()[core].vertices);
        let border_ranks = vertex_ranks(&graph, &border_vertices(&graph));
        (graph, core_ranks, border_ranks)
    }

    /// Any interior edge a few hops out stands in for a gateway
    fn some_edge(graph: &Graph, core_ranks: &[Option<u32>]) -> usize {
        graph
            .edges()
            .iter()
            .find(|e| {
                !e.is_border()
                    && e.vertices.iter().all(|&v| core_ranks[v].is_some_and(|r| (2..=4).contains(&r)))
            })
            .map(|e| e.index)
            .unwrap()
    }

    #[test]
    fn test_inbound_reaches_core() {
        let (graph, core_ranks, border_ranks) = setup();
        let gateway = some_edge(&graph, &core_ranks);
        let (segments, on_street) = route_highways(&graph, &[gateway], &core_ranks, &border_ranks);

        assert_eq!(segments[0].kind, HighwayKind::Gateway);
        let inbound: Vec<&HighwaySegment> =
            segments.iter().filter(|s| s.kind == HighwayKind::Inbound).collect();
        assert!(!inbound.is_empty());
        for s in &inbound {
            assert_eq!(core_ranks[s.to].unwrap() + 1, core_ranks[s.from].unwrap());
            assert!(graph.vertices()[s.from].neighbors.contains(&s.to));
        }
        assert_eq!(core_ranks[inbound.last().unwrap().to], Some(0));

        for s in &segments {
            assert!(on_street[s.from] && on_street[s.to]);
        }
    }

    #[test]
    fn test_outbound_reaches_border() {
        let (graph, core_ranks, border_ranks) = setup();
        let gateway = some_edge(&graph, &core_ranks);
        let (segments, _) = route_highways(&graph, &[gateway], &core_ranks, &border_ranks);

        let outbound: Vec<&HighwaySegment> =
            segments.iter().filter(|s| s.kind == HighwayKind::Outbound).collect();
        assert!(!outbound.is_empty());
        for s in &outbound {
            assert!(border_ranks[s.to].unwrap() < border_ranks[s.from].unwrap());
        }
        assert!(graph.vertices()[outbound.last().unwrap().to].border);
    }

    #[test]
    fn test_outbound_keeps_heading() {
        let (graph, core_ranks, border_ranks) = setup();
        let gateway = some_edge(&graph, &core_ranks);
        let (segments, _) = route_highways(&graph, &[gateway], &core_ranks, &border_ranks);

        let vertices = graph.vertices();
        let [a, b] = graph.edges()[gateway].vertices;
        let core = |v: usize| core_ranks[v].unwrap_or(u32::MAX);
        let (inner, outer) = if core(b) < core(a) { (b, a) } else { (a, b) };
        let heading = (vertices[outer].position - vertices[inner].position).normalize_or_zero();
        let score = |from: usize, to: usize| {
            (vertices[to].position - vertices[from].position)
                .normalize_or_zero()
                .dot(heading)
        };

        let outbound: Vec<&HighwaySegment> =
            segments.iter().filter(|s| s.kind == HighwayKind::Outbound).collect();
        assert!(!outbound.is_empty());
        for s in outbound {
            let rank = border_ranks[s.from].unwrap();
            let best = vertices[s.from]
                .neighbors
                .iter()
                .copied()
                .filter(|&n| border_ranks[n].is_some_and(|r| r < rank))
                .map(|n| score(s.from, n))
                .fold(f32::NEG_INFINITY, f32::max);
            assert_eq!(score(s.from, s.to), best, "step {} -> {}", s.from, s.to);
        }
    }

    #[test]
    fn test_segments_unique() {
        let (graph, core_ranks, border_ranks) = setup();
        let gateway = some_edge(&graph, &core_ranks);
        // Routing the same gateway twice adds nothing new
        let (segments, _) = route_highways(&graph, &[gateway, gateway], &core_ranks, &border_ranks);
        let mut pairs: Vec<(usize, usize)> =
            segments.iter().map(|s| (s.from.min(s.to), s.from.max(s.to))).collect();
        let total = pairs.len();
        pairs.sort_unstable();
        pairs.dedup();
        assert_eq!(pairs.len(), total);
    }
}
