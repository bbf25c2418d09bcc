//! Delaunay triangulation of 2-D sites
//!
//! Thin wrapper around `spade`'s incremental Delaunay triangulation. Only the
//! vertex adjacency is kept: each site's Delaunay neighbours are exactly the
//! sites whose bisectors bound its Voronoi cell.

use glam::{DVec2, Vec2};
use spade::{DelaunayTriangulation, Point2, Triangulation};

use crate::error::{Result, SettlementError};

/// Site adjacency extracted from a Delaunay triangulation
///
/// Vertex `i` of the triangulation corresponds to input site `sites[i]`.
/// Duplicate input points are collapsed onto the first occurrence.
#[derive(Debug, Clone)]
pub struct DelaunayResult {
    /// Input site index for every triangulation vertex
    pub sites: Vec<usize>,
    /// Vertex positions
    pub positions: Vec<DVec2>,
    /// Sorted Delaunay neighbours of every vertex
    pub neighbors: Vec<Vec<usize>>,
}

/// Triangulate a site set
///
/// # Errors
///
/// - `DegenerateSites` if fewer than 3 distinct sites remain or all sites
///   are collinear
/// - `GenerationFailed` if a coordinate is not representable (NaN, too large)
pub fn compute_delaunay(points: &[Vec2]) -> Result<DelaunayResult> {
    let mut triangulation: DelaunayTriangulation<Point2<f64>> = DelaunayTriangulation::new();
    let mut sites = Vec::with_capacity(points.len());

    for (site, p) in points.iter().enumerate() {
        let handle = triangulation
            .insert(Point2::new(p.x as f64, p.y as f64))
            .map_err(|e| {
                SettlementError::GenerationFailed(format!("site {} at {:?}: {:?}", site, p, e))
            })?;
        if handle.index() == sites.len() {
            sites.push(site);
        } else {
            log::debug!("site {} duplicates site {}, skipped", site, sites[handle.index()]);
        }
    }

    if triangulation.num_vertices() < 3 {
        return Err(SettlementError::DegenerateSites(format!(
            "{} distinct sites, need at least 3",
            triangulation.num_vertices()
        )));
    }
    if triangulation.all_vertices_on_line() {
        return Err(SettlementError::DegenerateSites(
            "all sites are collinear".into(),
        ));
    }

    let mut positions = Vec::with_capacity(sites.len());
    let mut neighbors = Vec::with_capacity(sites.len());
    for vertex in triangulation.vertices() {
        let p = vertex.position();
        positions.push(DVec2::new(p.x, p.y));

        let mut adjacent: Vec<usize> = vertex.out_edges().map(|e| e.to().fix().index()).collect();
        adjacent.sort_unstable();
        adjacent.dedup();
        neighbors.push(adjacent);
    }

    Ok(DelaunayResult {
        sites,
        positions,
        neighbors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_delaunay() {
        let points = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(5.0, 4.0),
        ];

        let result = compute_delaunay(&points).unwrap();

        assert_eq!(result.positions.len(), 5);
        assert_eq!(result.sites, vec![0, 1, 2, 3, 4]);
        // The inner point is connected to all four corners
        assert_eq!(result.neighbors[4], vec![0, 1, 2, 3]);
        for (i, list) in result.neighbors.iter().enumerate() {
            for &n in list {
                assert!(result.neighbors[n].contains(&i));
            }
        }
    }

    #[test]
    fn test_duplicates_collapsed() {
        let points = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 10.0),
        ];
        let result = compute_delaunay(&points).unwrap();
        assert_eq!(result.sites, vec![0, 1, 3]);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(matches!(
            compute_delaunay(&[]),
            Err(SettlementError::DegenerateSites(_))
        ));

        let repeated = vec![Vec2::ONE; 10];
        assert!(matches!(
            compute_delaunay(&repeated),
            Err(SettlementError::DegenerateSites(_))
        ));

        let line: Vec<Vec2> = (0..6).map(|i| Vec2::new(i as f32, 2.0 * i as f32)).collect();
        assert!(matches!(
            compute_delaunay(&line),
            Err(SettlementError::DegenerateSites(_))
        ));
    }

    #[test]
    fn test_nan_rejected() {
        let points = vec![Vec2::ZERO, Vec2::new(f32::NAN, 1.0), Vec2::ONE];
        assert!(matches!(
            compute_delaunay(&points),
            Err(SettlementError::GenerationFailed(_))
        ));
    }
}
