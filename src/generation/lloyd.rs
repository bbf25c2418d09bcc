//! Lloyd's Relaxation for uniform site distribution
//!
//! Each pass rebuilds the bounded Voronoi diagram and moves every site to the
//! average of its cell's boundary vertices. Sites are matched to cells by
//! array order, so the output list only contains sites that produced a cell.

use std::time::Instant;

use glam::{DVec2, Vec2};

use crate::error::Result;
use crate::geometry::Rect;

use super::delaunay::compute_delaunay;
use super::voronoi::generate_cells;

/// Options for Lloyd's relaxation algorithm
#[derive(Debug, Clone, Copy)]
pub struct LloydOptions {
    /// Maximum number of iterations to run
    pub max_iterations: usize,
    /// Convergence threshold as a fraction of the bounds diagonal
    ///
    /// Relaxation stops early when the largest site displacement in a pass
    /// falls below `convergence_threshold * diagonal`. Set to 0.0 to always
    /// run `max_iterations` passes.
    pub convergence_threshold: f32,
}

impl Default for LloydOptions {
    fn default() -> Self {
        Self {
            max_iterations: 2,
            convergence_threshold: 0.0,
        }
    }
}

/// Apply a fixed number of relaxation passes
pub fn lloyd_relaxation(sites: Vec<Vec2>, bounds: &Rect, iterations: usize) -> Result<Vec<Vec2>> {
    let options = LloydOptions {
        max_iterations: iterations,
        ..Default::default()
    };
    lloyd_relaxation_with_options(sites, bounds, options)
}

/// Apply Lloyd's Relaxation with custom options
///
/// # Errors
///
/// Propagates triangulation failures for degenerate site sets.
pub fn lloyd_relaxation_with_options(
    mut sites: Vec<Vec2>,
    bounds: &Rect,
    options: LloydOptions,
) -> Result<Vec<Vec2>> {
    let threshold = options.convergence_threshold * bounds.diagonal();
    let weld = super::weld_distance(bounds);
    let total_start = Instant::now();

    for iteration in 0..options.max_iterations {
        let delaunay = compute_delaunay(&sites)?;
        let cells = generate_cells(&delaunay, bounds, weld);

        let mut max_displacement: f32 = 0.0;
        let relaxed: Vec<Vec2> = cells
            .iter()
            .map(|cell| {
                let sum: DVec2 = cell.polygon.iter().copied().sum();
                let average = (sum / cell.polygon.len() as f64).as_vec2();
                max_displacement = max_displacement.max(average.distance(sites[cell.site]));
                average
            })
            .collect();
        sites = relaxed;

        log::debug!(
            "lloyd pass {}: {} sites, max displacement {:.4}",
            iteration + 1,
            sites.len(),
            max_displacement
        );

        if threshold > 0.0 && max_displacement < threshold {
            log::debug!("lloyd converged after {} passes", iteration + 1);
            break;
        }
    }

    log::debug!("lloyd relaxation finished in {:?}", total_start.elapsed());
    Ok(sites)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::sites::generate_sites;

    /// Standard deviation of cell areas, a rough uniformity measure
    fn area_spread(sites: &[Vec2], bounds: &Rect) -> f64 {
        let delaunay = compute_delaunay(sites).unwrap();
        let cells = generate_cells(&delaunay, bounds, 1e-6);
        let areas: Vec<f64> = cells
            .iter()
            .map(|c| {
                let n = c.polygon.len();
                (0..n)
                    .map(|i| c.polygon[i].perp_dot(c.polygon[(i + 1) % n]))
                    .sum::<f64>()
                    * 0.5
            })
            .collect();
        let mean = areas.iter().sum::<f64>() / areas.len() as f64;
        (areas.iter().map(|a| (a - mean).powi(2)).sum::<f64>() / areas.len() as f64).sqrt()
    }

    #[test]
    fn test_lloyd_relaxation() {
        let bounds = Rect::from_size(100.0, 100.0);
        let sites = generate_sites(60, &bounds, 42, 0);
        let relaxed = lloyd_relaxation(sites.clone(), &bounds, 3).unwrap();

        assert_eq!(relaxed.len(), 60);
        assert!(relaxed.iter().all(|p| bounds.contains(*p)));
        assert!(area_spread(&relaxed, &bounds) < area_spread(&sites, &bounds));
    }

    #[test]
    fn test_lloyd_relaxation_determinism() {
        let bounds = Rect::from_size(100.0, 100.0);
        let a = lloyd_relaxation(generate_sites(40, &bounds, 12345, 2), &bounds, 2).unwrap();
        let b = lloyd_relaxation(generate_sites(40, &bounds, 12345, 2), &bounds, 2).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_lloyd_zero_iterations() {
        let bounds = Rect::from_size(100.0, 100.0);
        let sites = generate_sites(10, &bounds, 1, 0);
        let relaxed = lloyd_relaxation(sites.clone(), &bounds, 0).unwrap();
        assert_eq!(relaxed, sites);
    }

    #[test]
    fn test_lloyd_convergence_stops_early() {
        let bounds = Rect::from_size(100.0, 100.0);
        let sites = generate_sites(30, &bounds, 7, 0);
        let options = LloydOptions {
            max_iterations: 20,
            convergence_threshold: 1.0,
        };
        // A threshold of a whole diagonal is met by the first pass
        let once = lloyd_relaxation_with_options(sites.clone(), &bounds, options).unwrap();
        let reference = lloyd_relaxation(sites, &bounds, 1).unwrap();
        assert_eq!(once, reference);
    }
}
