//! Settlement main structure

use glam::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{DistrictTuning, SettlementConfig};
use crate::district::{self, District, DistrictLayout, HighwaySegment, Parcel, WallSegment};
use crate::error::{Result, SettlementError};
use crate::generation::{generate_sites, PlanarSubdivision};
use crate::graph::Graph;

/// A generated settlement: the planar subdivision plus its district layout
///
/// Rebuilt from scratch by every [`Settlement::generate`] call and immutable
/// afterwards. All cross references are indices into [`Settlement::graph`].
///
/// # Examples
///
/// ```
/// use voronoi_settlement::*;
///
/// let config = SettlementConfigBuilder::new()
///     .seed(42)
///     .site_count(80)
///     .unwrap()
///     .wall_radius(2)
///     .build()
///     .unwrap();
///
/// let settlement = Settlement::generate(config).unwrap();
/// println!("{} cells, {} wall segments", settlement.cell_count(), settlement.wall().len());
///
/// let core = settlement.core_cell();
/// assert_eq!(settlement.district(core).unwrap().rank, Some(0));
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct Settlement {
    /// Configuration used to generate this settlement
    config: SettlementConfig,

    graph: Graph,

    layout: DistrictLayout,
}

impl Settlement {
    /// Generate a settlement from a configuration
    ///
    /// Draws `site_count` sites from the `(seed, tile_index)` stream, builds
    /// the relaxed subdivision, then runs the district stages.
    ///
    /// # Errors
    ///
    /// Returns an error if the sites are degenerate or the configuration was
    /// built by hand with out-of-range values.
    ///
    /// # Example
    ///
    /// ```
    /// use voronoi_settlement::*;
    ///
    /// let config = SettlementConfigBuilder::new().seed(7).build().unwrap();
    /// let a = Settlement::generate(config).unwrap();
    /// let b = Settlement::generate(config).unwrap();
    /// assert_eq!(a.layout(), b.layout());
    /// ```
    pub fn generate(config: SettlementConfig) -> Result<Self> {
        config.validate()?;

        let sites = generate_sites(config.site_count, &config.bounds, config.seed, config.tile_index);
        let graph = PlanarSubdivision::generate(&sites, config.bounds, config.relaxations)?;
        let mut settlement = Self::from_graph(graph, config.wall_radius, &config.tuning)?;
        settlement.config = config;

        log::info!(
            "settlement (seed {}, tile {}): {} cells, wall of {} segments, {} gateways, {} parcels",
            config.seed,
            config.tile_index,
            settlement.cell_count(),
            settlement.wall().len(),
            settlement.gateways().len(),
            settlement.parcel_count()
        );
        Ok(settlement)
    }

    /// Run the district stages over an existing subdivision
    ///
    /// The stored configuration takes the graph's bounds, `wall_radius` and
    /// `tuning`; seed and site fields keep their defaults since the sites did
    /// not come from this crate.
    ///
    /// # Errors
    ///
    /// `GenerationFailed` if the graph has no cells.
    pub fn from_graph(graph: Graph, wall_radius: u32, tuning: &DistrictTuning) -> Result<Self> {
        let layout = district::generate_districts(&graph, wall_radius, tuning)
            .ok_or_else(|| SettlementError::GenerationFailed("graph has no cells".into()))?;

        let config = SettlementConfig {
            bounds: *graph.bounds(),
            wall_radius,
            site_count: graph.cell_count(),
            tuning: *tuning,
            ..SettlementConfig::default()
        };

        Ok(Self { config, graph, layout })
    }

    #[inline]
    pub fn config(&self) -> &SettlementConfig {
        &self.config
    }

    /// The underlying cell/vertex/edge graph
    #[inline]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// District annotations, indexed like the graph arrays
    #[inline]
    pub fn layout(&self) -> &DistrictLayout {
        &self.layout
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.graph.cell_count()
    }

    /// Cell closest to the middle of the bounds (rank 0)
    #[inline]
    pub fn core_cell(&self) -> usize {
        self.layout.core_cell
    }

    /// District annotations of one cell, `None` if out of range
    #[inline]
    pub fn district(&self, cell: usize) -> Option<&District> {
        self.layout.districts.get(cell)
    }

    /// Closed counter-clockwise wall, empty when none was found
    #[inline]
    pub fn wall(&self) -> &[WallSegment] {
        &self.layout.wall
    }

    /// Gateway edge indices
    #[inline]
    pub fn gateways(&self) -> &[usize] {
        &self.layout.gateways
    }

    #[inline]
    pub fn highways(&self) -> &[HighwaySegment] {
        &self.layout.highways
    }

    /// Every parcel paired with the cell it belongs to
    pub fn parcels(&self) -> impl Iterator<Item = (usize, &Parcel)> + '_ {
        self.layout
            .districts
            .iter()
            .enumerate()
            .flat_map(|(cell, d)| d.parcels.iter().map(move |p| (cell, p)))
    }

    pub fn parcel_count(&self) -> usize {
        self.layout.districts.iter().map(|d| d.parcels.len()).sum()
    }

    /// Find the cell containing a point
    ///
    /// # Example
    ///
    /// ```
    /// # use voronoi_settlement::*;
    /// # let settlement = Settlement::generate(SettlementConfigBuilder::new().seed(3).build().unwrap()).unwrap();
    /// let middle = settlement.config().bounds.center();
    /// assert!(settlement.cell_at(middle).is_some());
    /// ```
    #[inline]
    pub fn cell_at(&self, point: Vec2) -> Option<usize> {
        self.graph.cell_at(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SettlementConfigBuilder;
    use crate::district::gateway::hop_distance;
    use crate::district::parcel::district_outline;
    use crate::geometry::{polygon_area, signed_area, Rect};

    fn config(seed: u64, tile: u32) -> SettlementConfig {
        SettlementConfigBuilder::new()
            .seed(seed)
            .tile_index(tile)
            .unwrap()
            .bounds(Vec2::ZERO, Vec2::new(400.0, 400.0))
            .unwrap()
            .site_count(150)
            .unwrap()
            .wall_radius(3)
            .build()
            .unwrap()
    }

    fn hex_graph() -> Graph {
        let center = Vec2::new(50.0, 50.0);
        let mut sites = vec![center];
        for k in 0..6 {
            let angle = std::f32::consts::FRAC_PI_3 * k as f32;
            sites.push(center + Vec2::new(angle.cos(), angle.sin()) * 25.0);
        }
        PlanarSubdivision::generate(&sites, Rect::from_size(100.0, 100.0), 0).unwrap()
    }

    #[test]
    fn test_deterministic() {
        let a = Settlement::generate(config(21, 4)).unwrap();
        let b = Settlement::generate(config(21, 4)).unwrap();

        assert_eq!(a.graph().cells(), b.graph().cells());
        assert_eq!(a.graph().vertices(), b.graph().vertices());
        assert_eq!(a.graph().edges(), b.graph().edges());
        assert_eq!(a.layout(), b.layout());
    }

    #[test]
    fn test_tiles_differ() {
        let a = Settlement::generate(config(21, 0)).unwrap();
        let b = Settlement::generate(config(21, 1)).unwrap();
        assert_ne!(a.graph().cells(), b.graph().cells());
    }

    #[test]
    fn test_graph_integrity() {
        let settlement = Settlement::generate(config(5, 0)).unwrap();
        let graph = settlement.graph();

        for edge in graph.edges() {
            assert!(edge.cells.iter().all(|&c| c < graph.cell_count()));
        }
        for cell in graph.cells() {
            for &n in &cell.neighbors {
                assert!(graph.cells()[n].neighbors.contains(&cell.index));
            }
        }
    }

    #[test]
    fn test_wall_closed_ccw() {
        let settlement = Settlement::generate(config(21, 0)).unwrap();
        let wall = settlement.wall();
        assert!(!wall.is_empty());

        for i in 0..wall.len() {
            let next = &wall[(i + 1) % wall.len()];
            assert_eq!(wall[i].cells[1], next.cells[0]);
        }
        let outline: Vec<Vec2> = wall.iter().map(|s| s.line[0]).collect();
        assert!(signed_area(&outline) > 0.0);

        for segment in wall {
            let rank = settlement.district(segment.cells[0]).unwrap().rank;
            assert_eq!(rank, Some(3));
        }
    }

    #[test]
    fn test_gateway_spacing() {
        let settlement = Settlement::generate(config(21, 0)).unwrap();
        let graph = settlement.graph();
        let min = settlement.config().tuning.min_gateway_distance;
        let gateways = settlement.gateways();

        for (i, &g) in gateways.iter().enumerate() {
            for &h in &gateways[i + 1..] {
                for &a in &graph.edges()[g].cells {
                    for &b in &graph.edges()[h].cells {
                        assert!(hop_distance(graph, a, b).unwrap() >= min);
                    }
                }
            }
        }
    }

    #[test]
    fn test_parcel_area() {
        let settlement = Settlement::generate(config(9, 0)).unwrap();
        assert!(settlement.parcel_count() > 0);

        let margin = settlement.config().tuning.street_margin;
        for (cell, district) in settlement.layout().districts.iter().enumerate() {
            if district.parcels.is_empty() {
                continue;
            }
            let outline = polygon_area(&district_outline(settlement.graph(), cell, margin));
            let total: f32 = district.parcels.iter().map(|p| p.area).sum();
            assert!(total <= outline + 1e-2);
            assert!(district.parcels.iter().all(|p| p.area > 0.0));
        }
    }

    #[test]
    fn test_rank_monotonic() {
        let settlement = Settlement::generate(config(13, 2)).unwrap();
        let core = settlement.core_cell();
        let rank = |c: usize| settlement.district(c).unwrap().rank;

        assert_eq!(rank(core), Some(0));
        for cell in settlement.graph().cells() {
            if cell.index == core {
                continue;
            }
            let min = cell.neighbors.iter().filter_map(|&n| rank(n)).min();
            assert_eq!(rank(cell.index), min.map(|m| m + 1));
        }
    }

    #[test]
    fn test_hex_ring() {
        let settlement = Settlement::from_graph(hex_graph(), 1, &DistrictTuning::default()).unwrap();

        assert_eq!(settlement.core_cell(), 0);
        assert_eq!(settlement.district(0).unwrap().rank, Some(0));
        assert_eq!(settlement.wall().len(), 6);
        assert_eq!(settlement.wall()[0].cells[0], settlement.wall()[5].cells[1]);
    }

    #[test]
    fn test_no_ring() {
        let settlement = Settlement::from_graph(hex_graph(), 5, &DistrictTuning::default()).unwrap();
        assert!(settlement.wall().is_empty());
        assert!(settlement.gateways().is_empty());
        assert!(settlement.highways().is_empty());
    }

    #[test]
    fn test_cell_at_site() {
        let settlement = Settlement::generate(config(2, 0)).unwrap();
        for cell in settlement.graph().cells() {
            assert_eq!(settlement.cell_at(cell.center), Some(cell.index));
        }
    }

    #[test]
    fn test_rejects_hand_built_config() {
        let config = SettlementConfig {
            site_count: 1,
            ..SettlementConfig::default()
        };
        assert!(Settlement::generate(config).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_round_trip() {
        let settlement = Settlement::generate(config(8, 0)).unwrap();
        let json = serde_json::to_string(&settlement).unwrap();
        let restored: Settlement = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.graph().cells(), settlement.graph().cells());
        assert_eq!(restored.layout(), settlement.layout());
        assert_eq!(restored.cell_at(settlement.graph().cells()[0].center), Some(0));
    }
}
