//! Settlement placement
//!
//! Assigns catalogue molds to parcels and wall segments. Fitting is
//! first-fit by footprint size only; placements are never tested against
//! each other for overlap.

mod mold;

pub use mold::{Mold, MoldCatalogue, MoldId, MoldKind};

use glam::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::district::WallSegment;
use crate::settlement::Settlement;
use crate::terrain::HeightSampler;

/// What a placement was derived from
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementSource {
    /// `parcel` indexes the parcels of district `cell`
    Parcel { cell: usize, parcel: usize },
    /// A run along wall segment `segment`
    WallRun { segment: usize },
    /// The corner at the start of wall segment `segment`
    WallCorner { segment: usize },
}

/// A mold instance placed in the world
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub mold: MoldId,

    pub kind: MoldKind,

    /// World position; plane `(x, y)` maps to `(x, z)`, height from the
    /// sampler goes to `y`
    pub position: Vec3,

    /// Rotation about the vertical axis in radians
    pub angle: f32,

    pub source: PlacementSource,
}

/// Placement records for one settlement at a time
///
/// # Example
///
/// ```
/// use voronoi_settlement::*;
///
/// let config = SettlementConfigBuilder::new().seed(11).build().unwrap();
/// let settlement = Settlement::generate(config).unwrap();
///
/// let catalogue = MoldCatalogue::from_molds([
///     Mold::new("house", 4.0, 4.0, MoldKind::Building),
///     Mold::new("wall", 1.0, 1.0, MoldKind::Wall),
/// ])
/// .unwrap();
///
/// let mut layer = PlacementLayer::new();
/// let count = layer.spawn(&settlement, &catalogue, &FlatTerrain::default()).len();
/// println!("{} placements", count);
///
/// layer.vacate();
/// assert!(layer.is_empty());
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacementLayer {
    placements: Vec<Placement>,
}

impl PlacementLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place molds over a settlement, replacing any previous records
    ///
    /// Each parcel takes the first `Building` mold whose width fits both the
    /// front and back spans and whose depth fits both side spans. Each wall
    /// segment takes one run: `Gate` when gated, `Ramp` when a neighbouring
    /// segment is gated, `Wall` otherwise; first-fit by width against the
    /// segment length. When the catalogue has a `Tower`, the first one is set
    /// at the start of every segment.
    pub fn spawn<S>(
        &mut self,
        settlement: &Settlement,
        catalogue: &MoldCatalogue,
        sampler: &S,
    ) -> &[Placement]
    where
        S: HeightSampler + ?Sized,
    {
        self.vacate();

        for (cell, district) in settlement.layout().districts.iter().enumerate() {
            for (index, parcel) in district.parcels.iter().enumerate() {
                let width_span = parcel.side_length(0).min(parcel.side_length(2));
                let depth_span = parcel.side_length(1).min(parcel.side_length(3));
                let Some(mold) = catalogue.first_fit(MoldKind::Building, width_span, depth_span) else {
                    continue;
                };
                self.place(
                    mold,
                    parcel.centroid.x,
                    parcel.centroid.y,
                    parcel.angle(),
                    PlacementSource::Parcel { cell, parcel: index },
                    sampler,
                );
            }
        }

        let wall = settlement.wall();
        let tower = catalogue.of_kind(MoldKind::Tower).next();
        for (index, segment) in wall.iter().enumerate() {
            let kind = run_kind(wall, index);
            if let Some(mold) = catalogue.of_kind(kind).find(|m| m.width <= segment.length()) {
                let mid = segment.midpoint();
                let source = PlacementSource::WallRun { segment: index };
                self.place(mold, mid.x, mid.y, segment.angle(), source, sampler);
            }
            if let Some(mold) = tower {
                let corner = segment.line[0];
                self.place(
                    mold,
                    corner.x,
                    corner.y,
                    segment.angle(),
                    PlacementSource::WallCorner { segment: index },
                    sampler,
                );
            }
        }

        log::debug!(
            "spawned {} placements from {} molds",
            self.placements.len(),
            catalogue.len()
        );
        &self.placements
    }

    /// Drop every placement record
    pub fn vacate(&mut self) {
        self.placements.clear();
    }

    #[inline]
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    fn place<S>(
        &mut self,
        mold: &Mold,
        x: f32,
        z: f32,
        angle: f32,
        source: PlacementSource,
        sampler: &S,
    ) where
        S: HeightSampler + ?Sized,
    {
        self.placements.push(Placement {
            mold: mold.id.clone(),
            kind: mold.kind,
            position: Vec3::new(x, sampler.vertical_offset_at(x, z), z),
            angle,
            source,
        });
    }
}

/// Mold kind for the run along `wall[index]`
fn run_kind(wall: &[WallSegment], index: usize) -> MoldKind {
    let n = wall.len();
    if wall[index].has_gate {
        MoldKind::Gate
    } else if wall[(index + n - 1) % n].has_gate || wall[(index + 1) % n].has_gate {
        MoldKind::Ramp
    } else {
        MoldKind::Wall
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SettlementConfigBuilder;
    use crate::terrain::FlatTerrain;
    use glam::Vec2;

    fn settlement() -> Settlement {
        let config = SettlementConfigBuilder::new()
            .seed(21)
            .bounds(Vec2::ZERO, Vec2::new(400.0, 400.0))
            .unwrap()
            .site_count(150)
            .unwrap()
            .wall_radius(3)
            .build()
            .unwrap();
        Settlement::generate(config).unwrap()
    }

    fn catalogue() -> MoldCatalogue {
        MoldCatalogue::from_molds([
            Mold::new("keep", 1000.0, 1000.0, MoldKind::Building),
            Mold::new("house", 2.0, 2.0, MoldKind::Building),
            Mold::new("gatehouse", 0.5, 4.0, MoldKind::Gate),
            Mold::new("ramp", 0.5, 2.0, MoldKind::Ramp),
            Mold::new("curtain", 0.5, 1.0, MoldKind::Wall),
            Mold::new("tower", 3.0, 3.0, MoldKind::Tower),
        ])
        .unwrap()
    }

    fn segment(has_gate: bool) -> WallSegment {
        WallSegment {
            cells: [0, 1],
            edge: 0,
            line: [Vec2::ZERO, Vec2::X],
            has_gate,
        }
    }

    #[test]
    fn test_run_kind() {
        let wall = [false, true, false, false, false].map(segment);
        assert_eq!(run_kind(&wall, 0), MoldKind::Ramp);
        assert_eq!(run_kind(&wall, 1), MoldKind::Gate);
        assert_eq!(run_kind(&wall, 2), MoldKind::Ramp);
        assert_eq!(run_kind(&wall, 3), MoldKind::Wall);
        assert_eq!(run_kind(&wall, 4), MoldKind::Wall);
    }

    #[test]
    fn test_spawn_parcels_and_wall() {
        let settlement = settlement();
        let mut layer = PlacementLayer::new();
        layer.spawn(&settlement, &catalogue(), &FlatTerrain::new(2.0));

        let buildings: Vec<&Placement> = layer
            .placements()
            .iter()
            .filter(|p| p.kind == MoldKind::Building)
            .collect();
        assert!(!buildings.is_empty());
        // "keep" never fits, so every parcel got the first mold that does
        assert!(buildings.iter().all(|p| p.mold == MoldId::from("house")));

        let wall = settlement.wall();
        let runs = layer
            .placements()
            .iter()
            .filter(|p| matches!(p.source, PlacementSource::WallRun { .. }))
            .count();
        let towers = layer.placements().iter().filter(|p| p.kind == MoldKind::Tower).count();
        assert_eq!(runs, wall.len());
        assert_eq!(towers, wall.len());

        let gates = layer.placements().iter().filter(|p| p.kind == MoldKind::Gate).count();
        assert_eq!(gates, settlement.gateways().len());

        assert!(layer.placements().iter().all(|p| p.position.y == 2.0));
    }

    #[test]
    fn test_parcel_placement_pose() {
        let settlement = settlement();
        let mut layer = PlacementLayer::new();
        layer.spawn(&settlement, &catalogue(), &FlatTerrain::default());

        for placement in layer.placements() {
            if let PlacementSource::Parcel { cell, parcel } = placement.source {
                let parcel = &settlement.district(cell).unwrap().parcels[parcel];
                assert_eq!(placement.position, Vec3::new(parcel.centroid.x, 0.0, parcel.centroid.y));
                assert_eq!(placement.angle, parcel.angle());
            }
        }
    }

    #[test]
    fn test_sampler_height() {
        let settlement = settlement();
        let mut layer = PlacementLayer::new();
        let slope = |x: f32, z: f32| x + z;
        layer.spawn(&settlement, &catalogue(), &slope);

        for p in layer.placements() {
            assert_eq!(p.position.y, p.position.x + p.position.z);
        }
    }

    #[test]
    fn test_vacate_and_respawn() {
        let settlement = settlement();
        let catalogue = catalogue();
        let mut layer = PlacementLayer::new();

        let first = layer.spawn(&settlement, &catalogue, &FlatTerrain::default()).len();
        assert!(first > 0);
        let second = layer.spawn(&settlement, &catalogue, &FlatTerrain::default()).len();
        assert_eq!(first, second);

        layer.vacate();
        assert!(layer.is_empty());
    }

    #[test]
    fn test_empty_catalogue() {
        let settlement = settlement();
        let mut layer = PlacementLayer::new();
        assert!(layer
            .spawn(&settlement, &MoldCatalogue::new(), &FlatTerrain::default())
            .is_empty());
    }
}
