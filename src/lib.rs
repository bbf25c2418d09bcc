//! Voronoi-based settlement layout generation
//!
//! A standalone library that lays out a walled settlement on a 2-D Voronoi
//! subdivision: districts ranked by distance from a core, a perimeter wall
//! with gateways, a highway network and building parcels. Output is plain
//! indexed data, suitable for any game engine.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use voronoi_settlement::*;
//!
//! // Generate a settlement for tile 3 of world seed 42
//! let config = SettlementConfigBuilder::new()
//!     .seed(42)
//!     .tile_index(3).unwrap()
//!     .wall_radius(3)
//!     .relaxations(2).unwrap()
//!     .build().unwrap();
//!
//! let settlement = Settlement::generate(config).unwrap();
//! println!("{} wall segments, {} parcels", settlement.wall().len(), settlement.parcel_count());
//!
//! // Put buildings on the parcels
//! let catalogue = MoldCatalogue::from_molds([
//!     Mold::new("house", 5.0, 4.0, MoldKind::Building),
//!     Mold::new("gate", 6.0, 3.0, MoldKind::Gate),
//!     Mold::new("wall", 2.0, 1.0, MoldKind::Wall),
//! ]).unwrap();
//!
//! let mut layer = PlacementLayer::new();
//! layer.spawn(&settlement, &catalogue, &FlatTerrain::default());
//! ```
//!
//! # Features
//!
//! - `serde`: Enables serialization support for configuration, graph,
//!   settlement and placement types

// Modules
pub mod config;
pub mod district;
pub mod error;
pub mod generation;
pub mod geometry;
pub mod graph;
pub mod placement;
pub mod settlement;
pub mod spatial;
pub mod terrain;

// Re-export core types for convenience
pub use config::{DistrictTuning, SettlementConfig, SettlementConfigBuilder};
pub use district::{
    District, DistrictLayout, EdgeState, HighwayKind, HighwaySegment, Parcel, VertexState, WallSegment,
};
pub use error::{Result, SettlementError};
pub use generation::{generate_sites, LloydOptions, PlanarSubdivision};
pub use geometry::Rect;
pub use graph::{Cell, Edge, Graph, Vertex};
pub use placement::{Mold, MoldCatalogue, MoldId, MoldKind, Placement, PlacementLayer, PlacementSource};
pub use settlement::Settlement;
pub use spatial::SpatialGrid;
pub use terrain::{FlatTerrain, HeightSampler};

// Re-export glam vectors for convenience
pub use glam::{Vec2, Vec3};
