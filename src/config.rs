//! Settlement Configuration and Builder
//!
//! This module provides configuration types for deterministic settlement generation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use glam::Vec2;

use crate::error::{Result, SettlementError};
use crate::geometry::Rect;

/// Number of buckets per axis in the point-lookup grid
pub const GRID_RESOLUTION: usize = 128;

/// Largest tile index accepted by [`SettlementConfigBuilder::tile_index`]
pub const MAX_TILE_INDEX: u32 = 65_535;

/// RNG words skipped per tile index before drawing site coordinates
///
/// Tiles sharing a world seed read disjoint windows of the same ChaCha stream
/// as long as `2 * site_count` stays below this stride.
pub const TILE_STREAM_STRIDE: u128 = 1 << 16;

/// Largest site count whose draws fit inside one tile's stream window
pub const MAX_SITE_COUNT: usize = (TILE_STREAM_STRIDE / 2) as usize;

/// Upper bound on Lloyd relaxation passes
pub const MAX_RELAXATIONS: u8 = 20;

/// Tunable constants of the district algorithms
///
/// None of these values carry correctness meaning; they shape how
/// "reasonable" the output looks.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistrictTuning {
    /// Cells within this many adjacency hops of a gateway are reserved
    pub min_gateway_distance: u32,

    /// Distance each district outline is pulled toward its center, leaving
    /// room for streets
    pub street_margin: f32,

    /// Longest allowed outline edge before densification inserts midpoints
    pub max_parcel_edge: f32,

    /// Both halves of a parcel split must exceed this area (world units²);
    /// must be positive
    pub min_split_area: f32,

    /// Maximum DFS steps spent searching for the wall cycle
    ///
    /// When exhausted the longest cycle found so far is kept.
    pub cycle_search_budget: usize,
}

impl Default for DistrictTuning {
    fn default() -> Self {
        Self {
            min_gateway_distance: 2,
            street_margin: 2.0,
            max_parcel_edge: 18.0,
            min_split_area: 1.0,
            cycle_search_budget: 2_000_000,
        }
    }
}

/// Configuration for deterministic settlement generation
///
/// The same configuration always produces the identical settlement, so a
/// host application may store this (a few dozen bytes) instead of the
/// generated layout.
///
/// # Example
///
/// ```rust
/// use voronoi_settlement::*;
///
/// let config = SettlementConfigBuilder::new()
///     .seed(42)
///     .tile_index(7)
///     .unwrap()
///     .wall_radius(2)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.tile_index, 7);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettlementConfig {
    /// World seed shared by every tile
    pub seed: u64,

    /// Tile identifier; selects a distinct window of the seeded RNG stream
    pub tile_index: u32,

    /// Rectangle the settlement is laid out in
    pub bounds: Rect,

    /// Graph distance (in cell hops from the core) at which the wall is sought
    pub wall_radius: u32,

    /// Number of random sites drawn inside `bounds`
    pub site_count: usize,

    /// Lloyd relaxation passes applied before the final diagram is built
    ///
    /// - 0: Raw random cells (irregular)
    /// - 2: Default, noticeably more uniform districts
    /// - 5+: Diminishing returns
    pub relaxations: u8,

    /// District algorithm constants
    pub tuning: DistrictTuning,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            tile_index: 0,
            bounds: Rect::from_size(500.0, 500.0),
            wall_radius: 3,
            site_count: 120,
            relaxations: 2,
            tuning: DistrictTuning::default(),
        }
    }
}

impl SettlementConfig {
    /// Re-run the builder checks on a configuration assembled by hand
    ///
    /// # Errors
    ///
    /// The same errors the corresponding [`SettlementConfigBuilder`] setters return
    pub fn validate(&self) -> Result<()> {
        SettlementConfigBuilder::new()
            .tile_index(self.tile_index)?
            .bounds(self.bounds.min, self.bounds.max)?
            .site_count(self.site_count)?
            .relaxations(self.relaxations)?
            .tuning(self.tuning)?;
        Ok(())
    }
}

/// Builder for creating SettlementConfig with validation
///
/// # Example
///
/// ```rust
/// use voronoi_settlement::*;
///
/// let config = SettlementConfigBuilder::new()
///     .seed(12345)
///     .site_count(80)
///     .unwrap()
///     .relaxations(3)
///     .unwrap()
///     .build()
///     .unwrap();
/// assert_eq!(config.site_count, 80);
/// ```
#[derive(Debug, Clone)]
pub struct SettlementConfigBuilder {
    seed: Option<u64>,
    tile_index: u32,
    bounds: Rect,
    wall_radius: u32,
    site_count: usize,
    relaxations: u8,
    tuning: DistrictTuning,
}

impl SettlementConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: Random (generated from thread_rng)
    /// - tile_index: 0
    /// - bounds: `[0, 0]..[500, 500]`
    /// - wall_radius: 3
    /// - site_count: 120
    /// - relaxations: 2
    pub fn new() -> Self {
        let defaults = SettlementConfig::default();
        Self {
            seed: None,
            tile_index: defaults.tile_index,
            bounds: defaults.bounds,
            wall_radius: defaults.wall_radius,
            site_count: defaults.site_count,
            relaxations: defaults.relaxations,
            tuning: defaults.tuning,
        }
    }

    /// Set the world seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the tile index
    ///
    /// # Errors
    ///
    /// Returns `TileOutOfRange` if `index > MAX_TILE_INDEX`
    pub fn tile_index(mut self, index: u32) -> Result<Self> {
        if index > MAX_TILE_INDEX {
            return Err(SettlementError::TileOutOfRange {
                index,
                max: MAX_TILE_INDEX,
            });
        }
        self.tile_index = index;
        Ok(self)
    }

    /// Set the layout rectangle
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the rectangle has no area or is not finite
    pub fn bounds(mut self, min: Vec2, max: Vec2) -> Result<Self> {
        let bounds = Rect::new(min, max);
        if !bounds.is_valid() {
            return Err(SettlementError::InvalidConfig(format!(
                "bounds must have positive finite extent (got {:?}..{:?})",
                min, max
            )));
        }
        self.bounds = bounds;
        Ok(self)
    }

    /// Set the wall radius (cell hops from the core)
    pub fn wall_radius(mut self, radius: u32) -> Self {
        self.wall_radius = radius;
        self
    }

    /// Set the number of sites drawn inside the bounds
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if fewer than 3 or more than `MAX_SITE_COUNT`
    /// sites are requested
    pub fn site_count(mut self, count: usize) -> Result<Self> {
        if !(3..=MAX_SITE_COUNT).contains(&count) {
            return Err(SettlementError::InvalidConfig(format!(
                "site count must be in 3..={} (got {})",
                MAX_SITE_COUNT, count
            )));
        }
        self.site_count = count;
        Ok(self)
    }

    /// Set the number of Lloyd relaxation passes
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `passes > MAX_RELAXATIONS`
    pub fn relaxations(mut self, passes: u8) -> Result<Self> {
        if passes > MAX_RELAXATIONS {
            return Err(SettlementError::InvalidConfig(format!(
                "relaxations must be <= {} (got {})",
                MAX_RELAXATIONS, passes
            )));
        }
        self.relaxations = passes;
        Ok(self)
    }

    /// Replace the district tuning constants
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for negative or non-finite distances and areas
    pub fn tuning(mut self, tuning: DistrictTuning) -> Result<Self> {
        let lengths = [
            ("street_margin", tuning.street_margin),
            ("max_parcel_edge", tuning.max_parcel_edge),
            ("min_split_area", tuning.min_split_area),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(SettlementError::InvalidConfig(format!(
                    "{} must be finite and >= 0 (got {})",
                    name, value
                )));
            }
        }
        if tuning.max_parcel_edge <= 0.0 || tuning.min_split_area <= 0.0 {
            return Err(SettlementError::InvalidConfig(
                "max_parcel_edge and min_split_area must be positive".into(),
            ));
        }
        self.tuning = tuning;
        Ok(self)
    }

    /// Build the configuration
    ///
    /// If no seed was provided, generates a random seed using thread_rng.
    pub fn build(self) -> Result<SettlementConfig> {
        let seed = self.seed.unwrap_or_else(rand::random);

        Ok(SettlementConfig {
            seed,
            tile_index: self.tile_index,
            bounds: self.bounds,
            wall_radius: self.wall_radius,
            site_count: self.site_count,
            relaxations: self.relaxations,
            tuning: self.tuning,
        })
    }
}

impl Default for SettlementConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
