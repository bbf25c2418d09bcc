//! Error types for settlement generation

use thiserror::Error;

/// Errors that can occur during settlement generation
///
/// Only input-precondition failures are reported here. Geometry searches that
/// come up empty (no wall ring, an unsplittable polygon) are not errors; the
/// affected entity is simply left out of the result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettlementError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The site set cannot produce a planar subdivision
    #[error("degenerate site set: {0}")]
    DegenerateSites(String),

    /// Tile index is past the supported range
    #[error("tile index {index} out of range (max {max})")]
    TileOutOfRange {
        /// Requested tile index
        index: u32,
        /// Largest accepted tile index
        max: u32,
    },

    /// Generation failed due to geometry issues
    #[error("generation failed: {0}")]
    GenerationFailed(String),

    /// Two molds in one catalogue share an identifier
    #[error("duplicate mold id: {0}")]
    DuplicateMold(String),
}

/// Result type alias for settlement operations
pub type Result<T> = std::result::Result<T, SettlementError>;
