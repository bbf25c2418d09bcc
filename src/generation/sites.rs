//! Seeded site placement
//!
//! Sites are drawn uniformly inside the bounds from a ChaCha stream seeded
//! with the world seed. The tile index selects how far into the stream the
//! draw starts, so neighbouring tiles get unrelated but reproducible layouts.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::TILE_STREAM_STRIDE;
use crate::geometry::Rect;

/// Create the RNG for a tile, already advanced past earlier tiles' windows
pub fn tile_rng(seed: u64, tile_index: u32) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_word_pos(tile_index as u128 * TILE_STREAM_STRIDE);
    rng
}

/// Draw `count` sites uniformly inside `bounds`
///
/// # Example
///
/// ```rust
/// use voronoi_settlement::generation::generate_sites;
/// use voronoi_settlement::Rect;
///
/// let bounds = Rect::from_size(100.0, 100.0);
/// let sites = generate_sites(50, &bounds, 42, 0);
/// assert_eq!(sites.len(), 50);
/// ```
pub fn generate_sites(count: usize, bounds: &Rect, seed: u64, tile_index: u32) -> Vec<Vec2> {
    let mut rng = tile_rng(seed, tile_index);
    (0..count)
        .map(|_| {
            let x = rng.gen_range(bounds.min.x..bounds.max.x);
            let y = rng.gen_range(bounds.min.y..bounds.max.y);
            Vec2::new(x, y)
        })
        .collect()
}
