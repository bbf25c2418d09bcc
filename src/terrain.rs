//! Terrain height queries
//!
//! The settlement is laid out in the 2-D plane; the host application supplies
//! ground height so placements can sit on its terrain. Plane `y` maps to
//! world `z`.

/// Trait for sampling ground height under a placement
pub trait HeightSampler {
    /// Vertical offset of the ground at world position `(x, z)`
    fn vertical_offset_at(&self, x: f32, z: f32) -> f32;
}

/// Level ground at a fixed height
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlatTerrain {
    pub height: f32,
}

impl FlatTerrain {
    pub fn new(height: f32) -> Self {
        Self { height }
    }
}

impl HeightSampler for FlatTerrain {
    #[inline]
    fn vertical_offset_at(&self, _x: f32, _z: f32) -> f32 {
        self.height
    }
}

/// Any `Fn(x, z) -> height` closure is a sampler
///
/// ```
/// use voronoi_settlement::HeightSampler;
///
/// let slope = |x: f32, _z: f32| x * 0.1;
/// assert_eq!(slope.vertical_offset_at(20.0, 5.0), 2.0);
/// ```
impl<F> HeightSampler for F
where
    F: Fn(f32, f32) -> f32,
{
    #[inline]
    fn vertical_offset_at(&self, x: f32, z: f32) -> f32 {
        self(x, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_terrain() {
        let terrain = FlatTerrain::new(3.5);
        assert_eq!(terrain.vertical_offset_at(0.0, 0.0), 3.5);
        assert_eq!(terrain.vertical_offset_at(-120.0, 999.0), 3.5);
        assert_eq!(FlatTerrain::default().vertical_offset_at(1.0, 1.0), 0.0);
    }

    #[test]
    fn test_closure_sampler() {
        let ridge = |x: f32, z: f32| (x - z).abs();
        assert_eq!(ridge.vertical_offset_at(4.0, 10.0), 6.0);

        fn sample(sampler: &dyn HeightSampler) -> f32 {
            sampler.vertical_offset_at(2.0, 2.0)
        }
        assert_eq!(sample(&FlatTerrain::new(1.0)), 1.0);
    }
}
