use std::ops::RangeInclusive;

use rand::Rng;

/// Range color channels are drawn from.
pub const COLOR_RANGE: RangeInclusive<f32> = 0.0..=1.0;
/// Range each offset component is drawn from (NDC).
pub const OFFSET_RANGE: RangeInclusive<f32> = -1.0..=1.0;
/// Range the per-object base scale is drawn from.
pub const SCALE_RANGE: RangeInclusive<f32> = 0.2..=0.5;

/// CPU-side description of one drawable triangle.
///
/// `color` and `offset` are uploaded once. `base_scale` never leaves the CPU;
/// the per-frame scale pair is derived from it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ObjectRecord {
    /// Straight RGBA; alpha is always 1.
    pub color: [f32; 4],
    pub offset: [f32; 2],
    pub base_scale: f32,
}

impl ObjectRecord {
    #[inline]
    pub const fn new(color: [f32; 4], offset: [f32; 2], base_scale: f32) -> Self {
        Self {
            color,
            offset,
            base_scale,
        }
    }

    /// Draws every attribute independently from its fixed range.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            color: [
                rng.random_range(COLOR_RANGE),
                rng.random_range(COLOR_RANGE),
                rng.random_range(COLOR_RANGE),
                1.0,
            ],
            offset: [rng.random_range(OFFSET_RANGE), rng.random_range(OFFSET_RANGE)],
            base_scale: rng.random_range(SCALE_RANGE),
        }
    }

    /// Per-frame scale pair; x is divided by the aspect ratio so triangles
    /// keep their shape on wide surfaces.
    #[inline]
    pub fn scale_for(&self, aspect: f32) -> [f32; 2] {
        [self.base_scale / aspect, self.base_scale]
    }
}
