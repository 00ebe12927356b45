//! Decorative background galaxy: a static spiral point cloud.
//!
//! Built once per scene and never mutated afterwards except for its slow Y rotation.

use std::f32::consts::TAU;

use glam::Vec3;

use crate::prng::Prng;
use crate::record::Rgb;

/// Points generated per PRNG stream. Fixed so parallel and serial builds agree.
const CHUNK: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GalaxyParams {
    pub count: usize,
    pub radius: f32,
    pub branches: u32,
    pub spin: f32,
    pub randomness: f32,
    pub randomness_power: f32,
    /// Vertical jitter scale; replaces the radial distance on the Y axis to flatten the disk.
    pub vertical_flatten: f32,
    /// Upper bound of the base→accent blend fraction.
    pub max_accent_mix: f32,
    pub base_color: Rgb,
    pub accent_color: Rgb,
    /// Radians added around Y each frame.
    pub rotation_per_frame: f32,
    pub seed: u64,
}

impl Default for GalaxyParams {
    fn default() -> Self {
        Self {
            count: 30_000,
            radius: 150.0,
            branches: 4,
            spin: 1.5,
            randomness: 0.5,
            randomness_power: 3.0,
            vertical_flatten: 0.2,
            max_accent_mix: 0.2,
            base_color: Rgb::WHITE,
            accent_color: Rgb::new(0xAD as f32 / 255.0, 0xD8 as f32 / 255.0, 0xE6 as f32 / 255.0),
            rotation_per_frame: 0.0003,
            seed: 0x6A1A_C71C,
        }
    }
}

impl GalaxyParams {
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecorativePoint {
    pub position: Vec3,
    pub color: Rgb,
    /// Spiral radius before jitter, always in `[0, radius)`.
    pub radial_distance: f32,
}

#[derive(Debug, Clone)]
pub struct GalaxyCloud {
    points: Vec<DecorativePoint>,
    rotation_y: f32,
    rotation_per_frame: f32,
}

impl GalaxyCloud {
    pub fn generate(params: &GalaxyParams) -> Self {
        let points = generate_points(params);
        tracing::debug!(count = points.len(), "galaxy generated");
        Self {
            points,
            rotation_y: 0.0,
            rotation_per_frame: params.rotation_per_frame,
        }
    }

    pub fn points(&self) -> &[DecorativePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    /// Advance the slow decorative spin by one frame.
    pub fn advance_rotation(&mut self) {
        self.rotation_y = (self.rotation_y + self.rotation_per_frame) % TAU;
    }
}

/// Pure generator: same params, same buffer.
pub fn generate_points(params: &GalaxyParams) -> Vec<DecorativePoint> {
    let chunks = params.count.div_ceil(CHUNK);

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        (0..chunks)
            .into_par_iter()
            .flat_map_iter(|c| generate_chunk(params, c))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        (0..chunks).flat_map(|c| generate_chunk(params, c)).collect()
    }
}

fn generate_chunk(params: &GalaxyParams, chunk: usize) -> Vec<DecorativePoint> {
    let start = chunk * CHUNK;
    let end = (start + CHUNK).min(params.count);
    let mut rng = Prng::derive(params.seed, chunk as u64);
    let branches = params.branches.max(1);

    (start..end)
        .map(|i| {
            let r = rng.next_f32_01() * params.radius;
            let spin_angle = r * params.spin;
            let branch_angle = (i as u32 % branches) as f32 / branches as f32 * TAU;

            let mut jitter = |scale: f32| {
                rng.next_f32_01().powf(params.randomness_power)
                    * rng.gen_sign()
                    * params.randomness
                    * scale
            };
            let jx = jitter(r);
            let jy = jitter(params.vertical_flatten);
            let jz = jitter(r);

            let angle = branch_angle + spin_angle;
            let position = Vec3::new(angle.cos() * r + jx, jy, angle.sin() * r + jz);
            let color = params
                .base_color
                .lerp(params.accent_color, rng.next_f32_01() * params.max_accent_mix);

            DecorativePoint {
                position,
                color,
                radial_distance: r,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> GalaxyParams {
        GalaxyParams::default().with_count(10_000).with_seed(99)
    }

    #[test]
    fn radial_distance_and_colors_stay_bounded() {
        let params = small();
        let cloud = GalaxyCloud::generate(&params);
        assert_eq!(cloud.len(), params.count);

        for p in cloud.points() {
            assert!(p.radial_distance >= 0.0 && p.radial_distance < params.radius);
            for c in p.color.to_array() {
                assert!((0.0..=1.0).contains(&c), "channel out of range: {c}");
            }
            // Jitter never exceeds randomness * r per horizontal axis.
            let base = Vec3::new(p.position.x, 0.0, p.position.z).length();
            assert!(base <= p.radial_distance * (1.0 + 2.0 * params.randomness) + 1e-3);
            assert!(p.position.y.abs() <= params.randomness * params.vertical_flatten + 1e-6);
        }
    }

    #[test]
    fn blend_never_saturates_toward_accent() {
        let params = small();
        let min_r = params.base_color.lerp(params.accent_color, params.max_accent_mix).r;
        for p in generate_points(&params) {
            // Accent red is below base red, so the blend only ever lowers it down to the cap.
            assert!(p.color.r >= min_r - 1e-6);
        }
    }

    #[test]
    fn generation_is_deterministic_per_seed() {
        let a = generate_points(&small());
        let b = generate_points(&small());
        assert_eq!(a, b);

        let c = generate_points(&small().with_seed(100));
        assert_ne!(a, c);
    }

    #[test]
    fn rotation_advances_per_frame() {
        let mut cloud = GalaxyCloud::generate(&GalaxyParams::default().with_count(8));
        cloud.advance_rotation();
        cloud.advance_rotation();
        assert!((cloud.rotation_y() - 0.0006).abs() < 1e-7);
    }

    #[test]
    fn zero_points_is_empty() {
        let cloud = GalaxyCloud::generate(&GalaxyParams::default().with_count(0));
        assert!(cloud.is_empty());
    }
}
