use fastnoise_lite::{FastNoiseLite, NoiseType};
use veldt_geom::Vec3;

use crate::config::TerrainParams;
use crate::zones::{FlatZone, RampZone};

/// Per-octave seed salt, so each octave samples a decorrelated lattice
/// and distinct world seeds produce distinct worlds.
const OCTAVE_SALT: i32 = 40_487;

/// The total height function: octave noise base, then flat-zone blend,
/// then ramp-zone carve, in that order. Ramps are applied last so an
/// entrance ramp can cut into an already-flattened village plateau.
///
/// Immutable once constructed; sampling is side-effect free and total
/// over all finite (x, z).
pub struct HeightField {
    octaves: Vec<Octave>,
    total_weight: f32,
    amplitude: f32,
    baseline_lift: f32,
    normal_step: f32,
    flat_zones: Vec<FlatZone>,
    ramp_zones: Vec<RampZone>,
}

struct Octave {
    noise: FastNoiseLite,
    weight: f32,
}

impl HeightField {
    pub fn new(
        seed: i32,
        params: &TerrainParams,
        flat_zones: Vec<FlatZone>,
        ramp_zones: Vec<RampZone>,
    ) -> Self {
        let mut octaves = Vec::with_capacity(params.octaves as usize);
        let mut total_weight = 0.0f32;
        for i in 0..params.octaves {
            let mut noise = FastNoiseLite::with_seed(seed ^ OCTAVE_SALT.wrapping_mul(i as i32 + 1));
            noise.set_noise_type(Some(NoiseType::OpenSimplex2));
            noise.set_frequency(Some(params.frequency * params.lacunarity.powi(i as i32)));
            let weight = params.persistence.powi(i as i32);
            total_weight += weight;
            octaves.push(Octave { noise, weight });
        }
        Self {
            octaves,
            total_weight,
            amplitude: params.amplitude,
            baseline_lift: params.baseline_lift,
            normal_step: params.normal_step,
            flat_zones,
            ramp_zones,
        }
    }

    /// Noise-only height, before any zone override.
    ///
    /// The octave sum is normalized to [-1, 1], remapped to [0, 1],
    /// scaled by the amplitude and lifted by `baseline_lift * amplitude`.
    /// The lift is deliberate: valleys stay shallow and above zero while
    /// peaks keep full range, and all downstream tuning (zone target
    /// heights, scatter bands) assumes this distribution.
    pub fn base_height(&self, x: f32, z: f32) -> f32 {
        let mut sum = 0.0f32;
        for oct in &self.octaves {
            sum += oct.noise.get_noise_2d(x, z) * oct.weight;
        }
        let n01 = (sum / self.total_weight + 1.0) * 0.5;
        n01 * self.amplitude + self.baseline_lift * self.amplitude
    }

    pub fn height(&self, x: f32, z: f32) -> f32 {
        let mut h = self.base_height(x, z);
        for zone in &self.flat_zones {
            let dx = x - zone.x;
            let dz = z - zone.z;
            let d = (dx * dx + dz * dz).sqrt();
            let w = zone.weight(d);
            if w > 0.0 {
                h += (zone.target_height - h) * w;
            }
        }
        for zone in &self.ramp_zones {
            let w = zone.weight(x, z);
            if w > 0.0 {
                let ramp_h = zone.surface_height(z);
                // Ramps carve down, never up.
                if ramp_h < h {
                    h += (ramp_h - h) * w;
                }
            }
        }
        h
    }

    /// Unit surface normal by central differences of the height field.
    pub fn normal(&self, x: f32, z: f32) -> Vec3 {
        let s = self.normal_step;
        let h_left = self.height(x - s, z);
        let h_right = self.height(x + s, z);
        let h_down = self.height(x, z - s);
        let h_up = self.height(x, z + s);
        Vec3::new(h_left - h_right, 2.0 * s, h_down - h_up).normalized()
    }

    /// Slope as the normal's vertical component: 1 flat, 0 vertical.
    #[inline]
    pub fn slope(&self, x: f32, z: f32) -> f32 {
        self.normal(x, z).y
    }

    pub fn flat_zones(&self) -> &[FlatZone] {
        &self.flat_zones
    }

    pub fn ramp_zones(&self) -> &[RampZone] {
        &self.ramp_zones
    }
}
