use crate::config::{ConfigError, TerrainParams, WorldConfig};
use crate::sampler::HeightField;
use crate::zones::{FlatZone, RampZone, ZoneError};

/// Read-only world: seed, terrain parameters, and the fully-populated
/// height field. Constructed through [`WorldBuilder`] so that the zone
/// registry is sealed before any terrain is generated; there is no way
/// to register a zone against an already-built `World`.
pub struct World {
    seed: i32,
    params: TerrainParams,
    field: HeightField,
}

impl World {
    pub fn builder(seed: i32, params: TerrainParams) -> WorldBuilder {
        WorldBuilder {
            seed,
            params,
            flat_zones: Vec::new(),
            ramp_zones: Vec::new(),
        }
    }

    /// Builder preloaded with the zones from a parsed config file.
    pub fn builder_from_config(seed: i32, cfg: &WorldConfig) -> Result<WorldBuilder, ConfigError> {
        let params = TerrainParams::from_config(&cfg.terrain)?;
        let mut b = World::builder(seed, params);
        for zone in &cfg.flat_zones {
            b.register_flat_zone(*zone)
                .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        }
        for zone in &cfg.ramp_zones {
            b.register_ramp_zone(*zone)
                .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        }
        Ok(b)
    }

    #[inline]
    pub fn seed(&self) -> i32 {
        self.seed
    }

    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    pub fn field(&self) -> &HeightField {
        &self.field
    }

    /// Terrain height at any world (x, z), loaded or not.
    #[inline]
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        self.field.height(x, z)
    }

    #[inline]
    pub fn normal_at(&self, x: f32, z: f32) -> veldt_geom::Vec3 {
        self.field.normal(x, z)
    }

    /// Slope in [0, 1] at any world (x, z); 1 is flat, 0 is vertical.
    #[inline]
    pub fn slope_at(&self, x: f32, z: f32) -> f32 {
        self.field.slope(x, z)
    }
}

pub struct WorldBuilder {
    seed: i32,
    params: TerrainParams,
    flat_zones: Vec<FlatZone>,
    ramp_zones: Vec<RampZone>,
}

impl WorldBuilder {
    /// Register a plateau override. Degenerate parameters are rejected
    /// here, at configuration time, never at sample time.
    pub fn register_flat_zone(&mut self, zone: FlatZone) -> Result<&mut Self, ZoneError> {
        zone.validate()?;
        self.flat_zones.push(zone);
        Ok(self)
    }

    pub fn register_ramp_zone(&mut self, zone: RampZone) -> Result<&mut Self, ZoneError> {
        zone.validate()?;
        self.ramp_zones.push(zone);
        Ok(self)
    }

    pub fn build(self) -> World {
        log::info!(
            "world seed={} octaves={} flat_zones={} ramp_zones={}",
            self.seed,
            self.params.octaves,
            self.flat_zones.len(),
            self.ramp_zones.len()
        );
        let field = HeightField::new(self.seed, &self.params, self.flat_zones, self.ramp_zones);
        World {
            seed: self.seed,
            params: self.params,
            field,
        }
    }
}
