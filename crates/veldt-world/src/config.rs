use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::zones::{FlatZone, RampZone};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct WorldConfig {
    #[serde(default)]
    pub terrain: Terrain,
    #[serde(default)]
    pub streaming: Streaming,
    #[serde(default)]
    pub scatter: Scatter,
    #[serde(default)]
    pub flat_zones: Vec<FlatZone>,
    #[serde(default)]
    pub ramp_zones: Vec<RampZone>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Terrain {
    #[serde(default = "default_octaves")]
    pub octaves: u32,
    #[serde(default = "default_frequency")]
    pub frequency: f32,
    #[serde(default = "default_lacunarity")]
    pub lacunarity: f32,
    #[serde(default = "default_persistence")]
    pub persistence: f32,
    #[serde(default = "default_amplitude")]
    pub amplitude: f32,
    #[serde(default = "default_baseline_lift")]
    pub baseline_lift: f32,
    #[serde(default = "default_normal_step")]
    pub normal_step: f32,
}
fn default_octaves() -> u32 {
    4
}
fn default_frequency() -> f32 {
    0.008
}
fn default_lacunarity() -> f32 {
    2.0
}
fn default_persistence() -> f32 {
    0.5
}
fn default_amplitude() -> f32 {
    60.0
}
fn default_baseline_lift() -> f32 {
    0.25
}
fn default_normal_step() -> f32 {
    0.5
}
impl Default for Terrain {
    fn default() -> Self {
        Self {
            octaves: default_octaves(),
            frequency: default_frequency(),
            lacunarity: default_lacunarity(),
            persistence: default_persistence(),
            amplitude: default_amplitude(),
            baseline_lift: default_baseline_lift(),
            normal_step: default_normal_step(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Streaming {
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,
    #[serde(default = "default_quads_per_cell")]
    pub quads_per_cell: u32,
    #[serde(default = "default_load_radius")]
    pub load_radius: i32,
    #[serde(default = "default_evict_margin")]
    pub evict_margin: i32,
}
fn default_cell_size() -> f32 {
    64.0
}
fn default_quads_per_cell() -> u32 {
    64
}
fn default_load_radius() -> i32 {
    2
}
fn default_evict_margin() -> i32 {
    1
}
impl Default for Streaming {
    fn default() -> Self {
        Self {
            cell_size: default_cell_size(),
            quads_per_cell: default_quads_per_cell(),
            load_radius: default_load_radius(),
            evict_margin: default_evict_margin(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Scatter {
    #[serde(default = "default_trees")]
    pub trees: ScatterBand,
    #[serde(default = "default_rocks")]
    pub rocks: ScatterBand,
    #[serde(default = "default_grass")]
    pub grass: ScatterBand,
    #[serde(default = "default_tree_count")]
    pub tree_count: [u32; 2],
    #[serde(default = "default_rock_count")]
    pub rock_count: [u32; 2],
    #[serde(default = "default_grass_candidates")]
    pub grass_candidates: u32,
}
fn default_trees() -> ScatterBand {
    ScatterBand {
        min_height: 18.0,
        max_height: 52.0,
        min_slope: 0.8,
        scale: [0.8, 1.3],
        asset_count: 3,
    }
}
fn default_rocks() -> ScatterBand {
    ScatterBand {
        min_height: 2.0,
        max_height: f32::INFINITY,
        min_slope: 0.0,
        scale: [0.5, 1.8],
        asset_count: 2,
    }
}
fn default_grass() -> ScatterBand {
    ScatterBand {
        min_height: 16.0,
        max_height: 48.0,
        min_slope: 0.85,
        scale: [0.7, 1.4],
        asset_count: 1,
    }
}
fn default_tree_count() -> [u32; 2] {
    [3, 8]
}
fn default_rock_count() -> [u32; 2] {
    [2, 5]
}
fn default_grass_candidates() -> u32 {
    150
}
impl Default for Scatter {
    fn default() -> Self {
        Self {
            trees: default_trees(),
            rocks: default_rocks(),
            grass: default_grass(),
            tree_count: default_tree_count(),
            rock_count: default_rock_count(),
            grass_candidates: default_grass_candidates(),
        }
    }
}

/// Admissibility window for one content category. Slope is the surface
/// normal's vertical component: 1 is dead flat, 0 is a cliff face.
#[derive(Clone, Debug, Deserialize)]
pub struct ScatterBand {
    pub min_height: f32,
    pub max_height: f32,
    pub min_slope: f32,
    pub scale: [f32; 2],
    pub asset_count: u32,
}

impl ScatterBand {
    #[inline]
    pub fn admits(&self, height: f32, slope: f32) -> bool {
        height >= self.min_height && height <= self.max_height && slope >= self.min_slope
    }
}

// Flattened snapshots used in tight loops (geist keeps config structs for
// serde and separate params structs for the hot path; same split here).

#[derive(Clone, Debug)]
pub struct TerrainParams {
    pub octaves: u32,
    pub frequency: f32,
    pub lacunarity: f32,
    pub persistence: f32,
    pub amplitude: f32,
    pub baseline_lift: f32,
    pub normal_step: f32,
}

impl TerrainParams {
    pub fn from_config(cfg: &Terrain) -> Result<Self, ConfigError> {
        if cfg.octaves == 0 {
            return Err(ConfigError::Invalid("terrain.octaves must be >= 1".into()));
        }
        if cfg.frequency <= 0.0 || cfg.persistence <= 0.0 || cfg.lacunarity <= 0.0 {
            return Err(ConfigError::Invalid(
                "terrain frequency/persistence/lacunarity must be positive".into(),
            ));
        }
        if cfg.normal_step <= 0.0 {
            return Err(ConfigError::Invalid(
                "terrain.normal_step must be positive".into(),
            ));
        }
        Ok(Self {
            octaves: cfg.octaves,
            frequency: cfg.frequency,
            lacunarity: cfg.lacunarity,
            persistence: cfg.persistence,
            amplitude: cfg.amplitude,
            baseline_lift: cfg.baseline_lift,
            normal_step: cfg.normal_step,
        })
    }
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self::from_config(&Terrain::default()).expect("default terrain config is valid")
    }
}

#[derive(Clone, Copy, Debug)]
pub struct StreamingParams {
    pub cell_size: f32,
    pub quads_per_cell: u32,
    pub load_radius: i32,
    pub evict_margin: i32,
}

impl StreamingParams {
    pub fn from_config(cfg: &Streaming) -> Result<Self, ConfigError> {
        if cfg.cell_size <= 0.0 {
            return Err(ConfigError::Invalid(
                "streaming.cell_size must be positive".into(),
            ));
        }
        // Cell meshes are indexed with u16; (q + 1)^2 vertices must stay
        // addressable.
        let verts = (cfg.quads_per_cell as u64 + 1).pow(2);
        if cfg.quads_per_cell == 0 || verts > u64::from(u16::MAX) + 1 {
            return Err(ConfigError::Invalid(format!(
                "streaming.quads_per_cell = {} puts {} vertices past the u16 index budget",
                cfg.quads_per_cell, verts
            )));
        }
        if cfg.load_radius < 0 || cfg.evict_margin < 0 {
            return Err(ConfigError::Invalid(
                "streaming radii must be non-negative".into(),
            ));
        }
        Ok(Self {
            cell_size: cfg.cell_size,
            quads_per_cell: cfg.quads_per_cell,
            load_radius: cfg.load_radius,
            evict_margin: cfg.evict_margin,
        })
    }
}

impl Default for StreamingParams {
    fn default() -> Self {
        Self::from_config(&Streaming::default()).expect("default streaming config is valid")
    }
}

#[derive(Clone, Debug)]
pub struct ScatterParams {
    pub trees: ScatterBand,
    pub rocks: ScatterBand,
    pub grass: ScatterBand,
    pub tree_count: [u32; 2],
    pub rock_count: [u32; 2],
    pub grass_candidates: u32,
}

impl ScatterParams {
    pub fn from_config(cfg: &Scatter) -> Result<Self, ConfigError> {
        for (name, band) in [
            ("trees", &cfg.trees),
            ("rocks", &cfg.rocks),
            ("grass", &cfg.grass),
        ] {
            if band.scale[0] <= 0.0 || band.scale[1] < band.scale[0] {
                return Err(ConfigError::Invalid(format!(
                    "scatter.{name}.scale range is inverted or non-positive"
                )));
            }
            if band.asset_count == 0 {
                return Err(ConfigError::Invalid(format!(
                    "scatter.{name}.asset_count must be >= 1"
                )));
            }
        }
        if cfg.tree_count[1] < cfg.tree_count[0] || cfg.rock_count[1] < cfg.rock_count[0] {
            return Err(ConfigError::Invalid(
                "scatter count ranges are inverted".into(),
            ));
        }
        Ok(Self {
            trees: cfg.trees.clone(),
            rocks: cfg.rocks.clone(),
            grass: cfg.grass.clone(),
            tree_count: cfg.tree_count,
            rock_count: cfg.rock_count,
            grass_candidates: cfg.grass_candidates,
        })
    }
}

impl Default for ScatterParams {
    fn default() -> Self {
        Self::from_config(&Scatter::default()).expect("default scatter config is valid")
    }
}

pub fn load_config_from_path(path: &Path) -> Result<WorldConfig, ConfigError> {
    let s = std::fs::read_to_string(path)?;
    let cfg: WorldConfig = toml::from_str(&s)?;
    Ok(cfg)
}
