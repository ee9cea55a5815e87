//! Height-field sampling and world configuration.
//!
//! The [`World`] is the read-only heart of the terrain system: a seeded,
//! analytically-sampleable height function with designer overrides
//! (flat plateaus and carved ramps) blended in. Everything downstream
//! (cell meshing, streaming, content scatter) derives from it.
#![forbid(unsafe_code)]

mod config;
mod sampler;
mod world;
mod zones;

pub use config::{
    ConfigError, ScatterBand, ScatterParams, StreamingParams, TerrainParams, WorldConfig,
    load_config_from_path,
};
pub use sampler::HeightField;
pub use world::{World, WorldBuilder};
pub use zones::{FlatZone, RampZone, ZoneError};
