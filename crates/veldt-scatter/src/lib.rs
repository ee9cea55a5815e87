//! Deterministic secondary content: discrete props and dense grass.
//!
//! Everything here is a pure function of (cell coordinate, world seed):
//! a fresh generator is seeded per cell per call, never shared or
//! advanced across cells, so evicting and reloading a cell reproduces
//! its content exactly.
#![forbid(unsafe_code)]

mod discrete;
mod grass;
mod seed;

pub use discrete::{ContentKind, DiscretePlacer, Placement, scatter_cell};
pub use grass::{DensePlacer, GrassField, MAX_INSTANCES_PER_BATCH, grass_for_cell};
pub use seed::cell_seed;
