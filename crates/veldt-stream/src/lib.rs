//! Cell streaming: background build workers plus the manager that keeps
//! the loaded set tracking the viewer.
#![forbid(unsafe_code)]

mod manager;
mod runtime;

pub use manager::{LoadedCell, StreamUpdate, TerrainSystem};
pub use runtime::{CellBuildJob, CellBuildOut, Runtime};
