use std::f32::consts::TAU;
use std::sync::Arc;

use hashbrown::HashMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use veldt_cell::CellCoord;
use veldt_geom::{Mat4, Vec3, trs_y};
use veldt_world::{ScatterParams, StreamingParams, World};

const GRASS_SALT: u64 = 0x6A55_B1AD_E50F_F5E7;

/// Instanced draws are capped at this many transforms per call; a
/// cell's array is split across as many batches as it needs.
pub const MAX_INSTANCES_PER_BATCH: usize = 1023;

/// One cell's grass: a flat array of per-instance transforms.
/// Regenerated wholesale when the cell reloads, never edited in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GrassField {
    pub transforms: Vec<Mat4>,
}

impl GrassField {
    /// Bounded slices whose concatenation is exactly `transforms`.
    pub fn batches(&self) -> impl Iterator<Item = &[Mat4]> {
        self.transforms.chunks(MAX_INSTANCES_PER_BATCH)
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

/// Deterministically generate a cell's grass instances: the same
/// candidate/admissibility scheme as the discrete placer, at much
/// higher density, producing bare transforms instead of records.
pub fn grass_for_cell(
    world: &World,
    coord: CellCoord,
    stream: &StreamingParams,
    params: &ScatterParams,
) -> GrassField {
    let seed = crate::seed::cell_seed(coord.cx, coord.cz, world.seed()) ^ GRASS_SALT;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let (bx, bz) = coord.base(stream.cell_size);
    let band = &params.grass;
    let mut transforms = Vec::new();
    for _ in 0..params.grass_candidates {
        let x = bx + rng.gen_range(0.0..stream.cell_size);
        let z = bz + rng.gen_range(0.0..stream.cell_size);
        let height = world.height_at(x, z);
        let slope = world.slope_at(x, z);
        if !band.admits(height, slope) {
            continue;
        }
        let yaw = rng.gen_range(0.0..TAU);
        let s = rng.gen_range(band.scale[0]..=band.scale[1]);
        // Blades vary more in height than in girth.
        let sy = s * rng.gen_range(0.9..=1.5);
        transforms.push(trs_y(Vec3::new(x, height, z), yaw, Vec3::new(s, sy, s)));
    }
    GrassField { transforms }
}

/// Owns the grass arrays for currently-loaded cells and serves them to
/// the per-frame instanced draw. No per-blade objects exist anywhere:
/// the render side consumes these slices read-only every frame.
pub struct DensePlacer {
    world: Arc<World>,
    stream: StreamingParams,
    params: ScatterParams,
    cells: HashMap<CellCoord, GrassField>,
}

impl DensePlacer {
    pub fn new(world: Arc<World>, stream: StreamingParams, params: ScatterParams) -> Self {
        Self {
            world,
            stream,
            params,
            cells: HashMap::new(),
        }
    }

    /// Generate and retain the cell's instance array. Idempotent.
    pub fn generate_for_cell(&mut self, coord: CellCoord) -> &GrassField {
        self.cells
            .entry(coord)
            .or_insert_with(|| grass_for_cell(&self.world, coord, &self.stream, &self.params))
    }

    pub fn remove_cell(&mut self, coord: CellCoord) {
        self.cells.remove(&coord);
    }

    pub fn field(&self, coord: CellCoord) -> Option<&GrassField> {
        self.cells.get(&coord)
    }

    /// All draw batches across every loaded cell, each bounded by
    /// [`MAX_INSTANCES_PER_BATCH`].
    pub fn batches(&self) -> impl Iterator<Item = &[Mat4]> {
        self.cells.values().flat_map(GrassField::batches)
    }

    pub fn instance_count(&self) -> usize {
        self.cells.values().map(GrassField::len).sum()
    }
}
