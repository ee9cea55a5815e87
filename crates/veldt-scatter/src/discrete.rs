use std::f32::consts::TAU;
use std::sync::Arc;

use hashbrown::HashMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use veldt_cell::CellCoord;
use veldt_geom::Vec3;
use veldt_world::{ScatterBand, ScatterParams, StreamingParams, World};

/// Stream-domain salt so discrete props and grass draw from unrelated
/// sequences for the same cell.
const DISCRETE_SALT: u64 = 0xD15C_0BB1_E5CA_77E5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentKind {
    Tree,
    Rock,
}

/// One placed prop: where it stands, how it faces, how big it is, and
/// which source asset variant to draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub kind: ContentKind,
    pub position: Vec3,
    pub yaw: f32,
    pub scale: f32,
    pub asset_index: u32,
}

/// Deterministically scatter trees and rocks over one cell. Pure in
/// (coord, world seed): candidates are drawn from a cell-seeded
/// generator, then admitted only where the sampled height and slope fit
/// the category's band.
pub fn scatter_cell(
    world: &World,
    coord: CellCoord,
    stream: &StreamingParams,
    params: &ScatterParams,
) -> Vec<Placement> {
    let mut rng = ChaCha8Rng::seed_from_u64(cell_rng_seed(world, coord));
    let mut out = Vec::new();
    place_category(
        world,
        coord,
        stream,
        &mut rng,
        ContentKind::Tree,
        &params.trees,
        params.tree_count,
        &mut out,
    );
    place_category(
        world,
        coord,
        stream,
        &mut rng,
        ContentKind::Rock,
        &params.rocks,
        params.rock_count,
        &mut out,
    );
    out
}

#[inline]
fn cell_rng_seed(world: &World, coord: CellCoord) -> u64 {
    crate::seed::cell_seed(coord.cx, coord.cz, world.seed()) ^ DISCRETE_SALT
}

#[allow(clippy::too_many_arguments)]
fn place_category(
    world: &World,
    coord: CellCoord,
    stream: &StreamingParams,
    rng: &mut ChaCha8Rng,
    kind: ContentKind,
    band: &ScatterBand,
    count_range: [u32; 2],
    out: &mut Vec<Placement>,
) {
    let (bx, bz) = coord.base(stream.cell_size);
    let candidates = rng.gen_range(count_range[0]..=count_range[1]);
    for _ in 0..candidates {
        let x = bx + rng.gen_range(0.0..stream.cell_size);
        let z = bz + rng.gen_range(0.0..stream.cell_size);
        let height = world.height_at(x, z);
        let slope = world.slope_at(x, z);
        if !band.admits(height, slope) {
            continue;
        }
        out.push(Placement {
            kind,
            position: Vec3::new(x, height, z),
            yaw: rng.gen_range(0.0..TAU),
            scale: rng.gen_range(band.scale[0]..=band.scale[1]),
            asset_index: rng.gen_range(0..band.asset_count),
        });
    }
}

/// Owns the per-cell discrete placements for currently-loaded cells.
pub struct DiscretePlacer {
    world: Arc<World>,
    stream: StreamingParams,
    params: ScatterParams,
    cells: HashMap<CellCoord, Vec<Placement>>,
}

impl DiscretePlacer {
    pub fn new(world: Arc<World>, stream: StreamingParams, params: ScatterParams) -> Self {
        Self {
            world,
            stream,
            params,
            cells: HashMap::new(),
        }
    }

    /// Generate and retain placements for a cell. Idempotent: calling
    /// again for a placed coordinate is a no-op.
    pub fn place_on_cell(&mut self, coord: CellCoord) -> &[Placement] {
        self.cells.entry(coord).or_insert_with(|| {
            let placed = scatter_cell(&self.world, coord, &self.stream, &self.params);
            log::debug!(
                "scatter cell ({}, {}): {} placements",
                coord.cx,
                coord.cz,
                placed.len()
            );
            placed
        })
    }

    /// Drop every placement owned by the cell.
    pub fn remove_cell(&mut self, coord: CellCoord) {
        self.cells.remove(&coord);
    }

    pub fn placements(&self, coord: CellCoord) -> Option<&[Placement]> {
        self.cells.get(&coord).map(Vec::as_slice)
    }

    pub fn iter_all(&self) -> impl Iterator<Item = &Placement> {
        self.cells.values().flatten()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}
