//! Terrain cells: coordinate math, sample grids, and CPU-side meshes.
#![forbid(unsafe_code)]

mod mesh;
mod palette;

pub use mesh::{CellMeshCpu, CollisionMesh, build_cell_mesh};
pub use palette::vertex_color;

use veldt_geom::Vec3;
use veldt_world::{StreamingParams, World};

/// Integer cell coordinate: floor division of world x/z by the cell
/// edge length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellCoord {
    pub cx: i32,
    pub cz: i32,
}

impl CellCoord {
    #[inline]
    pub const fn new(cx: i32, cz: i32) -> Self {
        Self { cx, cz }
    }

    #[inline]
    pub fn from_world(x: f32, z: f32, cell_size: f32) -> Self {
        Self {
            cx: (x / cell_size).floor() as i32,
            cz: (z / cell_size).floor() as i32,
        }
    }

    /// World-space origin (min corner) of this cell.
    #[inline]
    pub fn base(self, cell_size: f32) -> (f32, f32) {
        (self.cx as f32 * cell_size, self.cz as f32 * cell_size)
    }

    #[inline]
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cz: self.cz + dz,
        }
    }

    /// Chebyshev (chessboard) distance; streaming radii are square.
    #[inline]
    pub fn chebyshev(self, other: CellCoord) -> i32 {
        (self.cx - other.cx).abs().max((self.cz - other.cz).abs())
    }
}

/// One cell's (n+1)^2 grid of height-field samples, row-major with
/// `idx = z * (n + 1) + x`.
#[derive(Clone, Debug)]
pub struct CellSamples {
    pub coord: CellCoord,
    pub quads: u32,
    pub cell_size: f32,
    pub heights: Vec<f32>,
    pub normals: Vec<Vec3>,
    pub colors: Vec<[u8; 4]>,
}

impl CellSamples {
    /// Samples per edge (grid vertices, one more than quads).
    #[inline]
    pub fn edge(&self) -> usize {
        self.quads as usize + 1
    }

    #[inline]
    pub fn idx(&self, x: usize, z: usize) -> usize {
        z * self.edge() + x
    }

    /// World position of grid vertex (x, z).
    #[inline]
    pub fn position(&self, x: usize, z: usize) -> Vec3 {
        let (bx, bz) = self.coord.base(self.cell_size);
        let step = self.cell_size / self.quads as f32;
        Vec3::new(
            bx + x as f32 * step,
            self.heights[self.idx(x, z)],
            bz + z as f32 * step,
        )
    }

    /// Sample the world's height field across the whole grid. Pure in
    /// (world, coord): rebuilding after an evict reproduces the grid
    /// bit for bit.
    pub fn build(world: &World, coord: CellCoord, params: &StreamingParams) -> Self {
        let quads = params.quads_per_cell;
        let edge = quads as usize + 1;
        let (bx, bz) = coord.base(params.cell_size);
        let step = params.cell_size / quads as f32;
        let mut heights = Vec::with_capacity(edge * edge);
        let mut normals = Vec::with_capacity(edge * edge);
        let mut colors = Vec::with_capacity(edge * edge);
        for z in 0..edge {
            let wz = bz + z as f32 * step;
            for x in 0..edge {
                let wx = bx + x as f32 * step;
                let h = world.height_at(wx, wz);
                let n = world.normal_at(wx, wz);
                heights.push(h);
                normals.push(n);
                colors.push(vertex_color(h, n.y));
            }
        }
        Self {
            coord,
            quads,
            cell_size: params.cell_size,
            heights,
            normals,
            colors,
        }
    }
}
