use veldt_geom::{Aabb, Vec3};

use crate::CellSamples;

/// CPU-side renderable mesh for one cell: interleaved-free flat buffers
/// ready for GPU upload. Indices are u16; the streaming config is
/// validated so the vertex count always fits.
#[derive(Clone, Debug, PartialEq)]
pub struct CellMeshCpu {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub colors: Vec<u8>,
    pub indices: Vec<u16>,
    pub bbox: Aabb,
}

/// The physics collaborator gets the same vertices and triangulation,
/// without normals or colors.
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionMesh {
    pub positions: Vec<f32>,
    pub indices: Vec<u16>,
}

/// Triangulate a sample grid: two triangles per quad, counter-clockwise
/// seen from above.
pub fn build_cell_mesh(samples: &CellSamples) -> (CellMeshCpu, CollisionMesh) {
    let edge = samples.edge();
    let vert_count = edge * edge;
    let mut positions = Vec::with_capacity(vert_count * 3);
    let mut normals = Vec::with_capacity(vert_count * 3);
    let mut colors = Vec::with_capacity(vert_count * 4);
    let first = samples.position(0, 0);
    let mut bbox = Aabb::new(first, first);
    for z in 0..edge {
        for x in 0..edge {
            let p = samples.position(x, z);
            bbox.grow_to(p);
            positions.extend_from_slice(&[p.x, p.y, p.z]);
            let n: Vec3 = samples.normals[samples.idx(x, z)];
            normals.extend_from_slice(&[n.x, n.y, n.z]);
            colors.extend_from_slice(&samples.colors[samples.idx(x, z)]);
        }
    }

    let quads = samples.quads as usize;
    let mut indices = Vec::with_capacity(quads * quads * 6);
    for z in 0..quads {
        for x in 0..quads {
            let v00 = (z * edge + x) as u16;
            let v10 = v00 + 1;
            let v01 = v00 + edge as u16;
            let v11 = v01 + 1;
            indices.extend_from_slice(&[v00, v01, v11, v00, v11, v10]);
        }
    }

    let collision = CollisionMesh {
        positions: positions.clone(),
        indices: indices.clone(),
    };
    (
        CellMeshCpu {
            positions,
            normals,
            colors,
            indices,
            bbox,
        },
        collision,
    )
}
