use proptest::prelude::*;
use veldt_cell::{CellCoord, CellSamples, build_cell_mesh};
use veldt_world::{StreamingParams, TerrainParams, World};

fn small_params() -> StreamingParams {
    StreamingParams {
        cell_size: 16.0,
        quads_per_cell: 8,
        ..StreamingParams::default()
    }
}

proptest! {
    // Floor division puts every world point in exactly the cell whose
    // base spans it, including negative coordinates.
    #[test]
    fn from_world_matches_base_span(x in -1e5f32..1e5, z in -1e5f32..1e5) {
        let size = 64.0;
        let c = CellCoord::from_world(x, z, size);
        let (bx, bz) = c.base(size);
        prop_assert!(bx <= x + 1e-2 && x < bx + size + 1e-2);
        prop_assert!(bz <= z + 1e-2 && z < bz + size + 1e-2);
    }

    #[test]
    fn chebyshev_is_symmetric(ax in -1000i32..1000, az in -1000i32..1000, bx in -1000i32..1000, bz in -1000i32..1000) {
        let a = CellCoord::new(ax, az);
        let b = CellCoord::new(bx, bz);
        prop_assert_eq!(a.chebyshev(b), b.chebyshev(a));
        prop_assert_eq!(a.chebyshev(a), 0);
    }
}

#[test]
fn boundary_points_land_in_the_owning_cell() {
    assert_eq!(CellCoord::from_world(0.0, 0.0, 64.0), CellCoord::new(0, 0));
    assert_eq!(CellCoord::from_world(-0.5, 0.0, 64.0), CellCoord::new(-1, 0));
    assert_eq!(CellCoord::from_world(64.0, 63.9, 64.0), CellCoord::new(1, 0));
    assert_eq!(CellCoord::from_world(-64.0, -64.1, 64.0), CellCoord::new(-1, -2));
}

#[test]
fn mesh_counts_match_grid() {
    let world = World::builder(11, TerrainParams::default()).build();
    let params = small_params();
    let samples = CellSamples::build(&world, CellCoord::new(0, 0), &params);
    let (mesh, collision) = build_cell_mesh(&samples);
    let edge = params.quads_per_cell as usize + 1;
    assert_eq!(mesh.positions.len(), edge * edge * 3);
    assert_eq!(mesh.normals.len(), edge * edge * 3);
    assert_eq!(mesh.colors.len(), edge * edge * 4);
    let quads = params.quads_per_cell as usize;
    assert_eq!(mesh.indices.len(), quads * quads * 6);
    assert_eq!(collision.positions, mesh.positions);
    assert_eq!(collision.indices, mesh.indices);
    let max_index = *mesh.indices.iter().max().unwrap() as usize;
    assert!(max_index < edge * edge);
}

#[test]
fn triangles_wind_upward() {
    // A heightfield triangle seen from above must be counter-clockwise:
    // its face normal has positive y.
    let world = World::builder(99, TerrainParams::default()).build();
    let samples = CellSamples::build(&world, CellCoord::new(-2, 3), &small_params());
    let (mesh, _) = build_cell_mesh(&samples);
    let p = |i: u16| {
        let i = i as usize * 3;
        veldt_geom::Vec3::new(mesh.positions[i], mesh.positions[i + 1], mesh.positions[i + 2])
    };
    for tri in mesh.indices.chunks_exact(3) {
        let (a, b, c) = (p(tri[0]), p(tri[1]), p(tri[2]));
        let n = (b - a).cross(c - a);
        assert!(n.y > 0.0, "downward-facing triangle {tri:?}");
    }
}

#[test]
fn rebuild_is_bit_identical() {
    let world = World::builder(12345, TerrainParams::default()).build();
    let params = small_params();
    let coord = CellCoord::new(4, -7);
    let a = CellSamples::build(&world, coord, &params);
    let b = CellSamples::build(&world, coord, &params);
    assert_eq!(a.heights, b.heights);
    let (mesh_a, _) = build_cell_mesh(&a);
    let (mesh_b, _) = build_cell_mesh(&b);
    assert_eq!(mesh_a, mesh_b);
}

#[test]
fn bbox_spans_the_cell_footprint() {
    let world = World::builder(5, TerrainParams::default()).build();
    let params = small_params();
    let coord = CellCoord::new(1, 1);
    let samples = CellSamples::build(&world, coord, &params);
    let (mesh, _) = build_cell_mesh(&samples);
    let (bx, bz) = coord.base(params.cell_size);
    assert_eq!(mesh.bbox.min.x, bx);
    assert_eq!(mesh.bbox.min.z, bz);
    assert_eq!(mesh.bbox.max.x, bx + params.cell_size);
    assert_eq!(mesh.bbox.max.z, bz + params.cell_size);
}
