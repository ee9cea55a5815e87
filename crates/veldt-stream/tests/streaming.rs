use std::sync::Arc;

use veldt_cell::CellCoord;
use veldt_geom::Vec3;
use veldt_stream::TerrainSystem;
use veldt_world::{ScatterParams, StreamingParams, TerrainParams, World};

fn system() -> TerrainSystem {
    let world = Arc::new(World::builder(12345, TerrainParams::default()).build());
    // Small cells keep the worker cost of these tests negligible.
    let stream = StreamingParams {
        cell_size: 16.0,
        quads_per_cell: 8,
        load_radius: 2,
        evict_margin: 1,
    };
    TerrainSystem::new(world, stream, ScatterParams::default())
}

fn viewer_at_cell(sys: &TerrainSystem, cx: i32, cz: i32) -> Vec3 {
    let size = sys.streaming_params().cell_size;
    Vec3::new((cx as f32 + 0.5) * size, 0.0, (cz as f32 + 0.5) * size)
}

#[test]
fn update_loads_the_full_required_set() {
    let mut sys = system();
    let mut events = sys.update(Some(viewer_at_cell(&sys, 0, 0)));
    events.merge(sys.flush());

    let r = sys.streaming_params().load_radius;
    let expected = ((2 * r + 1) * (2 * r + 1)) as usize;
    assert_eq!(sys.loaded_count(), expected);
    assert_eq!(events.loaded.len(), expected);
    assert!(events.evicted.is_empty());
    for dz in -r..=r {
        for dx in -r..=r {
            assert!(sys.is_loaded(CellCoord::new(dx, dz)), "missing ({dx}, {dz})");
        }
    }
    assert_eq!(sys.in_flight(), 0);
}

#[test]
fn hysteresis_keeps_the_margin_band_loaded() {
    let mut sys = system();
    sys.update(Some(viewer_at_cell(&sys, 0, 0)));
    sys.flush();

    // One cell east: the far-west column is now at Chebyshev distance 3,
    // exactly radius + margin, and must survive.
    sys.update(Some(viewer_at_cell(&sys, 1, 0)));
    sys.flush();
    for dz in -2..=2 {
        assert!(sys.is_loaded(CellCoord::new(-2, dz)), "margin cell evicted");
    }

    // Two cells east: distance 4 exceeds radius + margin; now it goes.
    let mut events = sys.update(Some(viewer_at_cell(&sys, 2, 0)));
    events.merge(sys.flush());
    for dz in -2..=2 {
        assert!(!sys.is_loaded(CellCoord::new(-2, dz)), "stale cell retained");
    }
    assert!(events.evicted.contains(&CellCoord::new(-2, 0)));

    // Nothing outside radius + margin of the new center remains.
    let limit = sys.streaming_params().load_radius + sys.streaming_params().evict_margin;
    let center = sys.center().unwrap();
    for coord in sys.loaded_coords() {
        assert!(coord.chebyshev(center) <= limit);
    }
}

#[test]
fn evict_and_reload_reproduce_the_cell_exactly() {
    let mut sys = system();
    let coord = CellCoord::new(0, 0);

    sys.update(Some(viewer_at_cell(&sys, 0, 0)));
    sys.flush();
    let mesh_before = sys.cell(coord).unwrap().mesh.clone();
    let placements_before = sys.discrete().placements(coord).unwrap().to_vec();
    let grass_before = sys.grass().field(coord).unwrap().clone();

    // Teleport far enough that everything near the origin unloads.
    sys.update(Some(viewer_at_cell(&sys, 50, 50)));
    sys.flush();
    assert!(!sys.is_loaded(coord));
    assert!(sys.discrete().placements(coord).is_none());

    sys.update(Some(viewer_at_cell(&sys, 0, 0)));
    sys.flush();
    let cell = sys.cell(coord).unwrap();
    assert_eq!(cell.mesh, mesh_before);
    assert_eq!(sys.discrete().placements(coord).unwrap(), &placements_before[..]);
    assert_eq!(sys.grass().field(coord).unwrap(), &grass_before);
}

#[test]
fn missing_viewer_is_idle_not_fatal() {
    let mut sys = system();
    let events = sys.update(None);
    assert!(events.loaded.is_empty() && events.evicted.is_empty());
    assert_eq!(sys.loaded_count(), 0);

    // Streaming starts once a viewer appears, and goes idle again
    // without churn when it disappears.
    sys.update(Some(viewer_at_cell(&sys, 0, 0)));
    sys.flush();
    let loaded = sys.loaded_count();
    let events = sys.update(None);
    assert!(events.evicted.is_empty());
    assert_eq!(sys.loaded_count(), loaded);
}

#[test]
fn rapid_teleports_settle_to_the_final_viewpoint() {
    let mut sys = system();
    // Issue loads for three centers without waiting; in-flight work for
    // abandoned centers must be discarded, not promoted.
    sys.update(Some(viewer_at_cell(&sys, 0, 0)));
    sys.update(Some(viewer_at_cell(&sys, 40, 0)));
    sys.update(Some(viewer_at_cell(&sys, 80, 0)));
    sys.flush();

    assert_eq!(sys.in_flight(), 0);
    let center = CellCoord::new(80, 0);
    let limit = sys.streaming_params().load_radius + sys.streaming_params().evict_margin;
    for coord in sys.loaded_coords() {
        assert!(
            coord.chebyshev(center) <= limit,
            "cell {coord:?} survived a teleport it should not have"
        );
    }
    let r = sys.streaming_params().load_radius;
    for dz in -r..=r {
        for dx in -r..=r {
            assert!(sys.is_loaded(center.offset(dx, dz)));
        }
    }
}

#[test]
fn queries_work_for_unloaded_terrain() {
    let sys = system();
    // Nothing is loaded; height and slope still answer anywhere.
    let h = sys.height_at(10_000.0, -10_000.0);
    let s = sys.slope_at(10_000.0, -10_000.0);
    assert!(h.is_finite());
    assert!((0.0..=1.0).contains(&s));
}
