use proptest::prelude::*;
use veldt_world::{FlatZone, RampZone, TerrainParams, World};

fn plain_world(seed: i32) -> World {
    World::builder(seed, TerrainParams::default()).build()
}

fn village_world(seed: i32) -> World {
    let mut b = World::builder(seed, TerrainParams::default());
    b.register_flat_zone(FlatZone {
        x: 80.0,
        z: 80.0,
        core_radius: 16.0,
        falloff: 12.0,
        target_height: 20.0,
    })
    .unwrap();
    b.build()
}

fn ramp() -> RampZone {
    RampZone {
        center_x: 32.0,
        half_width: 6.0,
        north: 120.0,
        south: 40.0,
        start_height: 20.0,
        end_height: 6.0,
        margin: 4.0,
    }
}

#[test]
fn same_seed_same_heights() {
    let a = plain_world(12345);
    let b = plain_world(12345);
    for (x, z) in [(0.0, 0.0), (13.7, -211.4), (5000.0, 5000.0), (-87.2, 3.1)] {
        assert_eq!(a.height_at(x, z), b.height_at(x, z));
        assert_eq!(a.slope_at(x, z), b.slope_at(x, z));
    }
}

#[test]
fn distinct_seeds_distinct_worlds() {
    let a = plain_world(1);
    let b = plain_world(2);
    let differs = (0..32).any(|i| {
        let x = i as f32 * 37.5;
        a.height_at(x, x * 0.7) != b.height_at(x, x * 0.7)
    });
    assert!(differs);
}

#[test]
fn flat_zone_core_is_exact() {
    let w = village_world(12345);
    // Worked example: inside the core the plateau height is exact.
    assert!((w.height_at(80.0, 80.0) - 20.0).abs() < 1e-4);
    assert!((w.height_at(88.0, 72.0) - 20.0).abs() < 1e-4);
}

#[test]
fn flat_zone_leaves_far_terrain_untouched() {
    let with_zone = village_world(12345);
    let without = plain_world(12345);
    // (80, 200) is well past core + falloff.
    assert_eq!(with_zone.height_at(80.0, 200.0), without.height_at(80.0, 200.0));
    assert_eq!(with_zone.height_at(-40.0, -40.0), without.height_at(-40.0, -40.0));
}

#[test]
fn ramp_centerline_is_monotone_descending() {
    // Carve the ramp through a plateau that covers the whole corridor,
    // so the ramp is the active surface end to end.
    let mut b = World::builder(777, TerrainParams::default());
    b.register_flat_zone(FlatZone {
        x: 32.0,
        z: 80.0,
        core_radius: 60.0,
        falloff: 10.0,
        target_height: 40.0,
    })
    .unwrap();
    b.register_ramp_zone(RampZone {
        start_height: 40.0,
        ..ramp()
    })
    .unwrap();
    let w = b.build();
    let mut prev = f32::INFINITY;
    let mut z = 120.0;
    while z >= 40.0 {
        let h = w.height_at(32.0, z);
        assert!(
            h <= prev + 1e-4,
            "height rose from {prev} to {h} at z={z} walking south"
        );
        prev = h;
        z -= 1.0;
    }
}

#[test]
fn ramp_only_lowers_terrain() {
    let base = plain_world(777);
    let mut b = World::builder(777, TerrainParams::default());
    b.register_ramp_zone(ramp()).unwrap();
    let carved = b.build();
    for iz in 0..=80 {
        for ix in -12..=12 {
            let x = 32.0 + ix as f32;
            let z = 40.0 + iz as f32;
            assert!(
                carved.height_at(x, z) <= base.height_at(x, z) + 1e-4,
                "ramp raised terrain at ({x}, {z})"
            );
        }
    }
}

#[test]
fn flat_then_ramp_order_lets_ramps_cut_plateaus() {
    // A ramp whose surface dips below the plateau must win inside the
    // overlap; that is the whole point of applying ramps second.
    let mut b = World::builder(9, TerrainParams::default());
    b.register_flat_zone(FlatZone {
        x: 32.0,
        z: 110.0,
        core_radius: 30.0,
        falloff: 10.0,
        target_height: 20.0,
    })
    .unwrap();
    b.register_ramp_zone(ramp()).unwrap();
    let w = b.build();
    // Deep inside both the plateau core and the ramp rectangle, near the
    // south end of the plateau where the ramp surface is well below 20.
    let h = w.height_at(32.0, 90.0);
    let ramp_h = ramp().surface_height(90.0);
    assert!((h - ramp_h).abs() < 1e-3, "expected {ramp_h}, got {h}");
}

#[test]
fn normals_are_unit_and_slope_in_range() {
    let w = plain_world(4242);
    for i in 0..64 {
        let x = i as f32 * 17.3 - 500.0;
        let z = i as f32 * -9.1 + 250.0;
        let n = w.normal_at(x, z);
        assert!((n.length() - 1.0).abs() < 1e-4);
        let s = w.slope_at(x, z);
        assert!((0.0..=1.0).contains(&s), "slope {s} out of range");
    }
}

proptest! {
    // Heights stay within the lifted amplitude envelope everywhere.
    #[test]
    fn base_height_within_envelope(x in -1e5f32..1e5, z in -1e5f32..1e5, seed in any::<i32>()) {
        let w = plain_world(seed);
        let p = TerrainParams::default();
        let h = w.field().base_height(x, z);
        let lo = p.baseline_lift * p.amplitude;
        let hi = (1.0 + p.baseline_lift) * p.amplitude;
        prop_assert!(h >= lo - 1e-3 && h <= hi + 1e-3, "h={} outside [{}, {}]", h, lo, hi);
    }

    // The flat-zone blend never overshoots: output is between the raw
    // height and the target.
    #[test]
    fn flat_blend_is_bounded(x in -200.0f32..200.0, z in -200.0f32..200.0) {
        let with_zone = village_world(55);
        let without = plain_world(55);
        let raw = without.height_at(x, z);
        let blended = with_zone.height_at(x, z);
        let target = 20.0f32;
        let lo = raw.min(target) - 1e-3;
        let hi = raw.max(target) + 1e-3;
        prop_assert!(blended >= lo && blended <= hi);
    }
}
