use hashbrown::HashMap;
use raylib::prelude::*;

use veldt_cell::CellCoord;
use veldt_geom::Vec3 as WVec3;
use veldt_render_raylib::{CellRender, GrassRenderer, conv, upload_cell_mesh};
use veldt_scatter::{ContentKind, Placement};
use veldt_stream::TerrainSystem;

const CANOPY_TINTS: [Color; 3] = [
    Color::new(58, 112, 52, 255),
    Color::new(74, 128, 58, 255),
    Color::new(46, 96, 48, 255),
];
const ROCK_TINTS: [Color; 2] = [
    Color::new(118, 116, 110, 255),
    Color::new(96, 98, 104, 255),
];

/// Frame-loop side of the terrain system: mirrors the loaded-cell set
/// into GPU models and draws everything.
pub struct App {
    system: TerrainSystem,
    renders: HashMap<CellCoord, CellRender>,
    grass: GrassRenderer,
}

impl App {
    pub fn new(rl: &mut RaylibHandle, thread: &RaylibThread, system: TerrainSystem) -> Self {
        let grass = GrassRenderer::new(rl, thread);
        Self {
            system,
            renders: HashMap::new(),
            grass,
        }
    }

    pub fn system(&self) -> &TerrainSystem {
        &self.system
    }

    /// Advance streaming for this frame and apply the resulting loads
    /// and evictions to the GPU mirror.
    pub fn step(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread, viewer: Vector3) {
        let events = self.system.update(Some(conv::vec3_from_rl(viewer)));
        for coord in events.evicted {
            self.renders.remove(&coord);
        }
        for coord in events.loaded {
            let Some(cell) = self.system.cell(coord) else {
                continue;
            };
            if let Some(render) = upload_cell_mesh(rl, thread, coord, &cell.mesh) {
                self.renders.insert(coord, render);
            }
        }
    }

    pub fn draw_3d(&self, d3: &mut RaylibMode3D<RaylibDrawHandle>) {
        for render in self.renders.values() {
            d3.draw_model(&render.model, Vector3::zero(), 1.0, Color::WHITE);
        }
        for p in self.system.discrete().iter_all() {
            draw_prop(d3, p);
        }
        for batch in self.system.grass().batches() {
            self.grass.draw_batch(batch);
        }
    }

    pub fn draw_hud(&self, d: &mut RaylibDrawHandle) {
        let (queued, building) = self.system.queue_debug_counts();
        let text = format!(
            "cells {} | in-flight {} (q {} b {}) | props {} | grass {}",
            self.system.loaded_count(),
            self.system.in_flight(),
            queued,
            building,
            self.system.discrete().iter_all().count(),
            self.system.grass().instance_count(),
        );
        d.draw_text(&text, 12, 36, 18, Color::DARKGRAY);
    }
}

/// Props are drawn as primitives; `asset_index` picks a tint the way it
/// would pick a mesh variant with real assets.
fn draw_prop(d3: &mut RaylibMode3D<RaylibDrawHandle>, p: &Placement) {
    let base = conv::vec3_to_rl(p.position);
    match p.kind {
        ContentKind::Tree => {
            let s = p.scale;
            let trunk_top = conv::vec3_to_rl(p.position + WVec3::new(0.0, 2.2 * s, 0.0));
            d3.draw_cylinder_ex(
                base,
                trunk_top,
                0.28 * s,
                0.18 * s,
                7,
                Color::new(94, 70, 48, 255),
            );
            let canopy = conv::vec3_to_rl(p.position + WVec3::new(0.0, 2.9 * s, 0.0));
            let tint = CANOPY_TINTS[p.asset_index as usize % CANOPY_TINTS.len()];
            d3.draw_sphere(canopy, 1.25 * s, tint);
        }
        ContentKind::Rock => {
            let s = p.scale;
            let center = conv::vec3_to_rl(p.position + WVec3::new(0.0, 0.25 * s, 0.0));
            let tint = ROCK_TINTS[p.asset_index as usize % ROCK_TINTS.len()];
            // A squashed cube reads as a boulder well enough.
            d3.draw_cube(center, 1.1 * s, 0.7 * s, 0.9 * s, tint);
        }
    }
}
