use std::sync::Arc;

use hashbrown::HashMap;
use veldt_cell::{CellCoord, CellMeshCpu, CollisionMesh};
use veldt_geom::Vec3;
use veldt_scatter::{DensePlacer, DiscretePlacer};
use veldt_world::{ScatterParams, StreamingParams, World};

use crate::runtime::{CellBuildJob, CellBuildOut, Runtime};

/// A fully-materialized cell. Creation is atomic from the consumer's
/// point of view: mesh, collision, and secondary content all exist
/// before the cell is reported loaded, and all go away together.
pub struct LoadedCell {
    pub coord: CellCoord,
    pub mesh: CellMeshCpu,
    pub collision: CollisionMesh,
}

enum CellState {
    Loading { rev: u64 },
    Loaded(Box<LoadedCell>),
}

/// What one `update` changed, for the render side to act on.
#[derive(Debug, Default)]
pub struct StreamUpdate {
    pub loaded: Vec<CellCoord>,
    pub evicted: Vec<CellCoord>,
}

impl StreamUpdate {
    pub fn merge(&mut self, other: StreamUpdate) {
        self.loaded.extend(other.loaded);
        self.evicted.extend(other.evicted);
    }
}

/// The world coordinator: owns the loaded-cell set, the build runtime,
/// and both content placers, and exposes the height/slope queries the
/// rest of the game reads.
pub struct TerrainSystem {
    world: Arc<World>,
    stream: StreamingParams,
    runtime: Runtime,
    cells: HashMap<CellCoord, CellState>,
    center: Option<CellCoord>,
    next_rev: u64,
    next_job_id: u64,
    outstanding: usize,
    discrete: DiscretePlacer,
    grass: DensePlacer,
}

impl TerrainSystem {
    pub fn new(world: Arc<World>, stream: StreamingParams, scatter: ScatterParams) -> Self {
        let runtime = Runtime::new(world.clone(), stream);
        let discrete = DiscretePlacer::new(world.clone(), stream, scatter.clone());
        let grass = DensePlacer::new(world.clone(), stream, scatter);
        Self {
            world,
            stream,
            runtime,
            cells: HashMap::new(),
            center: None,
            next_rev: 1,
            next_job_id: 1,
            outstanding: 0,
            discrete,
            grass,
        }
    }

    /// Per-tick streaming step. With no viewer (actor destroyed, not yet
    /// spawned) this only drains completions; streaming resumes when a
    /// position is supplied again.
    pub fn update(&mut self, viewer: Option<Vec3>) -> StreamUpdate {
        let mut events = StreamUpdate::default();
        for out in self.runtime.drain_results() {
            self.promote(out, &mut events);
        }

        let Some(pos) = viewer else {
            return events;
        };
        let center = CellCoord::from_world(pos.x, pos.z, self.stream.cell_size);
        self.center = Some(center);

        // Evict with one cell of hysteresis so walking along a boundary
        // does not thrash load/unload.
        let evict_limit = self.stream.load_radius + self.stream.evict_margin;
        let stale: Vec<CellCoord> = self
            .cells
            .keys()
            .filter(|c| c.chebyshev(center) > evict_limit)
            .copied()
            .collect();
        for coord in stale {
            self.evict(coord, &mut events);
        }

        let r = self.stream.load_radius;
        for dz in -r..=r {
            for dx in -r..=r {
                let coord = center.offset(dx, dz);
                if !self.cells.contains_key(&coord) {
                    self.request_load(coord);
                }
            }
        }
        events
    }

    /// Block until no builds are queued or in flight, draining and
    /// promoting as they land. The deterministic settle point for
    /// headless callers and tests.
    pub fn flush(&mut self) -> StreamUpdate {
        let mut events = StreamUpdate::default();
        while self.outstanding > 0 {
            match self.runtime.recv_result() {
                Some(out) => self.promote(out, &mut events),
                None => break,
            }
        }
        events
    }

    fn request_load(&mut self, coord: CellCoord) {
        let rev = self.next_rev;
        self.next_rev += 1;
        let job_id = self.next_job_id;
        self.next_job_id += 1;
        self.cells.insert(coord, CellState::Loading { rev });
        self.outstanding += 1;
        log::debug!(
            "request cell ({}, {}) rev={rev} job={job_id:#x}",
            coord.cx,
            coord.cz
        );
        self.runtime.submit(CellBuildJob { coord, rev, job_id });
    }

    fn promote(&mut self, out: CellBuildOut, events: &mut StreamUpdate) {
        self.outstanding -= 1;
        let wanted = matches!(
            self.cells.get(&out.coord),
            Some(CellState::Loading { rev }) if *rev == out.rev
        );
        if !wanted {
            // The coordinate left the required set (or was re-requested)
            // while this build was in flight; cancellation is discard.
            log::debug!(
                "discard stale build ({}, {}) rev={}",
                out.coord.cx,
                out.coord.cz,
                out.rev
            );
            return;
        }
        let coord = out.coord;
        self.cells.insert(
            coord,
            CellState::Loaded(Box::new(LoadedCell {
                coord,
                mesh: out.mesh,
                collision: out.collision,
            })),
        );
        // Secondary content joins the cell before it is visible to
        // consumers; a loaded cell is never partially populated.
        self.discrete.place_on_cell(coord);
        self.grass.generate_for_cell(coord);
        log::debug!(
            "cell ({}, {}) loaded in {} ms",
            coord.cx,
            coord.cz,
            out.t_build_ms
        );
        events.loaded.push(coord);
    }

    fn evict(&mut self, coord: CellCoord, events: &mut StreamUpdate) {
        match self.cells.remove(&coord) {
            Some(CellState::Loaded(_)) => {
                self.discrete.remove_cell(coord);
                self.grass.remove_cell(coord);
                events.evicted.push(coord);
            }
            Some(CellState::Loading { .. }) => {
                // In-flight build; its completion will be discarded.
            }
            None => {}
        }
    }

    // Queries for gameplay collaborators; valid for any point, loaded
    // or not.

    #[inline]
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        self.world.height_at(x, z)
    }

    #[inline]
    pub fn slope_at(&self, x: f32, z: f32) -> f32 {
        self.world.slope_at(x, z)
    }

    pub fn world(&self) -> &Arc<World> {
        &self.world
    }

    pub fn streaming_params(&self) -> StreamingParams {
        self.stream
    }

    pub fn cell(&self, coord: CellCoord) -> Option<&LoadedCell> {
        match self.cells.get(&coord) {
            Some(CellState::Loaded(cell)) => Some(cell),
            _ => None,
        }
    }

    pub fn is_loaded(&self, coord: CellCoord) -> bool {
        self.cell(coord).is_some()
    }

    pub fn loaded_coords(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells.iter().filter_map(|(c, s)| match s {
            CellState::Loaded(_) => Some(*c),
            CellState::Loading { .. } => None,
        })
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded_coords().count()
    }

    pub fn in_flight(&self) -> usize {
        self.outstanding
    }

    pub fn center(&self) -> Option<CellCoord> {
        self.center
    }

    pub fn discrete(&self) -> &DiscretePlacer {
        &self.discrete
    }

    pub fn grass(&self) -> &DensePlacer {
        &self.grass
    }

    pub fn queue_debug_counts(&self) -> (usize, usize) {
        self.runtime.queue_debug_counts()
    }
}
