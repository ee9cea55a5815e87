use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, unbounded};
use rayon::{ThreadPool, ThreadPoolBuilder};
use veldt_cell::{CellCoord, CellMeshCpu, CellSamples, CollisionMesh, build_cell_mesh};
use veldt_world::{StreamingParams, World};

#[derive(Clone, Copy, Debug)]
pub struct CellBuildJob {
    pub coord: CellCoord,
    pub rev: u64,
    pub job_id: u64,
}

pub struct CellBuildOut {
    pub coord: CellCoord,
    pub rev: u64,
    pub job_id: u64,
    pub mesh: CellMeshCpu,
    pub collision: CollisionMesh,
    pub t_build_ms: u32,
}

/// Background cell builds: a job channel feeding a fixed worker pool,
/// results drained from a completion channel by the frame loop. Jobs
/// always run to completion; staleness is resolved by the manager when
/// it drains, not by interrupting workers.
pub struct Runtime {
    job_tx: Sender<CellBuildJob>,
    res_rx: Receiver<CellBuildOut>,
    _pool: Arc<ThreadPool>,
    queued: Arc<AtomicUsize>,
    inflight: Arc<AtomicUsize>,
    pub workers: usize,
}

impl Runtime {
    pub fn new(world: Arc<World>, stream: StreamingParams) -> Self {
        let (job_tx, job_rx) = unbounded::<CellBuildJob>();
        let (res_tx, res_rx) = unbounded::<CellBuildOut>();

        let workers = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
            .saturating_sub(1)
            .max(1);
        let queued = Arc::new(AtomicUsize::new(0));
        let inflight = Arc::new(AtomicUsize::new(0));

        let pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("veldt-build-{i}"))
                .build()
                .expect("cell build pool"),
        );
        for _ in 0..workers {
            let rx = job_rx.clone();
            let tx = res_tx.clone();
            let world = world.clone();
            let queued = queued.clone();
            let inflight = inflight.clone();
            pool.spawn(move || {
                while let Ok(job) = rx.recv() {
                    queued.fetch_sub(1, Ordering::Relaxed);
                    inflight.fetch_add(1, Ordering::Relaxed);
                    process_build_job(job, world.as_ref(), stream, &tx);
                    inflight.fetch_sub(1, Ordering::Relaxed);
                }
            });
        }

        Self {
            job_tx,
            res_rx,
            _pool: pool,
            queued,
            inflight,
            workers,
        }
    }

    pub fn submit(&self, job: CellBuildJob) {
        self.queued.fetch_add(1, Ordering::Relaxed);
        if self.job_tx.send(job).is_err() {
            self.queued.fetch_sub(1, Ordering::Relaxed);
        }
    }

    /// Everything that has completed so far, without blocking.
    pub fn drain_results(&self) -> Vec<CellBuildOut> {
        self.res_rx.try_iter().collect()
    }

    /// Block for the next completion. Only sound while the caller knows
    /// work is outstanding.
    pub fn recv_result(&self) -> Option<CellBuildOut> {
        self.res_rx.recv().ok()
    }

    pub fn queue_debug_counts(&self) -> (usize, usize) {
        (
            self.queued.load(Ordering::Relaxed),
            self.inflight.load(Ordering::Relaxed),
        )
    }
}

fn process_build_job(
    job: CellBuildJob,
    world: &World,
    stream: StreamingParams,
    tx: &Sender<CellBuildOut>,
) {
    let t0 = Instant::now();
    let samples = CellSamples::build(world, job.coord, &stream);
    let (mesh, collision) = build_cell_mesh(&samples);
    let t_build_ms = t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32;
    let _ = tx.send(CellBuildOut {
        coord: job.coord,
        rev: job.rev,
        job_id: job.job_id,
        mesh,
        collision,
        t_build_ms,
    });
}
