use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use raylib::prelude::*;

use veldt_stream::TerrainSystem;
use veldt_world::{
    ConfigError, FlatZone, RampZone, ScatterParams, StreamingParams, World, WorldConfig,
    load_config_from_path,
};

mod app;
mod camera;

use app::App;
use camera::FlyCamera;

#[derive(Parser, Debug)]
#[command(name = "veldt", about = "Streaming height-field terrain viewer")]
struct Args {
    /// World seed.
    #[arg(long, default_value_t = 1337)]
    seed: i32,
    /// TOML world config; built-in demo world when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the streaming load radius, in cells.
    #[arg(long)]
    radius: Option<i32>,
    #[arg(long, default_value_t = 1280)]
    width: i32,
    #[arg(long, default_value_t = 720)]
    height: i32,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let cfg = match &args.config {
        Some(path) => match load_config_from_path(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::error!("config {}: {e}", path.display());
                std::process::exit(2);
            }
        },
        None => demo_config(),
    };
    let system = match build_system(&args, &cfg) {
        Ok(system) => system,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(2);
        }
    };

    let (mut rl, thread) = raylib::init()
        .size(args.width, args.height)
        .title("veldt")
        .build();
    rl.set_target_fps(60);

    let spawn_x = 96.0;
    let spawn_z = 96.0;
    let spawn_y = system.height_at(spawn_x, spawn_z) + 12.0;
    let mut cam = FlyCamera::new(Vector3::new(spawn_x, spawn_y, spawn_z));
    rl.disable_cursor();

    let mut app = App::new(&mut rl, &thread, system);

    while !rl.window_should_close() {
        let dt = rl.get_frame_time();
        {
            let system = app.system();
            let floor = |x: f32, z: f32| system.height_at(x, z);
            cam.update(&mut rl, dt, floor);
        }
        app.step(&mut rl, &thread, cam.position);

        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::new(186, 214, 232, 255));
        {
            let mut d3 = d.begin_mode3D(cam.to_camera3d());
            app.draw_3d(&mut d3);
        }
        app.draw_hud(&mut d);
        d.draw_fps(12, 12);
    }
}

fn build_system(args: &Args, cfg: &WorldConfig) -> Result<TerrainSystem, ConfigError> {
    let mut stream = StreamingParams::from_config(&cfg.streaming)?;
    if let Some(r) = args.radius {
        stream.load_radius = r.max(0);
    }
    let scatter = ScatterParams::from_config(&cfg.scatter)?;
    let world = Arc::new(World::builder_from_config(args.seed, cfg)?.build());
    Ok(TerrainSystem::new(world, stream, scatter))
}

/// Default world when no config file is given: plain parameters plus a
/// settlement plateau with a carved path down its north side.
fn demo_config() -> WorldConfig {
    let mut cfg = WorldConfig::default();
    cfg.flat_zones.push(FlatZone {
        x: 96.0,
        z: 96.0,
        core_radius: 28.0,
        falloff: 18.0,
        target_height: 34.0,
    });
    cfg.ramp_zones.push(RampZone {
        center_x: 96.0,
        half_width: 6.0,
        north: 150.0,
        south: 96.0,
        start_height: 22.0,
        end_height: 34.0,
        margin: 4.0,
    });
    cfg
}
