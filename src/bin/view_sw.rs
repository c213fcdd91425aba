//! First-person view of a random grid.
//!
//! Controls  ↑/W ↓/S = walk ←/→ = turn Esc = quit
//!
//! ```bash
//! cargo run --release -- --seed 7 --resolution 300
//! ```

use clap::Parser;
use minifb::{Key, Window, WindowOptions};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

use gridcast_rs::{
    config::Config,
    engine::{Pipeline, SceneTextures},
    renderer::{Renderer, RendererExt, Software},
    sim::{FrameClock, FrameStats, InputCmd, update},
    world::{OccupancyGrid, Texture, TextureBank, Viewer},
};

const CAPTION: &str = "Raycasting with Rust";

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Window width in pixels
    #[arg(long, default_value_t = 1200)]
    width: usize,

    /// Window height in pixels
    #[arg(long, default_value_t = 600)]
    height: usize,

    /// Rays cast per frame (screen columns)
    #[arg(long, default_value_t = 300)]
    resolution: usize,

    /// Horizontal field of view in degrees
    #[arg(long, default_value_t = 72.0)]
    fov: f64,

    /// Maximum ray length in cells
    #[arg(long, default_value_t = 8.0)]
    range: f64,

    /// Grid is SIZE × SIZE cells
    #[arg(long, value_name = "SIZE", default_value_t = 32)]
    map_size: usize,

    /// Probability that a cell is a wall
    #[arg(long, default_value_t = 0.3)]
    fill: f64,

    /// Seed for map, lightning and rain
    #[arg(long)]
    seed: Option<u64>,
}

impl From<Opts> for Config {
    fn from(o: Opts) -> Self {
        Config {
            screen_w: o.width,
            screen_h: o.height,
            resolution: o.resolution,
            field_of_view: o.fov.to_radians(),
            range: o.range,
            map_size: o.map_size,
            fill_probability: o.fill,
            seed: o.seed,
            ..Config::default()
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg: Config = Opts::parse().into();
    cfg.validate()?;
    let mut rng = cfg.rng();

    // ─────────── textures (procedural stand-ins) ────────────
    let mut bank = TextureBank::default_with_checker();
    let sky_w = (cfg.screen_w as f64 * std::f64::consts::TAU / cfg.field_of_view) as usize;
    let scale = cfg.scale();
    let textures = SceneTextures {
        sky: bank.insert("SKY", Texture::sky(sky_w, cfg.screen_h))?,
        wall: bank.insert("WALL", Texture::bricks(128))?,
        weapon: bank.insert(
            "WEAPON",
            Texture::blade((150.0 * scale) as usize, (160.0 * scale) as usize),
        )?,
    };
    tracing::debug!(textures = bank.len(), "texture bank ready");

    // ─────────── world ────────────
    let mut grid = OccupancyGrid::generate(cfg.map_size, cfg.fill_probability, &mut rng);
    let spawn = grid
        .spawn_point()
        .ok_or_else(|| anyhow::anyhow!("generated grid has no open cell"))?;
    let mut viewer = Viewer::new(spawn, std::f64::consts::PI * 0.3);
    viewer.speed = cfg.speed;
    viewer.turn_rate = cfg.turn_rate;
    tracing::info!(x = spawn.x, y = spawn.y, "viewer spawned");

    let mut pipeline = Pipeline::new(&cfg, textures, &bank)?;
    let mut renderer = Software::default();

    let (w, h) = (cfg.screen_w, cfg.screen_h);
    let mut win = Window::new(CAPTION, w, h, WindowOptions::default())?;
    win.set_target_fps(60);

    let mut clock = FrameClock::new();
    let mut stats = FrameStats::new(Duration::from_secs(1));

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let t0 = Instant::now();
        let dt = clock.tick();

        /* --------------- one InputCmd per frame ----------------------- */
        let cmd = InputCmd::from_keys(
            win.is_key_down(Key::Up) || win.is_key_down(Key::W),
            win.is_key_down(Key::Down) || win.is_key_down(Key::S),
            win.is_key_down(Key::Left) || win.is_key_down(Key::A),
            win.is_key_down(Key::Right) || win.is_key_down(Key::D),
        );
        update(&mut grid, &mut viewer, cmd, dt, &mut rng);

        /* draw */
        let calls = pipeline.build(&viewer, &grid, &bank, &mut rng);
        renderer.begin_frame(w, h);
        renderer.replay(calls, &bank);
        let mut presented = Ok(());
        renderer.end_frame(|fb, w, h| presented = win.update_with_buffer(fb, w, h));
        presented?;

        if let Some((avg_ms, fps)) = stats.record(t0.elapsed()) {
            win.set_title(&format!("{CAPTION} - FPS: {fps:.2}"));
            tracing::info!("avg frame: {avg_ms:.2} ms  ({fps:.1} FPS)");
        }
    }
    Ok(())
}
