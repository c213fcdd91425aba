//! Top-down grid viewer with the ray fan overlaid.
//!
//! Every traversal point of every ray is marked, so the DDA can be checked
//! by eye. Same controls as `view_sw`.
//!
//! ```bash
//! cargo run --release --bin gridcast_rs -- --seed 7 --rays 40
//! ```

use clap::Parser;
use minifb::{Key, Window, WindowOptions};
use tracing_subscriber::EnvFilter;

use gridcast_rs::{
    config::Config,
    engine::{Crossing, cast_ray},
    renderer::{DrawCall, Rect, Renderer, RendererExt, Rgba, Software, rgba},
    sim::{FrameClock, InputCmd, update},
    world::{OccupancyGrid, TextureBank, Viewer},
};

const SIZE: usize = 768;

const WALL: Rgba = rgba(180, 60, 40, 255);
const FLOOR: Rgba = rgba(30, 30, 30, 255);
const RAY: Rgba = rgba(255, 255, 255, 90);
const VERTICAL: Rgba = rgba(80, 200, 255, 255);
const HORIZONTAL: Rgba = rgba(255, 220, 80, 255);
const VIEWER: Rgba = rgba(80, 255, 80, 255);

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Grid is SIZE × SIZE cells
    #[arg(long, value_name = "SIZE", default_value_t = 32)]
    map_size: usize,

    /// Probability that a cell is a wall
    #[arg(long, default_value_t = 0.3)]
    fill: f64,

    /// Rays in the fan
    #[arg(long, default_value_t = 24)]
    rays: usize,

    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // ─────────── parse CLI ────────────
    let opts = Opts::parse();
    let cfg = Config {
        map_size: opts.map_size,
        fill_probability: opts.fill,
        resolution: opts.rays.max(1),
        seed: opts.seed,
        ..Config::default()
    };
    cfg.validate()?;
    let mut rng = cfg.rng();

    let mut grid = OccupancyGrid::generate(cfg.map_size, cfg.fill_probability, &mut rng);
    let spawn = grid
        .spawn_point()
        .ok_or_else(|| anyhow::anyhow!("generated grid has no open cell"))?;
    let mut viewer = Viewer::new(spawn, 0.0);

    // ─────────── map‑space → screen‑space transform ────────────
    let cell = (SIZE / cfg.map_size).max(1) as f64;
    let to_screen = |x: f64, y: f64| -> (i32, i32) { ((x * cell) as i32, (y * cell) as i32) };

    let bank = TextureBank::default_with_checker();
    let mut renderer = Software::default();
    let mut calls = Vec::new();
    let mut clock = FrameClock::new();

    let mut win = Window::new("Grid map", SIZE, SIZE, WindowOptions::default())?;
    win.set_target_fps(60);

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let dt = clock.tick();
        let cmd = InputCmd::from_keys(
            win.is_key_down(Key::Up) || win.is_key_down(Key::W),
            win.is_key_down(Key::Down) || win.is_key_down(Key::S),
            win.is_key_down(Key::Left) || win.is_key_down(Key::A),
            win.is_key_down(Key::Right) || win.is_key_down(Key::D),
        );
        update(&mut grid, &mut viewer, cmd, dt, &mut rng);

        calls.clear();
        calls.push(DrawCall::Clear(0xFF_000000));

        /* cells ------------------------------------------------------- */
        for cy in 0..grid.size() {
            for cx in 0..grid.size() {
                let solid = !grid.is_open(cx as f64, cy as f64);
                let (x, y) = to_screen(cx as f64, cy as f64);
                let side = cell as i32 - 1;
                calls.push(DrawCall::Fill {
                    rect: Rect::new(x, y, side, side),
                    colour: if solid { WALL } else { FLOOR },
                });
            }
        }

        /* ray fan ----------------------------------------------------- */
        let (vx, vy) = to_screen(viewer.pos.x, viewer.pos.y);
        for i in 0..cfg.resolution {
            let offset = cfg.field_of_view * (i as f64 / cfg.resolution as f64 - 0.5);
            let ray = cast_ray(&grid, viewer.pos, viewer.direction() + offset, cfg.range);
            let Some(end) = ray.last() else { continue };
            let (ex, ey) = to_screen(end.pos.x, end.pos.y);
            calls.push(DrawCall::Line {
                x0: vx,
                y0: vy,
                x1: ex,
                y1: ey,
                colour: RAY,
            });
            for p in ray.iter().skip(1) {
                let (px, py) = to_screen(p.pos.x, p.pos.y);
                let colour = match p.crossing {
                    Crossing::Vertical => VERTICAL,
                    _ => HORIZONTAL,
                };
                calls.push(DrawCall::Fill {
                    rect: Rect::new(px - 1, py - 1, 3, 3),
                    colour,
                });
            }
        }

        calls.push(DrawCall::Fill {
            rect: Rect::new(vx - 3, vy - 3, 7, 7),
            colour: VIEWER,
        });

        renderer.begin_frame(SIZE, SIZE);
        renderer.replay(&calls, &bank);
        let mut presented = Ok(());
        renderer.end_frame(|fb, w, h| presented = win.update_with_buffer(fb, w, h));
        presented?;
    }
    Ok(())
}
