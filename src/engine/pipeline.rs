//! Frame assembly: sky, one ray per column, weapon overlay.
//!
//! The pipeline only *describes* the frame as a list of [`DrawCall`]s;
//! presenting it is the renderer's job.

use rand::Rng;
use std::f64::consts::TAU;

use crate::{
    config::{Config, ConfigError},
    engine::{
        column::{ColumnRenderer, WallTexture},
        projection::Projector,
        ray::cast_ray,
        types::Screen,
    },
    renderer::{DrawCall, Rect, Rgba},
    world::{OccupancyGrid, TextureBank, TextureId, Viewer},
};

/// Background behind everything else.
pub const CLEAR_COLOUR: Rgba = 0xFF_000000;

/// Textures the scene draws, by role.
#[derive(Clone, Copy, Debug)]
pub struct SceneTextures {
    pub sky: TextureId,
    pub wall: TextureId,
    pub weapon: TextureId,
}

pub struct Pipeline {
    screen: Screen,
    resolution: usize,
    field_of_view: f64,
    range: f64,
    scale: f64,
    textures: SceneTextures,
    columns: ColumnRenderer,
    calls: Vec<DrawCall>,
}

impl Pipeline {
    pub fn new(
        cfg: &Config,
        textures: SceneTextures,
        bank: &TextureBank,
    ) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let screen = Screen::new(cfg.screen_w, cfg.screen_h);
        let projector = Projector::new(&screen, cfg.z_min);
        let wall = WallTexture::new(textures.wall, bank.texture_or_missing(textures.wall));
        let columns = ColumnRenderer::new(
            projector,
            cfg.spacing(),
            cfg.light_range,
            cfg.rain_height,
            wall,
        );
        Ok(Self {
            screen,
            resolution: cfg.resolution,
            field_of_view: cfg.field_of_view,
            range: cfg.range,
            scale: cfg.scale(),
            textures,
            columns,
            calls: Vec::new(),
        })
    }

    #[inline]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Offset of `column`'s ray from the view axis.
    #[inline]
    pub fn column_angle(&self, column: usize) -> f64 {
        self.field_of_view * (column as f64 / self.resolution as f64 - 0.5)
    }

    /// Build the draw list for one frame.
    ///
    /// The grid is only read; the ambient light is sampled once so every
    /// column shades with the same value.
    pub fn build<R: Rng + ?Sized>(
        &mut self,
        viewer: &Viewer,
        grid: &OccupancyGrid,
        bank: &TextureBank,
        rng: &mut R,
    ) -> &[DrawCall] {
        let mut calls = std::mem::take(&mut self.calls);
        calls.clear();
        calls.push(DrawCall::Clear(CLEAR_COLOUR));

        self.draw_sky(viewer.direction(), bank, &mut calls);
        self.draw_columns(viewer, grid, rng, &mut calls);
        self.draw_weapon(viewer.paces(), bank, &mut calls);

        self.calls = calls;
        &self.calls
    }

    /*──────────────────────────── passes ────────────────────────────*/

    /// Panorama scrolled by heading; a second copy covers the wrap seam.
    fn draw_sky(&self, direction: f64, bank: &TextureBank, out: &mut Vec<DrawCall>) {
        let sky = bank.texture_or_missing(self.textures.sky);
        let (w, h) = (sky.width() as i32, sky.height() as i32);
        let left = -(sky.width() as f64) * direction / TAU;
        let src = Rect::of(sky);

        out.push(DrawCall::Blit {
            tex: self.textures.sky,
            src,
            dst: Rect::new(left as i32, 0, w, h),
        });
        if left + (sky.width() as f64) < self.screen.w as f64 {
            out.push(DrawCall::Blit {
                tex: self.textures.sky,
                src,
                dst: Rect::new(left as i32 + w, 0, w, h),
            });
        }
    }

    fn draw_columns<R: Rng + ?Sized>(
        &self,
        viewer: &Viewer,
        grid: &OccupancyGrid,
        rng: &mut R,
        out: &mut Vec<DrawCall>,
    ) {
        let light = grid.light();
        for column in 0..self.resolution {
            let angle = self.column_angle(column);
            let ray = cast_ray(grid, viewer.pos, viewer.direction() + angle, self.range);
            self.columns.draw(column, &ray, angle, light, rng, out);
        }
    }

    /// Hand-held sprite, bobbing with the distance walked.
    fn draw_weapon(&self, paces: f64, bank: &TextureBank, out: &mut Vec<DrawCall>) {
        let weapon = bank.texture_or_missing(self.textures.weapon);
        let bob_x = (paces * 2.0).cos() * self.scale * 6.0;
        let bob_y = (paces * 4.0).sin() * self.scale * 6.0;
        let left = self.screen.w as f64 * 0.66 + bob_x;
        let top = self.screen.h as f64 * 0.6 + bob_y;
        out.push(DrawCall::Blit {
            tex: self.textures.weapon,
            src: Rect::of(weapon),
            dst: Rect::new(
                left as i32,
                top as i32,
                weapon.width() as i32,
                weapon.height() as i32,
            ),
        });
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Texture;
    use glam::dvec2;
    use rand::{SeedableRng, rngs::StdRng};

    fn scene(cfg: &Config) -> (TextureBank, Pipeline) {
        let mut bank = TextureBank::default_with_checker();
        let textures = SceneTextures {
            sky: bank.insert("SKY", Texture::sky(cfg.screen_w * 5, cfg.screen_h)).unwrap(),
            wall: bank.insert("WALL", Texture::bricks(64)).unwrap(),
            weapon: bank.insert("WEAPON", Texture::blade(30, 40)).unwrap(),
        };
        let pipeline = Pipeline::new(cfg, textures, &bank).unwrap();
        (bank, pipeline)
    }

    fn small_cfg() -> Config {
        Config {
            screen_w: 120,
            screen_h: 60,
            resolution: 30,
            seed: Some(1),
            ..Config::default()
        }
    }

    #[test]
    fn column_angles_span_the_field_of_view() {
        let cfg = small_cfg();
        let (_, p) = scene(&cfg);
        assert!((p.column_angle(0) + cfg.field_of_view / 2.0).abs() < 1e-12);
        assert_eq!(p.column_angle(15), 0.0);
        assert!(p.column_angle(29) < cfg.field_of_view / 2.0);
    }

    #[test]
    fn frame_order_is_clear_sky_columns_weapon() {
        let cfg = small_cfg();
        let (bank, mut p) = scene(&cfg);
        let grid = OccupancyGrid::open(4);
        let viewer = Viewer::new(dvec2(2.0, 2.0), 0.0);
        let mut rng = cfg.rng();
        let calls = p.build(&viewer, &grid, &bank, &mut rng).to_vec();

        assert_eq!(calls[0], DrawCall::Clear(CLEAR_COLOUR));
        assert!(matches!(calls[1], DrawCall::Blit { tex, .. } if tex == p.textures.sky));
        assert!(matches!(
            calls.last(),
            Some(DrawCall::Blit { tex, .. }) if *tex == p.textures.weapon
        ));

        // every column sees a boundary wall in a 4×4 open grid
        let walls = calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Blit { tex, .. } if *tex == p.textures.wall))
            .count();
        assert_eq!(walls, cfg.resolution);
    }

    #[test]
    fn sky_wraps_with_second_copy() {
        let cfg = small_cfg();
        let (bank, p) = scene(&cfg);
        let sky_w = bank.texture(p.textures.sky).unwrap().width() as i32;

        let mut calls = Vec::new();
        p.draw_sky(0.0, &bank, &mut calls);
        assert_eq!(calls.len(), 1, "facing 0 the panorama covers the screen");

        calls.clear();
        p.draw_sky(TAU * 0.99, &bank, &mut calls);
        assert_eq!(calls.len(), 2);
        let DrawCall::Blit { dst: first, .. } = calls[0] else {
            unreachable!()
        };
        let DrawCall::Blit { dst: second, .. } = calls[1] else {
            unreachable!()
        };
        assert_eq!(second.x - first.x, sky_w);
        assert!(second.x < cfg.screen_w as i32);
    }

    #[test]
    fn weapon_bobs_with_paces() {
        let cfg = small_cfg();
        let (bank, p) = scene(&cfg);
        let mut still = Vec::new();
        let mut moved = Vec::new();
        p.draw_weapon(0.0, &bank, &mut still);
        p.draw_weapon(0.4, &bank, &mut moved);
        let DrawCall::Blit { dst: a, .. } = still[0] else {
            unreachable!()
        };
        let DrawCall::Blit { dst: b, .. } = moved[0] else {
            unreachable!()
        };
        // paces = 0: bob_x = 6 * scale, bob_y = 0
        assert_eq!(a.x, (120.0 * 0.66 + 6.0 * cfg.scale()) as i32);
        assert_eq!(a.y, 36);
        assert_ne!((a.x, a.y), (b.x, b.y));
    }

    #[test]
    fn same_seed_same_frame() {
        let cfg = small_cfg();
        let (bank, mut p) = scene(&cfg);
        let mut grid_rng = StdRng::seed_from_u64(3);
        let grid = OccupancyGrid::generate(16, 0.3, &mut grid_rng);
        let viewer = Viewer::new(grid.spawn_point().unwrap(), 1.0);

        let a = p.build(&viewer, &grid, &bank, &mut cfg.rng()).to_vec();
        let b = p.build(&viewer, &grid, &bank, &mut cfg.rng()).to_vec();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_invalid_config() {
        let cfg = Config {
            resolution: 0,
            ..small_cfg()
        };
        let bank = TextureBank::default_with_checker();
        let textures = SceneTextures {
            sky: 0,
            wall: 0,
            weapon: 0,
        };
        assert!(matches!(
            Pipeline::new(&cfg, textures, &bank),
            Err(ConfigError::ZeroResolution)
        ));
    }
}
