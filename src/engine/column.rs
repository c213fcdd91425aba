//! One screen column: textured wall slice, distance shadow and rain.

use rand::Rng;

use crate::{
    engine::{
        projection::Projector,
        ray::{TraversalPoint, first_hit},
    },
    renderer::{DrawCall, Rect, Rgba, rgba},
    world::{Texture, TextureId},
};

/// Depth-cue streak colour (white, mostly transparent).
pub const RAIN_COLOUR: Rgba = rgba(255, 255, 255, 40);

/// Opacity of the black overlay drawn over a wall slice.
///
/// Farther hits and "backward" faces get darker; ambient light lifts the
/// whole scene. `light_range` must exceed `light`.
#[inline]
pub fn shadow_alpha(distance: f64, shading: u8, light_range: f64, light: f64) -> u8 {
    let shade = (distance + shading as f64) / (light_range - light);
    (255.0 * shade.clamp(0.0, 1.0)) as u8
}

/// Wall texture as the column code sees it.
#[derive(Clone, Copy, Debug)]
pub struct WallTexture {
    pub id: TextureId,
    pub w: usize,
    pub h: usize,
}

impl WallTexture {
    pub fn new(id: TextureId, tex: &Texture) -> Self {
        Self {
            id,
            w: tex.width(),
            h: tex.height(),
        }
    }
}

/// Turns the point sequence of one ray into draw calls for one strip.
#[derive(Clone, Copy, Debug)]
pub struct ColumnRenderer {
    projector: Projector,
    spacing: f64,
    light_range: f64,
    rain_height: f64,
    wall: WallTexture,
}

impl ColumnRenderer {
    pub fn new(
        projector: Projector,
        spacing: f64,
        light_range: f64,
        rain_height: f64,
        wall: WallTexture,
    ) -> Self {
        Self {
            projector,
            spacing,
            light_range,
            rain_height,
            wall,
        }
    }

    /// Screen x and width of `column`.
    #[inline]
    pub fn strip(&self, column: usize) -> (i32, i32) {
        let left = (column as f64 * self.spacing).floor() as i32;
        let width = self.spacing.ceil() as i32;
        (left, width)
    }

    /// Emit the calls for one column, far points first.
    ///
    /// `angle` is the column's offset from the view axis and `light` the
    /// ambient light snapshot for this frame. Rain is drawn for every
    /// traversal point, including those behind the wall.
    pub fn draw<R: Rng + ?Sized>(
        &self,
        column: usize,
        ray: &[TraversalPoint],
        angle: f64,
        light: f64,
        rng: &mut R,
        out: &mut Vec<DrawCall>,
    ) {
        let (left, width) = self.strip(column);
        let hit = first_hit(ray);

        for (index, step) in ray.iter().enumerate().rev() {
            if hit == Some(index) {
                self.draw_wall(step, angle, left, width, light, out);
            }
            self.draw_rain(step, angle, left, index, rng, out);
        }
    }

    fn draw_wall(
        &self,
        step: &TraversalPoint,
        angle: f64,
        left: i32,
        width: i32,
        light: f64,
        out: &mut Vec<DrawCall>,
    ) {
        let tex_x = ((self.wall.w as f64 * step.offset).floor() as i32)
            .clamp(0, self.wall.w.saturating_sub(1) as i32);
        let span = self.projector.project(step.height, angle, step.distance);
        let dst = Rect::new(left, span.top as i32, width, span.height as i32);

        out.push(DrawCall::Blit {
            tex: self.wall.id,
            src: Rect::new(tex_x, 0, 1, self.wall.h as i32),
            dst,
        });

        let a = shadow_alpha(step.distance, step.shading, self.light_range, light);
        out.push(DrawCall::Fill {
            rect: dst,
            colour: rgba(0, 0, 0, a),
        });
    }

    fn draw_rain<R: Rng + ?Sized>(
        &self,
        step: &TraversalPoint,
        angle: f64,
        left: i32,
        index: usize,
        rng: &mut R,
        out: &mut Vec<DrawCall>,
    ) {
        let drops = (rng.r#gen::<f64>().powi(3) * index as f64) as usize;
        if drops == 0 {
            return;
        }
        let rain = self.projector.project(self.rain_height, angle, step.distance);
        for _ in 0..drops {
            let top = rng.r#gen::<f64>() * rain.top;
            out.push(DrawCall::Line {
                x0: left,
                y0: top as i32,
                x1: left,
                y1: (top + rain.height) as i32,
                colour: RAIN_COLOUR,
            });
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
