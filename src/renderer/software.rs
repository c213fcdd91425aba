//! ---------------------------------------------------------------------------
//! Software (CPU) back-end
//!
//! * Fills a `Vec<u32>` frame-buffer in **0xAARRGGBB** format.
//! * Every primitive clips against the frame, so callers may hand in
//!   rectangles that start above the screen or run past its bottom.
//! * Blits sample nearest-neighbour and blend by texel alpha, which lets
//!   sprites use alpha 0 as a colour key.
//! ---------------------------------------------------------------------------

use crate::{
    renderer::{Rect, Renderer, Rgba, blend},
    world::Texture,
};

/*───────────────────────────────────────────────────────────────────────*/
/*                              Backend                                 */
/*───────────────────────────────────────────────────────────────────────*/

#[derive(Default)]
pub struct Software {
    scratch: Vec<Rgba>,
    width: usize,
    height: usize,
}

impl Software {
    /// Intersect `r` with the frame; returns `(x0, y0, x1, y1)` half-open.
    fn clip(&self, r: Rect) -> Option<(i64, i64, i64, i64)> {
        let x0 = (r.x as i64).max(0);
        let y0 = (r.y as i64).max(0);
        let x1 = (r.x as i64 + r.w as i64).min(self.width as i64);
        let y1 = (r.y as i64 + r.h as i64).min(self.height as i64);
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }

    #[inline]
    fn put(&mut self, x: i64, y: i64, colour: Rgba) {
        if (0..self.width as i64).contains(&x) && (0..self.height as i64).contains(&y) {
            let idx = y as usize * self.width + x as usize;
            self.scratch[idx] = blend(self.scratch[idx], colour);
        }
    }
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        // (re)allocate if resolution changed
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.scratch.clear();
            self.scratch.resize(w * h, 0xFF_000000);
        }
    }

    fn clear(&mut self, colour: Rgba) {
        self.scratch.fill(colour);
    }

    fn blit(&mut self, tex: &Texture, src: Rect, dst: Rect) {
        if src.is_empty() || dst.is_empty() || tex.w == 0 || tex.h == 0 {
            return;
        }
        let Some((x0, y0, x1, y1)) = self.clip(dst) else {
            return;
        };

        let (tw, th) = (tex.w as i64, tex.h as i64);
        for x in x0..x1 {
            /* source column for this destination column */
            let u = src.x as i64 + (x - dst.x as i64) * src.w as i64 / dst.w as i64;
            if !(0..tw).contains(&u) {
                continue;
            }
            for y in y0..y1 {
                let v = src.y as i64 + (y - dst.y as i64) * src.h as i64 / dst.h as i64;
                if !(0..th).contains(&v) {
                    continue;
                }
                let texel = tex.texel(u as usize, v as usize);
                let idx = y as usize * self.width + x as usize;
                self.scratch[idx] = blend(self.scratch[idx], texel);
            }
        }
    }

    fn fill_rect(&mut self, rect: Rect, colour: Rgba) {
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        for y in y0..y1 {
            let row = y as usize * self.width;
            for px in &mut self.scratch[row + x0 as usize..row + x1 as usize] {
                *px = blend(*px, colour);
            }
        }
    }

    /// Integer Bresenham line‑drawing algorithm.
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, colour: Rgba) {
        let (mut x0, mut y0) = (x0 as i64, y0 as i64);
        let (x1, y1) = (x1 as i64, y1 as i64);
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.put(x0, y0, colour);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
