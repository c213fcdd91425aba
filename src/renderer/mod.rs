//! Rendering abstraction layer.
//!
//! *The engine never touches a pixel buffer directly.*
//! It produces a list of [`DrawCall`]s (back-to-front) and hands them to a
//! type that implements [`Renderer`].
//!
//! * Back-ends only need four primitives: textured blit, blended fill,
//!   blended line and clear.
//! * A helper blanket‐impl [`RendererExt`] adds `draw_frame` so call-sites
//!   stay short.

use crate::world::{Texture, TextureBank, TextureId};

/// Pixel format of the software frame-buffer (0xAARRGGBB).
pub type Rgba = u32;

/// Pack components into an [`Rgba`].
#[inline(always)]
pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Rgba {
    (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

#[inline(always)]
pub const fn alpha(c: Rgba) -> u8 {
    (c >> 24) as u8
}

/// Composite `src` over `dst` using the source alpha. The result is opaque.
#[inline]
pub fn blend(dst: Rgba, src: Rgba) -> Rgba {
    match alpha(src) {
        0 => dst,
        255 => src,
        a => {
            let a = a as u32;
            let inv = 255 - a;
            let ch = |shift: u32| {
                let s = (src >> shift) & 0xFF;
                let d = (dst >> shift) & 0xFF;
                ((s * a + d * inv + 127) / 255) << shift
            };
            0xFF00_0000 | ch(16) | ch(8) | ch(0)
        }
    }
}

/// Integer screen (or texture) rectangle. May extend past the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    #[inline]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Whole texture as a source rectangle.
    #[inline]
    pub fn of(tex: &Texture) -> Self {
        Self::new(0, 0, tex.w as i32, tex.h as i32)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }
}

/// One drawing command.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    /// Fill the whole surface, ignoring alpha.
    Clear(Rgba),
    /// Scale the `src` part of a texture into `dst`.
    Blit { tex: TextureId, src: Rect, dst: Rect },
    /// Alpha-blended rectangle.
    Fill { rect: Rect, colour: Rgba },
    /// Alpha-blended line segment, both end points inclusive.
    Line {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        colour: Rgba,
    },
}

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
/// Software callers typically forward it to their window-manager;
/// GPU back-ends can ignore the slice because they never allocate it.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution.
    fn begin_frame(&mut self, width: usize, height: usize);

    fn clear(&mut self, colour: Rgba);

    /// Scale the `src` region of `tex` into `dst`, blending by texel alpha.
    fn blit(&mut self, tex: &Texture, src: Rect, dst: Rect);

    fn fill_rect(&mut self, rect: Rect, colour: Rgba);

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, colour: Rgba);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// * `submit(&[Rgba], w, h)` is run exactly once per frame.
    /// * Software caller passes `|fb, w, h| window.update_with_buffer(fb, w, h)`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Convenience blanket-impl with a one-liner `draw_frame` adaptor.
pub trait RendererExt: Renderer {
    /// Replay `calls` in order without presenting.
    fn replay(&mut self, calls: &[DrawCall], bank: &TextureBank) {
        for c in calls {
            match *c {
                DrawCall::Clear(colour) => self.clear(colour),
                DrawCall::Blit { tex, src, dst } => {
                    self.blit(bank.texture_or_missing(tex), src, dst)
                }
                DrawCall::Fill { rect, colour } => self.fill_rect(rect, colour),
                DrawCall::Line {
                    x0,
                    y0,
                    x1,
                    y1,
                    colour,
                } => self.draw_line(x0, y0, x1, y1, colour),
            }
        }
    }

    fn draw_frame<F>(
        &mut self,
        width: usize,
        height: usize,
        calls: &[DrawCall],
        bank: &TextureBank,
        submit: F,
    ) where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.begin_frame(width, height);
        self.replay(calls, bank);
        self.end_frame(submit);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}

pub mod software;

pub use software::Software;
