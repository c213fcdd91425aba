// Format-agnostic repository of textures.
// The renderer and the column code interact through `TextureId` only.

use std::collections::HashMap;

use crate::renderer::{Rgba, rgba};

/// Runtime handle for a texture in this bank.
///
/// *Guaranteed* to remain stable for the lifetime of the bank.
pub type TextureId = u16;

/// `TextureId` whose pixels are the checkerboard fallback.
/// Always = 0 because `TextureBank::new()` inserts it first.
pub const NO_TEXTURE: TextureId = 0;

/// CPU-side storage: 32-bit **ARGB** (0xAARRGGBB) in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub name: String,
    pub w: usize,
    pub h: usize,
    pub pixels: Vec<Rgba>,
}

/// Convenience checkerboard 8×8 (dark/light grey).
impl Default for Texture {
    fn default() -> Self {
        const LIGHT: Rgba = 0xFF_A0A0A0;
        const DARK: Rgba = 0xFF_404040;
        let mut pix = vec![0; 8 * 8];
        for y in 0..8 {
            for x in 0..8 {
                pix[y * 8 + x] = if (x ^ y) & 1 == 0 { LIGHT } else { DARK };
            }
        }
        Texture {
            name: "CHECKER".to_string(),
            w: 8,
            h: 8,
            pixels: pix,
        }
    }
}

impl Texture {
    #[inline]
    pub fn width(&self) -> usize {
        self.w
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.h
    }

    /// Texel at (`x`, `y`); coordinates wrap around the texture.
    #[inline]
    pub fn texel(&self, x: usize, y: usize) -> Rgba {
        self.pixels[(y % self.h) * self.w + (x % self.w)]
    }

    /*──────────────── procedural stand-ins for image files ──────────────*/

    /// Running-bond brick wall, `size × size`.
    pub fn bricks(size: usize) -> Self {
        let size = size.max(8);
        let brick_h = size / 4;
        let brick_w = size / 2;
        let mut pixels = vec![0; size * size];
        for y in 0..size {
            let row = y / brick_h;
            let shift = if row % 2 == 0 { 0 } else { brick_w / 2 };
            for x in 0..size {
                let mortar = y % brick_h == 0 || (x + shift) % brick_w == 0;
                // cheap per-brick tint so the wall is not flat
                let brick = (x + shift) / brick_w + row * 3;
                let tint = ((brick * 37) % 24) as u8;
                pixels[y * size + x] = if mortar {
                    rgba(150, 145, 135, 255)
                } else {
                    rgba(140 + tint, 60 + tint / 2, 45, 255)
                };
            }
        }
        Texture {
            name: "BRICKS".to_string(),
            w: size,
            h: size,
            pixels,
        }
    }

    /// Sky panorama, `w × h`, with a horizon band of distant hills.
    pub fn sky(w: usize, h: usize) -> Self {
        let (w, h) = (w.max(1), h.max(1));
        let mut pixels = vec![0; w * h];
        for x in 0..w {
            let t = x as f64 / w as f64 * std::f64::consts::TAU;
            // periodic in x so the wrap seam is invisible
            let ridge = 0.62 + 0.05 * (t * 3.0).sin() + 0.03 * (t * 7.0).cos();
            let ridge_y = (ridge * h as f64) as usize;
            for y in 0..h {
                let v = y as f64 / h as f64;
                pixels[y * w + x] = if y >= ridge_y {
                    rgba(70, 60, 50, 255)
                } else {
                    let k = (v / ridge).min(1.0);
                    rgba(
                        (40.0 + 160.0 * k) as u8,
                        (60.0 + 120.0 * k) as u8,
                        (120.0 + 80.0 * k) as u8,
                        255,
                    )
                };
            }
        }
        Texture {
            name: "SKY".to_string(),
            w,
            h,
            pixels,
        }
    }

    /// Hand-held blade sprite on a transparent background.
    pub fn blade(w: usize, h: usize) -> Self {
        let (w, h) = (w.max(4), h.max(4));
        let mut pixels = vec![0; w * h];
        let hilt_y = h * 3 / 5;
        for y in 0..h {
            for x in 0..w {
                let fx = x as f64 / w as f64;
                let fy = y as f64 / h as f64;
                let px = if y < hilt_y {
                    // tapered blade leaning to the upper right
                    let centre = 0.55 + 0.25 * (1.0 - fy / 0.6);
                    let half = 0.02 + 0.08 * fy / 0.6;
                    if (fx - centre).abs() < half {
                        let edge = (fx - centre) / half;
                        let shine = (200.0 - 60.0 * edge.abs()) as u8;
                        rgba(shine, shine, shine.saturating_add(20), 255)
                    } else {
                        0
                    }
                } else if (fx - 0.55).abs() < 0.18 && y < hilt_y + h / 20 {
                    rgba(90, 70, 40, 255) // guard
                } else if (fx - 0.5 + (fy - 0.6) * 0.3).abs() < 0.22 {
                    rgba(210, 160, 130, 255) // hand
                } else {
                    0
                };
                pixels[y * w + x] = px;
            }
        }
        Texture {
            name: "BLADE".to_string(),
            w,
            h,
            pixels,
        }
    }
}

/// Things that can go wrong when using the bank.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    /// Attempted to insert a second texture with an existing name.
    #[error("texture name `{0}` already present in bank")]
    Duplicate(String),

    /// Requested ID is outside `0 .. bank.len()`.
    #[error("texture id {0} out of range")]
    BadId(TextureId),

    /// Width or height is zero, or the pixel buffer does not match.
    #[error("texture `{name}` has {len} pixels, expected {w}×{h}")]
    BadSize {
        name: String,
        w: usize,
        h: usize,
        len: usize,
    },
}

/// A format-agnostic cache of textures.
///
/// * Does **not** know about PNG or JPEG, decoding is someone else's job.
/// * Stores exactly one copy of every name.
/// * ID **0** is always the “missing” checkerboard.
pub struct TextureBank {
    by_name: HashMap<String, TextureId>,
    data: Vec<Texture>,
}

impl TextureBank {
    // ---------------------------------------------------------------------
    // Constructors
    // ---------------------------------------------------------------------

    /// Create an empty bank with a mandatory *missing* texture used as
    /// fallback.  The texture is inserted under the fixed name `"MISSING"`
    /// and obtains the handle **0**.
    pub fn new(missing_tex: Texture) -> Self {
        let mut by_name = HashMap::new();
        by_name.insert("MISSING".into(), NO_TEXTURE);
        Self {
            by_name,
            data: vec![missing_tex],
        }
    }

    pub fn default_with_checker() -> Self {
        Self::new(Texture::default())
    }

    // ---------------------------------------------------------------------
    // Query helpers
    // ---------------------------------------------------------------------

    /// Number of textures stored (including the “missing” one).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Obtain the id for a *loaded* texture by name.
    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(name).copied()
    }

    /// Borrow a texture by id, with bounds-checking.
    pub fn texture(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.data.get(id as usize).ok_or(TextureError::BadId(id))
    }

    /// Like [`texture`](Self::texture) but falls back to the checkerboard.
    pub fn texture_or_missing(&self, id: TextureId) -> &Texture {
        self.data
            .get(id as usize)
            .unwrap_or(&self.data[NO_TEXTURE as usize])
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Insert a texture under `name`.
    ///
    /// * Returns the newly assigned `TextureId`.
    /// * Fails if the name already exists (`Duplicate`) or the pixel buffer
    ///   does not describe a non-empty `w × h` image (`BadSize`).
    pub fn insert<S: Into<String>>(
        &mut self,
        name: S,
        tex: Texture,
    ) -> Result<TextureId, TextureError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(TextureError::Duplicate(name));
        }
        if tex.w == 0 || tex.h == 0 || tex.pixels.len() != tex.w * tex.h {
            return Err(TextureError::BadSize {
                name,
                w: tex.w,
                h: tex.h,
                len: tex.pixels.len(),
            });
        }
        let id = self.data.len() as TextureId;
        self.data.push(tex);
        self.by_name.insert(name, id);
        Ok(id)
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_tex(color: Rgba) -> Texture {
        Texture {
            name: "Dummy".to_string(),
            w: 2,
            h: 2,
            pixels: vec![color; 4],
        }
    }

    #[test]
    fn insert_and_lookup() {
        let mut bank = TextureBank::default_with_checker();
        let red = bank.insert("RED", dummy_tex(0xFF_FF0000)).unwrap();
        let blue = bank.insert("BLUE", dummy_tex(0xFF_0000FF)).unwrap();

        assert_ne!(red, NO_TEXTURE);
        assert_ne!(blue, red);
        assert_eq!(bank.id("RED"), Some(red));
        assert_eq!(bank.id("BLUE"), Some(blue));
        assert_eq!(bank.id("NOPE"), None);

        assert_eq!(bank.texture(red).unwrap().pixels[0], 0xFF_FF0000);
        assert_eq!(bank.texture(blue).unwrap().pixels[0], 0xFF_0000FF);
    }

    #[test]
    fn texel_wraps_around() {
        let tex = Texture {
            name: "GRAD".into(),
            w: 3,
            h: 2,
            pixels: vec![0, 1, 2, 3, 4, 5],
        };
        assert_eq!(tex.texel(2, 1), 5);
        assert_eq!(tex.texel(3, 0), 0);
        assert_eq!(tex.texel(4, 3), 4);
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut bank = TextureBank::default_with_checker();
        bank.insert("WOOD", dummy_tex(1)).unwrap();
        let err = bank.insert("WOOD", dummy_tex(2)).unwrap_err();
        assert_eq!(err, TextureError::Duplicate("WOOD".into()));
        // texture count still 2 (checker + first WOOD)
        assert_eq!(bank.len(), 2);
    }

    #[test]
    fn bad_id_guard() {
        let bank = TextureBank::default_with_checker();
        let bad = TextureId::MAX;
        assert_eq!(bank.texture(bad).unwrap_err(), TextureError::BadId(bad));
        assert_eq!(bank.texture_or_missing(bad).name, "CHECKER");
    }

    #[test]
    fn mismatched_pixels_rejected() {
        let mut bank = TextureBank::default_with_checker();
        let mut tex = dummy_tex(0);
        tex.pixels.pop();
        assert!(matches!(
            bank.insert("SHORT", tex),
            Err(TextureError::BadSize { len: 3, .. })
        ));
    }

    #[test]
    fn generated_textures_have_consistent_sizes() {
        for tex in [Texture::bricks(64), Texture::sky(300, 60), Texture::blade(40, 50)] {
            assert_eq!(tex.pixels.len(), tex.width() * tex.height(), "{}", tex.name);
        }
        let blade = Texture::blade(40, 50);
        assert!(blade.pixels.iter().any(|&p| p == 0), "blade needs transparency");
        assert!(blade.pixels.iter().any(|&p| p >> 24 == 0xFF));
    }
}
