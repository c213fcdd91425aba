use crate::engine::types::{ProjectedSpan, Screen};

/// Smallest depth a slice is projected at. Keeps slices from blowing up
/// when the viewer stands right against a wall.
pub const DEFAULT_Z_MIN: f64 = 0.2;

/// Perspective divide for wall slices.
#[derive(Clone, Copy, Debug)]
pub struct Projector {
    screen_h: f64,
    half_h: f64,
    z_min: f64,
}

impl Projector {
    pub fn new(screen: &Screen, z_min: f64) -> Self {
        Self {
            screen_h: screen.h as f64,
            half_h: screen.half_h,
            z_min,
        }
    }

    /// Project a slice of `height` cells, hit at ray length `distance`
    /// through a column `angle` radians off the view axis.
    ///
    /// ```text
    /// z      = max(distance · cos(angle), z_min)
    /// height = screen_h · height / z
    /// top    = screen_h / 2 · (1 + 1/z) − height
    /// ```
    ///
    /// `cos(angle)` takes the ray length back onto the view axis, which
    /// removes the fish-eye bulge at the screen edges.
    #[inline]
    pub fn project(&self, height: f64, angle: f64, distance: f64) -> ProjectedSpan {
        let z = (distance * angle.cos()).max(self.z_min);
        let wall_h = self.screen_h * height / z;
        let bottom = self.half_h * (1.0 + 1.0 / z);
        ProjectedSpan {
            top: bottom - wall_h,
            height: wall_h,
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
