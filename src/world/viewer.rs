use glam::DVec2;
use std::f64::consts::{PI, TAU};

use super::grid::OccupancyGrid;

/// Map cells per second.
pub const DEFAULT_SPEED: f64 = 3.0;
/// Radians per second (half a turn).
pub const DEFAULT_TURN_RATE: f64 = PI;

/// Player view-point on the grid.
///
/// * Only **yaw** is simulated, there is no vertical look.
/// * `paces` accumulates every attempted step and drives the weapon bob.
#[derive(Clone, Copy, Debug)]
pub struct Viewer {
    pub pos: DVec2, // map units, cell (x, y) spans [x, x+1) × [y, y+1)
    direction: f64, // radians in [0, 2π), 0 = +x, positive turns toward +y
    pub speed: f64,
    pub turn_rate: f64,
    paces: f64,
}

impl Viewer {
    pub fn new(pos: DVec2, direction: f64) -> Self {
        Self {
            pos,
            direction: direction.rem_euclid(TAU),
            speed: DEFAULT_SPEED,
            turn_rate: DEFAULT_TURN_RATE,
            paces: 0.0,
        }
    }

    #[inline]
    pub fn direction(&self) -> f64 {
        self.direction
    }

    #[inline]
    pub fn paces(&self) -> f64 {
        self.paces
    }

    /// Unit vector pointing where the viewer looks.
    #[inline(always)]
    pub fn forward(&self) -> DVec2 {
        let (s, c) = self.direction.sin_cos();
        DVec2::new(c, s)
    }

    /*──────────────────────── movement helpers ──────────────────────*/

    /// Turn by `delta` radians, wrapping into [0, 2π).
    pub fn rotate(&mut self, delta: f64) {
        self.direction = (self.direction + delta).rem_euclid(TAU);
        // rem_euclid can round up to exactly TAU for tiny negative inputs
        if self.direction >= TAU {
            self.direction = 0.0;
        }
    }

    /// Walk `distance` along the facing direction.
    ///
    /// Each axis is committed on its own so the viewer slides along walls.
    /// `paces` advances by the attempted distance even when both axes block.
    pub fn walk(&mut self, distance: f64, grid: &OccupancyGrid) {
        let delta = self.forward() * distance;
        if grid.is_open(self.pos.x + delta.x, self.pos.y) {
            self.pos.x += delta.x;
        }
        if grid.is_open(self.pos.x, self.pos.y + delta.y) {
            self.pos.y += delta.y;
        }
        self.paces += distance;
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
