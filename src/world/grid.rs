//! Occupancy grid: the only shared state read by every ray in a frame.
//!
//! Cells store a wall height (`0.0` = open, `> 0.0` = solid). Anything
//! outside `[0, size) × [0, size)` answers [`BOUNDARY_HEIGHT`] so rays can
//! never escape the generated area.

use glam::{DVec2, dvec2};
use rand::Rng;

/// Height returned for cells outside the generated bounds.
pub const BOUNDARY_HEIGHT: f64 = 1.0;

/// Height of a generated wall cell.
pub const WALL_HEIGHT: f64 = 1.0;

/// Peak value the ambient light jumps to when it re-triggers.
pub const LIGHT_PEAK: f64 = 2.0;

/// Linear decay of the ambient light, per second.
const LIGHT_DECAY: f64 = 10.0;

/// Mean seconds between light re-triggers (`random() * 5 < dt`).
const LIGHT_PERIOD: f64 = 5.0;

#[derive(Clone, Debug)]
pub struct OccupancyGrid {
    size: usize,
    cells: Vec<f64>, // row-major, `y * size + x`
    light: f64,
}

impl OccupancyGrid {
    /// Random `size × size` grid; every cell is independently solid with
    /// probability `fill`.
    pub fn generate<R: Rng + ?Sized>(size: usize, fill: f64, rng: &mut R) -> Self {
        let cells: Vec<f64> = (0..size * size)
            .map(|_| {
                if rng.r#gen::<f64>() < fill {
                    WALL_HEIGHT
                } else {
                    0.0
                }
            })
            .collect();

        let solid = cells.iter().filter(|&&h| h > 0.0).count();
        tracing::debug!(size, solid, fill, "generated occupancy grid");

        Self {
            size,
            cells,
            light: 0.0,
        }
    }

    /// Build a grid from explicit heights (row-major, `y * size + x`).
    ///
    /// Panics if `heights.len() != size * size`.
    pub fn from_heights(size: usize, heights: Vec<f64>) -> Self {
        assert_eq!(heights.len(), size * size, "grid must be size × size");
        Self {
            size,
            cells: heights,
            light: 0.0,
        }
    }

    /// Fully open grid, handy for tests and demos.
    pub fn open(size: usize) -> Self {
        Self::from_heights(size, vec![0.0; size * size])
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Wall height at a world position; coordinates are floored to cells.
    #[inline]
    pub fn height_at(&self, x: f64, y: f64) -> f64 {
        let (cx, cy) = (x.floor(), y.floor());
        let n = self.size as f64;
        // also rejects NaN
        if !(cx >= 0.0 && cy >= 0.0 && cx < n && cy < n) {
            return BOUNDARY_HEIGHT;
        }
        self.cells[cy as usize * self.size + cx as usize]
    }

    #[inline]
    pub fn is_open(&self, x: f64, y: f64) -> bool {
        self.height_at(x, y) <= 0.0
    }

    /// Overwrite one cell. Out-of-range cells are ignored.
    pub fn set(&mut self, cx: usize, cy: usize, height: f64) {
        if cx < self.size && cy < self.size {
            self.cells[cy * self.size + cx] = height;
        }
    }

    /*──────────────────────── ambient light ─────────────────────────*/

    #[inline]
    pub fn light(&self) -> f64 {
        self.light
    }

    pub fn set_light(&mut self, light: f64) {
        self.light = light.clamp(0.0, LIGHT_PEAK);
    }

    /// Decay the ambient light, or re-trigger it with probability `dt / 5`.
    pub fn update<R: Rng + ?Sized>(&mut self, dt: f64, rng: &mut R) {
        if self.light > 0.0 {
            self.light = (self.light - LIGHT_DECAY * dt).max(0.0);
        } else if rng.r#gen::<f64>() * LIGHT_PERIOD < dt {
            self.light = LIGHT_PEAK;
        }
    }

    /*──────────────────────── spawn helpers ─────────────────────────*/

    /// Centre of the open cell closest to the middle of the grid.
    pub fn spawn_point(&self) -> Option<DVec2> {
        let mid = self.size as f64 * 0.5;
        let centre = dvec2(mid, mid);
        (0..self.size * self.size)
            .filter(|&i| self.cells[i] <= 0.0)
            .map(|i| {
                dvec2(
                    (i % self.size) as f64 + 0.5,
                    (i / self.size) as f64 + 0.5,
                )
            })
            .min_by(|a, b| a.distance_squared(centre).total_cmp(&b.distance_squared(centre)))
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
