//! Grid DDA: walk a ray from grid line to grid line until it enters a
//! solid cell or runs out of range.
//!
//! Each iteration builds two candidate crossings, one with the next
//! vertical line (`x` integer) and one with the next horizontal line
//! (`y` integer), keeps the nearer one and probes the cell on the far side.

use glam::{DVec2, dvec2};
use smallvec::SmallVec;

use crate::world::OccupancyGrid;

/// Which family of grid lines a step crossed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Crossing {
    /// Starting point of the ray, nothing crossed yet.
    Origin,
    /// A line of constant `x`.
    Vertical,
    /// A line of constant `y`.
    Horizontal,
}

/// One grid-line crossing (or the origin) along a cast ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraversalPoint {
    pub pos: DVec2,
    /// Euclidean length of the step that produced this point.
    pub length: f64,
    /// Accumulated distance from the ray origin.
    pub distance: f64,
    /// Height of the probed cell; `> 0` marks a wall hit.
    pub height: f64,
    /// 0 = vertical line crossed heading +x, 1 = horizontal line heading +y,
    /// 2 = either family crossed heading backwards.
    pub shading: u8,
    /// Position along the crossed cell edge, in [0, 1).
    pub offset: f64,
    pub crossing: Crossing,
}

impl TraversalPoint {
    fn origin(pos: DVec2) -> Self {
        Self {
            pos,
            length: 0.0,
            distance: 0.0,
            height: 0.0,
            shading: 0,
            offset: 0.0,
            crossing: Crossing::Origin,
        }
    }

    #[inline]
    pub fn is_hit(&self) -> bool {
        self.height > 0.0
    }
}

/// Point sequence of a single ray. Most rays in a 32×32 grid with range 8
/// stay well under 24 crossings, so they never touch the heap.
pub type Ray = SmallVec<[TraversalPoint; 24]>;

/// Sine/cosine of the ray angle, computed once per ray.
#[derive(Clone, Copy, Debug)]
struct RayInfo {
    sin: f64,
    cos: f64,
}

/// Candidate crossing before it is selected.
#[derive(Clone, Copy, Debug)]
struct Step {
    pos: DVec2,
    length: f64,
}

impl Step {
    const NONE: Step = Step {
        pos: DVec2::NAN,
        length: f64::INFINITY,
    };
}

/// Advance from `x` to the next integer in the direction of `run`,
/// following slope `rise / run`. Returns `(dx, dy, length)`; a zero `run`
/// never crosses.
#[inline]
fn step_along(x: f64, rise: f64, run: f64) -> Option<(f64, f64, f64)> {
    if run == 0.0 {
        return None;
    }
    let dx = if run > 0.0 {
        (x + 1.0).floor() - x
    } else {
        (x - 1.0).ceil() - x
    };
    let dy = dx * (rise / run);
    Some((dx, dy, dx.hypot(dy)))
}

fn next_vertical(from: DVec2, info: RayInfo) -> Step {
    match step_along(from.x, info.sin, info.cos) {
        Some((dx, dy, length)) => Step {
            pos: dvec2(from.x + dx, from.y + dy),
            length,
        },
        None => Step::NONE,
    }
}

fn next_horizontal(from: DVec2, info: RayInfo) -> Step {
    // same walk with the axes swapped
    match step_along(from.y, info.cos, info.sin) {
        Some((dy, dx, length)) => Step {
            pos: dvec2(from.x + dx, from.y + dy),
            length,
        },
        None => Step::NONE,
    }
}

/// Turn the chosen candidate into a point: probe the cell being entered
/// and fill in distance, shading and texture offset.
fn inspect(
    step: Step,
    crossing: Crossing,
    info: RayInfo,
    grid: &OccupancyGrid,
    prev_distance: f64,
) -> TraversalPoint {
    let (probe, shading, along) = match crossing {
        Crossing::Vertical => {
            let back = info.cos < 0.0;
            let probe = dvec2(step.pos.x - if back { 1.0 } else { 0.0 }, step.pos.y);
            (probe, if back { 2 } else { 0 }, step.pos.y)
        }
        // `advance` never passes the origin
        Crossing::Horizontal | Crossing::Origin => {
            let back = info.sin < 0.0;
            let probe = dvec2(step.pos.x, step.pos.y - if back { 1.0 } else { 0.0 });
            (probe, if back { 2 } else { 1 }, step.pos.x)
        }
    };

    TraversalPoint {
        pos: step.pos,
        length: step.length,
        distance: prev_distance + step.length,
        height: grid.height_at(probe.x, probe.y),
        shading,
        offset: along - along.floor(),
        crossing,
    }
}

/// Pick the nearer of the two candidate crossings; ties go to the
/// vertical one.
#[inline]
fn advance(grid: &OccupancyGrid, current: &TraversalPoint, info: RayInfo) -> TraversalPoint {
    let vertical = next_vertical(current.pos, info);
    let horizontal = next_horizontal(current.pos, info);
    if vertical.length <= horizontal.length {
        inspect(vertical, Crossing::Vertical, info, grid, current.distance)
    } else {
        inspect(horizontal, Crossing::Horizontal, info, grid, current.distance)
    }
}

/// Cast a ray from `origin` at `angle` (radians) for at most `range` cells.
///
/// The result starts with the origin and ends either with the first wall
/// hit or with the first point whose distance exceeds `range`.
pub fn cast_ray(grid: &OccupancyGrid, origin: DVec2, angle: f64, range: f64) -> Ray {
    let (sin, cos) = angle.sin_cos();
    let info = RayInfo { sin, cos };

    let mut ray = Ray::new();
    let mut current = TraversalPoint::origin(origin);
    ray.push(current);

    // A ray inside an n×n grid crosses at most 2n + 2 lines before it hits
    // the boundary, so this cap never bites for finite inputs.
    let max_steps = 4 * grid.size() + 4;

    for _ in 0..max_steps {
        if current.height > 0.0 || current.distance > range {
            break;
        }
        current = advance(grid, &current, info);
        ray.push(current);
    }
    ray
}

/// Index of the first wall hit in `ray`, if any.
#[inline]
pub fn first_hit(ray: &[TraversalPoint]) -> Option<usize> {
    ray.iter().position(TraversalPoint::is_hit)
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::WALL_HEIGHT;
    use rand::{Rng, SeedableRng, rngs::StdRng};
    use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_4, PI, TAU};

    fn single_cell() -> OccupancyGrid {
        OccupancyGrid::open(1)
    }

    #[test]
    fn single_open_cell_hits_boundary_at_half() {
        let grid = single_cell();
        let ray = cast_ray(&grid, dvec2(0.5, 0.5), 0.0, 8.0);
        assert_eq!(ray.len(), 2);
        let hit = ray[1];
        assert!(hit.is_hit());
        assert!((hit.distance - 0.5).abs() < 1e-12);
        assert_eq!(hit.crossing, Crossing::Vertical);
        assert_eq!(hit.shading, 0);
        assert!((hit.offset - 0.5).abs() < 1e-12);
    }

    #[test]
    fn shading_classes_follow_travel_direction() {
        let grid = single_cell();
        let o = dvec2(0.5, 0.5);

        let west = cast_ray(&grid, o, PI, 8.0);
        assert_eq!(west.last().unwrap().shading, 2);
        assert_eq!(west.last().unwrap().crossing, Crossing::Vertical);

        let south = cast_ray(&grid, o, FRAC_PI_2, 8.0);
        assert_eq!(south.last().unwrap().shading, 1);
        assert_eq!(south.last().unwrap().crossing, Crossing::Horizontal);

        let north = cast_ray(&grid, o, -FRAC_PI_2, 8.0);
        assert_eq!(north.last().unwrap().shading, 2);
        assert_eq!(north.last().unwrap().crossing, Crossing::Horizontal);
    }

    #[test]
    fn exact_tie_prefers_vertical() {
        let grid = single_cell();
        // identical sin/cos: both candidates land on the (1, 1) corner
        let info = RayInfo {
            sin: FRAC_1_SQRT_2,
            cos: FRAC_1_SQRT_2,
        };
        let next = advance(&grid, &TraversalPoint::origin(dvec2(0.5, 0.5)), info);
        assert_eq!(next.crossing, Crossing::Vertical);
        assert_eq!(next.shading, 0);
        assert_eq!(next.pos, dvec2(1.0, 1.0));
    }

    #[test]
    fn step_along_moves_to_the_next_integer() {
        let (dx, dy, len) = step_along(0.5, 1.0, 2.0).unwrap();
        assert_eq!((dx, dy), (0.5, 0.25));
        assert!((len - 0.5f64.hypot(0.25)).abs() < 1e-15);

        // already on a line: a full cell backwards
        assert_eq!(step_along(2.0, 0.0, -1.0), Some((-1.0, 0.0, 1.0)));
        assert_eq!(step_along(0.3, 1.0, 0.0), None);
    }

    #[test]
    fn horizontal_crossing_probes_the_entered_row() {
        let mut grid = OccupancyGrid::open(4);
        grid.set(1, 2, WALL_HEIGHT);
        let step = Step {
            pos: dvec2(1.25, 2.0),
            length: 0.5,
        };

        let down = RayInfo { sin: 0.8, cos: 0.6 };
        let p = inspect(step, Crossing::Horizontal, down, &grid, 1.0);
        assert!(p.is_hit(), "heading +y enters row 2");
        assert_eq!((p.shading, p.offset, p.distance), (1, 0.25, 1.5));

        let up = RayInfo { sin: -0.8, cos: 0.6 };
        let p = inspect(step, Crossing::Horizontal, up, &grid, 1.0);
        assert!(!p.is_hit(), "heading -y enters row 1");
        assert_eq!(p.shading, 2);
        assert_eq!(p.crossing, Crossing::Horizontal);
    }

    #[test]
    fn diagonal_ray_reaches_corner() {
        let grid = single_cell();
        let ray = cast_ray(&grid, dvec2(0.5, 0.5), FRAC_PI_4, 8.0);
        let hit = ray.last().unwrap();
        assert!(hit.is_hit());
        assert!((hit.distance - 0.5f64.hypot(0.5)).abs() < 1e-9);
    }

    #[test]
    fn axis_aligned_rays_never_divide_by_zero() {
        let grid = OccupancyGrid::open(6);
        for angle in [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2] {
            let ray = cast_ray(&grid, dvec2(3.5, 3.5), angle, 8.0);
            for p in &ray {
                assert!(p.pos.is_finite(), "angle {angle}: {p:?}");
                assert!(p.distance.is_finite());
            }
            assert!(ray.last().unwrap().is_hit());
        }
        // zero sine exactly: only vertical candidates are finite
        let ray = cast_ray(&grid, dvec2(3.5, 3.5), 0.0, 8.0);
        assert!(ray[1..].iter().all(|p| p.crossing == Crossing::Vertical));
        assert_eq!(ray.len(), 4, "origin + x=4, x=5 and the boundary at x=6");
    }

    #[test]
    fn stops_at_first_wall() {
        let mut grid = OccupancyGrid::open(8);
        grid.set(5, 2, WALL_HEIGHT);
        let ray = cast_ray(&grid, dvec2(1.5, 2.5), 0.0, 8.0);
        let hit = ray.last().unwrap();
        assert!(hit.is_hit());
        assert!((hit.pos.x - 5.0).abs() < 1e-12);
        assert!((hit.distance - 3.5).abs() < 1e-12);
        assert_eq!(first_hit(&ray), Some(ray.len() - 1));
    }

    #[test]
    fn backward_ray_probes_cell_behind_the_line() {
        let mut grid = OccupancyGrid::open(8);
        grid.set(1, 2, WALL_HEIGHT);
        let ray = cast_ray(&grid, dvec2(4.5, 2.5), PI, 8.0);
        let hit = ray.last().unwrap();
        assert!((hit.pos.x - 2.0).abs() < 1e-9, "entering cell 1 through x = 2");
        assert_eq!(hit.shading, 2);
    }

    #[test]
    fn range_exhaustion_without_hit() {
        let grid = OccupancyGrid::open(64);
        let ray = cast_ray(&grid, dvec2(32.5, 32.5), 0.3, 4.0);
        let last = ray.last().unwrap();
        assert!(!last.is_hit());
        assert!(last.distance > 4.0);
        assert!(ray[..ray.len() - 1].iter().all(|p| p.distance <= 4.0));
        assert_eq!(first_hit(&ray), None);
    }

    #[test]
    fn offsets_are_fractional_and_distances_increase() {
        let mut rng = StdRng::seed_from_u64(0xD0D0);
        let grid = OccupancyGrid::generate(32, 0.3, &mut rng);
        let range = 8.0;
        for _ in 0..2_000 {
            let origin = dvec2(rng.gen_range(0.0..32.0), rng.gen_range(0.0..32.0));
            let angle = rng.gen_range(0.0..TAU);
            let ray = cast_ray(&grid, origin, angle, range);

            assert_eq!(ray[0].pos, origin);
            for w in ray.windows(2) {
                assert!(w[1].distance > w[0].distance, "{:?} -> {:?}", w[0], w[1]);
            }
            for p in &ray[1..] {
                assert!((0.0..1.0).contains(&p.offset), "{p:?}");
                assert!(p.shading <= 2);
            }

            // only the last point may be a hit or past the range
            let (last, body) = ray.split_last().unwrap();
            assert!(body.iter().all(|p| !p.is_hit() || p.distance == 0.0));
            assert!(body.iter().all(|p| p.distance <= range));
            assert!(last.is_hit() || last.distance > range);
        }
    }
}
