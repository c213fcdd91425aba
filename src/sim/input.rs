use rand::Rng;

use crate::world::{OccupancyGrid, Viewer};

/// Control state sampled once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputCmd {
    pub forward: f64, // –1 … +1  (back / forward)
    pub turn: f64,    // –1 … +1  (left / right)
}

impl InputCmd {
    /// Fold raw key states into a command; opposing keys cancel out.
    pub fn from_keys(up: bool, down: bool, left: bool, right: bool) -> Self {
        let axis = |pos: bool, neg: bool| pos as i8 as f64 - neg as i8 as f64;
        Self {
            forward: axis(up, down),
            turn: axis(right, left),
        }
    }
}

/// Apply one frame of input: turn first, then walk with collision.
pub fn player_input(viewer: &mut Viewer, grid: &OccupancyGrid, cmd: InputCmd, dt: f64) {
    if cmd.turn != 0.0 {
        viewer.rotate(cmd.turn * viewer.turn_rate * dt);
    }
    if cmd.forward != 0.0 {
        viewer.walk(cmd.forward * viewer.speed * dt, grid);
    }
}

/// Advance the world by `dt` seconds: ambient light, then the viewer.
pub fn update<R: Rng + ?Sized>(
    grid: &mut OccupancyGrid,
    viewer: &mut Viewer,
    cmd: InputCmd,
    dt: f64,
    rng: &mut R,
) {
    grid.update(dt, rng);
    player_input(viewer, grid, cmd, dt);
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;
    use rand::{SeedableRng, rngs::StdRng};
    use std::f64::consts::PI;

    #[test]
    fn opposing_keys_cancel() {
        assert_eq!(InputCmd::from_keys(true, true, false, false), InputCmd::default());
        let cmd = InputCmd::from_keys(false, true, true, false);
        assert_eq!((cmd.forward, cmd.turn), (-1.0, -1.0));
    }

    #[test]
    fn idle_input_leaves_viewer_alone() {
        let grid = OccupancyGrid::open(4);
        let mut v = Viewer::new(dvec2(2.5, 2.5), 1.0);
        player_input(&mut v, &grid, InputCmd::default(), 0.5);
        assert_eq!(v.pos, dvec2(2.5, 2.5));
        assert_eq!(v.direction(), 1.0);
        assert_eq!(v.paces(), 0.0);
    }

    #[test]
    fn speeds_scale_with_dt() {
        let grid = OccupancyGrid::open(8);
        let mut v = Viewer::new(dvec2(1.5, 4.5), 0.0);
        let cmd = InputCmd::from_keys(true, false, false, true);
        player_input(&mut v, &grid, cmd, 0.5);
        // half a second at π rad/s, then 1.5 cells along the new heading
        assert!((v.direction() - PI / 2.0).abs() < 1e-12);
        assert!((v.pos - dvec2(1.5, 6.0)).length() < 1e-9);
        assert!((v.paces() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn update_ticks_the_light() {
        let mut grid = OccupancyGrid::open(4);
        grid.set_light(2.0);
        let mut v = Viewer::new(dvec2(2.5, 2.5), 0.0);
        let mut rng = StdRng::seed_from_u64(0);
        update(&mut grid, &mut v, InputCmd::default(), 0.1, &mut rng);
        assert!((grid.light() - 1.0).abs() < 1e-12);
    }
}
