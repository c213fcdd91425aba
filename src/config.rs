//! Runtime tunables. Defaults reproduce the reference scene.

use rand::{SeedableRng, rngs::StdRng};
use std::f64::consts::PI;

use crate::{
    engine::DEFAULT_Z_MIN,
    world::{DEFAULT_SPEED, DEFAULT_TURN_RATE, LIGHT_PEAK},
};

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub screen_w: usize,
    pub screen_h: usize,
    /// Number of rays (screen columns) per frame.
    pub resolution: usize,
    /// Horizontal field of view, radians.
    pub field_of_view: f64,
    /// Maximum ray length, cells.
    pub range: f64,
    /// Distance at which the shadow overlay reaches full opacity.
    pub light_range: f64,
    pub z_min: f64,
    /// Nominal height of a rain streak, cells.
    pub rain_height: f64,
    pub map_size: usize,
    pub fill_probability: f64,
    pub speed: f64,
    pub turn_rate: f64,
    /// Fixed RNG seed; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            screen_w: 1200,
            screen_h: 600,
            resolution: 300,
            field_of_view: PI * 0.4,
            range: 8.0,
            light_range: 5.0,
            z_min: DEFAULT_Z_MIN,
            rain_height: 0.1,
            map_size: 32,
            fill_probability: 0.3,
            speed: DEFAULT_SPEED,
            turn_rate: DEFAULT_TURN_RATE,
            seed: None,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("screen size {0}×{1} must be non-zero")]
    EmptyScreen(usize, usize),

    #[error("resolution must be at least one column")]
    ZeroResolution,

    #[error("map size must be at least one cell")]
    ZeroMap,

    #[error("ray range {0} must be positive and finite")]
    BadRange(f64),

    #[error("field of view {0} must lie in (0, π)")]
    BadFieldOfView(f64),

    #[error("light range {0} must exceed the peak ambient light (2)")]
    BadLightRange(f64),

    #[error("near clamp {0} must be positive and finite")]
    BadZMin(f64),

    #[error("fill probability {0} must lie in [0, 1]")]
    BadFill(f64),
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.screen_w == 0 || self.screen_h == 0 {
            return Err(ConfigError::EmptyScreen(self.screen_w, self.screen_h));
        }
        if self.resolution == 0 {
            return Err(ConfigError::ZeroResolution);
        }
        if self.map_size == 0 {
            return Err(ConfigError::ZeroMap);
        }
        if !(self.range.is_finite() && self.range > 0.0) {
            return Err(ConfigError::BadRange(self.range));
        }
        if !(self.field_of_view > 0.0 && self.field_of_view < PI) {
            return Err(ConfigError::BadFieldOfView(self.field_of_view));
        }
        if !(self.light_range > LIGHT_PEAK) {
            return Err(ConfigError::BadLightRange(self.light_range));
        }
        if !(self.z_min.is_finite() && self.z_min > 0.0) {
            return Err(ConfigError::BadZMin(self.z_min));
        }
        if !(0.0..=1.0).contains(&self.fill_probability) {
            return Err(ConfigError::BadFill(self.fill_probability));
        }
        Ok(())
    }

    /// Pixels between the left edges of two neighbouring columns.
    #[inline]
    pub fn spacing(&self) -> f64 {
        self.screen_w as f64 / self.resolution as f64
    }

    /// Overlay scale relative to the 1200×600 reference.
    #[inline]
    pub fn scale(&self) -> f64 {
        (self.screen_w + self.screen_h) as f64 / 1200.0
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
