//! Ray casting and projection: everything between the grid and the
//! draw list.

pub mod column;
pub mod pipeline;
pub mod projection;
pub mod ray;
pub mod types;

pub use column::{ColumnRenderer, RAIN_COLOUR, WallTexture, shadow_alpha};
pub use pipeline::{CLEAR_COLOUR, Pipeline, SceneTextures};
pub use projection::{DEFAULT_Z_MIN, Projector};
pub use ray::{Crossing, Ray, TraversalPoint, cast_ray, first_hit};
pub use types::{ProjectedSpan, Screen};
