//! Grid ray-casting renderer.
//!
//! Data flows one way per frame:
//! [`world::OccupancyGrid`] → [`engine::cast_ray`] → [`engine::Projector`]
//! → [`engine::ColumnRenderer`] → [`renderer::DrawCall`]s → a
//! [`renderer::Renderer`] back-end.

pub mod config;
pub mod engine;
pub mod renderer;
pub mod sim;
pub mod world;
