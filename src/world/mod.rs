mod grid;
mod texture;
mod viewer;

pub use grid::{BOUNDARY_HEIGHT, LIGHT_PEAK, OccupancyGrid, WALL_HEIGHT};

pub use viewer::{DEFAULT_SPEED, DEFAULT_TURN_RATE, Viewer};

pub use texture::{NO_TEXTURE, Texture, TextureBank, TextureError, TextureId};
