mod clock;
mod input;

pub use clock::{FrameClock, FrameStats};
pub use input::{InputCmd, player_input, update};
