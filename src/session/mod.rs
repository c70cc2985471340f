// Gateway module for cycling sessions - follows the Train Station Pattern
// All external access must go through this gateway

mod cycle;
mod window;

pub use cycle::{CycleSession, Direction};
pub use window::{
    clamp_row_length, compute_render_window, RenderWindow, WindowEntry, WindowMode,
};
