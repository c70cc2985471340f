// Gateway module for the switcher controller - follows the Train Station Pattern
// All external access must go through this gateway

mod controller;
mod signal;

pub use controller::{Host, Switcher};
pub use signal::{Propagation, Signal};
