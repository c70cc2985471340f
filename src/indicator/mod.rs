// Gateway module for the switch indicator - follows the Train Station Pattern
// All external access must go through this gateway

mod frame;

pub use frame::{IndicatorFrame, IndicatorItem, IndicatorStyle, NullRenderer, Renderer};

#[cfg(test)]
pub use frame::MockRenderer;
