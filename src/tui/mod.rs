// Gateway module for TUI - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod app;
mod keys;
mod overlay;
mod render;
mod ui;

// Public re-exports - the ONLY way to access TUI functionality
pub use app::{DemoApp, DemoHost};
pub use keys::KeyTranslator;
pub use overlay::{IndicatorWidget, TerminalIndicator};
pub use ui::run_demo;
