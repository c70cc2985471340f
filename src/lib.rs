pub mod app;
pub mod cli;
pub mod constants;
pub mod directory;
pub mod history;
pub mod indicator;
pub mod session;
pub mod switcher;
pub mod tui;
pub mod utils;

pub use app::{load_config, Config};
pub use directory::{ActiveConversation, ConversationId, ConversationKind, Directory, Navigator};
pub use history::{HistoryPersistence, HistoryStore};
pub use indicator::{IndicatorFrame, Renderer};
pub use session::{compute_render_window, CycleSession, Direction, RenderWindow};
pub use switcher::{Host, Propagation, Signal, Switcher};
pub use utils::SwitchError;
