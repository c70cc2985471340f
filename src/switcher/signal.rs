use crate::directory::ConversationId;
use crate::session::Direction;

/// Externally delivered events, in whatever order the host produces them
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// Modifier + trigger key pressed
    GestureBegin { modifier_held: bool },
    /// Trigger key pressed again while the modifier is held
    GestureStep {
        direction: Direction,
        modifier_held: bool,
    },
    /// Modifier released
    GestureEnd,
    /// The host switched conversations through any ordinary means
    ConversationSwitched(ConversationId),
    /// The host moved away from conversations on its own
    ForcedNavigation,
}

/// What the signal source should do with the key event that produced a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// Suppress the key's default handling
    Stop,
    /// Let the key through
    Continue,
}

impl Propagation {
    pub fn is_stop(&self) -> bool {
        matches!(self, Self::Stop)
    }
}
