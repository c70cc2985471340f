// Gateway module for the conversation directory - follows the Train Station Pattern
// All external access must go through this gateway

mod memory;
mod types;

pub use memory::InMemoryDirectory;
pub use types::{
    ActiveConversation, Conversation, ConversationId, ConversationKind, Directory, DisplayInfo,
    Navigator,
};

#[cfg(test)]
pub use types::MockNavigator;
