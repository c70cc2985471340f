use parking_lot::Mutex;
use std::sync::Arc;

use crate::directory::{ActiveConversation, Conversation, ConversationId, InMemoryDirectory, Navigator};
use crate::switcher::Signal;

/// Stand-in for a chat client: tracks the visible conversation and reports switches
///
/// Every `switch_to` queues a `ConversationSwitched` signal, the same way a real
/// client announces navigation no matter who requested it.
#[derive(Debug, Default)]
pub struct DemoHost {
    active: Mutex<Option<ConversationId>>,
    pending: Mutex<Vec<Signal>>,
}

impl DemoHost {
    pub fn new(initial: Option<ConversationId>) -> Self {
        Self {
            active: Mutex::new(initial),
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Signals produced since the last call
    pub fn drain_signals(&self) -> Vec<Signal> {
        std::mem::take(&mut *self.pending.lock())
    }
}

impl ActiveConversation for DemoHost {
    fn current_conversation(&self) -> Option<ConversationId> {
        self.active.lock().clone()
    }
}

impl Navigator for DemoHost {
    fn switch_to(&self, id: &ConversationId) {
        *self.active.lock() = Some(id.clone());
        self.pending
            .lock()
            .push(Signal::ConversationSwitched(id.clone()));
    }
}

/// State of the demo screen outside the switcher itself
pub struct DemoApp {
    pub directory: Arc<InMemoryDirectory>,
    pub host: Arc<DemoHost>,
    /// Highlighted row in the conversation list
    pub selected: usize,
    pub status_message: Option<String>,
    pub running: bool,
    /// Whether the terminal reports key releases
    pub reports_release: bool,
}

impl DemoApp {
    pub fn new(directory: Arc<InMemoryDirectory>, host: Arc<DemoHost>, reports_release: bool) -> Self {
        Self {
            directory,
            host,
            selected: 0,
            status_message: None,
            running: true,
            reports_release,
        }
    }

    pub fn conversations(&self) -> Vec<Conversation> {
        self.directory.list()
    }

    pub fn select_next(&mut self) {
        let len = self.directory.len();
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Ordinary navigation to the highlighted conversation
    pub fn open_selected(&mut self) {
        if let Some(conversation) = self.conversations().get(self.selected) {
            self.host.switch_to(&conversation.id);
            self.status_message = Some(format!(
                "Opened {}",
                conversation.name.as_deref().unwrap_or(conversation.id.as_str())
            ));
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn quit(&mut self) {
        self.running = false;
    }
}
