use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use super::signal::{Propagation, Signal};
use crate::app::Config;
use crate::directory::{ActiveConversation, ConversationId, Directory, Navigator};
use crate::history::{HistoryPersistence, HistoryStore};
use crate::indicator::{IndicatorFrame, Renderer};
use crate::session::{CycleSession, Direction};

/// The collaborators a switcher talks to
#[derive(Clone)]
pub struct Host {
    pub directory: Arc<dyn Directory>,
    pub active: Arc<dyn ActiveConversation>,
    pub navigator: Arc<dyn Navigator>,
    pub renderer: Arc<dyn Renderer>,
    pub persistence: Arc<dyn HistoryPersistence>,
}

/// Owns one history store and one cycle session and routes host signals to them
///
/// Nothing happens until [`start`](Self::start); after [`stop`](Self::stop) every
/// signal is ignored again.
pub struct Switcher {
    config: Config,
    host: Host,
    history: HistoryStore,
    session: CycleSession,
    running: bool,
}

impl Switcher {
    pub fn new(config: Config, host: Host) -> Self {
        let history = HistoryStore::load(host.directory.clone(), host.persistence.clone());
        Self {
            config,
            host,
            history,
            session: CycleSession::new(),
            running: false,
        }
    }

    /// Begin accepting signals
    ///
    /// History is loaded once in [`new`](Self::new) and stays in memory across
    /// restarts; entries that went stale while stopped are pruned here.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.history.prune();
        self.running = true;
        info!("Switcher started with {} history entries", self.history.len());
    }

    /// Drop any open gesture without committing and stop accepting signals
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        if self.session.abort() {
            self.host.renderer.dismiss();
        }
        self.running = false;
        info!("Switcher stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn session(&self) -> &CycleSession {
        &self.session
    }

    pub fn handle(&mut self, signal: Signal) -> Propagation {
        if !self.running {
            return Propagation::Continue;
        }

        match signal {
            Signal::GestureBegin { modifier_held } => self.on_begin(modifier_held),
            Signal::GestureStep {
                direction,
                modifier_held,
            } => self.on_step(direction, modifier_held),
            Signal::GestureEnd => {
                self.finish();
                Propagation::Continue
            }
            Signal::ConversationSwitched(id) => {
                self.on_conversation_switched(id);
                Propagation::Continue
            }
            Signal::ForcedNavigation => {
                self.on_forced_navigation();
                Propagation::Continue
            }
        }
    }

    /// Explicit user reset of the history list
    ///
    /// An open gesture is dropped without committing, since its snapshot refers to
    /// the list being discarded.
    pub fn clear_history(&mut self) {
        if self.session.abort() {
            self.host.renderer.dismiss();
        }
        self.history.clear();
    }

    /// Heartbeat: force-end a gesture that outlived the configured bound
    pub fn expire_stale(&mut self, now: Instant) -> bool {
        let Some(max) = self.config.switcher.max_session() else {
            return false;
        };
        if !self.running || !self.session.is_expired(now, max) {
            return false;
        }
        debug!("Session exceeded {:?}, ending it", max);
        self.finish();
        true
    }

    fn on_begin(&mut self, modifier_held: bool) -> Propagation {
        if self.session.is_active() {
            return Propagation::Stop;
        }
        if !modifier_held {
            return Propagation::Continue;
        }

        let current = self.host.active.current_conversation();
        self.session.begin(current.as_ref(), &self.history);
        Propagation::Stop
    }

    fn on_step(&mut self, direction: Direction, modifier_held: bool) -> Propagation {
        if !self.session.is_active() {
            return Propagation::Continue;
        }

        if !modifier_held {
            debug!("Modifier no longer held, ending session");
            self.finish();
            return Propagation::Continue;
        }
        if self.expire_stale(Instant::now()) {
            return Propagation::Continue;
        }

        if let Some(target) = self.session.step(direction, self.host.directory.as_ref()) {
            if let Some(frame) = IndicatorFrame::for_session(
                &self.session,
                self.host.directory.as_ref(),
                &self.config.indicator,
            ) {
                self.host.renderer.render(&frame);
            }
            if self.config.switcher.instant_switch {
                self.host.navigator.switch_to(&target);
            }
        }
        Propagation::Stop
    }

    /// End the gesture, commit its target and dismiss the indicator
    fn finish(&mut self) {
        if !self.session.is_active() {
            return;
        }

        let committed = self.session.end(&mut self.history);
        self.host.renderer.dismiss();

        if let Some(target) = committed {
            info!("Committed {} as most recent", target);
            if !self.config.switcher.instant_switch {
                self.host.navigator.switch_to(&target);
            }
        }
    }

    fn on_conversation_switched(&mut self, id: ConversationId) {
        if self.session.suppresses_promotion() {
            debug!("Ignoring switch to {} during gesture", id);
            return;
        }
        self.history.promote(id);
    }

    fn on_forced_navigation(&mut self) {
        let Some(target) = self.session.target().cloned() else {
            return;
        };
        if self.host.directory.resolve(&target).is_some() {
            debug!("Re-asserting {} after forced navigation", target);
            self.host.navigator.switch_to(&target);
        }
    }
}
