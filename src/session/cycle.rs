use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

use super::window::{compute_render_window, RenderWindow, WindowMode};
use crate::directory::{ConversationId, Directory};
use crate::history::HistoryStore;

/// Direction of a single cycling step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

/// State of an open gesture
#[derive(Debug, Clone)]
struct ActiveSession {
    snapshot: Vec<ConversationId>,
    cursor: usize,
    started_at: Instant,
}

impl ActiveSession {
    fn target(&self) -> Option<&ConversationId> {
        self.snapshot.get(self.cursor)
    }
}

#[derive(Debug, Clone, Default)]
enum SessionState {
    #[default]
    Idle,
    Active(ActiveSession),
}

/// One cycling gesture: a frozen candidate list and a wrapping cursor
///
/// The snapshot is taken once on [`begin`](Self::begin) and never re-derived, so
/// promotions that happen mid-gesture cannot reorder what is being cycled through.
/// While a session is active, ordinary recency promotion is suppressed.
/// Out-of-order calls (`step`/`end` while idle, `begin` while active) are no-ops.
#[derive(Debug, Clone, Default)]
pub struct CycleSession {
    state: SessionState,
}

impl CycleSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active(_))
    }

    /// Whether ordinary conversation switches must leave history alone
    pub fn suppresses_promotion(&self) -> bool {
        self.is_active()
    }

    /// The frozen candidate list; empty while idle
    pub fn snapshot(&self) -> &[ConversationId] {
        match &self.state {
            SessionState::Active(session) => &session.snapshot,
            SessionState::Idle => &[],
        }
    }

    /// Highlighted index, `None` while idle
    pub fn cursor(&self) -> Option<usize> {
        match &self.state {
            SessionState::Active(session) => Some(session.cursor),
            SessionState::Idle => None,
        }
    }

    /// Identifier under the cursor, if the cursor points into the snapshot
    pub fn target(&self) -> Option<&ConversationId> {
        match &self.state {
            SessionState::Active(session) => session.target(),
            SessionState::Idle => None,
        }
    }

    /// Open a gesture. Returns `false` if one is already open.
    ///
    /// The snapshot is the current conversation followed by the history list, run
    /// through the same sanitize pass as loaded history.
    pub fn begin(&mut self, current: Option<&ConversationId>, history: &HistoryStore) -> bool {
        self.begin_at(current, history, Instant::now())
    }

    pub fn begin_at(
        &mut self,
        current: Option<&ConversationId>,
        history: &HistoryStore,
        now: Instant,
    ) -> bool {
        if self.is_active() {
            debug!("Ignoring begin: session already active");
            return false;
        }

        let snapshot = history.sanitize(current.into_iter().chain(history.entries()));
        debug!("Session started with {} candidates", snapshot.len());

        self.state = SessionState::Active(ActiveSession {
            snapshot,
            cursor: 0,
            started_at: now,
        });
        true
    }

    /// Advance the cursor one position, wrapping in both directions
    ///
    /// Returns the new target only when it still resolves. An unresolvable target
    /// leaves the cursor moved but yields `None`; invalid entries are not skipped.
    pub fn step(&mut self, direction: Direction, directory: &dyn Directory) -> Option<ConversationId> {
        let SessionState::Active(session) = &mut self.state else {
            debug!("Ignoring step: no active session");
            return None;
        };

        let len = session.snapshot.len();
        if len < 2 {
            return None;
        }

        session.cursor = match direction {
            Direction::Forward => (session.cursor + 1) % len,
            Direction::Backward => (session.cursor + len - 1) % len,
        };

        let target = session.target()?;
        if directory.resolve(target).is_none() {
            debug!("Cursor landed on vanished conversation {}", target);
            return None;
        }
        Some(target.clone())
    }

    /// Close the gesture and commit the final target into history
    ///
    /// The target becomes most recent and the conversation the gesture started
    /// from becomes second. Returns the committed identifier. Nothing is committed when idle, when the
    /// snapshot is empty, or when the target has since vanished or become ineligible.
    pub fn end(&mut self, history: &mut HistoryStore) -> Option<ConversationId> {
        let SessionState::Active(session) = std::mem::take(&mut self.state) else {
            debug!("Ignoring end: no active session");
            return None;
        };

        let target = session.target()?.clone();
        if history.directory().resolve_eligible(&target).is_none() {
            debug!("Not committing vanished or ineligible conversation {}", target);
            return None;
        }

        let anchor = session
            .snapshot
            .first()
            .filter(|anchor| history.directory().resolve_eligible(anchor).is_some())
            .cloned();
        history.promote_from(target.clone(), anchor);
        Some(target)
    }

    /// Force the session idle without committing anything
    pub fn abort(&mut self) -> bool {
        let was_active = self.is_active();
        self.state = SessionState::Idle;
        if was_active {
            debug!("Session aborted");
        }
        was_active
    }

    /// Whether the session has been open longer than `max`
    pub fn is_expired(&self, now: Instant, max: Duration) -> bool {
        match &self.state {
            SessionState::Active(session) => now.saturating_duration_since(session.started_at) > max,
            SessionState::Idle => false,
        }
    }

    /// Render window for the current cursor; `None` while idle
    pub fn render_window(&self, mode: WindowMode, row_length: usize) -> Option<RenderWindow> {
        match &self.state {
            SessionState::Active(session) => Some(compute_render_window(
                &session.snapshot,
                session.cursor,
                mode,
                row_length,
            )),
            SessionState::Idle => None,
        }
    }
}
