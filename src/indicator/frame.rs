use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::app::IndicatorConfig;
use crate::directory::{ConversationId, Directory};
use crate::session::{CycleSession, RenderWindow, WindowMode};

/// How the switcher surfaces the highlighted conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorStyle {
    /// Panel listing a page of candidates
    #[default]
    Overlay,
    /// Short-lived note naming the highlighted conversation
    Toast,
    /// No indicator at all
    Off,
}

/// A window entry with display information attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorItem {
    pub id: ConversationId,
    pub name: String,
    pub avatar: Option<String>,
    pub is_active: bool,
}

/// Everything a renderer needs to draw one step of a gesture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndicatorFrame {
    Overlay {
        items: Vec<IndicatorItem>,
        current_page: usize,
        page_count: usize,
    },
    Toast {
        item: IndicatorItem,
        duration: Duration,
    },
}

impl IndicatorFrame {
    /// Build the frame for the session's current cursor
    ///
    /// Returns `None` when the style is `Off`, the session is idle, or there is
    /// nothing under the cursor to show.
    pub fn for_session(
        session: &CycleSession,
        directory: &dyn Directory,
        config: &IndicatorConfig,
    ) -> Option<Self> {
        match config.style {
            IndicatorStyle::Off => None,
            IndicatorStyle::Toast => {
                let window = session.render_window(WindowMode::Single, config.row_length())?;
                let item = describe(&window, directory, config.show_avatars)
                    .into_iter()
                    .next()?;
                Some(Self::Toast {
                    item,
                    duration: Duration::from_millis(config.toast_duration_ms),
                })
            }
            IndicatorStyle::Overlay => {
                let window = session.render_window(config.overlay_mode, config.row_length())?;
                if window.is_empty() {
                    return None;
                }
                Some(Self::Overlay {
                    items: describe(&window, directory, config.show_avatars),
                    current_page: window.current_page,
                    page_count: window.page_count,
                })
            }
        }
    }

    pub fn items(&self) -> &[IndicatorItem] {
        match self {
            Self::Overlay { items, .. } => items,
            Self::Toast { item, .. } => std::slice::from_ref(item),
        }
    }
}

fn describe(window: &RenderWindow, directory: &dyn Directory, with_avatars: bool) -> Vec<IndicatorItem> {
    window
        .entries
        .iter()
        .map(|entry| {
            let info = directory.describe(&entry.id);
            IndicatorItem {
                id: entry.id.clone(),
                name: info.name,
                avatar: if with_avatars { info.avatar } else { None },
                is_active: entry.is_active,
            }
        })
        .collect()
}

/// Presentation sink for indicator frames
#[cfg_attr(test, mockall::automock)]
pub trait Renderer: Send + Sync {
    fn render(&self, frame: &IndicatorFrame);
    fn dismiss(&self);
}

/// Renderer that draws nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&self, _frame: &IndicatorFrame) {}
    fn dismiss(&self) {}
}
