use serde::{Deserialize, Serialize};

use crate::constants::{MAX_ROW_LENGTH, MIN_ROW_LENGTH};
use crate::directory::ConversationId;

/// How many candidates an indicator shows at once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowMode {
    /// Only the highlighted conversation
    #[serde(alias = "current")]
    Single,
    /// A page of up to `row_length` conversations
    #[default]
    Row,
}

/// One visible candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowEntry {
    pub id: ConversationId,
    pub is_active: bool,
}

/// What an indicator should display for the current cursor position
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderWindow {
    pub entries: Vec<WindowEntry>,
    pub current_page: usize,
    pub page_count: usize,
}

impl RenderWindow {
    /// The highlighted entry, if it is on the visible page
    pub fn active(&self) -> Option<&ConversationId> {
        self.entries.iter().find(|e| e.is_active).map(|e| &e.id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn clamp_row_length(row_length: usize) -> usize {
    row_length.clamp(MIN_ROW_LENGTH, MAX_ROW_LENGTH)
}

/// Compute the visible slice of `snapshot` around `cursor`
///
/// Row mode only ever pages through the first two pages of the snapshot; deeper
/// entries are never shown.
pub fn compute_render_window(
    snapshot: &[ConversationId],
    cursor: usize,
    mode: WindowMode,
    row_length: usize,
) -> RenderWindow {
    match mode {
        WindowMode::Single => RenderWindow {
            entries: snapshot
                .get(cursor)
                .map(|id| WindowEntry {
                    id: id.clone(),
                    is_active: true,
                })
                .into_iter()
                .collect(),
            current_page: 0,
            page_count: 1,
        },
        WindowMode::Row => {
            let page_size = clamp_row_length(row_length);
            let working = &snapshot[..snapshot.len().min(page_size * 2)];
            let page_count = if working.len() > page_size { 2 } else { 1 };
            let current_page = (page_count - 1).min(cursor / page_size);

            let start = (current_page * page_size).min(working.len());
            let end = ((current_page + 1) * page_size).min(working.len());

            let entries = working[start..end]
                .iter()
                .enumerate()
                .map(|(offset, id)| WindowEntry {
                    id: id.clone(),
                    is_active: start + offset == cursor,
                })
                .collect();

            RenderWindow {
                entries,
                current_page,
                page_count,
            }
        }
    }
}
