use parking_lot::Mutex;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};
use std::time::Instant;

use crate::indicator::{IndicatorFrame, IndicatorItem, Renderer};

const ITEM_WIDTH: u16 = 18;
const OVERLAY_HEIGHT: u16 = 6;
const TOAST_WIDTH: u16 = 36;
const TOAST_HEIGHT: u16 = 3;

#[derive(Debug, Clone)]
struct Shown {
    frame: IndicatorFrame,
    expires_at: Option<Instant>,
}

/// Renderer that keeps the latest frame for the terminal draw loop
///
/// Overlays disappear on dismiss; toasts stay up until their duration runs out.
#[derive(Debug, Default)]
pub struct TerminalIndicator {
    shown: Mutex<Option<Shown>>,
}

impl TerminalIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The frame to draw at `now`, if any
    pub fn visible(&self, now: Instant) -> Option<IndicatorFrame> {
        let mut shown = self.shown.lock();
        if shown
            .as_ref()
            .and_then(|s| s.expires_at)
            .is_some_and(|deadline| now >= deadline)
        {
            *shown = None;
        }
        shown.as_ref().map(|s| s.frame.clone())
    }
}

impl Renderer for TerminalIndicator {
    fn render(&self, frame: &IndicatorFrame) {
        let expires_at = match frame {
            IndicatorFrame::Toast { duration, .. } => Some(Instant::now() + *duration),
            IndicatorFrame::Overlay { .. } => None,
        };
        *self.shown.lock() = Some(Shown {
            frame: frame.clone(),
            expires_at,
        });
    }

    fn dismiss(&self) {
        let mut shown = self.shown.lock();
        if shown.as_ref().is_some_and(|s| s.expires_at.is_none()) {
            *shown = None;
        }
    }
}

/// Draws an indicator frame on top of whatever is already in the buffer
pub struct IndicatorWidget<'a> {
    pub frame: &'a IndicatorFrame,
}

impl Widget for IndicatorWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.frame {
            IndicatorFrame::Overlay {
                items,
                current_page,
                page_count,
            } => render_overlay(items, *current_page, *page_count, area, buf),
            IndicatorFrame::Toast { item, .. } => render_toast(item, area, buf),
        }
    }
}

fn item_style(item: &IndicatorItem) -> Style {
    if item.is_active {
        Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    }
}

fn item_label(item: &IndicatorItem) -> String {
    match &item.avatar {
        Some(avatar) => format!("[{}] {}", avatar, item.name),
        None => item.name.clone(),
    }
}

fn page_dots(current_page: usize, page_count: usize) -> Line<'static> {
    if page_count < 2 {
        return Line::default();
    }
    let dots: Vec<Span> = (0..page_count)
        .map(|page| {
            if page == current_page {
                Span::styled("● ", Style::default().fg(Color::Cyan))
            } else {
                Span::styled("○ ", Style::default().fg(Color::DarkGray))
            }
        })
        .collect();
    Line::from(dots).alignment(Alignment::Center)
}

fn render_overlay(
    items: &[IndicatorItem],
    current_page: usize,
    page_count: usize,
    area: Rect,
    buf: &mut Buffer,
) {
    let width = (items.len() as u16 * ITEM_WIDTH + 2).min(area.width);
    let height = OVERLAY_HEIGHT.min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    let popup = Rect::new(x, y, width, height);

    Clear.render(popup, buf);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Switch conversation ");
    let inner = block.inner(popup);
    block.render(popup, buf);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Length(ITEM_WIDTH); items.len()])
        .split(rows[1]);

    for (item, cell) in items.iter().zip(cells.iter()) {
        Paragraph::new(item_label(item))
            .style(item_style(item))
            .alignment(Alignment::Center)
            .render(*cell, buf);
    }

    Paragraph::new(page_dots(current_page, page_count)).render(rows[2], buf);
}

fn render_toast(item: &IndicatorItem, area: Rect, buf: &mut Buffer) {
    let width = TOAST_WIDTH.min(area.width);
    let height = TOAST_HEIGHT.min(area.height);
    let x = area.x + area.width.saturating_sub(width);
    let y = area.y + area.height.saturating_sub(height + 1);
    let popup = Rect::new(x, y, width, height);

    Clear.render(popup, buf);
    Paragraph::new(Line::from(vec![
        Span::raw("→ "),
        Span::styled(item_label(item), item_style(item)),
    ]))
    .block(Block::default().borders(Borders::ALL))
    .render(popup, buf);
}
