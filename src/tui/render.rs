use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use std::time::Instant;

use super::app::DemoApp;
use super::overlay::{IndicatorWidget, TerminalIndicator};
use crate::directory::{ActiveConversation, ConversationKind, Directory};
use crate::switcher::Switcher;

fn kind_tag(kind: ConversationKind) -> &'static str {
    match kind {
        ConversationKind::Direct => "DM ",
        ConversationKind::Group => "GRP",
        ConversationKind::Other => "CH ",
    }
}

/// Draw the whole demo screen
pub fn render_demo(f: &mut Frame, app: &DemoApp, switcher: &Switcher, indicator: &TerminalIndicator) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(f.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[0]);

    // Conversation list
    let active = app.host.current_conversation();
    let items: Vec<ListItem> = app
        .conversations()
        .iter()
        .map(|conv| {
            let is_active = active.as_ref() == Some(&conv.id);
            let marker = if is_active { "● " } else { "  " };
            let style = if conv.kind.is_eligible() {
                Style::default()
            } else {
                Style::default().fg(Color::DarkGray)
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Green)),
                Span::styled(kind_tag(conv.kind), Style::default().fg(Color::DarkGray)),
                Span::raw(" "),
                Span::styled(
                    conv.name.clone().unwrap_or_else(|| conv.id.to_string()),
                    style,
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Conversations "),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));
    let mut state = ListState::default();
    state.select(Some(app.selected));
    f.render_stateful_widget(list, columns[0], &mut state);

    // Recency list
    let history: Vec<ListItem> = switcher
        .history()
        .entries()
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let info = app.directory.describe(id);
            ListItem::new(format!("{:>2}. {}", i + 1, info.name))
        })
        .collect();
    let title = if switcher.session().is_active() {
        " Recent (frozen while cycling) "
    } else {
        " Recent "
    };
    f.render_widget(
        List::new(history).block(Block::default().borders(Borders::ALL).title(title)),
        columns[1],
    );

    // Help and status
    let mut help = vec![
        Span::styled("Alt+Tab", Style::default().fg(Color::Cyan)),
        Span::raw(": cycle  "),
        Span::styled("Up/Down Enter", Style::default().fg(Color::Green)),
        Span::raw(": open  "),
        Span::styled("x", Style::default().fg(Color::Yellow)),
        Span::raw(": clear recents  "),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::raw(": quit"),
    ];
    if !app.reports_release {
        help.push(Span::styled(
            "  (release any key without Alt to confirm)",
            Style::default().fg(Color::DarkGray),
        ));
    }
    let mut lines = vec![Line::from(help)];
    if let Some(status) = &app.status_message {
        lines.push(Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Gray),
        )));
    }
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::TOP)),
        chunks[1],
    );

    if let Some(frame) = indicator.visible(Instant::now()) {
        f.render_widget(IndicatorWidget { frame: &frame }, f.area());
    }
}
