//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::time::Duration;

use crate::app::{App, PickerRow, PlaylistPicker};
use crate::config::UiSettings;
use crate::library::NodeKind;

const CONTROLS: [(&str, &str); 6] = [
    ("n/l", "next track"),
    ("enter/r", "reveal"),
    ("space/p", "play/pause"),
    ("f", "playlists"),
    ("x", "reset"),
    ("q", "quit"),
];

const PICKER_CONTROLS: [(&str, &str); 3] = [("j/k", "up/down"), ("enter", "select"), ("esc", "close")];

fn controls_text(controls: &[(&str, &str)]) -> String {
    controls
        .iter()
        .map(|(k, v)| format!("[{}] {}", k, v))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn left_pad() -> Padding {
    Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    }
}

fn status_text(app: &App) -> String {
    let quiz = &app.quiz;
    let mut parts: Vec<String> = vec![
        format!(" SCOPE: {}", app.scope_label()),
        format!("Played: {}/{}", quiz.pool_used, quiz.pool_size),
        app.phase_text().to_string(),
        format!("Source: {}", app.source_label),
    ];
    if let Some(err) = &quiz.error {
        parts.push(format!("Error: {err}"));
    }
    parts.join(" • ")
}

/// Indented picker row: `+` marks folders, `*` smart playlists.
fn picker_label(row: &PickerRow) -> String {
    let marker = match row.kind {
        Some(NodeKind::Folder) => "+ ",
        Some(NodeKind::SmartPlaylist) => "* ",
        Some(NodeKind::Playlist) | None => "  ",
    };
    format!(
        "{}{}{} ({})",
        "  ".repeat(row.depth),
        marker,
        row.label,
        row.track_count
    )
}

fn draw_picker(frame: &mut Frame, picker: &PlaylistPicker, area: Rect) {
    let popup_area = centered_rect_sized(60, 16, area);
    frame.render_widget(Clear, popup_area);

    let items: Vec<ListItem> = picker
        .rows()
        .iter()
        .map(|row| ListItem::new(picker_label(row)))
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" playlists ")
                .title_bottom(format!(" {} ", controls_text(&PICKER_CONTROLS))),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(picker.selected()));
    frame.render_stateful_widget(list, popup_area, &mut state);
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(frame: &mut Frame, app: &App, ui_settings: &UiSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" rekordquiz ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status = Paragraph::new(status_text(app))
        .block(Block::bordered().padding(left_pad()).title(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[1]);

    // Quiz panel
    {
        let answer = app.answer_text(ui_settings);
        let body = if app.quiz.current_track.is_some() {
            answer
        } else if app.quiz.is_loading {
            "Loading…".to_string()
        } else if let Some(err) = &app.quiz.error {
            err.clone()
        } else {
            "Press [n] to start".to_string()
        };
        let mut panel = Paragraph::new(format!("\n{body}"))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" now playing "))
            .wrap(Wrap { trim: true });
        if app.quiz.is_revealed {
            panel = panel.bold();
        }
        frame.render_widget(panel, chunks[2]);
    }

    let playback = &app.quiz.playback;
    let shown = playback.current_time.min(playback.max_play_time);
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" excerpt "))
        .gauge_style(Style::default().add_modifier(Modifier::BOLD))
        .ratio(playback.progress())
        .label(format!(
            "{} / {}",
            format_mmss(shown),
            format_mmss(playback.max_play_time)
        ));
    frame.render_widget(gauge, chunks[3]);

    let footer = Paragraph::new(controls_text(&CONTROLS))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(left_pad()),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);

    if let Some(picker) = &app.picker {
        draw_picker(frame, picker, chunks[2].union(chunks[3]));
    }
}
