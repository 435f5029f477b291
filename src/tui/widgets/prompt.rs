//! Modal overlays: auth forms, the upload path prompt, delete confirmation.

use crate::app::state::{AppState, Prompt};
use crate::tui::theme::get_theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub fn render(frame: &mut Frame, state: &AppState, area: Rect) {
    if let Some(prompt) = &state.prompt {
        render_prompt(frame, prompt, area);
    } else if let Some((_, title)) = &state.pending_delete {
        render_delete_confirm(frame, title, area);
    }
}

fn render_prompt(frame: &mut Frame, prompt: &Prompt, area: Rect) {
    let theme = get_theme();
    let icons = &theme.icons;

    let (title, lines) = match prompt {
        Prompt::Login {
            username,
            password,
            on_password,
        } => (
            format!(" {} Sign in ", icons.user),
            credential_lines(username, password, *on_password),
        ),
        Prompt::Register {
            username,
            password,
            on_password,
        } => (
            format!(" {} Register ", icons.user),
            credential_lines(username, password, *on_password),
        ),
        Prompt::Upload { paths } => (
            format!(" {} Upload ", icons.upload),
            vec![
                field_line("Files", paths, true),
                Line::default(),
                hint_line("Space-separated paths to audio files"),
                hint_line("Enter: upload · Esc: cancel"),
            ],
        ),
    };

    let rect = centered(area, 52, (lines.len() + 2) as u16);
    frame.render_widget(Clear, rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(theme.palette.accent))
        .title(title)
        .title_style(Style::default().fg(theme.palette.accent));
    let inner = block.inner(rect);
    frame.render_widget(block, rect);
    frame.render_widget(Paragraph::new(lines), inner);
}

fn credential_lines(username: &str, password: &str, on_password: bool) -> Vec<Line<'static>> {
    let masked: String = password.chars().map(|_| '*').collect();
    vec![
        field_line("Username", username, !on_password),
        field_line("Password", &masked, on_password),
        Line::default(),
        hint_line("Tab: switch field · Enter: submit · Esc: cancel"),
    ]
}

fn field_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let theme = get_theme();
    let label_style = if focused {
        Style::default()
            .fg(theme.palette.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.palette.fg_secondary)
    };
    let cursor = if focused { "▏" } else { "" };
    Line::from(vec![
        Span::styled(format!("{label:>9}: "), label_style),
        Span::styled(
            format!("{value}{cursor}"),
            Style::default().fg(theme.palette.fg_primary),
        ),
    ])
}

fn hint_line(text: &str) -> Line<'static> {
    let theme = get_theme();
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(theme.palette.fg_secondary),
    ))
}

fn render_delete_confirm(frame: &mut Frame, title: &str, area: Rect) {
    let theme = get_theme();
    let icons = &theme.icons;

    let rect = centered(area, 52, 5);
    frame.render_widget(Clear, rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(theme.palette.error))
        .title(format!(" {} Delete upload ", icons.trash))
        .title_style(Style::default().fg(theme.palette.error));
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let lines = vec![
        Line::from(Span::styled(
            format!("Permanently delete \"{title}\" from the server?"),
            Style::default().fg(theme.palette.fg_primary),
        )),
        Line::default(),
        hint_line("y: delete · n/Esc: keep"),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area)[1];
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vert)[1]
}
