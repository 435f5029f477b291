//! Help screen showing keybindings

use crate::tui::theme::get_theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn render(frame: &mut Frame, area: Rect) {
    let theme = get_theme();
    let icons = &theme.icons;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(theme.palette.border))
        .title(format!(" {} Keybinds ", icons.help))
        .title_style(Style::default().fg(theme.palette.accent));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    let left_content = vec![
        section_header("Navigation"),
        keybind("j / Down", "Move down"),
        keybind("k / Up", "Move up"),
        keybind("g / G", "Go to top / bottom"),
        keybind("Ctrl+d / Ctrl+u", "Page down / up"),
        keybind("1 / 2 / 3", "Queue / Search / Liked"),
        keybind("h / l", "Previous / next view"),
        keybind("/", "Focus search"),
        Line::default(),
        section_header("Playback"),
        keybind("Enter", "Play selected track"),
        keybind("Space", "Toggle play/pause"),
        keybind("n / p", "Next / previous track"),
        keybind("R", "Cycle repeat mode"),
        keybind("S", "Toggle shuffle"),
        keybind("+ / -", "Volume up / down"),
        keybind("m", "Toggle mute"),
        keybind("] / [", "Seek 10s forward / back"),
    ];
    frame.render_widget(
        Paragraph::new(left_content).wrap(Wrap { trim: false }),
        cols[0],
    );

    let right_content = vec![
        section_header("Library"),
        keybind("f", "Like / unlike selected"),
        keybind("F", "Like / unlike playing track"),
        keybind("d", "Remove selected from queue"),
        keybind("D", "Delete own upload (confirms)"),
        keybind("u", "Upload audio files"),
        Line::default(),
        section_header("Account"),
        keybind("a", "Sign in"),
        keybind("A", "Register"),
        keybind("x", "Sign out"),
        Line::default(),
        section_header("General"),
        keybind("r / F5", "Refresh from server"),
        keybind("?", "Toggle this help"),
        keybind("q", "Quit"),
    ];
    frame.render_widget(
        Paragraph::new(right_content).wrap(Wrap { trim: false }),
        cols[1],
    );
}

fn section_header(title: &str) -> Line<'static> {
    let theme = get_theme();
    Line::from(vec![Span::styled(
        format!("━━ {title} ━━"),
        Style::default()
            .fg(theme.palette.accent)
            .add_modifier(Modifier::BOLD),
    )])
}

fn keybind(key: &str, desc: &str) -> Line<'static> {
    let theme = get_theme();
    Line::from(vec![
        Span::styled("  ", Style::default()),
        Span::styled(
            format!("{key:16}"),
            Style::default()
                .fg(theme.palette.accent_alt)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            desc.to_string(),
            Style::default().fg(theme.palette.fg_primary),
        ),
    ])
}
