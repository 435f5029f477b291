//! Now Playing widget - compact text-only player for the bottom bar

use crate::app::state::{AppState, ToastKind};
use crate::player::coordinator::RepeatMode;
use crate::tui::theme::get_theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(frame: &mut Frame, state: &AppState, area: Rect) {
    let theme = get_theme();
    let icons = &theme.icons;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(theme.palette.border))
        .title(format!(" {} Player ", icons.music))
        .title_style(Style::default().fg(theme.palette.accent));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let padded = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner)[1];

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title + artist
            Constraint::Length(1), // Progress bar
            Constraint::Length(1), // Time + controls + volume
            Constraint::Min(0),    // Toast / status
        ])
        .split(padded);

    let content_width = padded.width.saturating_sub(1) as usize;

    // An empty queue clears the title line entirely; a track without audio
    // keeps showing what it is, it just cannot play.
    let current = state.current_song();
    let title_line = match current {
        Some(song) => {
            let mut spans = vec![Span::styled(
                truncate_str(&song.title, content_width / 2),
                Style::default()
                    .fg(theme.palette.fg_primary)
                    .add_modifier(Modifier::BOLD),
            )];
            if !song.artist.is_empty() {
                spans.push(Span::styled(
                    format!("  {}", truncate_str(&song.artist, content_width / 2)),
                    Style::default().fg(theme.palette.fg_secondary),
                ));
            }
            if song.is_liked {
                spans.push(Span::styled(
                    format!(" {}", icons.heart),
                    Style::default().fg(theme.palette.liked),
                ));
            }
            Line::from(spans)
        }
        None => Line::from(Span::styled(
            "Not playing",
            Style::default().fg(theme.palette.fg_secondary),
        )),
    };
    frame.render_widget(Paragraph::new(title_line), rows[0]);

    // Progress bar, or a hint when the current track has no audio at all.
    let sourceless = current.is_some_and(|s| s.playable_source().is_none());
    if sourceless {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "no audio source",
                Style::default().fg(theme.palette.fg_secondary),
            ))),
            rows[1],
        );
    } else {
        let ratio = if state.duration_secs > 0.0 {
            (state.position_secs / state.duration_secs).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let bar = progress_bar(rows[1].width as usize, ratio, icons);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                bar,
                Style::default().fg(theme.palette.accent),
            ))),
            rows[1],
        );
    }

    frame.render_widget(Paragraph::new(controls_line(state)), rows[2]);

    // Toast wins the bottom row; otherwise the status line shows through.
    if let Some(toast) = &state.toast {
        let (prefix, color) = match toast.kind {
            ToastKind::Success => (icons.success, theme.palette.playing),
            ToastKind::Error => (icons.error, theme.palette.error),
        };
        let toast_line = Line::from(vec![
            Span::styled(format!("{prefix} "), Style::default().fg(color)),
            Span::styled(
                truncate_str(&toast.message, content_width.saturating_sub(3)),
                Style::default().fg(color),
            ),
        ]);
        frame.render_widget(Paragraph::new(toast_line), rows[3]);
    } else if !state.status.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                truncate_str(&state.status, content_width),
                Style::default().fg(theme.palette.fg_secondary),
            ))),
            rows[3],
        );
    }
}

fn controls_line(state: &AppState) -> Line<'static> {
    let theme = get_theme();
    let icons = &theme.icons;

    let pos_min = (state.position_secs / 60.0).floor() as u32;
    let pos_sec = (state.position_secs % 60.0).floor() as u32;
    let dur_min = (state.duration_secs / 60.0).floor() as u32;
    let dur_sec = (state.duration_secs % 60.0).floor() as u32;

    let play_icon = if state.player.is_playing() {
        icons.pause
    } else {
        icons.play
    };

    // Three volume tiers: muted-or-zero, below half, at or above half.
    let vol_icon = if state.muted || state.volume == 0 {
        icons.volume_mute
    } else if state.volume < 50 {
        icons.volume_low
    } else {
        icons.volume_high
    };

    let mut spans = vec![
        Span::styled(
            format!("{pos_min:02}:{pos_sec:02}/{dur_min:02}:{dur_sec:02}"),
            Style::default().fg(theme.palette.fg_secondary),
        ),
        Span::raw(" "),
        Span::styled(icons.prev, Style::default().fg(theme.palette.fg_secondary)),
        Span::raw(" "),
        Span::styled(play_icon, Style::default().fg(theme.palette.playing)),
        Span::raw(" "),
        Span::styled(icons.next, Style::default().fg(theme.palette.fg_secondary)),
        Span::raw("  "),
        Span::styled(vol_icon, Style::default().fg(theme.palette.fg_secondary)),
        Span::raw(" "),
        Span::styled(
            format!("{}%", state.volume),
            Style::default().fg(theme.palette.fg_secondary),
        ),
    ];

    match state.player.repeat {
        RepeatMode::Off => {}
        RepeatMode::One => {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                icons.repeat_one,
                Style::default().fg(theme.palette.accent_alt),
            ));
        }
        RepeatMode::All => {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                icons.repeat,
                Style::default().fg(theme.palette.accent_alt),
            ));
        }
    }
    if state.player.shuffle {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            icons.shuffle,
            Style::default().fg(theme.palette.accent_alt),
        ));
    }

    Line::from(spans)
}

fn progress_bar(width: usize, ratio: f64, icons: &crate::tui::theme::Icons) -> String {
    if width < 3 {
        return String::new();
    }

    let filled = ((width - 1) as f64 * ratio).round() as usize;
    let empty = width.saturating_sub(filled + 1);

    let mut bar = String::with_capacity(width * 3);
    for _ in 0..filled {
        bar.push_str(icons.progress_full);
    }
    bar.push_str(icons.progress_head);
    for _ in 0..empty {
        bar.push_str(icons.progress_empty);
    }
    bar
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    let char_count: usize = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{truncated}...")
    } else {
        s.chars().take(max_len).collect()
    }
}
