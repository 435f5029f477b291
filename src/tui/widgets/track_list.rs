//! Track list widget - renders the displayed sequence with virtual scrolling

use crate::app::state::{AppState, SearchFocus};
use crate::api::models::Song;
use crate::tui::theme::{get_theme, LoadingSpinner};
use crate::view::ViewMode;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Render the search input box
pub fn render_search_box(frame: &mut Frame, state: &AppState, area: Rect) {
    let theme = get_theme();

    let is_focused = state.search_focus == SearchFocus::Input;
    let border_color = if is_focused {
        theme.palette.accent
    } else {
        theme.palette.border
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(border_color))
        .title(" Query ")
        .title_style(Style::default().fg(theme.palette.accent));

    let prompt = if state.search_loading {
        let spinner = LoadingSpinner::frame(state.tick);
        format!("{} {}", state.search_query, spinner)
    } else {
        let cursor = if is_focused { "▏" } else { "" };
        format!("{}{}", state.search_query, cursor)
    };

    let p = Paragraph::new(Line::from(prompt))
        .style(Style::default().fg(theme.palette.fg_primary))
        .block(block);
    frame.render_widget(p, area);
}

pub fn render(frame: &mut Frame, state: &AppState, area: Rect) {
    let theme = get_theme();

    let loading = match state.view_mode {
        ViewMode::Search => state.search_loading,
        _ => state.songs_loading,
    };
    if loading && state.displayed.is_empty() {
        let spinner = LoadingSpinner::frame(state.tick);
        let loading = Paragraph::new(Line::from(format!("{} Loading...", spinner)))
            .style(Style::default().fg(theme.palette.fg_secondary));
        frame.render_widget(loading, area);
        return;
    }

    if state.displayed.is_empty() {
        let empty_msg = match state.view_mode {
            ViewMode::Queue => "Queue is empty. Upload songs (u) or search (/) to add some.",
            ViewMode::Search => "Search for music above",
            ViewMode::Liked => "No liked songs yet. Press f on a track to like it.",
        };
        let empty = Paragraph::new(Line::from(empty_msg))
            .style(Style::default().fg(theme.palette.fg_secondary));
        frame.render_widget(empty, area);
        return;
    }

    let visible_height = area.height as usize;
    let scroll_offset = state.scroll_offset;
    let playing_idx = state.player.position();

    let items: Vec<ListItem> = state
        .displayed
        .iter()
        .enumerate()
        .skip(scroll_offset)
        .take(visible_height)
        .map(|(i, song)| track_item(state, song, i, playing_idx))
        .collect();

    let adjusted_selected = state.selected.saturating_sub(scroll_offset);
    let mut list_state = ListState::default();
    list_state.select(Some(adjusted_selected));

    let list = List::new(items)
        .highlight_style(
            Style::default()
                .fg(theme.palette.bg_primary)
                .bg(theme.palette.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("\u{f054} "); // nf-fa-chevron_right

    frame.render_stateful_widget(list, area, &mut list_state);

    // Scroll position indicator in the top-right corner
    if state.displayed.len() > visible_height {
        let pos_text = format!("{}/{}", state.selected + 1, state.displayed.len());
        let pos_len = pos_text.len() as u16;
        let pos_x = area.x + area.width.saturating_sub(pos_len);
        if pos_x > area.x {
            frame.render_widget(
                Paragraph::new(pos_text).style(Style::default().fg(theme.palette.fg_secondary)),
                Rect::new(pos_x, area.y, pos_len, 1),
            );
        }
    }
}

fn track_item<'a>(
    state: &AppState,
    song: &'a Song,
    index: usize,
    playing_idx: Option<usize>,
) -> ListItem<'a> {
    let theme = get_theme();
    let icons = &theme.icons;

    let is_selected = index == state.selected;
    let is_playing = playing_idx == Some(index);

    let base_style = if is_selected {
        Style::default()
            .fg(theme.palette.accent)
            .add_modifier(Modifier::BOLD)
    } else if is_playing {
        Style::default().fg(theme.palette.playing)
    } else {
        Style::default().fg(theme.palette.fg_primary)
    };

    let marker = if is_playing {
        Span::styled(
            format!("{} ", if state.player.is_playing() { icons.play } else { icons.pause }),
            Style::default().fg(theme.palette.playing),
        )
    } else {
        Span::raw("  ")
    };

    let heart = if song.is_liked {
        Span::styled(
            format!("{} ", icons.heart),
            Style::default().fg(theme.palette.liked),
        )
    } else {
        Span::styled(
            format!("{} ", icons.heart_outline),
            Style::default().fg(theme.palette.fg_secondary),
        )
    };

    let mut spans = vec![
        marker,
        heart,
        Span::styled(song.title.as_str(), base_style),
        Span::styled(
            format!("  {}", song.artist),
            Style::default().fg(theme.palette.fg_secondary),
        ),
    ];

    let album = song.album_or_origin();
    if !album.is_empty() {
        spans.push(Span::styled(
            format!("  · {album}"),
            Style::default().fg(theme.palette.fg_secondary),
        ));
    }
    if let Some(d) = song.duration {
        spans.push(Span::styled(
            format!("  {}:{:02}", d / 60, d % 60),
            Style::default().fg(theme.palette.fg_secondary),
        ));
    }
    if song.playable_source().is_none() {
        spans.push(Span::styled(
            "  (no audio)",
            Style::default().fg(theme.palette.fg_secondary),
        ));
    }

    ListItem::new(Line::from(spans))
}
