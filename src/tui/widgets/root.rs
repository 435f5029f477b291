//! Root layout widget - orchestrates the main layout structure

use crate::app::state::AppState;
use crate::tui::theme::get_theme;
use crate::view::ViewMode;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders},
    Frame,
};

use super::{help, now_playing, prompt, sidebar, track_list};

/// Main layout structure:
/// ┌──────────┬─────────────────────────────────────────┐
/// │  Harmony │           Track list                    │
/// │          │        (Queue/Search/Liked)             │
/// │  Queue   │                                         │
/// │  Search  │                                         │
/// │  Liked   │                                         │
/// ├──────────┴─────────────────────────────────────────┤
/// │                    Player                          │
/// └────────────────────────────────────────────────────┘
pub fn render(frame: &mut Frame, state: &mut AppState) {
    let root = frame.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(6)])
        .split(root);

    let top_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(20), Constraint::Min(40)])
        .split(rows[0]);

    sidebar::render(frame, state, top_cols[0]);
    render_main_content(frame, state, top_cols[1]);
    now_playing::render(frame, state, rows[1]);

    // Modal overlays paint over everything else.
    prompt::render(frame, state, root);
}

fn render_main_content(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let theme = get_theme();
    let icons = &theme.icons;

    if state.show_help {
        help::render(frame, area);
        return;
    }

    let icon = match state.view_mode {
        ViewMode::Queue => icons.queue,
        ViewMode::Search => icons.search,
        ViewMode::Liked => icons.liked,
    };
    let title = format!(" {} {} ", icon, state.view_mode.title());

    let main = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(theme.palette.border))
        .title(title)
        .title_style(Style::default().fg(theme.palette.accent));
    let inner = main.inner(area);
    frame.render_widget(main, area);

    match state.view_mode {
        ViewMode::Search => {
            let sub = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(3)])
                .split(inner);
            track_list::render_search_box(frame, state, sub[0]);
            state.update_scroll(sub[1].height as usize);
            track_list::render(frame, state, sub[1]);
        }
        ViewMode::Queue | ViewMode::Liked => {
            state.update_scroll(inner.height as usize);
            track_list::render(frame, state, inner);
        }
    }
}
