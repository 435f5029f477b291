use crate::app::state::AppState;
use crate::tui::theme::get_theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Navigation menu. Exactly one entry carries the highlight at a time; the
/// highlight follows `state.view_mode`, so switching views clears the old
/// entry and sets the new one in the same draw.
pub fn render(frame: &mut Frame, state: &AppState, area: Rect) {
    let theme = get_theme();
    let icons = &theme.icons;

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(theme.palette.border))
        .title(" Harmony ")
        .title_style(Style::default().fg(theme.palette.accent));

    let entries = [
        (icons.queue, "Queue"),
        (icons.search, "Search"),
        (icons.liked, "Liked Songs"),
    ];

    let active = state.view_mode.nav_index();
    let items: Vec<ListItem> = entries
        .iter()
        .enumerate()
        .map(|(i, (icon, label))| {
            let is_active = i == active;
            let style = if is_active {
                Style::default()
                    .fg(theme.palette.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.palette.fg_primary)
            };
            let icon_style = if is_active {
                Style::default().fg(theme.palette.accent)
            } else {
                Style::default().fg(theme.palette.fg_secondary)
            };
            let prefix = if is_active {
                icons.selected
            } else {
                icons.unselected
            };

            ListItem::new(Line::from(vec![
                Span::styled(prefix, icon_style),
                Span::raw(" "),
                Span::styled(*icon, icon_style),
                Span::raw(" "),
                Span::styled(*label, style),
            ]))
        })
        .collect();

    let mut list_state = ListState::default();
    list_state.select(Some(active));

    let list = List::new(items).block(block).highlight_symbol("");
    frame.render_stateful_widget(list, rows[0], &mut list_state);

    render_account(frame, state, rows[1]);
}

fn render_account(frame: &mut Frame, state: &AppState, area: Rect) {
    let theme = get_theme();
    let icons = &theme.icons;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(theme.palette.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let line = match &state.user {
        Some(user) => Line::from(vec![
            Span::styled(icons.user, Style::default().fg(theme.palette.playing)),
            Span::raw(" "),
            Span::styled(
                user.username.clone(),
                Style::default().fg(theme.palette.fg_primary),
            ),
        ]),
        None => Line::from(vec![
            Span::styled(icons.user, Style::default().fg(theme.palette.fg_secondary)),
            Span::raw(" "),
            Span::styled(
                "a: sign in",
                Style::default().fg(theme.palette.fg_secondary),
            ),
        ]),
    };
    frame.render_widget(Paragraph::new(line), inner);
}
