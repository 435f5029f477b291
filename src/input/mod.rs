use crate::app::actions::Action;
use crate::app::events::{Event, InputEvent};
use crate::app::state::{AppState, SearchFocus};
use crate::view::ViewMode;
use crossterm::event::{
    self, Event as CtEvent, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind,
};
use tokio::sync::mpsc;

pub fn spawn_input_task(tx: mpsc::Sender<Event>) {
    tokio::task::spawn_blocking(move || loop {
        if event::poll(std::time::Duration::from_millis(250)).unwrap_or(false) {
            match event::read() {
                Ok(CtEvent::Key(k)) => {
                    if k.kind == KeyEventKind::Press
                        && tx.blocking_send(Event::Input(InputEvent::Key(k))).is_err()
                    {
                        break;
                    }
                }
                Ok(CtEvent::Mouse(m)) => {
                    if tx.blocking_send(Event::Input(InputEvent::Mouse(m))).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.blocking_send(Event::Input(InputEvent::Resize)).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => {}
            }
        }
    });
}

pub fn map_input_to_action(state: &AppState, ev: InputEvent) -> Option<Action> {
    match ev {
        InputEvent::Resize => Some(Action::Resize),
        InputEvent::Mouse(m) => match m.kind {
            MouseEventKind::ScrollUp => Some(Action::ListUp),
            MouseEventKind::ScrollDown => Some(Action::ListDown),
            _ => None,
        },
        InputEvent::Key(k) => {
            if state.prompt.is_some() {
                return handle_prompt(k);
            }
            if state.pending_delete.is_some() {
                return handle_delete_confirm(k);
            }
            if state.show_help {
                return handle_help(k);
            }
            if state.view_mode == ViewMode::Search && state.search_focus == SearchFocus::Input {
                return handle_search_input(state, k);
            }
            handle_normal_mode(k)
        }
    }
}

/// Text entry for the auth and upload modals.
fn handle_prompt(k: crossterm::event::KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Esc => Some(Action::LeaveInput),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Up => {
            Some(Action::PromptFieldNext)
        }
        KeyCode::Enter => Some(Action::SubmitInput),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Char('u') if k.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Action::ClearInput)
        }
        KeyCode::Char(c) => Some(Action::InputChar(c)),
        _ => None,
    }
}

fn handle_delete_confirm(k: crossterm::event::KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Some(Action::ConfirmDelete),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Action::CancelDelete),
        _ => None,
    }
}

fn handle_help(k: crossterm::event::KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Char('?') | KeyCode::Esc => Some(Action::ToggleHelp),
        KeyCode::Char('q') => Some(Action::Quit),
        _ => None,
    }
}

fn handle_search_input(state: &AppState, k: crossterm::event::KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Esc => Some(Action::LeaveInput),
        KeyCode::Enter => Some(Action::SubmitInput),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Down if !state.displayed.is_empty() => Some(Action::LeaveInput),
        KeyCode::Tab => Some(Action::NavDown),
        KeyCode::BackTab => Some(Action::NavUp),
        KeyCode::Char('u') if k.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Action::ClearInput)
        }
        KeyCode::Char(c) => Some(Action::InputChar(c)),
        _ => None,
    }
}

fn handle_normal_mode(k: crossterm::event::KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),

        // List navigation, vim style
        KeyCode::Up | KeyCode::Char('k') => Some(Action::ListUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::ListDown),
        KeyCode::Char('g') => Some(Action::GoTop),
        KeyCode::Char('G') => Some(Action::GoBottom),
        KeyCode::Char('d') if k.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::PageDown),
        KeyCode::Char('u') if k.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::PageUp),

        // View switching
        KeyCode::Left | KeyCode::Char('h') => Some(Action::NavUp),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::NavDown),
        KeyCode::Tab => Some(Action::NavDown),
        KeyCode::BackTab => Some(Action::NavUp),
        KeyCode::Char('1') => Some(Action::SetView(ViewMode::Queue)),
        KeyCode::Char('2') => Some(Action::SetView(ViewMode::Search)),
        KeyCode::Char('3') => Some(Action::SetView(ViewMode::Liked)),
        KeyCode::Char('/') => Some(Action::FocusSearch),

        // Playback
        KeyCode::Enter => Some(Action::Activate),
        KeyCode::Char(' ') => Some(Action::TogglePause),
        KeyCode::Char('n') => Some(Action::PlayNext),
        KeyCode::Char('p') => Some(Action::PlayPrev),
        KeyCode::Char('R') => Some(Action::ToggleRepeatMode),
        KeyCode::Char('S') => Some(Action::ToggleShuffle),
        KeyCode::Char('=') | KeyCode::Char('+') => Some(Action::VolumeUp),
        KeyCode::Char('-') | KeyCode::Char('_') => Some(Action::VolumeDown),
        KeyCode::Char('m') => Some(Action::ToggleMute),
        KeyCode::Char(']') => Some(Action::SeekForward),
        KeyCode::Char('[') => Some(Action::SeekBack),

        // Catalog mutation
        KeyCode::Char('f') => Some(Action::ToggleLikeSelected),
        KeyCode::Char('F') => Some(Action::ToggleLikeCurrent),
        KeyCode::Char('d') | KeyCode::Delete => Some(Action::RemoveSelected),
        KeyCode::Char('D') => Some(Action::DeleteSelected),
        KeyCode::Char('u') => Some(Action::OpenUpload),

        // Session
        KeyCode::Char('a') => Some(Action::OpenLogin),
        KeyCode::Char('A') => Some(Action::OpenRegister),
        KeyCode::Char('x') => Some(Action::Logout),

        KeyCode::Char('r') | KeyCode::F(5) => Some(Action::Refresh),
        KeyCode::Char('?') | KeyCode::F(1) => Some(Action::ToggleHelp),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn prompt_captures_plain_letters() {
        let mut state = AppState::new();
        state.prompt = Some(crate::app::state::Prompt::login());
        assert!(matches!(
            map_input_to_action(&state, key(KeyCode::Char('q'))),
            Some(Action::InputChar('q'))
        ));
        assert!(matches!(
            map_input_to_action(&state, key(KeyCode::Esc)),
            Some(Action::LeaveInput)
        ));
    }

    #[test]
    fn search_input_captures_text_until_left() {
        let mut state = AppState::new();
        state.view_mode = ViewMode::Search;
        assert!(matches!(
            map_input_to_action(&state, key(KeyCode::Char('j'))),
            Some(Action::InputChar('j'))
        ));
        assert!(matches!(
            map_input_to_action(&state, key(KeyCode::Enter)),
            Some(Action::SubmitInput)
        ));
    }

    #[test]
    fn delete_confirmation_swallows_unrelated_keys() {
        let mut state = AppState::new();
        state.pending_delete = Some(("id".into(), "Song".into()));
        assert!(map_input_to_action(&state, key(KeyCode::Char('j'))).is_none());
        assert!(matches!(
            map_input_to_action(&state, key(KeyCode::Char('y'))),
            Some(Action::ConfirmDelete)
        ));
    }

    #[test]
    fn normal_mode_maps_playback_keys() {
        let state = AppState::new();
        assert!(matches!(
            map_input_to_action(&state, key(KeyCode::Char(' '))),
            Some(Action::TogglePause)
        ));
        assert!(matches!(
            map_input_to_action(&state, key(KeyCode::Char('n'))),
            Some(Action::PlayNext)
        ));
    }
}
