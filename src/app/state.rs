use crate::api::models::{AuthUser, Song};
use crate::library::Catalog;
use crate::player::coordinator::Coordinator;
use crate::view::ViewMode;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchFocus {
    #[default]
    Input,
    Results,
}

/// Modal text entry: the auth forms and the upload path prompt from the web
/// page's modals, reduced to line editors.
#[derive(Debug, Clone)]
pub enum Prompt {
    Login {
        username: String,
        password: String,
        on_password: bool,
    },
    Register {
        username: String,
        password: String,
        on_password: bool,
    },
    Upload {
        paths: String,
    },
}

impl Prompt {
    pub fn login() -> Self {
        Prompt::Login {
            username: String::new(),
            password: String::new(),
            on_password: false,
        }
    }

    pub fn register() -> Self {
        Prompt::Register {
            username: String::new(),
            password: String::new(),
            on_password: false,
        }
    }

    pub fn upload() -> Self {
        Prompt::Upload {
            paths: String::new(),
        }
    }

    pub fn active_field_mut(&mut self) -> &mut String {
        match self {
            Prompt::Login {
                username,
                password,
                on_password,
            }
            | Prompt::Register {
                username,
                password,
                on_password,
            } => {
                if *on_password {
                    password
                } else {
                    username
                }
            }
            Prompt::Upload { paths } => paths,
        }
    }

    pub fn next_field(&mut self) {
        if let Prompt::Login { on_password, .. } | Prompt::Register { on_password, .. } = self {
            *on_password = !*on_password;
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub created_at: std::time::Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Success,
            created_at: std::time::Instant::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Error,
            created_at: std::time::Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > std::time::Duration::from_secs(4)
    }
}

pub struct AppState {
    pub should_quit: bool,
    pub tick: u64,

    // Session
    pub user: Option<AuthUser>,

    // Catalog + view
    pub catalog: Catalog,
    pub view_mode: ViewMode,
    pub displayed: Vec<Song>,
    /// List cursor, independent of the playback position.
    pub selected: usize,
    pub scroll_offset: usize,

    // Search (results live outside the catalog until liked)
    pub search_query: String,
    pub search_focus: SearchFocus,
    pub last_search: Option<String>,
    pub search_results: Vec<Song>,
    pub search_loading: bool,

    // Network bookkeeping
    pub songs_loading: bool,
    pub catalog_generation: u64,
    pub likes_in_flight: HashSet<String>,

    // Playback (the coordinator owns position/binding/play state)
    pub player: Coordinator,
    pub position_secs: f64,
    pub duration_secs: f64,
    pub volume: u8,
    pub muted: bool,

    // Overlays
    pub prompt: Option<Prompt>,
    /// (id, title) awaiting an irreversible-delete confirmation.
    pub pending_delete: Option<(String, String)>,
    pub show_help: bool,

    pub toast: Option<Toast>,
    pub status: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            should_quit: false,
            tick: 0,
            user: None,
            catalog: Catalog::new(),
            view_mode: ViewMode::Queue,
            displayed: Vec::new(),
            selected: 0,
            scroll_offset: 0,
            search_query: String::new(),
            search_focus: SearchFocus::Input,
            last_search: None,
            search_results: Vec::new(),
            search_loading: false,
            songs_loading: false,
            catalog_generation: 0,
            likes_in_flight: HashSet::new(),
            player: Coordinator::new(),
            position_secs: 0.0,
            duration_secs: 0.0,
            volume: 80,
            muted: false,
            prompt: None,
            pending_delete: None,
            show_help: false,
            toast: None,
            status: String::new(),
        }
    }

    /// The track at the playback position of the displayed sequence.
    pub fn current_song(&self) -> Option<&Song> {
        self.player.position().and_then(|i| self.displayed.get(i))
    }

    pub fn selected_song(&self) -> Option<&Song> {
        self.displayed.get(self.selected)
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        if !self.displayed.is_empty() {
            self.selected = (self.selected + 1).min(self.displayed.len() - 1);
        }
    }

    pub fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.displayed.len().saturating_sub(1));
    }

    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected - visible_height + 1;
        }
    }
}
