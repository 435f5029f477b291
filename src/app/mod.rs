pub mod actions;
pub mod events;
pub mod state;

use crate::api::client::HarmonyClient;
use crate::api::models::{LikeRequest, Song};
use crate::config::Config;
use crate::input;
use crate::player::audio::MpvPlayer;
use crate::player::coordinator::{Direction, MediaCommand, Toggle};
use crate::storage::Storage;
use crate::tui::{self, TuiTerminal};
use crate::view::{self, ViewMode};
use actions::Action;
use anyhow::Context;
use events::{Event, NetworkEvent, PlayerEvent};
use state::{AppState, Prompt, SearchFocus, Toast};
use tokio::sync::mpsc;

const SEARCH_CACHE_MAX_AGE_SECS: i64 = 600;

pub struct App {
    cfg: Config,
    config_path: std::path::PathBuf,
    state: AppState,
    client: HarmonyClient,
    storage: StorageHandle,
    mpv: Option<MpvPlayer>,
}

impl App {
    pub fn new(cfg: Config, config_path: std::path::PathBuf) -> anyhow::Result<Self> {
        let storage = StorageHandle::new(cfg.paths.data_dir.join("client.sqlite3"));
        let session = match storage.load_session() {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("session restore failed: {e:#}");
                None
            }
        };

        let client = HarmonyClient::new(
            &cfg.server.base_url,
            session.as_ref().map(|(token, _)| token.as_str()),
        )?;

        let mut state = AppState::new();
        state.volume = cfg.player.volume.min(100);
        if let Some(view_name) = &cfg.ui.last_view {
            state.view_mode = match view_name.as_str() {
                "search" => ViewMode::Search,
                "liked" => ViewMode::Liked,
                _ => ViewMode::Queue,
            };
        }

        Ok(Self {
            cfg,
            config_path,
            state,
            client,
            storage,
            mpv: None,
        })
    }

    pub async fn run(&mut self, terminal: &mut TuiTerminal) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<Event>(256);

        input::spawn_input_task(tx.clone());

        // The media element is best-effort: the catalog stays browsable even
        // when mpv is missing.
        let mpv_log = self.cfg.paths.data_dir.join("mpv.log");
        match MpvPlayer::spawn(tx.clone(), Some(&mpv_log)).await {
            Ok(p) => {
                let _ = p.set_volume(self.state.volume).await;
                self.mpv = Some(p);
            }
            Err(e) => {
                tracing::error!("mpv unavailable: {e:#}");
                self.state.toast = Some(Toast::error(format!("playback disabled: {e:#}")));
            }
        }

        tui::draw(terminal, &mut self.state)?;

        self.spawn_auth_check(&tx);
        self.spawn_fetch_songs(&tx);

        while let Some(ev) = rx.recv().await {
            self.state.tick = self.state.tick.wrapping_add(1);
            match ev {
                Event::Input(input_ev) => {
                    if let Some(action) = input::map_input_to_action(&self.state, input_ev) {
                        self.handle_action(action, &tx).await;
                    }
                }
                Event::Player(pe) => self.handle_player(pe).await,
                Event::Network(ne) => self.handle_network(ne, &tx).await,
            }

            if self.state.should_quit {
                break;
            }

            tui::draw(terminal, &mut self.state)?;
        }

        self.save_state_on_quit();
        Ok(())
    }

    fn save_state_on_quit(&mut self) {
        self.cfg.player.volume = self.state.volume;
        self.cfg.ui.last_view = Some(
            match self.state.view_mode {
                ViewMode::Queue => "queue",
                ViewMode::Search => "search",
                ViewMode::Liked => "liked",
            }
            .to_string(),
        );
        if let Err(e) = crate::config::save(&self.cfg, Some(&self.config_path)) {
            tracing::error!("save config: {e:#}");
        }
    }

    async fn handle_action(&mut self, action: Action, tx: &mpsc::Sender<Event>) {
        match action {
            Action::SetView(mode) => self.set_view(mode, None).await,
            Action::NavUp => {
                let mode = ViewMode::from_nav_index(self.state.view_mode.nav_index().saturating_sub(1));
                self.set_view(mode, None).await;
            }
            Action::NavDown => {
                let mode = ViewMode::from_nav_index((self.state.view_mode.nav_index() + 1).min(2));
                self.set_view(mode, None).await;
            }
            Action::FocusSearch => {
                self.set_view(ViewMode::Search, None).await;
                self.state.search_focus = SearchFocus::Input;
            }

            Action::Activate => {
                let index = self.state.selected;
                let cmds = self.state.player.load_track(&self.state.displayed, index, true);
                self.apply_commands(cmds).await;
                if let Some(song) = self.state.current_song() {
                    self.state.status = format!("Playing: {}", song.title);
                }
            }
            Action::TogglePause => self.toggle_play_pause().await,
            Action::PlayNext => {
                let cmds = self.state.player.advance(Direction::Next, &self.state.displayed);
                self.apply_commands(cmds).await;
            }
            Action::PlayPrev => {
                let cmds = self
                    .state
                    .player
                    .advance(Direction::Previous, &self.state.displayed);
                self.apply_commands(cmds).await;
            }
            Action::ToggleRepeatMode => {
                self.state.player.repeat = self.state.player.repeat.next();
                self.state.status = self.state.player.repeat.label().into();
            }
            Action::ToggleShuffle => {
                self.state.player.shuffle = !self.state.player.shuffle;
                self.state.status = if self.state.player.shuffle {
                    "Shuffle: On".into()
                } else {
                    "Shuffle: Off".into()
                };
            }
            Action::VolumeUp => self.change_volume(5).await,
            Action::VolumeDown => self.change_volume(-5).await,
            Action::ToggleMute => {
                self.state.muted = !self.state.muted;
                if let Some(mpv) = &self.mpv {
                    let _ = mpv.set_mute(self.state.muted).await;
                }
            }
            Action::SeekForward => {
                if let Some(mpv) = &self.mpv
                    && self.state.player.loaded_source().is_some()
                {
                    let _ = mpv.seek_relative(10.0).await;
                }
            }
            Action::SeekBack => {
                if let Some(mpv) = &self.mpv
                    && self.state.player.loaded_source().is_some()
                {
                    let _ = mpv.seek_relative(-10.0).await;
                }
            }

            Action::ToggleLikeSelected => {
                let song = self.state.selected_song().cloned();
                self.toggle_like(song, tx);
            }
            Action::ToggleLikeCurrent => {
                let song = self.state.current_song().cloned();
                self.toggle_like(song, tx);
            }
            Action::RemoveSelected => {
                let song = self.state.selected_song().cloned();
                match song {
                    Some(song) if self.state.catalog.get(&song.id).is_some() => {
                        self.remove_local(&song.id).await;
                        self.state.status = format!("Removed: {}", song.title);
                    }
                    Some(_) => {
                        self.state.toast = Some(Toast::error("Track is not in the queue"));
                    }
                    None => {}
                }
            }
            Action::DeleteSelected => {
                let Some(song) = self.state.selected_song().cloned() else {
                    return;
                };
                if self.state.user.is_none() {
                    self.state.toast = Some(Toast::error("Sign in to delete uploads"));
                    self.state.prompt = Some(Prompt::login());
                    return;
                }
                if !song.can_delete {
                    self.state.toast = Some(Toast::error("You can only delete your own uploads"));
                    return;
                }
                self.state.pending_delete = Some((song.id.clone(), song.title.clone()));
            }
            Action::ConfirmDelete => {
                if let Some((id, _)) = self.state.pending_delete.take() {
                    self.spawn_delete(id, tx);
                }
            }
            Action::CancelDelete => {
                self.state.pending_delete = None;
            }

            Action::SubmitInput => self.submit_input(tx).await,
            Action::LeaveInput => {
                if self.state.prompt.is_some() {
                    self.state.prompt = None;
                } else {
                    self.state.search_focus = SearchFocus::Results;
                }
            }

            Action::OpenLogin => {
                self.state.prompt = Some(Prompt::login());
            }
            Action::OpenRegister => {
                self.state.prompt = Some(Prompt::register());
            }
            Action::OpenUpload => {
                if self.state.user.is_none() {
                    self.state.toast = Some(Toast::error("Sign in to upload songs"));
                    self.state.prompt = Some(Prompt::login());
                } else {
                    self.state.prompt = Some(Prompt::upload());
                }
            }
            Action::Logout => {
                if self.state.user.is_none() {
                    self.state.toast = Some(Toast::error("Not signed in"));
                } else {
                    self.spawn_logout(tx);
                }
            }

            Action::Refresh => {
                self.spawn_fetch_songs(tx);
                if self.state.view_mode == ViewMode::Search
                    && let Some(query) = self.state.last_search.clone()
                {
                    self.spawn_search(query, tx);
                }
            }

            other => self.reduce(other),
        }
    }

    /// Pure state transitions with no async side effects.
    fn reduce(&mut self, action: Action) {
        match action {
            Action::Quit => self.state.should_quit = true,
            Action::ListUp => self.state.select_prev(),
            Action::ListDown => self.state.select_next(),
            Action::GoTop => {
                self.state.selected = 0;
                self.state.scroll_offset = 0;
            }
            Action::GoBottom => {
                self.state.selected = self.state.displayed.len().saturating_sub(1);
            }
            Action::PageUp => {
                self.state.selected = self.state.selected.saturating_sub(10);
            }
            Action::PageDown => {
                self.state.selected =
                    (self.state.selected + 10).min(self.state.displayed.len().saturating_sub(1));
            }
            Action::ToggleHelp => self.state.show_help = !self.state.show_help,
            Action::InputChar(c) => {
                if let Some(prompt) = &mut self.state.prompt {
                    prompt.active_field_mut().push(c);
                } else {
                    self.state.search_query.push(c);
                }
            }
            Action::Backspace => {
                if let Some(prompt) = &mut self.state.prompt {
                    prompt.active_field_mut().pop();
                } else {
                    self.state.search_query.pop();
                }
            }
            Action::ClearInput => {
                if let Some(prompt) = &mut self.state.prompt {
                    prompt.active_field_mut().clear();
                } else {
                    self.state.search_query.clear();
                }
            }
            Action::PromptFieldNext => {
                if let Some(prompt) = &mut self.state.prompt {
                    prompt.next_field();
                }
            }
            Action::Resize => {}
            _ => {}
        }
    }

    /// Switch the displayed view. The selector resolves the active index
    /// (requested, else whatever is loaded, else 0); the coordinator adopts
    /// it without touching an in-flight source.
    async fn set_view(&mut self, mode: ViewMode, requested: Option<usize>) {
        if mode == ViewMode::Search && self.state.view_mode != ViewMode::Search {
            self.state.search_focus = SearchFocus::Input;
        }
        let v = view::select_view(
            mode,
            requested,
            &self.state.catalog,
            &self.state.search_results,
            self.state.player.loaded_source(),
        );
        self.state.view_mode = v.mode;
        self.state.displayed = v.displayed;
        let cmds = self.state.player.sync_view(&self.state.displayed, v.active);
        self.apply_commands(cmds).await;
        self.state.selected = v.active.unwrap_or(0);
        self.state.clamp_selection();
    }

    /// Recompute the displayed sequence for the current mode after a catalog
    /// or search-result change.
    async fn refresh_view(&mut self) {
        self.set_view(self.state.view_mode, None).await;
    }

    async fn toggle_play_pause(&mut self) {
        let catalog_empty = self.state.catalog.is_empty();
        match self
            .state
            .player
            .toggle_play_pause(&self.state.displayed, catalog_empty)
        {
            Toggle::Commands(cmds) => self.apply_commands(cmds).await,
            Toggle::FallBackToQueue => {
                // Nothing active: fall back to the start of the queue.
                self.set_view(ViewMode::Queue, Some(0)).await;
                let cmds = self.state.player.load_track(&self.state.displayed, 0, true);
                self.apply_commands(cmds).await;
            }
            Toggle::NeedsContent => {
                self.state.toast = Some(if self.state.user.is_none() {
                    Toast::error("Nothing to play. Sign in (a) or upload songs (u).")
                } else {
                    Toast::error("Nothing to play. Upload songs (u) to get started.")
                });
            }
        }
    }

    async fn change_volume(&mut self, delta: i16) {
        let v = (self.state.volume as i16 + delta).clamp(0, 100) as u8;
        self.state.volume = v;
        if let Some(mpv) = &self.mpv {
            let _ = mpv.set_volume(v).await;
        }
    }

    /// Execute the coordinator's decisions against mpv. This is the only
    /// place that writes to the media element.
    async fn apply_commands(&mut self, cmds: Vec<MediaCommand>) {
        let Some(mpv) = &self.mpv else {
            if !cmds.is_empty() {
                self.state.status = "playback disabled (mpv not running)".into();
            }
            return;
        };
        for cmd in cmds {
            let res = match &cmd {
                MediaCommand::Pause => mpv.pause().await,
                MediaCommand::Load { url } => {
                    self.state.position_secs = 0.0;
                    self.state.duration_secs = 0.0;
                    // Hold playback until an explicit Play; loadfile would
                    // otherwise start on its own.
                    match mpv.pause().await {
                        Ok(()) => mpv.load(&self.absolute_source(url)).await,
                        Err(e) => Err(e),
                    }
                }
                MediaCommand::Play => mpv.play().await,
                MediaCommand::Detach => {
                    self.state.position_secs = 0.0;
                    self.state.duration_secs = 0.0;
                    mpv.detach().await
                }
            };
            if let Err(e) = res {
                tracing::error!("media command {cmd:?} failed: {e:#}");
                self.state.player.on_error();
                self.state.toast = Some(Toast::error(format!("playback error: {e:#}")));
                return;
            }
        }
    }

    /// Server-relative audio paths become absolute against the configured
    /// base URL; remote catalog tracks already carry full URLs.
    fn absolute_source(&self, source: &str) -> String {
        if source.starts_with('/') {
            format!(
                "{}{}",
                self.cfg.server.base_url.trim_end_matches('/'),
                source
            )
        } else {
            source.to_string()
        }
    }

    async fn submit_input(&mut self, tx: &mpsc::Sender<Event>) {
        if let Some(prompt) = self.state.prompt.clone() {
            self.submit_prompt(prompt, tx);
            return;
        }

        // Search bar. A blank query is not an empty-search state: it is
        // the queue view, from the top.
        let query = self.state.search_query.trim().to_string();
        if query.is_empty() {
            self.set_view(ViewMode::Queue, Some(0)).await;
            return;
        }
        self.spawn_search(query, tx);
    }

    fn submit_prompt(&mut self, prompt: Prompt, tx: &mpsc::Sender<Event>) {
        match prompt {
            Prompt::Login { username, password, .. } => {
                let (username, password) = (username.trim().to_string(), password);
                if username.is_empty() || password.is_empty() {
                    self.state.toast = Some(Toast::error("Enter a username and password"));
                    return;
                }
                self.state.prompt = None;
                self.state.status = "Signing in...".into();
                let client = self.client.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    match client.login(&username, &password).await {
                        Ok((username, token)) => {
                            let _ = tx
                                .send(Event::Network(NetworkEvent::LoggedIn { username, token }))
                                .await;
                        }
                        Err(e) => {
                            let _ = tx
                                .send(Event::Network(NetworkEvent::Error(format!(
                                    "sign in failed: {e:#}"
                                ))))
                                .await;
                        }
                    }
                });
            }
            Prompt::Register { username, password, .. } => {
                let (username, password) = (username.trim().to_string(), password);
                if username.is_empty() || password.is_empty() {
                    self.state.toast = Some(Toast::error("Enter a username and password"));
                    return;
                }
                self.state.prompt = None;
                self.state.status = "Registering...".into();
                let client = self.client.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    match client.register(&username, &password).await {
                        Ok(()) => {
                            let _ = tx
                                .send(Event::Network(NetworkEvent::Registered { username }))
                                .await;
                        }
                        Err(e) => {
                            let _ = tx
                                .send(Event::Network(NetworkEvent::Error(format!(
                                    "registration failed: {e:#}"
                                ))))
                                .await;
                        }
                    }
                });
            }
            Prompt::Upload { paths } => {
                let files = parse_upload_paths(&paths);
                if files.is_empty() {
                    self.state.toast = Some(Toast::error("Enter at least one file path"));
                    return;
                }
                self.state.prompt = None;
                self.state.status = format!("Uploading {} file(s)...", files.len());
                // One independent request per file; one failure never blocks
                // the others.
                for path in files {
                    let client = self.client.clone();
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        let file = path.display().to_string();
                        let outcome = match client.upload(&path).await {
                            Ok(song) => Ok(song.title),
                            Err(e) => Err(format!("{e:#}")),
                        };
                        let _ = tx
                            .send(Event::Network(NetworkEvent::UploadFinished { file, outcome }))
                            .await;
                    });
                }
            }
        }
    }

    fn spawn_auth_check(&self, tx: &mpsc::Sender<Event>) {
        let client = self.client.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            match client.me().await {
                Ok(user) => {
                    let _ = tx.send(Event::Network(NetworkEvent::AuthChecked { user })).await;
                }
                Err(e) => {
                    tracing::debug!("auth check failed: {e:#}");
                    let _ = tx
                        .send(Event::Network(NetworkEvent::AuthChecked { user: None }))
                        .await;
                }
            }
        });
    }

    /// Catalog fetch with a generation counter: a response that is not for
    /// the newest request is dropped, so a slow early fetch can never
    /// overwrite a later one.
    fn spawn_fetch_songs(&mut self, tx: &mpsc::Sender<Event>) {
        self.state.catalog_generation += 1;
        let generation = self.state.catalog_generation;
        self.state.songs_loading = true;

        let client = self.client.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            match client.songs().await {
                Ok(songs) => {
                    let _ = tx
                        .send(Event::Network(NetworkEvent::SongsLoaded { generation, songs }))
                        .await;
                }
                Err(e) => {
                    let _ = tx
                        .send(Event::Network(NetworkEvent::Error(format!(
                            "load songs: {e:#}"
                        ))))
                        .await;
                }
            }
        });
    }

    fn spawn_search(&mut self, query: String, tx: &mpsc::Sender<Event>) {
        self.state.search_loading = true;
        self.state.last_search = Some(query.clone());
        self.state.status = format!("Searching: {query}");

        let client = self.client.clone();
        let storage = self.storage.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let now = now_unix();

            // Fresh cached response first; the server only gets asked when
            // the cache misses or has gone stale.
            if let Ok(Ok(Some(json))) = tokio::task::spawn_blocking({
                let storage = storage.clone();
                let query = query.clone();
                move || storage.get_cached_search(&query, now, SEARCH_CACHE_MAX_AGE_SECS)
            })
            .await
                && let Ok(songs) = serde_json::from_str::<Vec<Song>>(&json)
            {
                let _ = tx
                    .send(Event::Network(NetworkEvent::SearchResults { query, songs }))
                    .await;
                return;
            }

            match client.search(&query).await {
                Ok(songs) => {
                    if let Ok(raw) = serde_json::to_string(&songs) {
                        let _ = tokio::task::spawn_blocking({
                            let storage = storage.clone();
                            let query = query.clone();
                            move || storage.cache_search(&query, &raw, now)
                        })
                        .await;
                    }
                    let _ = tx
                        .send(Event::Network(NetworkEvent::SearchResults { query, songs }))
                        .await;
                }
                Err(e) => {
                    let _ = tx
                        .send(Event::Network(NetworkEvent::Error(format!("search: {e:#}"))))
                        .await;
                }
            }
        });
    }

    /// Like/unlike with the auth short-circuit and a single-flight guard per
    /// song id; a second toggle while one is pending is dropped rather than
    /// raced against the first.
    fn toggle_like(&mut self, song: Option<Song>, tx: &mpsc::Sender<Event>) {
        let Some(song) = song else { return };
        if self.state.user.is_none() {
            self.state.toast = Some(Toast::error("Sign in to like songs"));
            self.state.prompt = Some(Prompt::login());
            return;
        }
        if !self.state.likes_in_flight.insert(song.id.clone()) {
            tracing::debug!("like toggle already in flight for {}", song.id);
            return;
        }

        let currently_liked = self.state.catalog.is_liked(&song.id);
        let client = self.client.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = if currently_liked {
                client.unlike(&song.id).await
            } else {
                client.like(&LikeRequest::for_song(&song)).await
            };
            match result {
                Ok(canonical_id) => {
                    let mut song = song;
                    song.id = canonical_id;
                    let _ = tx
                        .send(Event::Network(NetworkEvent::LikeToggled {
                            song: Box::new(song),
                            liked: !currently_liked,
                        }))
                        .await;
                }
                Err(e) => {
                    let _ = tx
                        .send(Event::Network(NetworkEvent::LikeFailed {
                            song_id: song.id,
                            message: format!("{e:#}"),
                        }))
                        .await;
                }
            }
        });
    }

    fn spawn_delete(&mut self, id: String, tx: &mpsc::Sender<Event>) {
        self.state.status = "Deleting...".into();
        let client = self.client.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            match client.delete(&id).await {
                Ok(()) => {
                    let _ = tx
                        .send(Event::Network(NetworkEvent::SongDeleted { song_id: id }))
                        .await;
                }
                Err(e) => {
                    let _ = tx
                        .send(Event::Network(NetworkEvent::Error(format!("delete: {e:#}"))))
                        .await;
                }
            }
        });
    }

    fn spawn_logout(&mut self, tx: &mpsc::Sender<Event>) {
        let client = self.client.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Err(e) = client.logout().await {
                // The server session may already be gone; drop ours anyway.
                tracing::debug!("logout request failed: {e:#}");
            }
            let _ = tx.send(Event::Network(NetworkEvent::LoggedOut)).await;
        });
    }

    /// Remove a track from the catalog and reconcile playback: the active
    /// track stopping, earlier removals shifting the index, an emptied view
    /// clearing everything.
    async fn remove_local(&mut self, id: &str) {
        let removed_at = match self.state.view_mode {
            ViewMode::Queue | ViewMode::Liked => {
                self.state.displayed.iter().position(|s| s.id == id)
            }
            // Search results are not the catalog; removing a track from the
            // catalog leaves the result list untouched.
            ViewMode::Search => None,
        };

        self.state.catalog.remove(id);

        match self.state.view_mode {
            ViewMode::Queue => {
                self.state.displayed = self.state.catalog.songs().to_vec();
            }
            ViewMode::Liked => {
                self.state.displayed = self.state.catalog.liked_songs();
            }
            ViewMode::Search => {}
        }

        if let Some(removed) = removed_at {
            let remaining = self.state.displayed.len();
            let cmds = self.state.player.handle_removal(removed, remaining);
            self.apply_commands(cmds).await;
        }
        self.state.clamp_selection();
    }

    async fn handle_player(&mut self, pe: PlayerEvent) {
        match pe {
            PlayerEvent::Started => {
                // mpv reports pause=false on startup with nothing loaded;
                // only trust it while a track is active.
                if self.state.player.position().is_some() {
                    self.state.player.on_started();
                }
            }
            PlayerEvent::Paused => self.state.player.on_paused(),
            PlayerEvent::Position { seconds } => self.state.position_secs = seconds.max(0.0),
            PlayerEvent::Duration { seconds } => {
                self.state.duration_secs = seconds.max(0.0);
                self.state.player.on_ready();
            }
            PlayerEvent::Ended => {
                self.state.position_secs = 0.0;
                let cmds = self.state.player.handle_ended(&self.state.displayed);
                self.apply_commands(cmds).await;
            }
            PlayerEvent::Error(e) => {
                tracing::warn!("player error: {e}");
                self.state.player.on_error();
                self.state.toast = Some(Toast::error(e));
            }
        }
    }

    async fn handle_network(&mut self, ne: NetworkEvent, tx: &mpsc::Sender<Event>) {
        match ne {
            NetworkEvent::Error(e) => {
                tracing::error!("{e}");
                self.state.songs_loading = false;
                self.state.search_loading = false;
                self.state.toast = Some(Toast::error(e.clone()));
                self.state.status = format!("Error: {e}");
            }
            NetworkEvent::AuthChecked { user } => {
                if let Some(u) = &user {
                    self.state.status = format!("Signed in as {}", u.username);
                }
                self.state.user = user;
            }
            NetworkEvent::LoggedIn { username, token } => {
                if let Err(e) = self.storage.save_session(&token, &username, now_unix()) {
                    tracing::error!("persist session: {e:#}");
                }
                match HarmonyClient::new(&self.cfg.server.base_url, Some(&token)) {
                    Ok(client) => self.client = client,
                    Err(e) => {
                        self.state.toast = Some(Toast::error(format!("session setup: {e:#}")));
                        return;
                    }
                }
                self.state.toast = Some(Toast::success(format!("Welcome back, {username}")));
                // Liked/owned flags are per session; refetch under the new one.
                self.spawn_auth_check(tx);
                self.spawn_fetch_songs(tx);
            }
            NetworkEvent::Registered { username } => {
                self.state.toast = Some(Toast::success("Registered. Sign in to continue."));
                self.state.prompt = Some(Prompt::Login {
                    username,
                    password: String::new(),
                    on_password: true,
                });
            }
            NetworkEvent::LoggedOut => {
                if let Err(e) = self.storage.clear_session() {
                    tracing::error!("clear session: {e:#}");
                }
                match HarmonyClient::new(&self.cfg.server.base_url, None) {
                    Ok(client) => self.client = client,
                    Err(e) => {
                        self.state.toast = Some(Toast::error(format!("session teardown: {e:#}")));
                        return;
                    }
                }
                self.state.user = None;
                self.state.toast = Some(Toast::success("Signed out"));
                self.spawn_fetch_songs(tx);
            }
            NetworkEvent::SongsLoaded { generation, songs } => {
                if generation != self.state.catalog_generation {
                    tracing::debug!("dropping stale catalog response (gen {generation})");
                    return;
                }
                self.state.songs_loading = false;
                self.state.catalog.replace_all(songs);
                self.refresh_view().await;
                self.state.status = format!("{} tracks", self.state.catalog.len());
            }
            NetworkEvent::SearchResults { query, songs } => {
                if self.state.last_search.as_deref() != Some(query.as_str()) {
                    tracing::debug!("dropping stale search response for {query:?}");
                    return;
                }
                self.state.search_loading = false;
                // Results carry server-side liked flags, but this session's
                // catalog is authoritative for tracks it already knows.
                let catalog = &self.state.catalog;
                let results: Vec<Song> = songs
                    .into_iter()
                    .map(|mut s| {
                        s.is_liked = catalog.is_liked(&s.id) || s.is_liked;
                        s
                    })
                    .collect();
                self.state.search_results = results;
                self.state.status = format!("{} results", self.state.search_results.len());
                if self.state.view_mode == ViewMode::Search {
                    self.refresh_view().await;
                    if !self.state.displayed.is_empty() {
                        self.state.search_focus = SearchFocus::Results;
                    }
                }
            }
            NetworkEvent::LikeToggled { song, liked } => {
                self.state.likes_in_flight.remove(&song.id);
                let title = song.title.clone();
                let id = song.id.clone();
                self.state.catalog.confirm_like(*song, liked);
                for s in &mut self.state.search_results {
                    if s.id == id {
                        s.is_liked = liked;
                    }
                }
                // The liked view sheds unliked tracks live; the other views
                // pick up the flag change on the same refresh.
                self.refresh_view().await;
                self.state.status = if liked {
                    format!("Liked: {title}")
                } else {
                    format!("Unliked: {title}")
                };
            }
            NetworkEvent::LikeFailed { song_id, message } => {
                self.state.likes_in_flight.remove(&song_id);
                self.state.toast = Some(Toast::error(message));
            }
            NetworkEvent::UploadFinished { file, outcome } => match outcome {
                Ok(title) => {
                    self.state.toast = Some(Toast::success(format!("Uploaded: {title}")));
                    // The server owns ids and metadata; refetch rather than
                    // patching the catalog locally.
                    self.spawn_fetch_songs(tx);
                }
                Err(e) => {
                    self.state.toast = Some(Toast::error(format!("{file}: {e}")));
                }
            },
            NetworkEvent::SongDeleted { song_id } => {
                self.remove_local(&song_id).await;
                self.state.toast = Some(Toast::success("Deleted"));
                self.spawn_fetch_songs(tx);
            }
        }
    }
}

fn now_unix() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

fn parse_upload_paths(input: &str) -> Vec<std::path::PathBuf> {
    input
        .split_whitespace()
        .map(std::path::PathBuf::from)
        .collect()
}

// rusqlite connections are not Sync; open per operation from blocking tasks.
#[derive(Clone)]
struct StorageHandle {
    path: std::path::PathBuf,
}

impl StorageHandle {
    fn new(path: std::path::PathBuf) -> Self {
        Self { path }
    }

    fn open(&self) -> anyhow::Result<Storage> {
        Storage::open(&self.path).context("open client storage")
    }

    fn load_session(&self) -> anyhow::Result<Option<(String, String)>> {
        self.open()?.load_session()
    }

    fn save_session(&self, token: &str, username: &str, now_unix: i64) -> anyhow::Result<()> {
        self.open()?.save_session(token, username, now_unix)
    }

    fn clear_session(&self) -> anyhow::Result<()> {
        self.open()?.clear_session()
    }

    fn get_cached_search(
        &self,
        query: &str,
        now_unix: i64,
        max_age_secs: i64,
    ) -> anyhow::Result<Option<String>> {
        self.open()?.get_cached_search(query, now_unix, max_age_secs)
    }

    fn cache_search(&self, query: &str, results_json: &str, now_unix: i64) -> anyhow::Result<()> {
        self.open()?.cache_search(query, results_json, now_unix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app(name: &str) -> App {
        let dir = std::env::temp_dir().join(format!("harmony-app-{}-{name}", std::process::id()));
        let mut cfg = Config::default();
        cfg.paths.data_dir = dir.clone();
        App::new(cfg, dir.join("config.toml")).unwrap()
    }

    fn song(id: &str) -> Song {
        Song {
            id: id.to_string(),
            title: id.to_string(),
            file_path: format!("/audio/{id}.mp3"),
            ..Song::default()
        }
    }

    #[test]
    fn upload_paths_split_on_whitespace() {
        let paths = parse_upload_paths("  /a/one.mp3   /b/two.ogg\n");
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0], std::path::PathBuf::from("/a/one.mp3"));
    }

    #[test]
    fn blank_upload_input_yields_nothing() {
        assert!(parse_upload_paths("   ").is_empty());
    }

    #[tokio::test]
    async fn blank_search_submission_is_the_queue_view_from_the_top() {
        let mut app = test_app("blank-search");
        app.state.catalog.replace_all(vec![song("a"), song("b")]);
        app.set_view(ViewMode::Search, None).await;

        let (tx, _rx) = mpsc::channel(8);
        app.state.search_query = "   ".into();
        app.submit_input(&tx).await;

        assert_eq!(app.state.view_mode, ViewMode::Queue);
        assert_eq!(app.state.selected, 0);
        assert_eq!(app.state.player.position(), Some(0));
    }

    #[test]
    fn unauthenticated_like_opens_login_without_a_request() {
        let mut app = test_app("unauth-like");
        let (tx, _rx) = mpsc::channel(8);
        app.toggle_like(Some(song("a")), &tx);

        assert!(app.state.likes_in_flight.is_empty());
        assert!(matches!(app.state.prompt, Some(Prompt::Login { .. })));
    }
}
