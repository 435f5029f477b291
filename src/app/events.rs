use crate::api::models::{AuthUser, Song};

#[derive(Debug, Clone)]
pub enum Event {
    Input(InputEvent),
    Player(PlayerEvent),
    Network(NetworkEvent),
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Key(crossterm::event::KeyEvent),
    Mouse(crossterm::event::MouseEvent),
    Resize,
}

/// Feedback from the media element. Play requests resolve through these,
/// never synchronously.
#[derive(Debug, Clone)]
pub enum PlayerEvent {
    Started,
    Paused,
    Position { seconds: f64 },
    Duration { seconds: f64 },
    Ended,
    Error(String),
}

#[derive(Debug, Clone)]
pub enum NetworkEvent {
    Error(String),
    AuthChecked {
        user: Option<AuthUser>,
    },
    LoggedIn {
        username: String,
        token: String,
    },
    Registered {
        username: String,
    },
    LoggedOut,
    /// Stale generations are dropped; see the fetch spawn.
    SongsLoaded {
        generation: u64,
        songs: Vec<Song>,
    },
    SearchResults {
        query: String,
        songs: Vec<Song>,
    },
    /// Server confirmed a like flip; carries the full song so a track the
    /// catalog has never seen can be inserted.
    LikeToggled {
        song: Box<Song>,
        liked: bool,
    },
    /// A like/unlike request failed; releases the per-song in-flight guard.
    LikeFailed {
        song_id: String,
        message: String,
    },
    UploadFinished {
        file: String,
        outcome: Result<String, String>,
    },
    SongDeleted {
        song_id: String,
    },
}
