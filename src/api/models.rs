use serde::{Deserialize, Serialize};

/// A song record as the Harmony server returns it. Field names follow the
/// server's JSON (camelCase).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Song {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub file_path: String,
    pub cover_path: String,
    /// Bundled sample or user upload (serving from the server's own disk).
    pub is_local: bool,
    /// Uploaded by some user (owner in `user_id`).
    pub is_uploaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jamendo_id: Option<String>,
    pub duration: Option<u32>,
    /// Derived per session by the server; the catalog keeps it in sync with
    /// the liked-id set after every local mutation.
    pub is_liked: bool,
    pub can_delete: bool,
}

impl Default for Song {
    fn default() -> Self {
        Self {
            id: String::new(),
            user_id: None,
            title: String::new(),
            artist: String::new(),
            album: String::new(),
            file_path: String::new(),
            cover_path: String::new(),
            is_local: false,
            is_uploaded: false,
            jamendo_id: None,
            duration: None,
            is_liked: false,
            can_delete: false,
        }
    }
}

impl Song {
    /// The source to hand the media element, if the track carries one at all.
    /// Remote tracks occasionally arrive without an audio URL; those render
    /// but cannot play.
    pub fn playable_source(&self) -> Option<&str> {
        if self.file_path.is_empty() {
            None
        } else {
            Some(&self.file_path)
        }
    }

    /// Album text for list display, falling back to the origin of the track.
    pub fn album_or_origin(&self) -> &str {
        if !self.album.is_empty() {
            &self.album
        } else if self.is_uploaded {
            "My Uploads"
        } else if self.is_local {
            "Samples"
        } else {
            "Jamendo"
        }
    }
}

/// Body of `POST /api/songs/like`. The server needs the full metadata so a
/// freshly-searched remote track can be inserted into its songs table before
/// the like lands.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    pub song_id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub file_path: String,
    pub cover_path: String,
    pub duration: u32,
    pub is_local: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jamendo_id: Option<String>,
}

impl LikeRequest {
    pub fn for_song(song: &Song) -> Self {
        let jamendo_id = song.jamendo_id.clone().or_else(|| {
            song.id
                .strip_prefix("jamendo-")
                .map(|rest| rest.to_string())
        });
        Self {
            song_id: song.id.clone(),
            title: song.title.clone(),
            artist: song.artist.clone(),
            album: song.album.clone(),
            file_path: song.file_path.clone(),
            cover_path: song.cover_path.clone(),
            duration: song.duration.unwrap_or(0),
            is_local: song.is_local,
            jamendo_id,
        }
    }
}

/// The identified session, as `GET /auth/me` reports it.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub user_id: i64,
    pub username: String,
}
