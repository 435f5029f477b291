use crate::api::models::Song;
use std::collections::HashSet;

/// The in-memory reflection of the server's song list for this session:
/// an ordered list unique by id, plus the derived liked-id set.
///
/// Invariant: `song.is_liked` always equals `liked.contains(&song.id)`.
/// Every public mutation updates both sides in the same call, so no caller
/// can observe them disagreeing.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    songs: Vec<Song>,
    liked: HashSet<String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the catalog wholesale with a fresh server response. The liked
    /// set is rebuilt from the per-song flags the server derived.
    pub fn replace_all(&mut self, songs: Vec<Song>) {
        self.songs = songs;
        self.liked = self
            .songs
            .iter()
            .filter(|s| s.is_liked)
            .map(|s| s.id.clone())
            .collect();
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Song> {
        self.songs.iter().find(|s| s.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.songs.iter().position(|s| s.id == id)
    }

    pub fn is_liked(&self, id: &str) -> bool {
        self.liked.contains(id)
    }

    /// Songs in the liked set, catalog order preserved.
    pub fn liked_songs(&self) -> Vec<Song> {
        self.songs
            .iter()
            .filter(|s| self.liked.contains(&s.id))
            .cloned()
            .collect()
    }

    /// Append if the id is not present yet. The inserted copy takes its liked
    /// flag from the set, never from whatever the caller held.
    pub fn insert_if_absent(&mut self, mut song: Song) {
        if self.get(&song.id).is_none() {
            song.is_liked = self.liked.contains(&song.id);
            self.songs.push(song);
        }
    }

    /// Apply a server-confirmed like/unlike. Liking a track the catalog has
    /// never seen (a fresh remote search result) inserts it first; the flip
    /// only happens once membership is possible, so liked-but-absent is never
    /// observable. Unliking keeps the track in the catalog.
    pub fn confirm_like(&mut self, song: Song, liked: bool) {
        let id = song.id.clone();
        if liked {
            self.insert_if_absent(song);
            self.liked.insert(id.clone());
        } else {
            self.liked.remove(&id);
        }
        if let Some(s) = self.songs.iter_mut().find(|s| s.id == id) {
            s.is_liked = liked;
        }
    }

    /// Filter out a track by id. Returns the removed song so callers can
    /// reconcile playback against it.
    pub fn remove(&mut self, id: &str) -> Option<Song> {
        let idx = self.position(id)?;
        let song = self.songs.remove(idx);
        self.liked.remove(id);
        Some(song)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(id: &str) -> Song {
        Song {
            id: id.to_string(),
            title: format!("Track {id}"),
            artist: "Artist".into(),
            file_path: format!("/audio/{id}.mp3"),
            ..Song::default()
        }
    }

    fn liked_song(id: &str) -> Song {
        Song {
            is_liked: true,
            ..song(id)
        }
    }

    fn flags_agree(c: &Catalog) -> bool {
        c.songs().iter().all(|s| s.is_liked == c.is_liked(&s.id))
    }

    #[test]
    fn replace_all_rebuilds_liked_set() {
        let mut c = Catalog::new();
        c.replace_all(vec![song("a"), liked_song("b"), song("c")]);
        assert!(!c.is_liked("a"));
        assert!(c.is_liked("b"));
        assert_eq!(c.liked_songs().len(), 1);
        assert!(flags_agree(&c));
    }

    #[test]
    fn confirm_like_inserts_unknown_track_before_flip() {
        let mut c = Catalog::new();
        c.replace_all(vec![song("a")]);

        c.confirm_like(song("jamendo-9"), true);
        assert_eq!(c.len(), 2);
        assert!(c.is_liked("jamendo-9"));
        assert!(c.get("jamendo-9").unwrap().is_liked);
        assert!(flags_agree(&c));
    }

    #[test]
    fn unlike_keeps_track_in_catalog() {
        let mut c = Catalog::new();
        c.replace_all(vec![liked_song("a"), song("b")]);

        c.confirm_like(song("a"), false);
        assert_eq!(c.len(), 2);
        assert!(!c.is_liked("a"));
        assert!(!c.get("a").unwrap().is_liked);
        assert!(flags_agree(&c));
    }

    #[test]
    fn flags_agree_across_arbitrary_toggle_sequences() {
        let mut c = Catalog::new();
        c.replace_all(vec![song("a"), song("b")]);
        for (id, liked) in [
            ("a", true),
            ("b", true),
            ("a", false),
            ("jamendo-1", true),
            ("b", false),
            ("jamendo-1", false),
            ("a", true),
        ] {
            c.confirm_like(song(id), liked);
            assert!(flags_agree(&c), "after toggling {id} -> {liked}");
        }
    }

    #[test]
    fn liked_songs_preserve_catalog_order() {
        let mut c = Catalog::new();
        c.replace_all(vec![liked_song("c"), song("a"), liked_song("b")]);
        let liked: Vec<_> = c.liked_songs().into_iter().map(|s| s.id).collect();
        assert_eq!(liked, vec!["c", "b"]);
    }

    #[test]
    fn remove_drops_liked_membership() {
        let mut c = Catalog::new();
        c.replace_all(vec![liked_song("a"), song("b")]);
        let removed = c.remove("a").unwrap();
        assert_eq!(removed.id, "a");
        assert!(!c.is_liked("a"));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn insert_if_absent_is_idempotent() {
        let mut c = Catalog::new();
        c.replace_all(vec![song("a")]);
        c.insert_if_absent(song("a"));
        c.insert_if_absent(song("b"));
        c.insert_if_absent(song("b"));
        assert_eq!(c.len(), 2);
    }
}
