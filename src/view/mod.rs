use crate::api::models::Song;
use crate::library::Catalog;

/// Which subset of the catalog the main list shows. `Queue` is the full
/// catalog, `Liked` the liked filter, `Search` a result set held
/// independently of the catalog (results only join the catalog once liked).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Queue,
    Search,
    Liked,
}

impl ViewMode {
    pub fn title(self) -> &'static str {
        match self {
            ViewMode::Queue => "Queue",
            ViewMode::Search => "Search",
            ViewMode::Liked => "Liked Songs",
        }
    }

    /// Position of this mode's entry in the sidebar. Exactly one entry is
    /// highlighted at a time; the mapping is what keeps that mutual.
    pub fn nav_index(self) -> usize {
        match self {
            ViewMode::Queue => 0,
            ViewMode::Search => 1,
            ViewMode::Liked => 2,
        }
    }

    pub fn from_nav_index(idx: usize) -> Self {
        match idx {
            0 => ViewMode::Queue,
            1 => ViewMode::Search,
            _ => ViewMode::Liked,
        }
    }
}

/// The displayed sequence and the active index within it.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub mode: ViewMode,
    pub displayed: Vec<Song>,
    pub active: Option<usize>,
}

/// Compute the view for `mode`. `requested` pins an index when the user
/// explicitly picked a track; `loaded_source` is whatever the media element
/// currently has loaded, used to keep "what's playing" selected across a
/// view switch.
pub fn select_view(
    mode: ViewMode,
    requested: Option<usize>,
    catalog: &Catalog,
    search_results: &[Song],
    loaded_source: Option<&str>,
) -> ViewState {
    let displayed: Vec<Song> = match mode {
        ViewMode::Queue => catalog.songs().to_vec(),
        ViewMode::Liked => catalog.liked_songs(),
        ViewMode::Search => search_results.to_vec(),
    };
    let active = resolve_active(&displayed, requested, loaded_source);
    ViewState {
        mode,
        displayed,
        active,
    }
}

/// Active-index resolution, in order: a valid requested index wins; else the
/// track matching the loaded source; else 0 for a non-empty sequence; else
/// none.
pub fn resolve_active(
    displayed: &[Song],
    requested: Option<usize>,
    loaded_source: Option<&str>,
) -> Option<usize> {
    if let Some(idx) = requested {
        if idx < displayed.len() {
            return Some(idx);
        }
    }
    if let Some(src) = loaded_source {
        if let Some(idx) = displayed
            .iter()
            .position(|s| s.playable_source() == Some(src))
        {
            return Some(idx);
        }
    }
    if displayed.is_empty() {
        None
    } else {
        Some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(id: &str) -> Song {
        Song {
            id: id.to_string(),
            title: id.to_string(),
            file_path: format!("/audio/{id}.mp3"),
            is_liked: false,
            ..Song::default()
        }
    }

    fn liked(id: &str) -> Song {
        Song {
            is_liked: true,
            ..song(id)
        }
    }

    fn catalog(songs: Vec<Song>) -> Catalog {
        let mut c = Catalog::new();
        c.replace_all(songs);
        c
    }

    #[test]
    fn requested_index_wins_when_valid() {
        let c = catalog(vec![song("a"), song("b"), song("c")]);
        let v = select_view(ViewMode::Queue, Some(2), &c, &[], Some("/audio/a.mp3"));
        assert_eq!(v.active, Some(2));
    }

    #[test]
    fn loaded_source_is_preserved_across_view_switch() {
        let c = catalog(vec![song("a"), liked("b"), liked("c")]);
        let v = select_view(ViewMode::Liked, None, &c, &[], Some("/audio/c.mp3"));
        assert_eq!(v.displayed.len(), 2);
        assert_eq!(v.active, Some(1)); // "c" sits at index 1 of the liked view
    }

    #[test]
    fn falls_back_to_first_track() {
        let c = catalog(vec![song("a"), song("b")]);
        let v = select_view(ViewMode::Queue, None, &c, &[], Some("/audio/zz.mp3"));
        assert_eq!(v.active, Some(0));
    }

    #[test]
    fn empty_sequence_has_no_active_index() {
        let c = catalog(vec![]);
        let v = select_view(ViewMode::Queue, Some(3), &c, &[], None);
        assert_eq!(v.active, None);
        assert!(v.displayed.is_empty());
    }

    #[test]
    fn out_of_bounds_request_falls_through_the_policy() {
        let c = catalog(vec![song("a"), song("b")]);
        let v = select_view(ViewMode::Queue, Some(9), &c, &[], Some("/audio/b.mp3"));
        assert_eq!(v.active, Some(1));
    }

    #[test]
    fn search_view_ignores_the_catalog() {
        let c = catalog(vec![song("a")]);
        let results = vec![song("jamendo-1"), song("jamendo-2")];
        let v = select_view(ViewMode::Search, None, &c, &results, None);
        assert_eq!(v.displayed.len(), 2);
        assert_eq!(v.active, Some(0));
    }

    #[test]
    fn tracks_without_audio_never_match_loaded_source() {
        let mut silent = song("s");
        silent.file_path = String::new();
        let c = catalog(vec![silent, song("a")]);
        let v = select_view(ViewMode::Queue, None, &c, &[], Some(""));
        // An empty loaded source must not pair up with an untransmittable track.
        assert_eq!(v.active, Some(0));
    }
}
