use crate::api::models::Song;

/// What the coordinator wants done to the media element. The app layer is
/// the only executor; nothing else touches the player backend, so every
/// binding invariant lives in this file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaCommand {
    Pause,
    Load { url: String },
    Play,
    Detach,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatMode {
    #[default]
    Off,
    One,
    All,
}

impl RepeatMode {
    pub fn next(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RepeatMode::Off => "Repeat: Off",
            RepeatMode::One => "Repeat: One",
            RepeatMode::All => "Repeat: All",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Outcome of a play/pause toggle when no track is active: the app either
/// falls back to the start of the queue or prompts the user for content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toggle {
    Commands(Vec<MediaCommand>),
    FallBackToQueue,
    NeedsContent,
}

/// Owns the playback position, the source loaded into the media element, and
/// the play state, and reconciles them whenever the displayed sequence, the
/// position, or the element itself changes.
///
/// Play requests resolve asynchronously: `Play` is a request, and `playing`
/// only flips true once the element reports it started. A playback error
/// resets the flag without propagating.
#[derive(Debug, Default)]
pub struct Coordinator {
    position: Option<usize>,
    loaded: Option<String>,
    ready: bool,
    playing: bool,
    pub repeat: RepeatMode,
    pub shuffle: bool,
}

impl Coordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn loaded_source(&self) -> Option<&str> {
        self.loaded.as_deref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Load the track at `index` of `seq`. Out-of-bounds indices clamp to 0
    /// for a non-empty sequence; an empty sequence clears all playback state.
    pub fn load_track(&mut self, seq: &[Song], index: usize, autoplay: bool) -> Vec<MediaCommand> {
        if seq.is_empty() {
            return self.clear();
        }
        let index = if index < seq.len() { index } else { 0 };

        let mut cmds = Vec::new();
        if self.playing {
            self.playing = false;
            cmds.push(MediaCommand::Pause);
        }
        self.position = Some(index);

        match seq[index].playable_source() {
            Some(src) => {
                if self.loaded.as_deref() != Some(src) || !self.ready {
                    self.loaded = Some(src.to_string());
                    self.ready = false;
                    cmds.push(MediaCommand::Load {
                        url: src.to_string(),
                    });
                }
                if autoplay {
                    cmds.push(MediaCommand::Play);
                }
            }
            None => {
                // A track with no audio keeps its position but detaches the
                // element; an empty queue would have cleared the position too.
                if self.loaded.take().is_some() {
                    cmds.push(MediaCommand::Detach);
                }
                self.ready = false;
            }
        }
        cmds
    }

    /// Position none, element detached, play state false.
    pub fn clear(&mut self) -> Vec<MediaCommand> {
        let mut cmds = Vec::new();
        if self.playing {
            cmds.push(MediaCommand::Pause);
        }
        if self.loaded.take().is_some() {
            cmds.push(MediaCommand::Detach);
        }
        self.position = None;
        self.ready = false;
        self.playing = false;
        cmds
    }

    /// Adopt a view switch: the selector already resolved the active index
    /// for the new sequence. The loaded source is left alone: an in-flight
    /// track keeps playing across a view change, and the next explicit load
    /// or toggle reconciles the binding.
    pub fn sync_view(&mut self, seq: &[Song], active: Option<usize>) -> Vec<MediaCommand> {
        if seq.is_empty() {
            return self.clear();
        }
        self.position = active;
        Vec::new()
    }

    pub fn toggle_play_pause(&mut self, seq: &[Song], catalog_empty: bool) -> Toggle {
        let Some(track) = self.position.and_then(|i| seq.get(i)) else {
            if !catalog_empty {
                return Toggle::FallBackToQueue;
            }
            return Toggle::NeedsContent;
        };

        if self.playing {
            self.playing = false;
            return Toggle::Commands(vec![MediaCommand::Pause]);
        }

        // Resume only if the element still holds this track's source;
        // otherwise the sequence changed under the index and a reload is due.
        let expected = track.playable_source();
        if expected.is_some() && self.loaded.as_deref() == expected && self.ready {
            Toggle::Commands(vec![MediaCommand::Play])
        } else {
            let index = self.position.unwrap_or(0);
            Toggle::Commands(self.load_track(seq, index, true))
        }
    }

    /// Step through the displayed sequence. Next stops at the end unless
    /// repeat-all wraps it; previous always wraps.
    pub fn advance(&mut self, dir: Direction, seq: &[Song]) -> Vec<MediaCommand> {
        if seq.is_empty() {
            return Vec::new();
        }
        match dir {
            Direction::Next => {
                let next = self.position.map(|i| i + 1).unwrap_or(0);
                if next < seq.len() {
                    self.load_track(seq, next, true)
                } else if self.repeat == RepeatMode::All {
                    self.load_track(seq, 0, true)
                } else {
                    let mut cmds = Vec::new();
                    if self.playing {
                        self.playing = false;
                        cmds.push(MediaCommand::Pause);
                    }
                    cmds
                }
            }
            Direction::Previous => {
                let cur = self.position.unwrap_or(0);
                let prev = (cur + seq.len() - 1) % seq.len();
                self.load_track(seq, prev, true)
            }
        }
    }

    /// The element reported the current source finished.
    pub fn handle_ended(&mut self, seq: &[Song]) -> Vec<MediaCommand> {
        self.playing = false;
        if seq.is_empty() {
            return Vec::new();
        }
        if self.repeat == RepeatMode::One {
            if let Some(idx) = self.position {
                return self.load_track(seq, idx, true);
            }
        }
        let at_last = self.position == Some(seq.len() - 1);
        if self.repeat == RepeatMode::All || self.shuffle || !at_last {
            self.advance(Direction::Next, seq)
        } else {
            Vec::new()
        }
    }

    /// A track was removed from the displayed sequence at `removed`.
    /// Removing the active track stops playback and clears the binding;
    /// removals before it shift the index left so it keeps naming the same
    /// logical track.
    pub fn handle_removal(&mut self, removed: usize, remaining: usize) -> Vec<MediaCommand> {
        let Some(active) = self.position else {
            return Vec::new();
        };
        if remaining == 0 {
            return self.clear();
        }
        if removed == active {
            self.clear()
        } else if removed < active {
            self.position = Some(active - 1);
            Vec::new()
        } else {
            Vec::new()
        }
    }

    // Element feedback. `playing` is only trusted from here.

    pub fn on_started(&mut self) {
        self.playing = true;
        self.ready = true;
    }

    pub fn on_paused(&mut self) {
        self.playing = false;
    }

    pub fn on_ready(&mut self) {
        self.ready = true;
    }

    /// A rejected play request or decode failure: force play state false.
    /// The caller surfaces the message; nothing propagates.
    pub fn on_error(&mut self) {
        self.playing = false;
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
            ..Song::default()
        }
    }

    fn silent(id: &str) -> Song {
        Song {
            file_path: String::new(),
            ..song(id)
        }
    }

    fn seq(ids: &[&str]) -> Vec<Song> {
        ids.iter().map(|id| song(id)).collect()
    }

    #[test]
    fn load_track_on_empty_sequence_clears_state() {
        let mut c = Coordinator::new();
        c.load_track(&seq(&["a"]), 0, false);
        let cmds = c.load_track(&[], 0, true);
        assert_eq!(c.position(), None);
        assert_eq!(c.loaded_source(), None);
        assert!(!c.is_playing());
        assert!(cmds.contains(&MediaCommand::Detach));
    }

    #[test]
    fn load_track_clamps_out_of_bounds_to_first() {
        let mut c = Coordinator::new();
        c.load_track(&seq(&["a", "b"]), 7, false);
        assert_eq!(c.position(), Some(0));
        assert_eq!(c.loaded_source(), Some("/audio/a.mp3"));
    }

    #[test]
    fn load_track_pauses_before_switching_source() {
        let mut c = Coordinator::new();
        let s = seq(&["a", "b"]);
        c.load_track(&s, 0, true);
        c.on_started();

        let cmds = c.load_track(&s, 1, true);
        assert_eq!(
            cmds,
            vec![
                MediaCommand::Pause,
                MediaCommand::Load {
                    url: "/audio/b.mp3".into()
                },
                MediaCommand::Play,
            ]
        );
    }

    #[test]
    fn reloading_same_ready_source_skips_load() {
        let mut c = Coordinator::new();
        let s = seq(&["a"]);
        c.load_track(&s, 0, false);
        c.on_ready();
        let cmds = c.load_track(&s, 0, true);
        assert_eq!(cmds, vec![MediaCommand::Play]);
    }

    #[test]
    fn sourceless_track_detaches_but_keeps_position() {
        let mut c = Coordinator::new();
        let s = vec![song("a"), silent("b")];
        c.load_track(&s, 0, false);
        let cmds = c.load_track(&s, 1, true);
        assert_eq!(cmds, vec![MediaCommand::Detach]);
        assert_eq!(c.position(), Some(1));
        assert_eq!(c.loaded_source(), None);
        assert!(!c.is_playing());
    }

    #[test]
    fn toggle_with_no_track_falls_back_to_queue() {
        let mut c = Coordinator::new();
        assert_eq!(c.toggle_play_pause(&[], false), Toggle::FallBackToQueue);
        assert_eq!(c.toggle_play_pause(&[], true), Toggle::NeedsContent);
    }

    #[test]
    fn toggle_resumes_matching_source_without_reload() {
        let mut c = Coordinator::new();
        let s = seq(&["a"]);
        c.load_track(&s, 0, false);
        c.on_ready();
        assert_eq!(
            c.toggle_play_pause(&s, false),
            Toggle::Commands(vec![MediaCommand::Play])
        );
    }

    #[test]
    fn toggle_reloads_when_sequence_changed_under_the_index() {
        let mut c = Coordinator::new();
        c.load_track(&seq(&["a", "b"]), 1, false);
        c.on_ready();
        // The displayed sequence now shows different tracks at the same index.
        let swapped = seq(&["x", "y"]);
        let Toggle::Commands(cmds) = c.toggle_play_pause(&swapped, false) else {
            panic!("expected commands");
        };
        assert!(cmds.contains(&MediaCommand::Load {
            url: "/audio/y.mp3".into()
        }));
    }

    #[test]
    fn toggle_pauses_while_playing() {
        let mut c = Coordinator::new();
        let s = seq(&["a"]);
        c.load_track(&s, 0, true);
        c.on_started();
        assert_eq!(
            c.toggle_play_pause(&s, false),
            Toggle::Commands(vec![MediaCommand::Pause])
        );
        assert!(!c.is_playing());
    }

    #[test]
    fn next_at_last_index_without_repeat_stops_in_place() {
        let mut c = Coordinator::new();
        let s = seq(&["a", "b"]);
        c.load_track(&s, 1, true);
        c.on_started();

        c.advance(Direction::Next, &s);
        assert!(!c.is_playing());
        assert_eq!(c.position(), Some(1));
    }

    #[test]
    fn next_at_last_index_with_repeat_all_wraps() {
        let mut c = Coordinator::new();
        let s = seq(&["a", "b"]);
        c.repeat = RepeatMode::All;
        c.load_track(&s, 1, true);

        let cmds = c.advance(Direction::Next, &s);
        assert_eq!(c.position(), Some(0));
        assert!(cmds.contains(&MediaCommand::Load {
            url: "/audio/a.mp3".into()
        }));
    }

    #[test]
    fn previous_at_first_index_always_wraps() {
        let mut c = Coordinator::new();
        let s = seq(&["a", "b", "c"]);
        for repeat in [RepeatMode::Off, RepeatMode::One, RepeatMode::All] {
            c.repeat = repeat;
            c.load_track(&s, 0, false);
            c.advance(Direction::Previous, &s);
            assert_eq!(c.position(), Some(2), "repeat mode {repeat:?}");
        }
    }

    #[test]
    fn ended_with_repeat_one_reloads_same_index() {
        let mut c = Coordinator::new();
        let s = seq(&["a", "b"]);
        c.repeat = RepeatMode::One;
        c.load_track(&s, 1, true);
        c.on_started();

        let cmds = c.handle_ended(&s);
        assert_eq!(c.position(), Some(1));
        assert!(cmds.contains(&MediaCommand::Play));
    }

    #[test]
    fn ended_mid_sequence_advances() {
        let mut c = Coordinator::new();
        let s = seq(&["a", "b"]);
        c.load_track(&s, 0, true);
        c.on_started();

        let cmds = c.handle_ended(&s);
        assert_eq!(c.position(), Some(1));
        assert!(cmds.contains(&MediaCommand::Play));
    }

    #[test]
    fn ended_at_last_without_repeat_stays_put() {
        let mut c = Coordinator::new();
        let s = seq(&["a", "b"]);
        c.load_track(&s, 1, true);
        c.on_started();

        let cmds = c.handle_ended(&s);
        assert!(cmds.is_empty());
        assert!(!c.is_playing());
        assert_eq!(c.position(), Some(1));
    }

    #[test]
    fn removing_track_before_active_shifts_index_left() {
        let mut c = Coordinator::new();
        let s = seq(&["a", "b", "c"]);
        c.load_track(&s, 1, true);
        c.on_started();
        let loaded_before = c.loaded_source().map(str::to_string);

        // Remove "a"; "b" is still the active track, now at index 0.
        let cmds = c.handle_removal(0, 2);
        assert!(cmds.is_empty());
        assert_eq!(c.position(), Some(0));
        assert_eq!(c.loaded_source(), loaded_before.as_deref());
        assert!(c.is_playing());
    }

    #[test]
    fn removing_active_track_clears_binding() {
        let mut c = Coordinator::new();
        let s = seq(&["a", "b"]);
        c.load_track(&s, 0, true);
        c.on_started();

        let cmds = c.handle_removal(0, 1);
        assert_eq!(c.position(), None);
        assert_eq!(c.loaded_source(), None);
        assert!(!c.is_playing());
        assert!(cmds.contains(&MediaCommand::Detach));
    }

    #[test]
    fn removal_emptying_sequence_forces_none() {
        let mut c = Coordinator::new();
        let s = seq(&["a"]);
        c.load_track(&s, 0, false);
        c.handle_removal(0, 0);
        assert_eq!(c.position(), None);
        assert_eq!(c.loaded_source(), None);
    }

    #[test]
    fn play_error_resets_play_state_only() {
        let mut c = Coordinator::new();
        let s = seq(&["a"]);
        c.load_track(&s, 0, true);
        c.on_started();
        c.on_error();
        assert!(!c.is_playing());
        assert_eq!(c.position(), Some(0));
    }

    #[test]
    fn empty_view_sync_clears_everything() {
        let mut c = Coordinator::new();
        c.load_track(&seq(&["a"]), 0, false);
        let cmds = c.sync_view(&[], None);
        assert_eq!(c.position(), None);
        assert!(cmds.contains(&MediaCommand::Detach));
    }
}
