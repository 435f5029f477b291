//! Nerd Font icons for TUI display
//! Requires a Nerd Font to be installed (https://www.nerdfonts.com)

/// Icon set using Nerd Font glyphs
#[derive(Debug, Clone)]
pub struct Icons {
    // Playback controls
    pub play: &'static str,
    pub pause: &'static str,
    pub next: &'static str,
    pub prev: &'static str,

    // Volume tiers
    pub volume_mute: &'static str,
    pub volume_low: &'static str,
    pub volume_high: &'static str,

    // Repeat/Shuffle
    pub repeat: &'static str,
    pub repeat_one: &'static str,
    pub shuffle: &'static str,

    // Navigation
    pub search: &'static str,
    pub queue: &'static str,
    pub liked: &'static str,
    pub help: &'static str,

    // Status
    pub success: &'static str,
    pub error: &'static str,

    // Tracks
    pub music: &'static str,
    pub heart: &'static str,
    pub heart_outline: &'static str,
    pub user: &'static str,
    pub upload: &'static str,
    pub trash: &'static str,

    // Selection
    pub selected: &'static str,
    pub unselected: &'static str,

    // Progress bar
    pub progress_full: &'static str,
    pub progress_empty: &'static str,
    pub progress_head: &'static str,
}

impl Icons {
    /// Nerd Font icon set
    pub const fn nerd() -> Self {
        Self {
            // Playback - nf-fa-*
            play: "\u{f04b}",          // nf-fa-play
            pause: "\u{f04c}",         // nf-fa-pause
            next: "\u{f051}",          // nf-fa-step_forward
            prev: "\u{f048}",          // nf-fa-step_backward

            // Volume - nf-fa-volume_*
            volume_mute: "\u{f026}",   // nf-fa-volume_off
            volume_low: "\u{f027}",    // nf-fa-volume_down
            volume_high: "\u{f028}",   // nf-fa-volume_up

            // Repeat/Shuffle - nf-md-*
            repeat: "\u{f456}",        // nf-md-repeat
            repeat_one: "\u{f458}",    // nf-md-repeat_once
            shuffle: "\u{f49d}",       // nf-md-shuffle

            // Navigation
            search: "\u{f002}",        // nf-fa-search
            queue: "\u{f03a}",         // nf-fa-list
            liked: "\u{f004}",         // nf-fa-heart
            help: "\u{f059}",          // nf-fa-question_circle

            // Status
            success: "\u{f00c}",       // nf-fa-check
            error: "\u{f00d}",         // nf-fa-times

            // Tracks
            music: "\u{f001}",         // nf-fa-music
            heart: "\u{f004}",         // nf-fa-heart
            heart_outline: "\u{f08a}", // nf-fa-heart_o
            user: "\u{f007}",          // nf-fa-user
            upload: "\u{f093}",        // nf-fa-upload
            trash: "\u{f1f8}",         // nf-fa-trash

            // Selection
            selected: "\u{f054}",      // nf-fa-chevron_right
            unselected: " ",

            // Progress bar
            progress_full: "━",
            progress_empty: "─",
            progress_head: "●",
        }
    }
}

impl Default for Icons {
    fn default() -> Self {
        Self::nerd()
    }
}

/// Loading spinner frames
pub struct LoadingSpinner;

impl LoadingSpinner {
    /// Braille-based smooth spinner
    pub const BRAILLE: [&'static str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

    pub fn frame(tick: u64) -> &'static str {
        let idx = (tick / 4) as usize % Self::BRAILLE.len();
        Self::BRAILLE[idx]
    }
}
