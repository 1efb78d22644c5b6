use crate::audio::PlaybackState;
use crate::library::{PlaylistPath, Track};

/// Snapshot of one quiz session, pushed to subscribers on every change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuizState {
    pub current_track: Option<Track>,
    pub is_revealed: bool,
    pub is_loading: bool,
    /// Human-readable failure of the last `next_track`, cleared on success.
    pub error: Option<String>,
    pub playback: PlaybackState,
    /// Size of the active scope.
    pub pool_size: usize,
    /// Ids drawn in the current cycle.
    pub pool_used: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Playing,
    Revealed,
}

impl QuizState {
    pub fn phase(&self) -> Phase {
        if self.is_loading {
            return Phase::Loading;
        }
        match (&self.current_track, self.is_revealed) {
            (None, _) => Phase::Idle,
            (Some(_), false) => Phase::Playing,
            (Some(_), true) => Phase::Revealed,
        }
    }
}

/// Commands accepted by the quiz thread, applied one at a time in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizCmd {
    Next,
    Reveal,
    TogglePlayback,
    /// `None` selects the whole library.
    SetFilter(Option<PlaylistPath>),
    Reset,
    Quit,
}
