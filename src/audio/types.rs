//! Audio-related small types.
//!
//! This module defines the playback snapshot pushed to subscribers and the
//! events a player device reports.

use std::time::Duration;

/// Default excerpt length.
pub const EXCERPT_LENGTH: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq)]
/// Playback information pushed to subscribers.
pub struct PlaybackState {
    pub is_playing: bool,
    /// Elapsed time since the excerpt start (not since the track start).
    pub current_time: Duration,
    /// Full track length as reported by the device.
    pub duration: Duration,
    /// Absolute position in the track where the excerpt begins.
    pub start_offset: Duration,
    /// Excerpt length cap.
    pub max_play_time: Duration,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            is_playing: false,
            current_time: Duration::ZERO,
            duration: Duration::ZERO,
            start_offset: Duration::ZERO,
            max_play_time: EXCERPT_LENGTH,
        }
    }
}

impl PlaybackState {
    /// Fraction of the excerpt already played, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.max_play_time.is_zero() {
            return 0.0;
        }
        (self.current_time.as_secs_f64() / self.max_play_time.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub fn excerpt_finished(&self) -> bool {
        self.current_time >= self.max_play_time
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    /// The opened media is decodable; carries its length when known.
    MetadataReady { duration: Option<Duration> },
    /// Playback reached the end of the media.
    Ended,
    /// The device failed; the current media is unusable.
    Fault(String),
}
