use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::audio::{EXCERPT_LENGTH, PlaybackController, PlaybackState, PlayerDevice};
use crate::broadcast::{Broadcast, Subscription};
use crate::library::{Library, PlaylistIndex, PlaylistNode};

use super::error::QuizError;
use super::pool::SelectionPool;
use super::probe::FileProbe;
use super::random::{RandomSource, excerpt_start};
use super::types::QuizState;

/// How many draws one `next_track` may spend before giving up.
pub const RETRY_BUDGET: usize = 10;

/// One quiz: picks tracks from the active scope, plays excerpts and tracks
/// the reveal state. Every change is pushed to subscribers as a full
/// [`QuizState`].
pub struct QuizSession<D, P, R> {
    library: Arc<Library>,
    pool: SelectionPool,
    controller: PlaybackController<D>,
    playback: Subscription<PlaybackState>,
    probe: P,
    random: R,
    state: QuizState,
    updates: Broadcast<QuizState>,
}

impl<D: PlayerDevice, P: FileProbe, R: RandomSource> QuizSession<D, P, R> {
    pub fn new(
        library: Arc<Library>,
        device: D,
        probe: P,
        random: R,
        updates: Broadcast<QuizState>,
    ) -> Self {
        let controller = PlaybackController::new(device);
        let playback = controller.subscribe();
        let pool = SelectionPool::new(library.all_ids());

        let mut session = Self {
            library,
            pool,
            controller,
            playback,
            probe,
            random,
            state: QuizState::default(),
            updates,
        };
        session.publish();
        session
    }

    #[cfg(test)]
    pub fn state(&self) -> &QuizState {
        &self.state
    }

    #[cfg(test)]
    pub fn pool(&self) -> &SelectionPool {
        &self.pool
    }

    pub fn library(&self) -> &Arc<Library> {
        &self.library
    }

    #[cfg(test)]
    pub fn subscribe(&self) -> Subscription<QuizState> {
        self.updates.subscribe()
    }

    /// Scope the quiz to `playlist` (every track under it, recursively), or
    /// to the whole library for `None`. Always resets the session.
    pub fn set_playlist_filter(&mut self, playlist: Option<&PlaylistNode>) {
        let ids = match playlist {
            Some(node) => PlaylistIndex::flatten(node),
            None => self.library.all_ids(),
        };
        info!(
            scope = playlist.map_or("all tracks", PlaylistNode::name),
            tracks = ids.len(),
            "quiz scope changed"
        );
        self.pool.set_scope(ids);
        self.reset();
    }

    /// Draw tracks until one plays, spending at most [`RETRY_BUDGET`] draws.
    ///
    /// Missing files, unknown ids and load failures each consume one draw.
    /// The previous track stays in the state while loading.
    pub fn next_track(&mut self) -> Result<(), QuizError> {
        self.state.is_loading = true;
        self.publish();
        self.controller.stop();
        self.sync_playback();

        let library = Arc::clone(&self.library);
        for attempt in 1..=RETRY_BUDGET {
            let Some(id) = self.pool.draw(&mut self.random) else {
                return Err(self.fail(QuizError::NoTracksAvailable));
            };
            self.pool.mark_consumed(&id);

            let Some(track) = library.track(&id) else {
                warn!(attempt, %id, "playlist references an unknown track, skipping");
                continue;
            };
            if !self.probe.exists(&track.location) {
                warn!(
                    attempt,
                    %id,
                    location = %track.location.display(),
                    "track file missing, skipping"
                );
                continue;
            }

            let start = excerpt_start(track.duration, &mut self.random);
            if let Err(e) = self.controller.load(&track.location, start, EXCERPT_LENGTH) {
                warn!(attempt, %id, error = %e, "could not load track, skipping");
                continue;
            }

            debug!(attempt, %id, ?start, "track loaded");
            self.state.current_track = Some(track.clone());
            self.state.is_revealed = false;
            self.state.is_loading = false;
            self.state.error = None;
            self.sync_playback();
            self.publish();

            // The track stays current even when autoplay is refused.
            if let Err(e) = self.controller.play() {
                warn!(%id, error = %e, "autoplay failed");
            }
            self.sync_playback();
            self.publish();
            return Ok(());
        }

        Err(self.fail(QuizError::RetryBudgetExhausted))
    }

    /// Show the current answer. No-op without a track or when already shown.
    pub fn reveal(&mut self) {
        if self.state.current_track.is_none() || self.state.is_revealed {
            return;
        }
        self.state.is_revealed = true;
        self.publish();
    }

    pub fn toggle_playback(&mut self) {
        if let Err(e) = self.controller.toggle() {
            debug!(error = %e, "toggle ignored");
        }
        if self.sync_playback() {
            self.publish();
        }
    }

    /// Stop playback and return to the idle state, keeping the scope but
    /// forgetting which of its tracks were already drawn.
    pub fn reset(&mut self) {
        self.controller.stop();
        self.pool.clear_used();
        self.state = QuizState::default();
        self.sync_playback();
        self.publish();
    }

    /// One sampling step of the playback controller.
    pub fn tick(&mut self) {
        self.controller.tick();
        if self.sync_playback() {
            self.publish();
        }
    }

    /// Release the device and drop every subscriber. Terminal.
    pub fn destroy(&mut self) {
        self.controller.destroy();
        self.playback.dispose();
        self.updates.clear();
    }

    fn fail(&mut self, err: QuizError) -> QuizError {
        warn!(error = %err, "no track could be played");
        self.state.current_track = None;
        self.state.is_revealed = false;
        self.state.is_loading = false;
        self.state.error = Some(err.to_string());
        self.sync_playback();
        self.publish();
        err
    }

    /// Pull the newest controller snapshot into the quiz state.
    fn sync_playback(&mut self) -> bool {
        match self.playback.latest() {
            Some(playback) => {
                self.state.playback = playback;
                true
            }
            None => false,
        }
    }

    fn publish(&mut self) {
        self.state.pool_size = self.pool.active_ids().len();
        self.state.pool_used = self.pool.used_ids().len();
        self.updates.publish(&self.state);
    }
}
