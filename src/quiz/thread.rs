use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::audio::{DeviceError, PlayerDevice, RodioDevice};
use crate::broadcast::Broadcast;
use crate::library::Library;

use super::probe::{FileProbe, FsProbe};
use super::random::{RandomSource, RngSource};
use super::session::QuizSession;
use super::types::{QuizCmd, QuizState};

/// Start the quiz thread. The output device is opened on that thread; the
/// outcome is reported once through `ready`.
pub(super) fn spawn_quiz_thread(
    library: Arc<Library>,
    rx: Receiver<QuizCmd>,
    updates: Broadcast<QuizState>,
    sample_interval: Duration,
    ready: Sender<Result<(), DeviceError>>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let device = match RodioDevice::open_default() {
            Ok(device) => device,
            Err(e) => {
                let _ = ready.send(Err(e));
                return;
            }
        };
        let _ = ready.send(Ok(()));

        let session = QuizSession::new(library, device, FsProbe, RngSource::new(), updates);
        run_session(session, &rx, sample_interval);
    })
}

/// Apply commands in arrival order and tick the session at least once per
/// `sample_interval` until `Quit` arrives or every sender is gone.
pub(super) fn run_session<D, P, R>(
    mut session: QuizSession<D, P, R>,
    rx: &Receiver<QuizCmd>,
    sample_interval: Duration,
) where
    D: PlayerDevice,
    P: FileProbe,
    R: RandomSource,
{
    let mut last_tick = Instant::now();
    loop {
        match rx.recv_timeout(sample_interval) {
            Ok(QuizCmd::Quit) => break,
            Ok(cmd) => apply(&mut session, cmd),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if last_tick.elapsed() >= sample_interval {
            session.tick();
            last_tick = Instant::now();
        }
    }

    info!("quiz thread stopping");
    session.destroy();
}

fn apply<D, P, R>(session: &mut QuizSession<D, P, R>, cmd: QuizCmd)
where
    D: PlayerDevice,
    P: FileProbe,
    R: RandomSource,
{
    debug!(?cmd, "quiz command");
    match cmd {
        // Failures are already part of the published state.
        QuizCmd::Next => {
            let _ = session.next_track();
        }
        QuizCmd::Reveal => session.reveal(),
        QuizCmd::TogglePlayback => session.toggle_playback(),
        QuizCmd::SetFilter(None) => session.set_playlist_filter(None),
        QuizCmd::SetFilter(Some(path)) => {
            let library = Arc::clone(session.library());
            match library.playlist_index().node_at(&path) {
                Some(node) => session.set_playlist_filter(Some(node)),
                None => warn!(%path, "unknown playlist, filter unchanged"),
            }
        }
        QuizCmd::Reset => session.reset(),
        QuizCmd::Quit => {}
    }
}
