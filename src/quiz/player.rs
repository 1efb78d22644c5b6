use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::audio::DeviceError;
use crate::broadcast::{Broadcast, Subscription};
use crate::config::QuizSettings;
use crate::library::Library;

use super::thread::spawn_quiz_thread;
use super::types::{QuizCmd, QuizState};

/// Handle to the quiz thread. Commands are queued; state comes back through
/// subscriptions.
pub struct QuizPlayer {
    tx: Sender<QuizCmd>,
    updates: Broadcast<QuizState>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl QuizPlayer {
    /// Spawn the quiz thread and wait until it has an output device.
    pub fn spawn(library: Arc<Library>, settings: &QuizSettings) -> Result<Self, DeviceError> {
        let (tx, rx) = mpsc::channel::<QuizCmd>();
        let (ready_tx, ready_rx) = mpsc::channel();
        let updates = Broadcast::new();
        let interval = Duration::from_millis(settings.sample_interval_ms);

        let handle = spawn_quiz_thread(library, rx, updates.clone(), interval, ready_tx);

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                let _ = handle.join();
                return Err(e);
            }
            Err(_) => {
                let _ = handle.join();
                return Err(DeviceError::Output(
                    "quiz thread exited during startup".to_string(),
                ));
            }
        }

        Ok(Self {
            tx,
            updates,
            join: Mutex::new(Some(handle)),
        })
    }

    pub fn subscribe(&self) -> Subscription<QuizState> {
        self.updates.subscribe()
    }

    pub fn send(&self, cmd: QuizCmd) -> Result<(), mpsc::SendError<QuizCmd>> {
        self.tx.send(cmd)
    }

    /// Ask the thread to stop and wait for it.
    pub fn quit(&self) {
        let _ = self.send(QuizCmd::Quit);

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}
