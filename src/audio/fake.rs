//! In-memory [`PlayerDevice`] for tests. Every call is recorded in a shared
//! log so a test can keep a handle after moving the device into its owner.

use std::collections::{HashMap, HashSet, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use super::device::{DeviceError, PlayerDevice};
use super::types::DeviceEvent;

#[derive(Debug, Default)]
pub struct FakeLog {
    pub opened: Vec<PathBuf>,
    pub seeks: Vec<Duration>,
    pub plays: usize,
    pub pauses: usize,
    pub stops: usize,
    pub position_reads: usize,
    /// Absolute position reported by `position()`.
    pub position: Duration,
    pub durations: HashMap<PathBuf, Duration>,
    /// `open` fails outright.
    pub unreadable: HashSet<PathBuf>,
    /// `open` succeeds but the device reports a fault.
    pub faulty: HashSet<PathBuf>,
    pub fail_play: bool,
    pub pending: VecDeque<DeviceEvent>,
    pub loaded: Option<PathBuf>,
}

#[derive(Clone, Default)]
pub struct FakeDevice {
    log: Arc<Mutex<FakeLog>>,
}

impl FakeDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> MutexGuard<'_, FakeLog> {
        self.log.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PlayerDevice for FakeDevice {
    fn open(&mut self, location: &Path) -> Result<(), DeviceError> {
        let mut log = self.log();
        log.opened.push(location.to_path_buf());
        if log.unreadable.contains(location) {
            return Err(DeviceError::Open {
                path: location.to_path_buf(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "unreadable"),
            });
        }
        log.loaded = Some(location.to_path_buf());
        if log.faulty.contains(location) {
            log.pending.push_back(DeviceEvent::Fault("corrupt stream".into()));
        } else {
            let duration = log.durations.get(location).copied();
            log.pending.push_back(DeviceEvent::MetadataReady { duration });
        }
        Ok(())
    }

    fn seek(&mut self, position: Duration) -> Result<(), DeviceError> {
        let mut log = self.log();
        if log.loaded.is_none() {
            return Err(DeviceError::NoTrackLoaded);
        }
        log.seeks.push(position);
        log.position = position;
        Ok(())
    }

    fn play(&mut self) -> Result<(), DeviceError> {
        let mut log = self.log();
        if log.loaded.is_none() {
            return Err(DeviceError::NoTrackLoaded);
        }
        if log.fail_play {
            return Err(DeviceError::Output("autoplay blocked".into()));
        }
        log.plays += 1;
        Ok(())
    }

    fn pause(&mut self) {
        self.log().pauses += 1;
    }

    fn stop(&mut self) {
        let mut log = self.log();
        log.stops += 1;
        log.loaded = None;
        log.pending.clear();
    }

    fn position(&self) -> Duration {
        let mut log = self.log();
        log.position_reads += 1;
        log.position
    }

    fn duration(&self) -> Option<Duration> {
        let log = self.log();
        log.loaded
            .as_ref()
            .and_then(|p| log.durations.get(p).copied())
    }

    fn poll_event(&mut self) -> Option<DeviceEvent> {
        self.log().pending.pop_front()
    }
}
