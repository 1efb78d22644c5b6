use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::debug;

use super::device::{DeviceError, PlayerDevice};
use super::sink::{create_sink_at, probe_duration};
use super::types::DeviceEvent;

/// [`PlayerDevice`] backed by the default `rodio` output stream.
///
/// Seeking rebuilds the sink with the decoder skipped forward, so the
/// absolute position is the seek base plus whatever the sink has played.
pub struct RodioDevice {
    stream: OutputStream,
    sink: Option<Sink>,
    location: Option<PathBuf>,
    duration: Option<Duration>,
    base: Duration,
    playing: bool,
    events: VecDeque<DeviceEvent>,
}

impl RodioDevice {
    pub fn open_default() -> Result<Self, DeviceError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| DeviceError::Output(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            sink: None,
            location: None,
            duration: None,
            base: Duration::ZERO,
            playing: false,
            events: VecDeque::new(),
        })
    }
}

impl PlayerDevice for RodioDevice {
    fn open(&mut self, location: &Path) -> Result<(), DeviceError> {
        self.stop();

        match probe_duration(location) {
            Ok(duration) => {
                self.location = Some(location.to_path_buf());
                self.duration = duration;
                self.events.push_back(DeviceEvent::MetadataReady { duration });
                Ok(())
            }
            // The file exists but cannot be decoded: report it like a device fault.
            Err(DeviceError::Decode { message, .. }) => {
                self.events.push_back(DeviceEvent::Fault(message));
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn seek(&mut self, position: Duration) -> Result<(), DeviceError> {
        let Some(location) = self.location.as_deref() else {
            return Err(DeviceError::NoTrackLoaded);
        };

        let new_sink = create_sink_at(&self.stream, location, position).map_err(|e| {
            DeviceError::Seek {
                position,
                message: e.to_string(),
            }
        })?;
        if self.playing {
            new_sink.play();
        }
        if let Some(old) = self.sink.replace(new_sink) {
            old.stop();
        }
        self.base = position;
        debug!(?position, "seeked");
        Ok(())
    }

    fn play(&mut self) -> Result<(), DeviceError> {
        if self.sink.is_none() {
            let Some(location) = self.location.as_deref() else {
                return Err(DeviceError::NoTrackLoaded);
            };
            self.sink = Some(create_sink_at(&self.stream, location, self.base)?);
        }
        if let Some(sink) = self.sink.as_ref() {
            sink.play();
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = self.sink.as_ref() {
            sink.pause();
        }
        self.playing = false;
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.location = None;
        self.duration = None;
        self.base = Duration::ZERO;
        self.playing = false;
        self.events.clear();
    }

    fn position(&self) -> Duration {
        self.base + self.sink.as_ref().map_or(Duration::ZERO, Sink::get_pos)
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn poll_event(&mut self) -> Option<DeviceEvent> {
        if let Some(ev) = self.events.pop_front() {
            return Some(ev);
        }
        let drained = self.sink.as_ref().is_some_and(Sink::empty);
        if self.playing && drained {
            self.playing = false;
            return Some(DeviceEvent::Ended);
        }
        None
    }
}
