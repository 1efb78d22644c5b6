use std::path::Path;
use std::time::Duration;

use tracing::{debug, warn};

use crate::broadcast::{Broadcast, Subscription};

use super::device::{DeviceError, LoadError, PlayerDevice};
use super::types::{DeviceEvent, PlaybackState};

/// Plays bounded excerpts on one [`PlayerDevice`].
///
/// The owner calls [`PlaybackController::tick`] periodically; ticks only do
/// work while playing. Each sample recomputes `current_time` from the device
/// position and pauses once the excerpt cap is reached.
pub struct PlaybackController<D> {
    device: Option<D>,
    state: PlaybackState,
    sampling: bool,
    updates: Broadcast<PlaybackState>,
}

impl<D: PlayerDevice> PlaybackController<D> {
    pub fn new(device: D) -> Self {
        Self {
            device: Some(device),
            state: PlaybackState::default(),
            sampling: false,
            updates: Broadcast::new(),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn subscribe(&self) -> Subscription<PlaybackState> {
        self.updates.subscribe()
    }

    /// Whether the sampling tick is armed.
    #[cfg(test)]
    pub fn is_sampling(&self) -> bool {
        self.sampling
    }

    #[cfg(test)]
    pub fn is_destroyed(&self) -> bool {
        self.device.is_none()
    }

    /// Open `location`, wait for its metadata and seek to `start_offset`.
    ///
    /// Leaves the device paused; call [`PlaybackController::play`] to start.
    pub fn load(
        &mut self,
        location: &Path,
        start_offset: Duration,
        max_play_time: Duration,
    ) -> Result<(), LoadError> {
        let device = self.device.as_mut().ok_or(DeviceError::Released)?;
        device.stop();
        self.sampling = false;
        self.state = PlaybackState {
            start_offset,
            max_play_time,
            ..PlaybackState::default()
        };

        let opened = open_and_seek(device, location, start_offset);
        match opened {
            Ok(duration) => {
                self.state.duration = duration;
                debug!(
                    location = %location.display(),
                    ?start_offset,
                    ?duration,
                    "excerpt loaded"
                );
                self.publish();
                Ok(())
            }
            Err(e) => {
                device.stop();
                self.publish();
                Err(e)
            }
        }
    }

    /// Start or resume the excerpt. Once the cap has been reached, or the
    /// media ended first, the excerpt restarts from its start offset.
    pub fn play(&mut self) -> Result<(), DeviceError> {
        let device = self.device.as_mut().ok_or(DeviceError::Released)?;
        if self.state.excerpt_finished() {
            device.seek(self.state.start_offset)?;
            self.state.current_time = Duration::ZERO;
        }
        device.play()?;

        self.state.is_playing = true;
        self.sampling = true;
        self.publish();
        Ok(())
    }

    pub fn pause(&mut self) {
        let Some(device) = self.device.as_mut() else {
            return;
        };
        device.pause();
        self.state.is_playing = false;
        self.sampling = false;
        self.publish();
    }

    pub fn toggle(&mut self) -> Result<(), DeviceError> {
        if self.state.is_playing {
            self.pause();
            Ok(())
        } else {
            self.play()
        }
    }

    /// Stop playback and forget the loaded media.
    pub fn stop(&mut self) {
        let Some(device) = self.device.as_mut() else {
            return;
        };
        device.stop();
        self.sampling = false;
        self.state = PlaybackState {
            max_play_time: self.state.max_play_time,
            ..PlaybackState::default()
        };
        self.publish();
    }

    /// One sampling step. Returns whether the device was sampled.
    pub fn tick(&mut self) -> bool {
        if !self.sampling {
            return false;
        }
        let Some(device) = self.device.as_mut() else {
            return false;
        };

        let mut ended = false;
        while let Some(event) = device.poll_event() {
            match event {
                DeviceEvent::Ended => ended = true,
                DeviceEvent::Fault(message) => {
                    warn!(%message, "playback fault");
                    ended = true;
                }
                DeviceEvent::MetadataReady { .. } => {}
            }
        }

        if ended {
            // Media ran out before the cap: the excerpt is over all the same.
            self.state.current_time = self.state.max_play_time;
            self.state.is_playing = false;
            self.sampling = false;
            debug!("media ended inside the excerpt");
        } else {
            let absolute = device.position();
            self.state.current_time = absolute.saturating_sub(self.state.start_offset);
            if self.state.current_time >= self.state.max_play_time {
                device.pause();
                self.state.is_playing = false;
                self.sampling = false;
                debug!(current_time = ?self.state.current_time, "excerpt cap reached");
            }
        }

        self.publish();
        true
    }

    /// Release the device and drop every subscriber. Terminal.
    pub fn destroy(&mut self) {
        if let Some(mut device) = self.device.take() {
            device.stop();
        }
        self.sampling = false;
        self.state.is_playing = false;
        self.updates.clear();
    }

    fn publish(&self) {
        self.updates.publish(&self.state);
    }
}

fn open_and_seek<D: PlayerDevice>(
    device: &mut D,
    location: &Path,
    start_offset: Duration,
) -> Result<Duration, LoadError> {
    device.open(location)?;

    let reported = loop {
        match device.poll_event() {
            Some(DeviceEvent::MetadataReady { duration }) => break duration,
            Some(DeviceEvent::Fault(message)) => return Err(LoadError::Fault(message)),
            // Left over from the previous media.
            Some(DeviceEvent::Ended) => continue,
            None => return Err(LoadError::NoMetadata),
        }
    };

    device.seek(start_offset)?;
    Ok(reported.or_else(|| device.duration()).unwrap_or_default())
}
