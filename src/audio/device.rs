use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use super::types::DeviceEvent;

/// An audio output that can play one media file at a time.
///
/// Opening is split from metadata: after [`PlayerDevice::open`] the device
/// reports either [`DeviceEvent::MetadataReady`] or [`DeviceEvent::Fault`]
/// through [`PlayerDevice::poll_event`].
///
/// That event must already be queued when `open` returns. The controller
/// polls once right after opening and treats an empty queue as missing
/// metadata; a backend that probes asynchronously has to block in `open`
/// until it knows the outcome.
pub trait PlayerDevice {
    fn open(&mut self, location: &Path) -> Result<(), DeviceError>;
    /// Seek to an absolute position in the opened media.
    fn seek(&mut self, position: Duration) -> Result<(), DeviceError>;
    fn play(&mut self) -> Result<(), DeviceError>;
    fn pause(&mut self);
    /// Stop and forget the opened media.
    fn stop(&mut self);
    /// Absolute playback position in the opened media.
    fn position(&self) -> Duration;
    fn duration(&self) -> Option<Duration>;
    fn poll_event(&mut self) -> Option<DeviceEvent>;
}

#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("no audio output device: {0}")]
    Output(String),

    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("failed to seek to {position:?}: {message}")]
    Seek { position: Duration, message: String },

    #[error("no media loaded")]
    NoTrackLoaded,

    #[error("player device was released")]
    Released,
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error("device fault: {0}")]
    Fault(String),

    #[error("device reported no metadata")]
    NoMetadata,
}
