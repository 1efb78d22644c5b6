//! Audio playback: the player device abstraction, its `rodio` backend and
//! the excerpt-bounded playback controller.

mod controller;
mod device;
mod rodio_device;
mod sink;
mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use controller::PlaybackController;
pub use device::{DeviceError, PlayerDevice};
pub use rodio_device::RodioDevice;
pub use types::{EXCERPT_LENGTH, PlaybackState};
