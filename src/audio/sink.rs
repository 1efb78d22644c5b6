//! Utilities for creating `rodio` sinks from file paths.
//!
//! The helpers here encapsulate opening/decoding a file and preparing a
//! paused `Sink` at the requested start position.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use super::device::DeviceError;

fn decoder_for(path: &Path) -> Result<Decoder<BufReader<File>>, DeviceError> {
    let file = File::open(path).map_err(|source| DeviceError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    Decoder::new(BufReader::new(file)).map_err(|e| DeviceError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Decode enough of `path` to learn its length.
pub(super) fn probe_duration(path: &Path) -> Result<Option<Duration>, DeviceError> {
    Ok(decoder_for(path)?.total_duration())
}

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
) -> Result<Sink, DeviceError> {
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    let source = decoder_for(path)?.skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok(sink)
}
