//! Library model, playlist tree and ingestion front-ends.
//!
//! Everything here is read-only once loaded: the quiz borrows the track table
//! and playlist tree but never changes them.

mod display;
mod error;
mod ingest;
mod location;
mod model;
mod playlist;
mod scan;

pub use display::reveal_text;
pub use ingest::load_library;
pub use model::{Library, Track, TrackId};
pub use playlist::{NodeKind, PlaylistIndex, PlaylistNode, PlaylistPath};

#[cfg(test)]
pub use model::SourceKind;

#[cfg(test)]
mod tests;
