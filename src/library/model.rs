use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use super::playlist::{PlaylistIndex, PlaylistNode};

/// Opaque track identifier, unique within one loaded library.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: TrackId,
    pub name: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub key: String,
    pub bpm: Option<f64>,
    /// Local filesystem path of the audio file.
    pub location: PathBuf,
    /// Zero when the source did not know the length.
    pub duration: Duration,
}

/// Where a library was loaded from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// JSON document printed by the Rekordbox database reader.
    ReaderJson,
    /// Plain directory of audio files.
    Directory,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::ReaderJson => f.write_str("rekordbox"),
            SourceKind::Directory => f.write_str("directory"),
        }
    }
}

/// An ingested library: the track table plus the playlist tree.
///
/// Immutable once built; the quiz shares it behind an `Arc`.
#[derive(Debug)]
pub struct Library {
    tracks: Vec<Track>,
    by_id: HashMap<TrackId, usize>,
    playlists: PlaylistNode,
    source: SourceKind,
}

impl Library {
    /// Build a library from tracks in ingestion order. Later duplicates of an
    /// id are dropped and returned so the caller can report them.
    pub fn new(
        tracks: Vec<Track>,
        playlists: PlaylistNode,
        source: SourceKind,
    ) -> (Self, Vec<TrackId>) {
        let mut kept: Vec<Track> = Vec::with_capacity(tracks.len());
        let mut by_id: HashMap<TrackId, usize> = HashMap::with_capacity(tracks.len());
        let mut duplicates = Vec::new();

        for track in tracks {
            if by_id.contains_key(&track.id) {
                duplicates.push(track.id);
                continue;
            }
            by_id.insert(track.id.clone(), kept.len());
            kept.push(track);
        }

        let library = Self {
            tracks: kept,
            by_id,
            playlists,
            source,
        };
        (library, duplicates)
    }

    pub fn track(&self, id: &TrackId) -> Option<&Track> {
        self.by_id.get(id).map(|&i| &self.tracks[i])
    }

    /// Every ingested id, in ingestion order.
    pub fn all_ids(&self) -> Vec<TrackId> {
        self.tracks.iter().map(|t| t.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[cfg(test)]
    pub fn playlists(&self) -> &PlaylistNode {
        &self.playlists
    }

    pub fn playlist_index(&self) -> PlaylistIndex<'_> {
        PlaylistIndex::new(&self.playlists)
    }

    pub fn source(&self) -> SourceKind {
        self.source
    }
}
