//! Library ingestion: turns a path on disk into a [`Library`].
//!
//! Two sources are understood: the JSON document printed by the Rekordbox
//! database reader, and a plain directory of audio files.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use crate::config::{LibrarySettings, SourceSetting};

use super::error::IngestError;
use super::location::resolve_location;
use super::model::{Library, SourceKind, Track, TrackId};
use super::playlist::PlaylistNode;
use super::scan::directory_library;

/// Load the library at `path` according to `settings.source`.
pub fn load_library(path: &Path, settings: &LibrarySettings) -> Result<Library, IngestError> {
    let kind = match settings.source {
        SourceSetting::ReaderJson => SourceKind::ReaderJson,
        SourceSetting::Directory => SourceKind::Directory,
        SourceSetting::Auto => detect_source(path)?,
    };

    let library = match kind {
        SourceKind::ReaderJson => {
            let text = fs::read_to_string(path).map_err(|source| IngestError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            parse_reader_json(&text, path)?
        }
        SourceKind::Directory => directory_library(path, settings)?,
    };

    info!(
        path = %path.display(),
        source = %kind,
        tracks = library.len(),
        "library loaded"
    );
    Ok(library)
}

fn detect_source(path: &Path) -> Result<SourceKind, IngestError> {
    if path.is_dir() {
        return Ok(SourceKind::Directory);
    }
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        Ok(SourceKind::ReaderJson)
    } else {
        Err(IngestError::UnsupportedSource(path.to_path_buf()))
    }
}

#[derive(Debug, Deserialize)]
struct ReaderDocument {
    #[serde(default)]
    source: Option<String>,
    tracks: Vec<ReaderTrack>,
    #[serde(default)]
    playlists: Option<ReaderNode>,
}

#[derive(Debug, Deserialize)]
struct ReaderTrack {
    #[serde(deserialize_with = "id_string")]
    id: String,
    #[serde(default, alias = "name")]
    title: Option<String>,
    #[serde(default)]
    artist: Option<String>,
    #[serde(default)]
    album: Option<String>,
    #[serde(default)]
    genre: Option<String>,
    #[serde(default, alias = "tonality")]
    key: Option<String>,
    #[serde(default)]
    bpm: Option<f64>,
    #[serde(default)]
    location: Option<String>,
    /// Seconds.
    #[serde(default)]
    duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ReaderNode {
    Folder {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        children: Vec<ReaderNode>,
    },
    Playlist {
        #[serde(default)]
        name: Option<String>,
        #[serde(default, rename = "trackIds", deserialize_with = "id_list")]
        track_ids: Vec<String>,
        #[serde(default, rename = "isSmartPlaylist")]
        is_smart: bool,
    },
}

/// Ids may be written as strings or bare numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl From<RawId> for String {
    fn from(id: RawId) -> Self {
        match id {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

fn id_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let ids = Vec::<RawId>::deserialize(deserializer)?;
    Ok(ids.into_iter().map(String::from).collect())
}

/// Parse the reader's JSON output. `origin` is only used for error messages.
pub fn parse_reader_json(text: &str, origin: &Path) -> Result<Library, IngestError> {
    let doc: ReaderDocument = serde_json::from_str(text)?;
    if doc.tracks.is_empty() {
        return Err(IngestError::NoTracks(origin.to_path_buf()));
    }

    let from_database = doc.source.as_deref() == Some("database");

    let tracks: Vec<Track> = doc.tracks.into_iter().map(convert_track).collect();
    let playlists = match doc.playlists {
        Some(node) => convert_node(node, from_database),
        None => PlaylistNode::folder("ROOT", Vec::new()),
    };
    // The tree must hang off a folder so "all playlists" has a single root.
    let playlists = match playlists {
        root @ PlaylistNode::Folder { .. } => root,
        single => PlaylistNode::folder("ROOT", vec![single]),
    };

    let (library, duplicates) = Library::new(tracks, playlists, SourceKind::ReaderJson);
    for id in duplicates {
        warn!(%id, "duplicate track id in library, keeping the first");
    }
    Ok(library)
}

fn convert_track(raw: ReaderTrack) -> Track {
    let duration = raw
        .duration
        .filter(|d| d.is_finite() && *d > 0.0)
        .map(Duration::from_secs_f64)
        .unwrap_or(Duration::ZERO);

    Track {
        id: TrackId::new(raw.id),
        name: raw.title.unwrap_or_default(),
        artist: raw.artist.unwrap_or_default(),
        album: raw.album.unwrap_or_default(),
        genre: raw.genre.unwrap_or_default(),
        key: raw.key.unwrap_or_default(),
        bpm: raw.bpm.filter(|b| b.is_finite() && *b > 0.0),
        location: resolve_location(raw.location.as_deref().unwrap_or_default()),
        duration,
    }
}

fn convert_node(node: ReaderNode, from_database: bool) -> PlaylistNode {
    match node {
        ReaderNode::Folder { name, children } => PlaylistNode::Folder {
            name: name.unwrap_or_else(|| "Unnamed".to_string()),
            children: children
                .into_iter()
                .map(|c| convert_node(c, from_database))
                .collect(),
        },
        ReaderNode::Playlist {
            name,
            track_ids,
            is_smart,
        } => {
            // A live database cannot resolve smart playlist rules.
            let track_ids = if is_smart && from_database {
                Vec::new()
            } else {
                track_ids.into_iter().map(TrackId::new).collect()
            };
            PlaylistNode::Playlist {
                name: name.unwrap_or_else(|| "Unnamed".to_string()),
                track_ids,
                is_smart,
            }
        }
    }
}
