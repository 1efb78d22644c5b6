use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use lofty::prelude::{Accessor, AudioFile, TaggedFileExt};
use tracing::debug;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::error::IngestError;
use super::model::{Library, SourceKind, Track, TrackId};
use super::playlist::PlaylistNode;

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Walk `dir` and read every audio file it contains, sorted by path.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let mut tracks: Vec<Track> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if path.is_file()
            && (settings.include_hidden || !is_hidden(path))
            && is_audio_file(path, settings)
        {
            tracks.push(read_track(path));
        }
    }

    tracks.sort_by(|a, b| a.location.cmp(&b.location));
    tracks
}

fn read_track(path: &Path) -> Track {
    let mut name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string();
    let mut artist = String::new();
    let mut album = String::new();
    let mut genre = String::new();
    let mut duration = Duration::ZERO;

    match lofty::read_from_path(path) {
        Ok(tagged) => {
            duration = tagged.properties().duration();

            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(v) = tag.title().filter(|v| !v.trim().is_empty()) {
                    name = v.trim().to_string();
                }
                if let Some(v) = tag.artist() {
                    artist = v.trim().to_string();
                }
                if let Some(v) = tag.album() {
                    album = v.trim().to_string();
                }
                if let Some(v) = tag.genre() {
                    genre = v.trim().to_string();
                }
            }
        }
        Err(e) => debug!(path = %path.display(), error = %e, "no readable tags"),
    }

    Track {
        id: TrackId::new(path.to_string_lossy()),
        name,
        artist,
        album,
        genre,
        key: String::new(),
        bpm: None,
        location: path.to_path_buf(),
        duration,
    }
}

/// Scan `dir` into a library with one playlist per directory holding audio.
pub fn directory_library(dir: &Path, settings: &LibrarySettings) -> Result<Library, IngestError> {
    let tracks = scan(dir, settings);
    if tracks.is_empty() {
        return Err(IngestError::NoTracks(dir.to_path_buf()));
    }

    let mut groups: BTreeMap<String, Vec<TrackId>> = BTreeMap::new();
    for track in &tracks {
        let rel = track
            .location
            .parent()
            .and_then(|p| p.strip_prefix(dir).ok())
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let name = if rel.is_empty() { ".".to_string() } else { rel };
        groups.entry(name).or_default().push(track.id.clone());
    }

    let children = groups
        .into_iter()
        .map(|(name, ids)| PlaylistNode::playlist(name, ids))
        .collect();
    let root_name = dir
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("ROOT")
        .to_string();

    // Paths are unique, so no duplicates can come back here.
    let (library, _) = Library::new(
        tracks,
        PlaylistNode::folder(root_name, children),
        SourceKind::Directory,
    );
    Ok(library)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::PlaylistIndex;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn is_audio_file_matches_configured_extensions_case_insensitive() {
        let settings = LibrarySettings::default();
        assert!(is_audio_file(Path::new("/tmp/a.mp3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.MP3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.flac"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.aiff"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a.txt"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a"), &settings));
    }

    #[test]
    fn scan_filters_non_audio_and_falls_back_to_file_stem() {
        let dir = tempdir().unwrap();

        fs::write(dir.path().join("b.MP3"), b"not a real mp3").unwrap();
        fs::write(dir.path().join("A.ogg"), b"not a real ogg").unwrap();
        fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();

        let tracks = scan(dir.path(), &LibrarySettings::default());
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].name, "A");
        assert_eq!(tracks[1].name, "b");
        assert_eq!(tracks[0].duration, Duration::ZERO);
        assert_eq!(tracks[0].id.as_str(), tracks[0].location.to_string_lossy());
    }

    #[test]
    fn scan_respects_include_hidden_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden.mp3"), b"not real").unwrap();
        fs::write(dir.path().join("visible.mp3"), b"not real").unwrap();

        let tracks = scan(dir.path(), &LibrarySettings::default());

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].name, "visible");
    }

    #[test]
    fn scan_respects_recursive_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("child.mp3"), b"not real").unwrap();

        let settings = LibrarySettings {
            recursive: false,
            ..LibrarySettings::default()
        };
        let tracks = scan(dir.path(), &settings);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].name, "root");
    }

    #[test]
    fn directory_library_groups_tracks_by_folder() {
        let dir = tempdir().unwrap();
        let house = dir.path().join("house");
        let techno = dir.path().join("techno");
        fs::create_dir_all(&house).unwrap();
        fs::create_dir_all(&techno).unwrap();
        fs::write(dir.path().join("loose.mp3"), b"x").unwrap();
        fs::write(house.join("h1.mp3"), b"x").unwrap();
        fs::write(house.join("h2.mp3"), b"x").unwrap();
        fs::write(techno.join("t1.mp3"), b"x").unwrap();

        let library = directory_library(dir.path(), &LibrarySettings::default()).unwrap();
        assert_eq!(library.len(), 4);
        assert_eq!(library.source(), SourceKind::Directory);

        let names: Vec<String> = library
            .playlist_index()
            .entries()
            .into_iter()
            .map(|e| format!("{}:{}", e.name, e.track_count))
            .collect();
        assert_eq!(names, vec![".:1", "house:2", "techno:1"]);
        assert_eq!(PlaylistIndex::flatten(library.playlists()).len(), 4);
    }

    #[test]
    fn directory_library_without_audio_is_an_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let err = directory_library(dir.path(), &LibrarySettings::default()).unwrap_err();
        assert!(matches!(err, IngestError::NoTracks(_)));
    }
}
