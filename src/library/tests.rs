use std::path::{Path, PathBuf};
use std::time::Duration;

use super::error::IngestError;
use super::ingest::parse_reader_json;
use super::*;
use crate::config::{LibrarySettings, RevealField, SourceSetting};

fn ids(raw: &[&str]) -> Vec<TrackId> {
    raw.iter().map(|s| TrackId::from(*s)).collect()
}

fn sample_tree() -> PlaylistNode {
    PlaylistNode::folder(
        "ROOT",
        vec![
            PlaylistNode::folder(
                "Sets",
                vec![
                    PlaylistNode::playlist("Warmup", ids(&["1", "2", "3"])),
                    PlaylistNode::playlist("Peak", ids(&["3", "4"])),
                    PlaylistNode::folder("Empty", Vec::new()),
                ],
            ),
            PlaylistNode::playlist("Favourites", ids(&["2", "5"])),
        ],
    )
}

#[test]
fn flatten_playlist_returns_its_references() {
    let node = PlaylistNode::playlist("p", ids(&["b", "a", "c"]));
    assert_eq!(PlaylistIndex::flatten(&node), ids(&["b", "a", "c"]));
}

#[test]
fn flatten_folder_deduplicates_shared_tracks() {
    let tree = sample_tree();
    let flat = PlaylistIndex::flatten(&tree);
    assert_eq!(flat, ids(&["1", "2", "3", "4", "5"]));

    let sets = &tree.children()[0];
    assert_eq!(PlaylistIndex::flatten(sets), ids(&["1", "2", "3", "4"]));
}

#[test]
fn flatten_empty_folder_and_smart_playlist_yield_nothing() {
    let smart = PlaylistNode::Playlist {
        name: "Smart".into(),
        track_ids: Vec::new(),
        is_smart: true,
    };
    assert!(PlaylistIndex::flatten(&smart).is_empty());
    assert!(PlaylistIndex::flatten(&PlaylistNode::folder("f", Vec::new())).is_empty());
}

#[test]
fn node_at_walks_child_indices() {
    let tree = sample_tree();
    let index = PlaylistIndex::new(&tree);

    assert_eq!(index.node_at(&PlaylistPath::default()).unwrap().name(), "ROOT");
    assert_eq!(index.node_at(&PlaylistPath(vec![0, 1])).unwrap().name(), "Peak");
    assert_eq!(index.node_at(&PlaylistPath(vec![1])).unwrap().name(), "Favourites");
    assert!(index.node_at(&PlaylistPath(vec![0, 7])).is_none());
    assert!(index.node_at(&PlaylistPath(vec![1, 0])).is_none());
}

#[test]
fn entries_list_depth_first_with_counts() {
    let tree = sample_tree();
    let entries = PlaylistIndex::new(&tree).entries();

    let rows: Vec<(usize, &str, NodeKind, usize)> = entries
        .iter()
        .map(|e| (e.depth, e.name.as_str(), e.kind, e.track_count))
        .collect();
    assert_eq!(
        rows,
        vec![
            (0, "Sets", NodeKind::Folder, 4),
            (1, "Warmup", NodeKind::Playlist, 3),
            (1, "Peak", NodeKind::Playlist, 2),
            (1, "Empty", NodeKind::Folder, 0),
            (0, "Favourites", NodeKind::Playlist, 2),
        ]
    );
    assert_eq!(entries[2].path, PlaylistPath(vec![0, 1]));
    assert_eq!(entries[2].path.to_string(), "/0/1");
}

const READER_JSON: &str = r#"{
  "source": "database",
  "tracks": [
    {"id": "101", "title": "Strings of Life", "artist": "Rhythim Is Rhythim", "album": "",
     "location": "/music/strings.mp3", "duration": 367.5},
    {"id": 102, "title": "Energy Flash", "artist": "Joey Beltram", "album": "Energy Flash",
     "location": "file://localhost/music/energy%20flash.flac", "duration": null,
     "genre": "Techno", "key": "8A", "bpm": 132.0},
    {"id": "101", "title": "Duplicate", "location": "/music/dup.mp3", "duration": 10}
  ],
  "playlists": {
    "name": "ROOT",
    "type": "folder",
    "children": [
      {"name": "Classics", "type": "playlist", "trackIds": ["101", "102"]},
      {"name": "Rules", "type": "playlist", "trackIds": ["101"], "isSmartPlaylist": true},
      {"name": "Crates", "type": "folder", "children": []}
    ]
  }
}"#;

#[test]
fn reader_json_builds_tracks_and_tree() {
    let library = parse_reader_json(READER_JSON, Path::new("reader.json")).unwrap();
    assert_eq!(library.source(), SourceKind::ReaderJson);
    assert_eq!(library.len(), 2);
    assert_eq!(library.all_ids(), ids(&["101", "102"]));

    let strings = library.track(&TrackId::from("101")).unwrap();
    assert_eq!(strings.name, "Strings of Life");
    assert_eq!(strings.duration, Duration::from_secs_f64(367.5));
    assert_eq!(strings.location, PathBuf::from("/music/strings.mp3"));

    let energy = library.track(&TrackId::from("102")).unwrap();
    assert_eq!(energy.duration, Duration::ZERO);
    assert_eq!(energy.key, "8A");
    assert_eq!(energy.bpm, Some(132.0));
    #[cfg(unix)]
    assert_eq!(energy.location, PathBuf::from("/music/energy flash.flac"));

    let index = library.playlist_index();
    let entries = index.entries();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].track_count, 2);
    // Smart playlists from a live database are emptied.
    assert_eq!(entries[1].kind, NodeKind::SmartPlaylist);
    assert_eq!(entries[1].track_count, 0);
}

#[test]
fn reader_json_keeps_smart_playlists_from_exports() {
    let text = READER_JSON.replace("\"database\"", "\"xml\"");
    let library = parse_reader_json(&text, Path::new("reader.json")).unwrap();
    let entries = library.playlist_index().entries();
    assert_eq!(entries[1].track_count, 1);
}

#[test]
fn reader_json_accepts_numeric_playlist_ids() {
    let text = r#"{
      "tracks": [
        {"id": 1, "title": "One", "location": "/music/one.mp3"},
        {"id": "2", "title": "Two", "location": "/music/two.mp3"}
      ],
      "playlists": {"type": "folder", "children": [
        {"name": "Mixed", "type": "playlist", "trackIds": [1, "2"]}
      ]}
    }"#;
    let library = parse_reader_json(text, Path::new("reader.json")).unwrap();
    let index = library.playlist_index();
    let mixed = index.node_at(&PlaylistPath(vec![0])).unwrap();
    assert_eq!(PlaylistIndex::flatten(mixed), ids(&["1", "2"]));
}

#[test]
fn reader_json_without_tracks_is_an_error() {
    let err = parse_reader_json(
        r#"{"source": "database", "tracks": [], "playlists": {"type": "folder", "children": []}}"#,
        Path::new("empty.json"),
    )
    .unwrap_err();
    assert!(matches!(err, IngestError::NoTracks(_)));

    let err = parse_reader_json("{not json", Path::new("bad.json")).unwrap_err();
    assert!(matches!(err, IngestError::Json(_)));
}

#[test]
fn load_library_detects_source_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let json = dir.path().join("library.json");
    std::fs::write(&json, READER_JSON).unwrap();

    let settings = LibrarySettings::default();
    let library = load_library(&json, &settings).unwrap();
    assert_eq!(library.source(), SourceKind::ReaderJson);

    let xml = dir.path().join("rekordbox.xml");
    std::fs::write(&xml, "<DJ_PLAYLISTS/>").unwrap();
    assert!(matches!(
        load_library(&xml, &settings),
        Err(IngestError::UnsupportedSource(_))
    ));

    let forced = LibrarySettings {
        source: SourceSetting::ReaderJson,
        ..LibrarySettings::default()
    };
    assert!(matches!(
        load_library(&dir.path().join("missing.json"), &forced),
        Err(IngestError::Io { .. })
    ));
}

fn track() -> Track {
    Track {
        id: TrackId::from("7"),
        name: "  Song  ".into(),
        artist: "Artist".into(),
        album: String::new(),
        genre: "House".into(),
        key: "4A".into(),
        bpm: Some(124.0),
        location: PathBuf::from("/music/file-name.mp3"),
        duration: Duration::from_secs(300),
    }
}

#[test]
fn reveal_text_joins_configured_fields() {
    let t = track();
    assert_eq!(
        reveal_text(&t, &[RevealField::Artist, RevealField::Title], " - "),
        "Artist - Song"
    );
    assert_eq!(
        reveal_text(&t, &[RevealField::Key, RevealField::Bpm, RevealField::Album], " | "),
        "4A | 124 BPM"
    );
    assert_eq!(reveal_text(&t, &[RevealField::Filename], ""), "file-name");
}

#[test]
fn reveal_text_falls_back_when_fields_are_empty() {
    let mut t = track();
    assert_eq!(reveal_text(&t, &[RevealField::Album], " - "), "Song");

    t.name = String::new();
    assert_eq!(reveal_text(&t, &[], " - "), "file-name");
}
